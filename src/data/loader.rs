use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Number, Value as JsonValue};

use super::model::{Listing, ListingStore};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load listings from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "Loyer": 1450, "Pièces": 2.5, ... }, ...]`
/// * `.csv`     – header row of field names, one listing per row
/// * `.parquet` – flat columns of strings, integers, floats or booleans
pub fn load_file(path: &Path) -> Result<ListingStore> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

impl ListingStore {
    /// Load `path`, falling back to an empty store on any failure. The
    /// failure is logged and otherwise swallowed.
    pub fn load_or_empty(path: &Path) -> ListingStore {
        match load_file(path) {
            Ok(store) => {
                log::info!("Loaded {} listings from {}", store.len(), path.display());
                store
            }
            Err(e) => {
                log::error!("Impossible de charger les données ({}): {e:#}", path.display());
                ListingStore::default()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema: a top-level array of flat objects.
fn load_json(path: &Path) -> Result<ListingStore> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<ListingStore> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let JsonValue::Array(records) = root else {
        bail!("Expected top-level JSON array");
    };

    let listings = records
        .into_iter()
        .enumerate()
        .map(|(i, rec)| match rec {
            JsonValue::Object(fields) => Ok(Listing::from_fields(fields)),
            _ => bail!("Row {i} is not a JSON object"),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ListingStore::from_listings(listings))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with field names, one listing per row. Cell types
/// are guessed (integer, float, bool, else string); empty cells become null.
fn load_csv(path: &Path) -> Result<ListingStore> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<ListingStore> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut listings = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let fields: Map<String, JsonValue> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, cell)| (h.clone(), guess_cell_type(cell)))
            .collect();

        listings.push(Listing::from_fields(fields));
    }

    Ok(ListingStore::from_listings(listings))
}

fn guess_cell_type(s: &str) -> JsonValue {
    if s.is_empty() {
        return JsonValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return JsonValue::from(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return JsonValue::Number(n);
        }
    }
    if s == "true" || s == "false" {
        return JsonValue::Bool(s == "true");
    }
    JsonValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one listing per row. Column order becomes field
/// order. Works with files written by Pandas, Polars or `generate_sample`.
fn load_parquet(path: &Path) -> Result<ListingStore> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut listings = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut fields = Map::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = extract_cell(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row}, column '{}'", field.name()))?;
                fields.insert(field.name().clone(), value);
            }
            listings.push(Listing::from_fields(fields));
        }
    }

    Ok(ListingStore::from_listings(listings))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<JsonValue> {
    if col.is_null(row) {
        return Ok(JsonValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            JsonValue::String(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => JsonValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            JsonValue::from(arr.value(row))
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            JsonValue::from(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            float_value(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            float_value(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            JsonValue::Bool(arr.value(row))
        }
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}

/// NaN and infinities have no JSON form and load as null.
fn float_value(f: f64) -> JsonValue {
    Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
}
