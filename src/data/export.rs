use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{render_text, Listing};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Aucune donnée à exporter")]
    NothingToExport,
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Formats and payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        })
    }
}

/// `annonces-export-YYYY-MM-DD.<ext>`
pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "annonces-export-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// A serialized export ready to be handed to a [`DownloadSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Serializers
// ---------------------------------------------------------------------------

/// Render listings as CSV.
///
/// The header is the field names of the first listing in stored order. Every
/// cell is rendered as text and then JSON-quoted, numbers included; fields a
/// listing lacks become `""`. Rows end with `\n`.
pub fn to_csv(listings: &[Listing]) -> Result<String, ExportError> {
    let first = listings.first().ok_or(ExportError::NothingToExport)?;
    let headers: Vec<&str> = first.field_names().collect();

    let mut out = headers.join(",");
    out.push('\n');

    // The writer renders a record with no fields as `""`; those rows stay blank.
    if headers.is_empty() {
        out.push_str(&"\n".repeat(listings.len()));
        return Ok(out);
    }

    // Cells are pre-quoted, so the writer must not quote again.
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for listing in listings {
        let row = headers
            .iter()
            .map(|h| {
                let text = render_text(listing.get(h));
                serde_json::to_string(&JsonValue::String(text))
            })
            .collect::<Result<Vec<_>, _>>()?;
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
    out.push_str(&String::from_utf8_lossy(&bytes));
    Ok(out)
}

/// Render listings as a pretty-printed JSON array (2-space indent), keeping
/// every field exactly as stored.
pub fn to_json(listings: &[Listing]) -> Result<String, ExportError> {
    if listings.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    let array: Vec<&serde_json::Map<String, JsonValue>> =
        listings.iter().map(Listing::fields).collect();
    Ok(serde_json::to_string_pretty(&array)?)
}

/// Serialize `listings` in `format` and name the file after `date`.
pub fn build_payload(
    listings: &[Listing],
    format: ExportFormat,
    date: NaiveDate,
) -> Result<ExportPayload, ExportError> {
    let text = match format {
        ExportFormat::Csv => to_csv(listings)?,
        ExportFormat::Json => to_json(listings)?,
    };
    Ok(ExportPayload {
        file_name: export_file_name(format, date),
        mime: format.mime(),
        bytes: text.into_bytes(),
    })
}

/// Build the payload and hand it to `sink`. Nothing reaches the sink when
/// there is nothing to export.
pub fn export(
    listings: &[Listing],
    format: ExportFormat,
    date: NaiveDate,
    sink: &mut dyn DownloadSink,
) -> Result<Option<PathBuf>, ExportError> {
    let payload = build_payload(listings, format, date)?;
    sink.deliver(&payload)
}

// ---------------------------------------------------------------------------
// Download sinks
// ---------------------------------------------------------------------------

/// Receives a finished export and turns it into a file.
///
/// Returns the written path, or `None` when the user declined to save.
pub trait DownloadSink {
    fn deliver(&mut self, payload: &ExportPayload) -> Result<Option<PathBuf>, ExportError>;
}

fn write_payload(path: &Path, payload: &ExportPayload) -> Result<PathBuf, ExportError> {
    std::fs::write(path, &payload.bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

/// Native "save as" dialog pre-filled with the export file name.
pub struct SaveDialogSink;

impl DownloadSink for SaveDialogSink {
    fn deliver(&mut self, payload: &ExportPayload) -> Result<Option<PathBuf>, ExportError> {
        let ext = Path::new(&payload.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let file = rfd::FileDialog::new()
            .set_title("Export listings")
            .set_file_name(&payload.file_name)
            .add_filter(payload.mime, &[ext])
            .save_file();

        match file {
            Some(path) => write_payload(&path, payload).map(Some),
            None => Ok(None),
        }
    }
}

/// Writes every payload into a fixed directory under its own file name.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, payload: &ExportPayload) -> Result<Option<PathBuf>, ExportError> {
        write_payload(&self.dir.join(&payload.file_name), payload).map(Some)
    }
}
