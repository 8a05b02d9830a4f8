use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One synthetic listing, serialized with the viewer's field names.
#[derive(Debug, Serialize)]
struct SampleListing {
    #[serde(rename = "Loyer")]
    rent: i64,
    #[serde(rename = "Pièces")]
    rooms: f64,
    #[serde(rename = "Surface")]
    surface: i64,
    #[serde(rename = "Meublé")]
    furnished: &'static str,
    #[serde(rename = "Adresse")]
    address: String,
    #[serde(rename = "Description courte")]
    short_description: &'static str,
    #[serde(rename = "URL annonce")]
    listing_url: String,
    #[serde(rename = "Portail")]
    source_portal: &'static str,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform pick from a non-empty slice.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_f64() * items.len() as f64) as usize % items.len()]
    }
}

const STREETS: &[&str] = &[
    "Rue de Carouge",
    "Boulevard Carl-Vogt",
    "Rue des Eaux-Vives",
    "Avenue de France",
    "Rue de Lyon",
    "Chemin des Crêts",
    "Rue du Rhône",
    "Route de Chêne",
];
const DESCRIPTIONS: &[&str] = &[
    "Lumineux, proche du lac",
    "Refait à neuf, cuisine équipée",
    "Calme, vue dégagée",
    "Balcon, proche transports",
    "Traversant avec cave",
];
const PORTALS: &[&str] = &["ImmoScout24", "Homegate.ch", "Anibis", "Comparis"];
const ROOMS: &[f64] = &[1.5, 2.0, 2.5, 3.0];

fn generate(n: usize, rng: &mut SimpleRng) -> Vec<SampleListing> {
    (0..n)
        .map(|i| {
            let rooms = *rng.pick(ROOMS);
            let surface = (rooms * 18.0 + rng.next_f64() * 20.0).round() as i64;
            // roughly CHF 25–35 per m², rounded to 10
            let per_m2 = 25.0 + rng.next_f64() * 10.0;
            let rent = ((surface as f64 * per_m2) / 10.0).round() as i64 * 10;
            let portal = *rng.pick(PORTALS);
            SampleListing {
                rent,
                rooms,
                surface,
                furnished: if rng.next_f64() < 0.2 { "Oui" } else { "Non" },
                address: format!("{} {}, Genève", rng.pick(STREETS), 1 + i % 60),
                short_description: *rng.pick(DESCRIPTIONS),
                listing_url: format!(
                    "https://www.{}/annonce/{}",
                    portal.to_ascii_lowercase().trim_end_matches(".ch"),
                    100_000 + i
                ),
                source_portal: portal,
            }
        })
        .collect()
}

fn write_parquet(listings: &[SampleListing], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Loyer", DataType::Int64, false),
        Field::new("Pièces", DataType::Float64, false),
        Field::new("Surface", DataType::Int64, false),
        Field::new("Meublé", DataType::Utf8, false),
        Field::new("Adresse", DataType::Utf8, false),
        Field::new("Description courte", DataType::Utf8, false),
        Field::new("URL annonce", DataType::Utf8, false),
        Field::new("Portail", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(listings.iter().map(|l| l.rent))),
            Arc::new(Float64Array::from_iter_values(listings.iter().map(|l| l.rooms))),
            Arc::new(Int64Array::from_iter_values(listings.iter().map(|l| l.surface))),
            Arc::new(StringArray::from_iter_values(listings.iter().map(|l| l.furnished))),
            Arc::new(StringArray::from_iter_values(listings.iter().map(|l| &l.address))),
            Arc::new(StringArray::from_iter_values(
                listings.iter().map(|l| l.short_description),
            )),
            Arc::new(StringArray::from_iter_values(listings.iter().map(|l| &l.listing_url))),
            Arc::new(StringArray::from_iter_values(listings.iter().map(|l| l.source_portal))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let listings = generate(48, &mut rng);

    let json = serde_json::to_string_pretty(&listings).context("serializing listings")?;
    std::fs::write("data.json", json).context("writing data.json")?;
    write_parquet(&listings, "data.parquet")?;

    println!(
        "Wrote {} listings to data.json and data.parquet",
        listings.len()
    );
    Ok(())
}
