/// Data layer: listing records, loading, filtering, statistics and export.
///
/// Architecture:
/// ```text
///  data.json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ListingStore (empty on failure)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ ListingStore  │  Vec<Listing>, read-only for the session
///   └──────────────┘
///        │
///        ├──────────────┬──────────────┐
///        ▼              ▼              ▼
///   ┌──────────┐   ┌─────────┐   ┌──────────┐
///   │  filter   │   │  stats  │   │  export  │
///   └──────────┘   └─────────┘   └──────────┘
///   FilterSpec →    Summary        CSV / JSON →
///   visible idx                    DownloadSink
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
