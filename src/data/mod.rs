/// Data layer: loading, column mapping, and the two query engines.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RentTable (headers cleaned, State derived)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  load once, publish Arc snapshots by replacement
///   └──────────┘
///        │
///        ├─────────────────────┐
///        ▼                     ▼
///   ┌──────────┐         ┌──────────┐
///   │  lookup   │         │  filter   │  region + bounds → sorted page
///   └──────────┘         └──────────┘
///   (key + schema)        (schema)
/// ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod key;
pub mod loader;
pub mod lookup;
pub mod model;
pub mod schema;
