/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  sources  │  four immutable Arc<Table>s, loaded once
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  row predicates → filtered copy
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod sources;
