/// Data layer: core types, loading, column registry and filtering.
///
/// Architecture:
/// ```text
///  fileUrl (http(s) / file:// / path)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch bytes → decode first sheet → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Row>, columns of row 0
///   └──────────┘
///        │                      │
///        ▼                      ▼
///   ┌──────────┐          ┌──────────┐
///   │ columns   │          │  filter   │  (columns, mode) → row indices
///   └──────────┘          └──────────┘
/// ```

pub mod columns;
pub mod filter;
pub mod loader;
pub mod model;
