/// Data layer: core types, loading, caching, filtering and aggregation.
///
/// Architecture:
/// ```text
///  restaurants .csv
///        │
///        ▼
///   ┌──────────┐      ┌──────────────┐
///   │  loader   │ ◄─── │ DatasetCache │  one parse per source key
///   └──────────┘      └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, type index, rejected rows
///   └──────────┘
///        │  + FilterCriteria
///        ▼
///   ┌──────────┐
///   │  filter   │  conjunctive predicates → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ aggregate │  means, group counts, histograms, search
///   └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
