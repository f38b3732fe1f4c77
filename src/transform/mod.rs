/// Column derivations applied between loading and charting.
///
/// ```text
///   Arc<Table> (immutable source)
///        │ clone
///        ▼
///   ┌──────────┐   filter / drop / impute / season / z-score / rank / join
///   │ pipeline  │   one DeriveStep list per dataset
///   └──────────┘
///        │
///        ▼
///   transient Table → chart builders
/// ```

pub mod aggregate;
pub mod impute;
pub mod pipeline;
pub mod season;
pub mod standardize;
