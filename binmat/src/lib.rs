pub mod codec;
pub mod consts;
pub mod dispatch;
pub mod errors;
pub mod export;
pub mod params;
pub mod sampler;
pub mod signal;
pub mod stats;
pub mod store;
pub mod worker;
pub mod zones;

// re-exports
pub use codec::{load_matrix, save_matrix};
pub use dispatch::compute_matrix;
pub use export::{save_bed, save_tabulated, save_values};
pub use errors::MatrixError;
pub use params::{Parameters, RefPoint};
pub use signal::{RangeValues, ScoreFile, ScoreReader, ScoreSource};
pub use stats::Statistic;
pub use store::{GroupMatrix, MatrixStore, SortKey, SortOrder};
