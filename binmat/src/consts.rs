/// Number of regions handed to one worker at a time. A batch amortizes the
/// cost of opening a score-file handle without starving the pool.
pub const BATCH_SIZE: usize = 400;

/// Fraction of a group's regions that must be unscored (strictly exceeded)
/// before an aggregate warning is printed.
pub const UNSCORED_WARN_FRACTION: f64 = 0.75;
