use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("Bin size has to be greater than zero")]
    ZeroBinSize,

    #[error("Length of {0} has to be a multiple of the bin size. Current value {1}, bin size {2}")]
    NotMultipleOfBinSize(&'static str, u32, u32),

    #[error("Unknown averaging statistic: {0}")]
    UnknownStatistic(String),

    #[error("Unknown reference point: {0}")]
    UnknownRefPoint(String),

    #[error("Unknown sort order: {0}")]
    UnknownSortOrder(String),

    #[error("Region shorter than the bin size ({1} bp): {0}")]
    RegionTooShort(String, u32),

    #[error("Could not compute values for any of the regions in group '{0}'")]
    EmptyResult(String),

    #[error("Malformed matrix file: {0}")]
    Format(String),

    #[error("The number of groups ({1}) does not match the number of labels given ({0})")]
    RelabelCount(usize, usize),

    #[error("The group labels given contain repeated names: {0}")]
    RelabelDuplicate(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
