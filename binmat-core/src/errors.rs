use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegionFileError {
    #[error("Error parsing region line: {0}")]
    Malformed(String),

    #[error("Region end is smaller than region start: {0}")]
    NegativeWidth(String),

    #[error("Corrupted file. 0 regions found in the file: {0}")]
    EmptyRegionFile(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
