pub mod bedgraph;
pub mod bigwig;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use bedgraph::BedGraphReader;
pub use bigwig::BigWigReader;

///
/// The answer a score source gives for one coordinate range.
///
#[derive(Debug, Clone, PartialEq)]
pub enum RangeValues {
    /// A dense per-base array covering the requested range. Positions
    /// with no recorded signal are NaN, which is distinct from zero.
    Values(Vec<f64>),
    /// The chromosome does not exist in this source.
    UnknownChrom,
    /// The chromosome may exist but the source has nothing usable for
    /// this range.
    NoData,
}

///
/// An open handle onto a score source. Handles are never shared between
/// workers; each batch opens its own.
///
pub trait ScoreReader {
    fn values(&mut self, chrom: &str, start: u32, end: u32) -> Result<RangeValues>;
}

///
/// A score source a reader can be opened from. The source itself is
/// cheap and shareable; `open` is called once per batch.
///
pub trait ScoreSource {
    fn open(&self) -> Result<Box<dyn ScoreReader>>;

    /// Short human-readable kind, used in aggregate warnings.
    fn kind(&self) -> &'static str;
}

///
/// A score file on disk, selected once at run start.
///
#[derive(Debug, Clone)]
pub enum ScoreFile {
    BigWig(PathBuf),
    BedGraph(PathBuf),
}

impl ScoreFile {
    ///
    /// Pick the source implementation from the file extension:
    /// `.bw`/`.bigwig` files are read as bigWig, everything else as
    /// (optionally gzipped) bedGraph text.
    ///
    pub fn from_path<T: AsRef<Path>>(path: T) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if name.ends_with(".bw") || name.ends_with(".bigwig") {
            ScoreFile::BigWig(path)
        } else {
            ScoreFile::BedGraph(path)
        }
    }
}

impl ScoreSource for ScoreFile {
    fn open(&self) -> Result<Box<dyn ScoreReader>> {
        match self {
            ScoreFile::BigWig(path) => Ok(Box::new(BigWigReader::open(path)?)),
            ScoreFile::BedGraph(path) => Ok(Box::new(BedGraphReader::open(path)?)),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ScoreFile::BigWig(_) => "bigwig",
            ScoreFile::BedGraph(_) => "bedgraph",
        }
    }
}

///
/// Fetch `[start, end)` from a reader, allowing a negative start: the
/// part of the range that lies before the chromosome begins is padded
/// with NaN so local indices stay aligned with the requested range.
///
pub fn fetch_padded(
    reader: &mut dyn ScoreReader,
    chrom: &str,
    start: i64,
    end: i64,
) -> Result<RangeValues> {
    if end <= 0 {
        return Ok(RangeValues::Values(vec![f64::NAN; (end - start).max(0) as usize]));
    }
    if start < 0 {
        return match reader.values(chrom, 0, end as u32)? {
            RangeValues::Values(values) => {
                let mut padded = vec![f64::NAN; (-start) as usize];
                padded.extend(values);
                Ok(RangeValues::Values(padded))
            }
            other => Ok(other),
        };
    }
    reader.values(chrom, start as u32, end as u32)
}
