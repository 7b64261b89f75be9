use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::RegionFileError;

/// Placeholder used when a region line carries no name column.
pub const NO_NAME: &str = "No name";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "-" => Ok(Strand::Reverse),
            // everything else (including ".") is treated as forward
            _ => Ok(Strand::Forward),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

///
/// Feature struct, the representation of one scored interval:
/// a gene, a peak, or any other region a matrix row is computed for.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
    pub name: String,
    pub score: Option<f64>,
    pub strand: Strand,
}

impl Feature {
    ///
    /// Parse a feature from a BED-like tab-separated line.
    ///
    /// Only the first three columns are required; name, score and strand
    /// are picked up when present.
    ///
    pub fn from_bed_line(line: &str) -> Result<Self, RegionFileError> {
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 3 {
            return Err(RegionFileError::Malformed(line.to_string()));
        }

        let start: u32 = parts[1]
            .parse()
            .map_err(|_| RegionFileError::Malformed(line.to_string()))?;
        let end: u32 = parts[2]
            .parse()
            .map_err(|_| RegionFileError::Malformed(line.to_string()))?;

        if end < start {
            return Err(RegionFileError::NegativeWidth(line.to_string()));
        }

        let name = parts
            .get(3)
            .filter(|s| !s.is_empty())
            .map_or_else(|| NO_NAME.to_string(), |s| s.to_string());
        let score = parts.get(4).and_then(|s| s.parse::<f64>().ok());
        let strand = parts
            .get(5)
            .map(|s| Strand::from_str(s).unwrap_or_default())
            .unwrap_or_default();

        Ok(Feature {
            chrom: parts[0].to_string(),
            start,
            end,
            name,
            score,
            strand,
        })
    }

    ///
    /// Get length of the feature
    ///
    pub fn width(&self) -> u32 {
        self.end - self.start
    }

    /// A compact `name chrom:start-end` location string for diagnostics.
    pub fn location(&self) -> String {
        format!("{} {}:{}-{}", self.name, self.chrom, self.start, self.end)
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.chrom, self.start, self.end, self.name, self.strand
        )
    }
}
