use std::path::Path;

use anyhow::{Result, anyhow};
use bigtools::BigWigRead;
use bigtools::utils::reopen::ReopenableFile;

use crate::signal::{RangeValues, ScoreReader};

///
/// Score reader backed by a bigWig file. Ranges are materialized as
/// dense per-base arrays; bases without an interval stay NaN.
///
/// Chromosomes missing from the file header are reported as no-data,
/// the way genome-wide track readers behave: a region on an unlisted
/// contig simply has no score.
///
pub struct BigWigReader {
    reader: BigWigRead<ReopenableFile>,
}

impl BigWigReader {
    pub fn open(path: &Path) -> Result<Self> {
        let path = path
            .to_str()
            .ok_or_else(|| anyhow!("bigWig path is not valid UTF-8: {:?}", path))?;
        let reader = BigWigRead::open_file(path)
            .map_err(|e| anyhow!("Failed to open bigWig file {}: {}", path, e))?;
        Ok(BigWigReader { reader })
    }
}

impl ScoreReader for BigWigReader {
    fn values(&mut self, chrom: &str, start: u32, end: u32) -> Result<RangeValues> {
        let chrom_length = match self.reader.chroms().iter().find(|c| c.name == chrom) {
            Some(info) => info.length,
            None => return Ok(RangeValues::NoData),
        };

        let mut values = vec![f64::NAN; (end.saturating_sub(start)) as usize];

        // the query has to stay within the chromosome; bases past its end
        // remain NaN
        let query_end = end.min(chrom_length);
        if start < query_end {
            let intervals = self
                .reader
                .get_interval(chrom, start, query_end)
                .map_err(|e| anyhow!("Failed to read {}:{}-{}: {}", chrom, start, end, e))?;
            for interval in intervals {
                let interval =
                    interval.map_err(|e| anyhow!("Failed to read {}: {}", chrom, e))?;
                let lo = interval.start.max(start) - start;
                let hi = interval.end.min(query_end) - start;
                for v in &mut values[lo as usize..hi as usize] {
                    *v = interval.value as f64;
                }
            }
        }

        Ok(RangeValues::Values(values))
    }
}
