use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use anyhow::{Result, anyhow};

use binmat_core::utils::get_dynamic_reader;

use crate::signal::{RangeValues, ScoreReader};

///
/// Score reader backed by a (optionally gzipped) bedGraph file, held in
/// memory as one dense per-base array per chromosome. Bases not covered
/// by any bedGraph interval are NaN.
///
/// Chromosomes absent from the file are reported as unknown, the way an
/// alignment-file reader reports a contig missing from its header.
///
pub struct BedGraphReader {
    chroms: HashMap<String, Vec<f64>>,
}

impl BedGraphReader {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(path)?;
        BedGraphReader::from_reader(reader)
            .map_err(|e| anyhow!("Failed to parse bedGraph file {}: {}", path.display(), e))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut chroms: HashMap<String, Vec<f64>> = HashMap::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim_end();
            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with("track")
                || line.starts_with("browser")
            {
                continue;
            }

            let mut fields = line.split('\t');
            let chrom = fields
                .next()
                .ok_or_else(|| anyhow!("empty bedGraph line"))?;
            let start: usize = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| anyhow!("bad start in bedGraph line: {}", line))?;
            let end: usize = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| anyhow!("bad end in bedGraph line: {}", line))?;
            let value: f64 = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| anyhow!("bad value in bedGraph line: {}", line))?;

            let track = chroms.entry(chrom.to_string()).or_default();
            if track.len() < end {
                track.resize(end, f64::NAN);
            }
            track[start..end].fill(value);
        }

        Ok(BedGraphReader { chroms })
    }
}

impl ScoreReader for BedGraphReader {
    fn values(&mut self, chrom: &str, start: u32, end: u32) -> Result<RangeValues> {
        let Some(track) = self.chroms.get(chrom) else {
            return Ok(RangeValues::UnknownChrom);
        };

        let start = start as usize;
        let end = end as usize;
        let mut values = vec![f64::NAN; end.saturating_sub(start)];
        let covered = end.min(track.len());
        if start < covered {
            values[..covered - start].copy_from_slice(&track[start..covered]);
        }
        Ok(RangeValues::Values(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    const TRACK: &str = "track type=bedGraph\nchr1\t0\t10\t1.5\nchr1\t10\t20\t3\nchr2\t5\t8\t2\n";

    #[rstest]
    fn test_dense_values() {
        let mut reader = BedGraphReader::from_reader(TRACK.as_bytes()).unwrap();
        let RangeValues::Values(values) = reader.values("chr1", 5, 15).unwrap() else {
            panic!("expected values");
        };
        assert_eq!(values[..5], [1.5, 1.5, 1.5, 1.5, 1.5]);
        assert_eq!(values[5..], [3.0, 3.0, 3.0, 3.0, 3.0]);
    }

    #[rstest]
    fn test_uncovered_bases_are_nan() {
        let mut reader = BedGraphReader::from_reader(TRACK.as_bytes()).unwrap();
        let RangeValues::Values(values) = reader.values("chr2", 0, 10).unwrap() else {
            panic!("expected values");
        };
        assert!(values[..5].iter().all(|v| v.is_nan()));
        assert_eq!(values[5..8], [2.0, 2.0, 2.0]);
        assert!(values[8..].iter().all(|v| v.is_nan()));
    }

    #[rstest]
    fn test_unknown_chrom() {
        let mut reader = BedGraphReader::from_reader(TRACK.as_bytes()).unwrap();
        assert_eq!(
            reader.values("chrM", 0, 10).unwrap(),
            RangeValues::UnknownChrom
        );
    }

    #[rstest]
    fn test_range_past_track_end_is_nan_padded() {
        let mut reader = BedGraphReader::from_reader(TRACK.as_bytes()).unwrap();
        let RangeValues::Values(values) = reader.values("chr1", 15, 25).unwrap() else {
            panic!("expected values");
        };
        assert_eq!(values.len(), 10);
        assert_eq!(values[..5], [3.0, 3.0, 3.0, 3.0, 3.0]);
        assert!(values[5..].iter().all(|v| v.is_nan()));
    }
}
