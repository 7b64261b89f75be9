use binmat_core::models::{Feature, Strand};

use crate::errors::MatrixError;
use crate::params::{Parameters, RefPoint};

///
/// One contiguous genomic sub-range mapped to a fixed number of bins.
/// Coordinates are signed: the first zone of a feature near the start of
/// its chromosome can begin below zero.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    pub start: i64,
    pub end: i64,
    pub bins: usize,
}

///
/// The ordered zones for one feature, plus a flag raised when the
/// upstream zone would reach past the start of the chromosome. The flag
/// is a non-fatal diagnostic for the call site.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ZonePlan {
    pub zones: Vec<Zone>,
    pub near_chrom_start: bool,
}

impl ZonePlan {
    /// Genomic range `[start, end)` covering every zone.
    pub fn span(&self) -> (i64, i64) {
        let start = self.zones.first().map_or(0, |z| z.start);
        let end = self.zones.last().map_or(0, |z| z.end);
        (start, end)
    }
}

///
/// Plan the zones for one feature.
///
/// The upstream/downstream bin counts are swapped for minus-strand
/// features so that "before" and "after" follow the feature's 5'→3'
/// direction; the sampled row is additionally reversed end-to-end later
/// (see the worker). Both steps together give a strand-consistent
/// profile; neither works without the other.
///
pub fn plan_zones(feature: &Feature, params: &Parameters) -> Result<ZonePlan, MatrixError> {
    let bin_size = params.bin_size as i64;
    let fstart = feature.start as i64;
    let fend = feature.end as i64;

    // after (a) and before (b) bin counts, in 5'→3' orientation
    let (after, before) = match feature.strand {
        Strand::Reverse => (params.upstream_bins() as i64, params.downstream_bins() as i64),
        Strand::Forward => (params.downstream_bins() as i64, params.upstream_bins() as i64),
    };

    let zones = if params.body > 0 {
        if feature.width() < params.bin_size {
            return Err(MatrixError::RegionTooShort(
                feature.location(),
                params.bin_size,
            ));
        }
        // the body zone is normalized to body/bin_size bins regardless of
        // the true feature length; this is what makes unequal-length
        // regions comparable
        vec![
            Zone {
                start: fstart - before * bin_size,
                end: fstart,
                bins: before as usize,
            },
            Zone {
                start: fstart,
                end: fend,
                bins: params.body_bins(),
            },
            Zone {
                start: fend,
                end: fend + after * bin_size,
                bins: after as usize,
            },
        ]
    } else {
        let anchor = match params.ref_point {
            // TSS anchors on the strand-swapped start
            RefPoint::Tss => match feature.strand {
                Strand::Reverse => fend,
                Strand::Forward => fstart,
            },
            // TES and center anchor on the raw coordinates
            RefPoint::Tes => fend,
            RefPoint::Center => fstart + (fend - fstart) / 2,
        };
        vec![
            Zone {
                start: anchor - before * bin_size,
                end: anchor,
                bins: before as usize,
            },
            Zone {
                start: anchor,
                end: anchor + after * bin_size,
                bins: after as usize,
            },
        ]
    };

    Ok(ZonePlan {
        zones,
        near_chrom_start: fstart - before * bin_size < 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn feature(start: u32, end: u32, strand: Strand) -> Feature {
        Feature {
            chrom: "chr1".to_string(),
            start,
            end,
            name: "x".to_string(),
            score: None,
            strand,
        }
    }

    fn params(bin_size: u32, upstream: u32, downstream: u32, body: u32) -> Parameters {
        Parameters {
            bin_size,
            upstream,
            downstream,
            body,
            ..Default::default()
        }
    }

    #[rstest]
    fn test_body_mode_plus_strand() {
        let plan = plan_zones(
            &feature(1000, 2000, Strand::Forward),
            &params(10, 20, 30, 100),
        )
        .unwrap();
        assert_eq!(
            plan.zones,
            vec![
                Zone { start: 980, end: 1000, bins: 2 },
                Zone { start: 1000, end: 2000, bins: 10 },
                Zone { start: 2000, end: 2030, bins: 3 },
            ]
        );
        assert!(!plan.near_chrom_start);
    }

    #[rstest]
    fn test_body_mode_minus_strand_swaps_bin_counts() {
        let plan = plan_zones(
            &feature(1000, 2000, Strand::Reverse),
            &params(10, 20, 30, 100),
        )
        .unwrap();
        // before = downstream bins, after = upstream bins
        assert_eq!(
            plan.zones,
            vec![
                Zone { start: 970, end: 1000, bins: 3 },
                Zone { start: 1000, end: 2000, bins: 10 },
                Zone { start: 2000, end: 2020, bins: 2 },
            ]
        );
    }

    #[rstest]
    fn test_body_zone_bins_are_independent_of_feature_length() {
        let short = plan_zones(
            &feature(1000, 1050, Strand::Forward),
            &params(10, 0, 0, 100),
        )
        .unwrap();
        let long = plan_zones(
            &feature(1000, 9000, Strand::Forward),
            &params(10, 0, 0, 100),
        )
        .unwrap();
        assert_eq!(short.zones[1].bins, 10);
        assert_eq!(long.zones[1].bins, 10);
    }

    #[rstest]
    fn test_body_mode_rejects_regions_shorter_than_one_bin() {
        let result = plan_zones(
            &feature(1000, 1005, Strand::Forward),
            &params(10, 20, 20, 100),
        );
        assert!(matches!(result, Err(MatrixError::RegionTooShort(_, _))));
    }

    #[rstest]
    fn test_tss_mode_plus_strand_anchors_on_start() {
        let plan = plan_zones(
            &feature(1000, 2000, Strand::Forward),
            &params(10, 20, 20, 0),
        )
        .unwrap();
        assert_eq!(
            plan.zones,
            vec![
                Zone { start: 980, end: 1000, bins: 2 },
                Zone { start: 1000, end: 1020, bins: 2 },
            ]
        );
    }

    #[rstest]
    fn test_tss_mode_minus_strand_anchors_on_end() {
        let plan = plan_zones(
            &feature(1000, 2000, Strand::Reverse),
            &params(10, 20, 20, 0),
        )
        .unwrap();
        assert_eq!(
            plan.zones,
            vec![
                Zone { start: 1980, end: 2000, bins: 2 },
                Zone { start: 2000, end: 2020, bins: 2 },
            ]
        );
    }

    #[rstest]
    fn test_tes_mode_anchors_on_raw_end_for_both_strands() {
        let p = Parameters {
            ref_point: RefPoint::Tes,
            ..params(10, 20, 20, 0)
        };
        let plus = plan_zones(&feature(1000, 2000, Strand::Forward), &p).unwrap();
        let minus = plan_zones(&feature(1000, 2000, Strand::Reverse), &p).unwrap();
        assert_eq!(plus.zones[0].end, 2000);
        assert_eq!(minus.zones[0].end, 2000);
    }

    #[rstest]
    fn test_center_mode_anchors_on_midpoint() {
        let p = Parameters {
            ref_point: RefPoint::Center,
            ..params(10, 20, 20, 0)
        };
        let plan = plan_zones(&feature(1000, 2000, Strand::Forward), &p).unwrap();
        assert_eq!(plan.zones[0].end, 1500);
        assert_eq!(plan.zones[1].start, 1500);
    }

    #[rstest]
    fn test_near_chrom_start_flag() {
        let plan = plan_zones(&feature(5, 500, Strand::Forward), &params(10, 20, 20, 0)).unwrap();
        assert!(plan.near_chrom_start);
        assert_eq!(plan.zones[0].start, -15);
    }

    #[rstest]
    fn test_zero_length_upstream_contributes_no_bins() {
        let plan = plan_zones(&feature(1000, 2000, Strand::Forward), &params(10, 0, 20, 0)).unwrap();
        assert_eq!(plan.zones[0].bins, 0);
        assert_eq!(plan.zones[0].start, plan.zones[0].end);
    }
}
