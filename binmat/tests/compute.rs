use std::collections::HashMap;

use anyhow::Result;
use ndarray::Array2;
use pretty_assertions::assert_eq;
use rstest::*;

use binmat::codec::{load_matrix, save_matrix};
use binmat::dispatch::compute_matrix;
use binmat::errors::MatrixError;
use binmat::params::Parameters;
use binmat::signal::{RangeValues, ScoreReader, ScoreSource};
use binmat::stats::Statistic;
use binmat::store::{SortKey, SortOrder};
use binmat_core::models::FeatureGroups;

/// Thread-safe in-memory score source; every open() hands out an
/// independent reader over the same tracks.
struct MockSource {
    chroms: HashMap<String, Vec<f64>>,
    unknown_is_no_data: bool,
}

struct MockReader {
    chroms: HashMap<String, Vec<f64>>,
    unknown_is_no_data: bool,
}

impl MockSource {
    fn constant(chrom: &str, length: usize, value: f64) -> Self {
        let mut chroms = HashMap::new();
        chroms.insert(chrom.to_string(), vec![value; length]);
        MockSource {
            chroms,
            unknown_is_no_data: false,
        }
    }

    fn gradient(chrom: &str, length: usize) -> Self {
        let mut chroms = HashMap::new();
        chroms.insert(chrom.to_string(), (0..length).map(|p| p as f64).collect());
        MockSource {
            chroms,
            unknown_is_no_data: false,
        }
    }
}

impl ScoreSource for MockSource {
    fn open(&self) -> Result<Box<dyn ScoreReader>> {
        Ok(Box::new(MockReader {
            chroms: self.chroms.clone(),
            unknown_is_no_data: self.unknown_is_no_data,
        }))
    }

    fn kind(&self) -> &'static str {
        "bigwig"
    }
}

impl ScoreReader for MockReader {
    fn values(&mut self, chrom: &str, start: u32, end: u32) -> Result<RangeValues> {
        let Some(track) = self.chroms.get(chrom) else {
            return Ok(if self.unknown_is_no_data {
                RangeValues::NoData
            } else {
                RangeValues::UnknownChrom
            });
        };
        let start = start as usize;
        let end = end as usize;
        let mut values = vec![f64::NAN; end - start];
        let covered = end.min(track.len());
        if start < covered {
            values[..covered - start].copy_from_slice(&track[start..covered]);
        }
        Ok(RangeValues::Values(values))
    }
}

fn groups_from(text: &str) -> FeatureGroups {
    FeatureGroups::from_reader(text.as_bytes()).unwrap()
}

fn tss_params() -> Parameters {
    Parameters {
        bin_size: 10,
        upstream: 20,
        downstream: 20,
        body: 0,
        ..Default::default()
    }
}

fn rows_equal_bitwise(a: &Array2<f64>, b: &Array2<f64>) -> bool {
    a.shape() == b.shape()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| (x.is_nan() && y.is_nan()) || x == y)
}

#[rstest]
fn test_two_groups_end_to_end() {
    let source = MockSource::constant("chr1", 5000, 2.0);
    let groups = groups_from(
        "chr1\t1000\t2000\tgeneA\t0\t+\nchr1\t2500\t3000\tgeneB\t0\t-\n#peaks\n\
         chr1\t4000\t4100\tgeneC\n#background\n",
    );

    let store = compute_matrix(&source, &groups, &tss_params()).unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.groups()[0].label, "peaks");
    assert_eq!(store.groups()[1].label, "background");
    assert_eq!(store.groups()[0].matrix.shape(), &[2, 4]);
    assert_eq!(store.groups()[1].matrix.shape(), &[1, 4]);
    for group in store.groups() {
        assert!(group.matrix.iter().all(|v| *v == 2.0));
        assert!(group.row_avgs.iter().all(|v| *v == 2.0));
    }
}

#[rstest]
fn test_minus_strand_anchoring_through_pipeline() {
    let source = MockSource::gradient("chr1", 3000);
    let groups = groups_from("chr1\t1000\t2000\tg\t0\t-\n");

    let store = compute_matrix(&source, &groups, &tss_params()).unwrap();

    let row = store.groups()[0].matrix.row(0);
    let values: Vec<f64> = row.iter().copied().collect();
    // anchored on the feature end, then reversed end-to-end
    assert_eq!(values, vec![2014.5, 2004.5, 1994.5, 1984.5]);
}

#[rstest]
fn test_parallel_result_matches_sequential() {
    let source = MockSource::gradient("chr1", 30000);

    // enough regions for several batches of 400
    let mut bed = String::new();
    for i in 0..1000 {
        let start = 1000 + (i % 250) * 100;
        let strand = if i % 3 == 0 { "-" } else { "+" };
        bed.push_str(&format!(
            "chr1\t{}\t{}\tg{}\t0\t{}\n",
            start,
            start + 80 + (i % 7) * 10,
            i,
            strand
        ));
    }
    let groups = groups_from(&bed);
    assert!(groups.total_features() > 800);

    let sequential = compute_matrix(&source, &groups, &tss_params()).unwrap();
    let parallel_params = Parameters {
        proc_number: 4,
        ..tss_params()
    };
    let parallel = compute_matrix(&source, &groups, &parallel_params).unwrap();

    assert_eq!(sequential.len(), parallel.len());
    for (a, b) in sequential.groups().iter().zip(parallel.groups()) {
        assert_eq!(a.features, b.features);
        assert!(rows_equal_bitwise(&a.matrix, &b.matrix));
    }
}

#[rstest]
fn test_all_unscored_group_is_an_error() {
    let mut source = MockSource::constant("chr1", 5000, 1.0);
    source.unknown_is_no_data = true;
    let groups = groups_from("chrUn\t1000\t2000\ta\nchrUn\t3000\t4000\tb\n");

    let result = compute_matrix(&source, &groups, &tss_params());

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MatrixError>(),
        Some(MatrixError::EmptyResult(_))
    ));
}

#[rstest]
fn test_save_load_round_trip() {
    let source = MockSource::gradient("chr1", 5000);
    let groups = groups_from(
        "chr1\t1000\t1030\tshort\t0\t+\nchr1\t2000\t3000\tlong\t0\t-\n#peaks\n\
         chr1\t4000\t4500\tother\n#rest\n",
    );
    // nan_after_end leaves NaN entries in the short region's row
    let params = Parameters {
        bin_size: 10,
        upstream: 20,
        downstream: 40,
        body: 0,
        nan_after_end: true,
        ..Default::default()
    };

    let store = compute_matrix(&source, &groups, &params).unwrap();
    assert!(store.groups()[0].matrix.iter().any(|v| v.is_nan()));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matrix.mat.gz");
    save_matrix(&store, &path).unwrap();
    let loaded = load_matrix(&path).unwrap();

    assert_eq!(loaded.params, store.params);
    assert_eq!(loaded.len(), store.len());
    for (a, b) in store.groups().iter().zip(loaded.groups()) {
        assert_eq!(a.label, b.label);
        assert!(rows_equal_bitwise(&a.matrix, &b.matrix));
        for (fa, fb) in a.features.iter().zip(&b.features) {
            assert_eq!(fa.chrom, fb.chrom);
            assert_eq!(fa.start, fb.start);
            assert_eq!(fa.end, fb.end);
            assert_eq!(fa.name, fb.name);
            assert_eq!(fa.strand, fb.strand);
        }
    }
}

#[rstest]
fn test_sort_and_relabel_survive_persistence() {
    let source = MockSource::constant("chr1", 10000, 1.0);
    let groups = groups_from(
        "chr1\t1000\t2000\ta\nchr1\t3000\t3100\tb\nchr1\t5000\t5500\tc\n#genes\n",
    );

    let mut store = compute_matrix(&source, &groups, &tss_params()).unwrap();
    store.sort(SortKey::RegionLength, SortOrder::Descend);
    store.relabel(&["sorted".to_string()]).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matrix.mat.gz");
    save_matrix(&store, &path).unwrap();
    let loaded = load_matrix(&path).unwrap();

    assert_eq!(loaded.groups()[0].label, "sorted");
    let widths: Vec<u32> = loaded.groups()[0]
        .features
        .iter()
        .map(|f| f.width())
        .collect();
    assert_eq!(widths, vec![1000, 500, 100]);
}

#[rstest]
fn test_forward_strand_unaffected_by_strandedness_of_track() {
    let source = MockSource::gradient("chr1", 3000);
    let groups = groups_from("chr1\t1000\t2000\tg\t0\t+\n");

    let store = compute_matrix(&source, &groups, &tss_params()).unwrap();

    let values: Vec<f64> = store.groups()[0].matrix.row(0).iter().copied().collect();
    assert_eq!(values, vec![984.5, 994.5, 1004.5, 1014.5]);
}

#[rstest]
fn test_row_average_uses_configured_statistic_default_mean() {
    let source = MockSource::gradient("chr1", 3000);
    let groups = groups_from("chr1\t1000\t2000\tg\t0\t+\n");

    let store = compute_matrix(&source, &groups, &tss_params()).unwrap();

    let avg = store.groups()[0].row_avgs[0];
    assert_eq!(avg, Statistic::Mean.reduce(&[984.5, 994.5, 1004.5, 1014.5]));
}
