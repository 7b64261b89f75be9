use std::fmt::{self, Display};
use std::str::FromStr;

use ndarray::{Array2, Axis};

use binmat_core::models::Feature;

use crate::errors::MatrixError;
use crate::params::Parameters;
use crate::stats::{Statistic, row_summaries};

///
/// One named group: the merged matrix, the accepted features (1:1 and
/// in order with the matrix rows), a per-row summary vector, and, after
/// a length-based sort, the per-row length in bins used downstream for
/// rendering.
///
#[derive(Debug, Clone)]
pub struct GroupMatrix {
    pub label: String,
    pub features: Vec<Feature>,
    pub matrix: Array2<f64>,
    pub row_avgs: Vec<f64>,
    pub bin_lengths: Option<Vec<usize>>,
}

///
/// The grouped result of one run: groups in first-insertion order, plus
/// the parameters that produced them.
///
#[derive(Debug, Clone)]
pub struct MatrixStore {
    pub params: Parameters,
    groups: Vec<GroupMatrix>,
}

/// Key a sort is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    RegionLength,
    Stat(Statistic),
}

impl FromStr for SortKey {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "region_length" => Ok(SortKey::RegionLength),
            other => Ok(SortKey::Stat(Statistic::from_str(other)?)),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::RegionLength => write!(f, "region_length"),
            SortKey::Stat(stat) => write!(f, "{}", stat),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascend,
    Descend,
}

impl FromStr for SortOrder {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascend" => Ok(SortOrder::Ascend),
            "descend" => Ok(SortOrder::Descend),
            _ => Err(MatrixError::UnknownSortOrder(s.to_string())),
        }
    }
}

impl MatrixStore {
    pub fn new(params: Parameters) -> Self {
        MatrixStore {
            params,
            groups: Vec::new(),
        }
    }

    ///
    /// Append a group. The per-row summary starts out as the NaN-aware
    /// row mean; a later sort replaces it with the sort key.
    ///
    pub fn push_group(&mut self, label: String, features: Vec<Feature>, matrix: Array2<f64>) {
        let row_avgs = row_summaries(&matrix, Statistic::Mean);
        self.groups.push(GroupMatrix {
            label,
            features,
            matrix,
            row_avgs,
            bin_lengths: None,
        });
    }

    pub fn groups(&self) -> &[GroupMatrix] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    ///
    /// Sort every group's rows by the given key. Rows, features and the
    /// per-row summary are permuted jointly; descending order is the
    /// exact reverse of the ascending permutation.
    ///
    pub fn sort(&mut self, key: SortKey, order: SortOrder) {
        let upstream_bins = self.params.upstream_bins();
        let bin_size = self.params.bin_size;

        for group in &mut self.groups {
            let keys: Vec<f64> = match key {
                SortKey::RegionLength => {
                    group.features.iter().map(|f| f.width() as f64).collect()
                }
                SortKey::Stat(stat) => row_summaries(&group.matrix, stat),
            };

            let mut perm: Vec<usize> = (0..keys.len()).collect();
            perm.sort_by(|&i, &j| keys[i].total_cmp(&keys[j]));
            if order == SortOrder::Descend {
                perm.reverse();
            }

            group.matrix = group.matrix.select(Axis(0), &perm);
            group.features = perm.iter().map(|&i| group.features[i].clone()).collect();
            group.row_avgs = perm.iter().map(|&i| keys[i]).collect();
            group.bin_lengths = match key {
                SortKey::RegionLength => Some(
                    group
                        .features
                        .iter()
                        .map(|f| upstream_bins + (f.width() / bin_size) as usize)
                        .collect(),
                ),
                SortKey::Stat(_) => None,
            };
        }
    }

    ///
    /// Rename every group, preserving positional correspondence with the
    /// current label order. Nothing is mutated unless the new labels are
    /// the right count and pairwise distinct.
    ///
    pub fn relabel(&mut self, labels: &[String]) -> Result<(), MatrixError> {
        if labels.len() != self.groups.len() {
            return Err(MatrixError::RelabelCount(labels.len(), self.groups.len()));
        }
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(MatrixError::RelabelDuplicate(label.clone()));
            }
        }

        for (group, label) in self.groups.iter_mut().zip(labels) {
            group.label = label.clone();
        }
        Ok(())
    }
}

impl Display for MatrixStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: usize = self.groups.iter().map(|g| g.features.len()).sum();
        write!(
            f,
            "MatrixStore with {} groups and {} rows of {} bins.",
            self.len(),
            rows,
            self.params.matrix_cols()
        )
    }
}
