use std::collections::HashSet;
use std::fmt::{self, Display};
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::errors::RegionFileError;
use crate::models::Feature;
use crate::utils::get_dynamic_reader;

/// Label assigned to trailing regions that were never closed by a `#` marker.
pub const DEFAULT_GROUP_LABEL: &str = "genes";

///
/// FeatureGroups struct, the representation of a region definition file:
/// an ordered list of named groups, each holding the features that were
/// read between two `#label` delimiter lines.
///
/// Consecutive entries covering the exact same interval are dropped,
/// keeping only the first; the number of dropped duplicates is recorded.
///
#[derive(Debug, Clone)]
pub struct FeatureGroups {
    groups: Vec<(String, Vec<Feature>)>,
    pub duplicates: usize,
    pub total_intervals: usize,
}

impl TryFrom<&Path> for FeatureGroups {
    type Error = RegionFileError;

    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        let reader = get_dynamic_reader(value)
            .map_err(|e| RegionFileError::Malformed(format!("{}: {}", value.display(), e)))?;
        let groups = FeatureGroups::from_reader(reader)?;

        if groups.is_empty() {
            return Err(RegionFileError::EmptyRegionFile(
                value.display().to_string(),
            ));
        }

        Ok(groups)
    }
}

impl TryFrom<PathBuf> for FeatureGroups {
    type Error = RegionFileError;

    fn try_from(value: PathBuf) -> Result<Self, Self::Error> {
        FeatureGroups::try_from(value.as_path())
    }
}

impl FeatureGroups {
    ///
    /// Read grouped features from a BED-like stream.
    ///
    /// A line starting with `#` closes the run of features read so far into
    /// one group, labelled with the text after the hash. Features left over
    /// at the end of the stream form the implicit [DEFAULT_GROUP_LABEL]
    /// group. Group labels already taken get a `_r1`, `_r2`, ... suffix.
    ///
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, RegionFileError> {
        let mut groups: Vec<(String, Vec<Feature>)> = Vec::new();
        let mut used_labels: HashSet<String> = HashSet::new();
        let mut current: Vec<Feature> = Vec::new();
        let mut previous: Option<(String, u32, u32)> = None;
        let mut duplicates = 0;
        let mut total_intervals = 0;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            if line.starts_with("browser") || line.starts_with("track") {
                continue;
            }

            if let Some(label) = line.strip_prefix('#') {
                if current.is_empty() {
                    continue;
                }
                let label = unique_label(label, &used_labels);
                used_labels.insert(label.clone());
                groups.push((label, std::mem::take(&mut current)));
                continue;
            }

            total_intervals += 1;
            let feature = Feature::from_bed_line(line)?;

            // the file is assumed sorted; only the directly preceding
            // interval is compared
            let key = (feature.chrom.clone(), feature.start, feature.end);
            if previous.as_ref() == Some(&key) {
                duplicates += 1;
                continue;
            }
            previous = Some(key);

            current.push(feature);
        }

        if !current.is_empty() {
            let label = unique_label(DEFAULT_GROUP_LABEL, &used_labels);
            groups.push((label, current));
        }

        Ok(FeatureGroups {
            groups,
            duplicates,
            total_intervals,
        })
    }

    pub fn groups(&self) -> &[(String, Vec<Feature>)] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    ///
    /// Total number of features kept across all groups
    ///
    pub fn total_features(&self) -> usize {
        self.groups.iter().map(|(_, features)| features.len()).sum()
    }

    ///
    /// Fraction of parsed interval lines that were consecutive duplicates
    ///
    pub fn duplicate_ratio(&self) -> f64 {
        if self.total_intervals == 0 {
            return 0.0;
        }
        self.duplicates as f64 / self.total_intervals as f64
    }
}

impl Display for FeatureGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FeatureGroups with {} groups and {} features.",
            self.len(),
            self.total_features()
        )
    }
}

fn unique_label(label: &str, used: &HashSet<String>) -> String {
    if !used.contains(label) {
        return label.to_string();
    }
    let mut i = 0;
    loop {
        i += 1;
        let candidate = format!("{}_r{}", label, i);
        if !used.contains(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn parse(text: &str) -> FeatureGroups {
        FeatureGroups::from_reader(text.as_bytes()).unwrap()
    }

    #[rstest]
    fn test_groups_split_on_markers() {
        let groups = parse(
            "chr1\t10\t20\ta\nchr1\t30\t40\tb\n#peaks\nchr2\t5\t15\tc\n#background\n",
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.groups()[0].0, "peaks");
        assert_eq!(groups.groups()[0].1.len(), 2);
        assert_eq!(groups.groups()[1].0, "background");
        assert_eq!(groups.groups()[1].1.len(), 1);
    }

    #[rstest]
    fn test_trailing_features_form_default_group() {
        let groups = parse("chr1\t10\t20\ta\n#peaks\nchr1\t50\t60\tb\n");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.groups()[1].0, DEFAULT_GROUP_LABEL);
    }

    #[rstest]
    fn test_duplicate_labels_are_suffixed() {
        let groups = parse(
            "chr1\t10\t20\ta\n#peaks\nchr1\t30\t40\tb\n#peaks\nchr1\t50\t60\tc\n#peaks\n",
        );
        let labels: Vec<&str> = groups.groups().iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["peaks", "peaks_r1", "peaks_r2"]);
    }

    #[rstest]
    fn test_consecutive_duplicates_are_dropped() {
        let groups = parse(
            "chr1\t10\t20\ta\nchr1\t10\t20\tb\nchr1\t10\t20\tc\nchr1\t30\t40\td\n",
        );
        assert_eq!(groups.total_features(), 2);
        assert_eq!(groups.duplicates, 2);
        assert_eq!(groups.total_intervals, 4);
        assert_eq!(groups.duplicate_ratio(), 0.5);
        // the first of the duplicate run is the one kept
        assert_eq!(groups.groups()[0].1[0].name, "a");
    }

    #[rstest]
    fn test_browser_and_track_lines_are_skipped() {
        let groups = parse("browser position chr1\ntrack name=x\nchr1\t10\t20\ta\n");
        assert_eq!(groups.total_features(), 1);
    }

    #[rstest]
    fn test_marker_without_rows_is_ignored() {
        let groups = parse("#empty\nchr1\t10\t20\ta\n#real\n");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.groups()[0].0, "real");
    }

    #[rstest]
    fn test_input_order_is_preserved() {
        let groups = parse("chr9\t10\t20\tz\nchr1\t5\t6\ta\nchr1\t1\t2\tb\n");
        let names: Vec<&str> = groups.groups()[0]
            .1
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["z", "a", "b"]);
    }
}
