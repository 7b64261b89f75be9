use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use ndarray::Array2;

use binmat_core::models::feature_groups::DEFAULT_GROUP_LABEL;
use binmat_core::models::{Feature, Strand};
use binmat_core::utils::get_dynamic_reader;

use crate::errors::MatrixError;
use crate::params::Parameters;
use crate::store::MatrixStore;

/// Format a matrix value so it reads back bit-for-bit: shortest
/// round-trippable decimal for finite values, the literal `nan` for
/// masked entries.
pub(crate) fn fmt_value(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        value.to_string()
    }
}

fn parse_value(raw: &str) -> Result<f64, MatrixError> {
    if raw == "nan" {
        return Ok(f64::NAN);
    }
    raw.parse::<f64>()
        .map_err(|_| MatrixError::Format(format!("bad numeric value: {}", raw)))
}

///
/// Save a matrix store as a gzipped text stream:
///
/// - one `@key:value<TAB>key:value...` header line with the parameters,
/// - one line per region (`chrom start end name score strand bin1 ...`,
///   tab-separated),
/// - a `#label` line after each group's regions.
///
pub fn save_matrix<T: AsRef<Path>>(store: &MatrixStore, path: T) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());

    writeln!(encoder, "@{}", store.params.to_header())?;

    for group in store.groups() {
        for (i, feature) in group.features.iter().enumerate() {
            let score = fmt_value(group.row_avgs[i]);
            let bins = group
                .matrix
                .row(i)
                .iter()
                .map(|v| fmt_value(*v))
                .collect::<Vec<_>>()
                .join("\t");
            writeln!(
                encoder,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                feature.chrom, feature.start, feature.end, feature.name, score, feature.strand,
                bins
            )?;
        }
        writeln!(encoder, "#{}", group.label)?;
    }

    encoder.finish()?;
    Ok(())
}

///
/// Load a matrix store back from its persisted representation. Any
/// malformed header or row is fatal; partial recovery could silently
/// corrupt downstream matrices. The per-row summary is recomputed as
/// the NaN-aware row mean.
///
pub fn load_matrix<T: AsRef<Path>>(path: T) -> Result<MatrixStore> {
    let path = path.as_ref();
    let reader = get_dynamic_reader(path)
        .with_context(|| format!("Failed to open matrix file: {}", path.display()))?;

    let mut params: Option<Parameters> = None;
    let mut features: Vec<Feature> = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut groups: Vec<(String, Vec<Feature>, Vec<Vec<f64>>)> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('@') {
            params = Some(Parameters::from_header(header)?);
            continue;
        }

        if let Some(label) = line.strip_prefix('#') {
            if !features.is_empty() {
                groups.push((
                    label.to_string(),
                    std::mem::take(&mut features),
                    std::mem::take(&mut rows),
                ));
            }
            continue;
        }

        let (feature, bins) = parse_region_line(line)?;
        features.push(feature);
        rows.push(bins);
    }

    // rows never closed by a marker belong to one default group
    if !features.is_empty() {
        groups.push((DEFAULT_GROUP_LABEL.to_string(), features, rows));
    }

    let params = params.ok_or_else(|| {
        MatrixError::Format(format!("no @ header line in {}", path.display()))
    })?;
    let cols = params.matrix_cols();

    let mut store = MatrixStore::new(params);
    for (label, features, rows) in groups {
        let mut flat = Vec::with_capacity(rows.len() * cols);
        for row in &rows {
            if row.len() != cols {
                return Err(MatrixError::Format(format!(
                    "row with {} bins where {} were expected (group '{}')",
                    row.len(),
                    cols,
                    label
                ))
                .into());
            }
            flat.extend_from_slice(row);
        }
        let matrix = Array2::from_shape_vec((rows.len(), cols), flat)
            .map_err(|e| MatrixError::Format(e.to_string()))?;
        store.push_group(label, features, matrix);
    }

    Ok(store)
}

fn parse_region_line(line: &str) -> Result<(Feature, Vec<f64>), MatrixError> {
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() < 7 {
        return Err(MatrixError::Format(format!("truncated region line: {}", line)));
    }

    let start: u32 = parts[1]
        .parse()
        .map_err(|_| MatrixError::Format(format!("bad start: {}", line)))?;
    let end: u32 = parts[2]
        .parse()
        .map_err(|_| MatrixError::Format(format!("bad end: {}", line)))?;
    let score = parse_value(parts[4])?;
    let strand = Strand::from_str(parts[5]).unwrap_or_default();

    let bins = parts[6..]
        .iter()
        .map(|raw| parse_value(raw))
        .collect::<Result<Vec<f64>, MatrixError>>()?;

    let feature = Feature {
        chrom: parts[0].to_string(),
        start,
        end,
        name: parts[3].to_string(),
        score: if score.is_nan() { None } else { Some(score) },
        strand,
    };

    Ok((feature, bins))
}
