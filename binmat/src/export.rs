use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;

use crate::codec::fmt_value;
use crate::stats::{Statistic, column_summaries};
use crate::store::MatrixStore;

///
/// Write the per-bin column summaries as a plain tab-separated table.
/// One row per bin, first column the bin's genomic offset from the
/// anchor, then a mean and a std column for every group.
///
pub fn save_tabulated<T: AsRef<Path>>(store: &MatrixStore, path: T) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    let mut header = String::from("#bin No.");
    for group in store.groups() {
        header.push_str(&format!("\t{} mean\t{} std", group.label, group.label));
    }
    writeln!(writer, "{}", header)?;

    let means: Vec<Vec<f64>> = store
        .groups()
        .iter()
        .map(|g| column_summaries(&g.matrix, Statistic::Mean))
        .collect();
    let stds: Vec<Vec<f64>> = store
        .groups()
        .iter()
        .map(|g| column_summaries(&g.matrix, Statistic::Std))
        .collect();

    let bin_size = store.params.bin_size as i64;
    let mut offset = -(store.params.upstream as i64);
    for bin in 0..store.params.matrix_cols() {
        let mut line = offset.to_string();
        for group in 0..store.len() {
            line.push('\t');
            line.push_str(&fmt_value(means[group][bin]));
            line.push('\t');
            line.push_str(&fmt_value(stds[group][bin]));
        }
        writeln!(writer, "{}", line)?;
        offset += bin_size;
    }

    writer.flush()?;
    Ok(())
}

///
/// Write the accepted regions back out as BED, in matrix row order,
/// with a `#label` line closing each group.
///
pub fn save_bed<T: AsRef<Path>>(store: &MatrixStore, path: T) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    for group in store.groups() {
        for (i, feature) in group.features.iter().enumerate() {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}",
                feature.chrom,
                feature.start,
                feature.end,
                feature.name,
                fmt_value(group.row_avgs[i]),
                feature.strand
            )?;
        }
        writeln!(writer, "#{}", group.label)?;
    }

    writer.flush()?;
    Ok(())
}

///
/// Dump the raw matrix values, one region per row, for inspection with
/// external tools. Two comment lines lead the table: the group labels
/// with their row counts, and the geometry the bins were computed with.
///
pub fn save_values<T: AsRef<Path>>(store: &MatrixStore, path: T) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    let labels = store
        .groups()
        .iter()
        .map(|g| format!("{}:{}", g.label, g.features.len()))
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(writer, "#{}", labels)?;
    writeln!(
        writer,
        "#downstream:{}\tupstream:{}\tbody:{}\tbin size:{}",
        store.params.downstream, store.params.upstream, store.params.body, store.params.bin_size
    )?;

    for group in store.groups() {
        for row in group.matrix.rows() {
            let line = row
                .iter()
                .map(|v| fmt_value(*v))
                .collect::<Vec<_>>()
                .join("\t");
            writeln!(writer, "{}", line)?;
        }
    }

    writer.flush()?;
    Ok(())
}
