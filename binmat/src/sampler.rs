use crate::stats::Statistic;
use crate::zones::Zone;

///
/// Sample a raw per-base array into bins, zone by zone.
///
/// The array is expected to cover `[zones[0].start, zones[last].end)`;
/// index 0 of the array corresponds to the first zone's start. Within a
/// zone, `bins` evenly spaced sample positions are taken over
/// `[start, end)` (no endpoint) with a step of `(end - start) / bins`.
/// Each position is rounded up and reduced over the half-open window
/// `[pos, pos + step)` with the given statistic. If the feature is short
/// the windows overlap; if it is long they are spaced apart.
///
/// Degenerate zones (no bins, or an empty range) contribute no values.
///
pub fn sample_zones(values: &[f64], zones: &[Zone], stat: Statistic) -> Vec<f64> {
    let Some(first) = zones.first() else {
        return Vec::new();
    };
    let base = first.start;

    let mut samples = Vec::new();
    for zone in zones {
        if zone.bins == 0 || zone.end <= zone.start {
            continue;
        }
        let step = (zone.end - zone.start) as f64 / zone.bins as f64;
        for i in 0..zone.bins {
            let pos = zone.start as f64 + i as f64 * step;
            let index_start = (pos.ceil() as i64 - base).max(0) as usize;
            let index_end = (index_start as f64 + step) as usize;

            let index_start = index_start.min(values.len());
            let index_end = index_end.clamp(index_start, values.len());
            samples.push(stat.reduce(&values[index_start..index_end]));
        }
    }

    samples
}
