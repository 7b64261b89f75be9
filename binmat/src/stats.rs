use std::fmt::{self, Display};
use std::str::FromStr;

use ndarray::{Array2, Axis};

use crate::errors::MatrixError;

///
/// The closed set of supported reduction statistics. Unknown names are
/// rejected when the configuration is parsed, not when a bin is reduced.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Statistic {
    #[default]
    Mean,
    Median,
    Min,
    Max,
    Sum,
    Std,
}

impl FromStr for Statistic {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(Statistic::Mean),
            "median" => Ok(Statistic::Median),
            "min" => Ok(Statistic::Min),
            "max" => Ok(Statistic::Max),
            "sum" => Ok(Statistic::Sum),
            "std" => Ok(Statistic::Std),
            _ => Err(MatrixError::UnknownStatistic(s.to_string())),
        }
    }
}

impl Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Statistic::Mean => "mean",
            Statistic::Median => "median",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Sum => "sum",
            Statistic::Std => "std",
        };
        write!(f, "{}", name)
    }
}

impl Statistic {
    ///
    /// Reduce a slice of values, ignoring non-finite entries. If every
    /// entry is non-finite the result is NaN, a masked value rather than
    /// a numeric failure.
    ///
    pub fn reduce(&self, values: &[f64]) -> f64 {
        let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return f64::NAN;
        }

        match self {
            Statistic::Mean => finite.iter().sum::<f64>() / finite.len() as f64,
            Statistic::Median => {
                finite.sort_by(f64::total_cmp);
                let mid = finite.len() / 2;
                if finite.len() % 2 == 0 {
                    (finite[mid - 1] + finite[mid]) / 2.0
                } else {
                    finite[mid]
                }
            }
            Statistic::Min => finite.iter().copied().fold(f64::INFINITY, f64::min),
            Statistic::Max => finite.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Statistic::Sum => finite.iter().sum(),
            Statistic::Std => {
                let n = finite.len() as f64;
                let mean = finite.iter().sum::<f64>() / n;
                let var = finite.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
                var.sqrt()
            }
        }
    }
}

/// Apply `stat` across each row of the matrix.
pub fn row_summaries(matrix: &Array2<f64>, stat: Statistic) -> Vec<f64> {
    matrix
        .axis_iter(Axis(0))
        .map(|row| stat.reduce(&row.iter().copied().collect::<Vec<_>>()))
        .collect()
}

/// Apply `stat` down each column of the matrix.
pub fn column_summaries(matrix: &Array2<f64>, stat: Statistic) -> Vec<f64> {
    matrix
        .axis_iter(Axis(1))
        .map(|col| stat.reduce(&col.iter().copied().collect::<Vec<_>>()))
        .collect()
}
