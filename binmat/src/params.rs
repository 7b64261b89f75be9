use std::collections::HashMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::MatrixError;
use crate::stats::Statistic;

///
/// Anchor coordinate used when no body stretching is requested
/// (body length of zero).
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefPoint {
    #[default]
    Tss,
    Tes,
    Center,
}

impl FromStr for RefPoint {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TSS" | "tss" => Ok(RefPoint::Tss),
            "TES" | "tes" => Ok(RefPoint::Tes),
            "center" => Ok(RefPoint::Center),
            _ => Err(MatrixError::UnknownRefPoint(s.to_string())),
        }
    }
}

impl Display for RefPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefPoint::Tss => write!(f, "TSS"),
            RefPoint::Tes => write!(f, "TES"),
            RefPoint::Center => write!(f, "center"),
        }
    }
}

///
/// The immutable per-run configuration. One value is built up front,
/// validated once, and passed by reference into every component.
///
/// All lengths are in base pairs and have to be exact multiples of
/// `bin_size`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub bin_size: u32,
    pub upstream: u32,
    pub downstream: u32,
    pub body: u32,
    pub ref_point: RefPoint,
    pub avg_type: Statistic,
    pub scale: f64,
    pub min_threshold: Option<f64>,
    pub max_threshold: Option<f64>,
    pub skip_zeros: bool,
    pub missing_data_as_zero: bool,
    pub nan_after_end: bool,
    pub proc_number: usize,
    pub verbose: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            bin_size: 10,
            upstream: 500,
            downstream: 1500,
            body: 0,
            ref_point: RefPoint::Tss,
            avg_type: Statistic::Mean,
            scale: 1.0,
            min_threshold: None,
            max_threshold: None,
            skip_zeros: false,
            missing_data_as_zero: false,
            nan_after_end: false,
            proc_number: 1,
            verbose: false,
        }
    }
}

impl Parameters {
    ///
    /// Check the parameter combination before any computation starts.
    ///
    pub fn validate(&self) -> Result<(), MatrixError> {
        if self.bin_size == 0 {
            return Err(MatrixError::ZeroBinSize);
        }
        if self.body % self.bin_size > 0 {
            return Err(MatrixError::NotMultipleOfBinSize(
                "body",
                self.body,
                self.bin_size,
            ));
        }
        if self.upstream % self.bin_size > 0 {
            return Err(MatrixError::NotMultipleOfBinSize(
                "region before the body",
                self.upstream,
                self.bin_size,
            ));
        }
        if self.downstream % self.bin_size > 0 {
            return Err(MatrixError::NotMultipleOfBinSize(
                "region after the body",
                self.downstream,
                self.bin_size,
            ));
        }
        Ok(())
    }

    pub fn matrix_cols(&self) -> usize {
        ((self.upstream + self.downstream + self.body) / self.bin_size) as usize
    }

    pub fn upstream_bins(&self) -> usize {
        (self.upstream / self.bin_size) as usize
    }

    pub fn downstream_bins(&self) -> usize {
        (self.downstream / self.bin_size) as usize
    }

    pub fn body_bins(&self) -> usize {
        (self.body / self.bin_size) as usize
    }

    ///
    /// Serialize to the persisted header representation:
    /// tab-separated `key:value` pairs.
    ///
    pub fn to_header(&self) -> String {
        let pairs = [
            ("upstream", self.upstream.to_string()),
            ("downstream", self.downstream.to_string()),
            ("body", self.body.to_string()),
            ("bin size", self.bin_size.to_string()),
            ("ref point", self.ref_point.to_string()),
            ("verbose", fmt_bool(self.verbose)),
            ("bin avg type", self.avg_type.to_string()),
            (
                "missing data as zero",
                fmt_bool(self.missing_data_as_zero),
            ),
            ("min threshold", fmt_opt(self.min_threshold)),
            ("max threshold", fmt_opt(self.max_threshold)),
            ("scale", self.scale.to_string()),
            ("skip zeros", fmt_bool(self.skip_zeros)),
            ("nan after end", fmt_bool(self.nan_after_end)),
            ("proc number", self.proc_number.to_string()),
        ];

        pairs
            .iter()
            .map(|(key, value)| format!("{}:{}", key, value))
            .collect::<Vec<_>>()
            .join("\t")
    }

    ///
    /// Rebuild parameters from a persisted header line (without the
    /// leading `@`).
    ///
    pub fn from_header(header: &str) -> Result<Self, MatrixError> {
        let mut values: HashMap<&str, HeaderValue> = HashMap::new();
        for pair in header.split('\t') {
            let (key, raw) = pair
                .split_once(':')
                .ok_or_else(|| MatrixError::Format(format!("bad header pair: {}", pair)))?;
            values.insert(key, HeaderValue::parse(raw));
        }

        Ok(Parameters {
            bin_size: get_u32(&values, "bin size")?,
            upstream: get_u32(&values, "upstream")?,
            downstream: get_u32(&values, "downstream")?,
            body: get_u32(&values, "body")?,
            ref_point: RefPoint::from_str(&get_text(&values, "ref point")?)?,
            avg_type: Statistic::from_str(&get_text(&values, "bin avg type")?)?,
            scale: get_f64(&values, "scale")?,
            min_threshold: get_opt_f64(&values, "min threshold")?,
            max_threshold: get_opt_f64(&values, "max threshold")?,
            skip_zeros: get_bool(&values, "skip zeros")?,
            missing_data_as_zero: get_bool(&values, "missing data as zero")?,
            nan_after_end: get_bool(&values, "nan after end")?,
            proc_number: get_u32(&values, "proc number")? as usize,
            verbose: get_bool(&values, "verbose")?,
        })
    }
}

/// Typed header value: integers first, then the `True`/`False`/`None`
/// literals, everything else stays a string.
#[derive(Debug, Clone, PartialEq)]
enum HeaderValue {
    Int(i64),
    Bool(bool),
    None,
    Text(String),
}

impl HeaderValue {
    fn parse(raw: &str) -> Self {
        if let Ok(value) = raw.parse::<i64>() {
            return HeaderValue::Int(value);
        }
        match raw {
            "True" => HeaderValue::Bool(true),
            "False" => HeaderValue::Bool(false),
            "None" => HeaderValue::None,
            _ => HeaderValue::Text(raw.to_string()),
        }
    }
}

fn fmt_bool(value: bool) -> String {
    if value { "True".into() } else { "False".into() }
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "None".into(),
    }
}

fn get<'a>(
    values: &'a HashMap<&str, HeaderValue>,
    key: &str,
) -> Result<&'a HeaderValue, MatrixError> {
    values
        .get(key)
        .ok_or_else(|| MatrixError::Format(format!("missing header key: {}", key)))
}

fn get_u32(values: &HashMap<&str, HeaderValue>, key: &str) -> Result<u32, MatrixError> {
    match get(values, key)? {
        HeaderValue::Int(v) if *v >= 0 => Ok(*v as u32),
        other => Err(MatrixError::Format(format!(
            "header key '{}' is not a non-negative integer: {:?}",
            key, other
        ))),
    }
}

fn get_bool(values: &HashMap<&str, HeaderValue>, key: &str) -> Result<bool, MatrixError> {
    match get(values, key)? {
        HeaderValue::Bool(v) => Ok(*v),
        other => Err(MatrixError::Format(format!(
            "header key '{}' is not a boolean: {:?}",
            key, other
        ))),
    }
}

fn get_text(values: &HashMap<&str, HeaderValue>, key: &str) -> Result<String, MatrixError> {
    match get(values, key)? {
        HeaderValue::Text(v) => Ok(v.clone()),
        other => Err(MatrixError::Format(format!(
            "header key '{}' is not a string: {:?}",
            key, other
        ))),
    }
}

fn get_f64(values: &HashMap<&str, HeaderValue>, key: &str) -> Result<f64, MatrixError> {
    match get(values, key)? {
        HeaderValue::Int(v) => Ok(*v as f64),
        HeaderValue::Text(v) => v
            .parse::<f64>()
            .map_err(|_| MatrixError::Format(format!("header key '{}' is not a number: {}", key, v))),
        other => Err(MatrixError::Format(format!(
            "header key '{}' is not a number: {:?}",
            key, other
        ))),
    }
}

fn get_opt_f64(
    values: &HashMap<&str, HeaderValue>,
    key: &str,
) -> Result<Option<f64>, MatrixError> {
    match get(values, key)? {
        HeaderValue::None => Ok(None),
        _ => get_f64(values, key).map(Some),
    }
}
