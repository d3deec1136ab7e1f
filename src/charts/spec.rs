//! Chart Specification Module
//! Backend-independent chart descriptions: a mark, channel encodings, and
//! the rows bound to them.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Geometric mark drawn for each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Line,
    Bar,
}

impl Mark {
    pub fn as_str(self) -> &'static str {
        match self {
            Mark::Line => "line",
            Mark::Bar => "bar",
        }
    }
}

/// How values of a field are placed on a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Discrete, evenly spaced, ordered categories.
    Ordinal,
    Quantitative,
    Nominal,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Ordinal => "ordinal",
            FieldType::Quantitative => "quantitative",
            FieldType::Nominal => "nominal",
        }
    }
}

/// Ordering of a discrete axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSort {
    Ascending,
    /// Descending by the value encoded on the x channel.
    DescendingByX,
}

/// One encoding channel bound to a data field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub field: String,
    pub field_type: FieldType,
    /// d3-format string for axis labels, e.g. `d` for integers.
    pub format: Option<String>,
    pub sort: Option<AxisSort>,
}

impl Channel {
    pub fn new(field: &str, field_type: FieldType) -> Self {
        Self {
            field: field.to_string(),
            field_type,
            format: None,
            sort: None,
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn with_sort(mut self, sort: AxisSort) -> Self {
        self.sort = Some(sort);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    pub x: Channel,
    pub y: Channel,
    /// Splits rows into series, one color each.
    pub color: Option<Channel>,
    /// Fields shown on hover.
    pub tooltip: Vec<Channel>,
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Datum {
    Int(i64),
    Text(String),
}

impl Datum {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Datum::Int(v) => Some(*v as f64),
            Datum::Text(_) => None,
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Int(v) => write!(f, "{}", v),
            Datum::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::Text(v.to_string())
    }
}

pub type Row = BTreeMap<String, Datum>;

/// Complete declarative chart: consumed by the Vega-Lite and SVG backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: String,
    pub mark: Mark,
    pub encoding: Encoding,
    pub data: Vec<Row>,
}

impl ChartSpec {
    /// Value of `field` in every row that has it, in data order.
    pub fn values<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Datum> + 'a {
        self.data.iter().filter_map(move |row| row.get(field))
    }
}
