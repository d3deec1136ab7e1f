//! Charts module - Chart descriptions and rendering backends

mod plotter;
mod renderer;
mod spec;
mod vega;

pub use plotter::{ChartPlotter, CITY_FIELD, COUNT_FIELD, LINE_CHART_TITLE, TYPE_FIELD, YEAR_FIELD};
pub use renderer::{RenderError, StaticChartRenderer, PALETTE};
pub use spec::{AxisSort, Channel, ChartSpec, Datum, Encoding, FieldType, Mark, Row};
pub use vega::{VegaLiteRenderer, VEGA_LITE_SCHEMA};
