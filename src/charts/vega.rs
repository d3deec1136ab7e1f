//! Vega-Lite Backend
//! Translates a `ChartSpec` into a Vega-Lite v5 document for the browser.

use crate::charts::spec::{AxisSort, Channel, ChartSpec};
use serde_json::{json, Map, Value};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

pub struct VegaLiteRenderer;

impl VegaLiteRenderer {
    /// Build the Vega-Lite document. The chart stretches to its container.
    pub fn to_json(spec: &ChartSpec) -> Value {
        let mut encoding = Map::new();
        encoding.insert("x".to_string(), Self::channel(&spec.encoding.x));
        encoding.insert("y".to_string(), Self::channel(&spec.encoding.y));
        if let Some(color) = &spec.encoding.color {
            encoding.insert("color".to_string(), Self::channel(color));
        }
        if !spec.encoding.tooltip.is_empty() {
            let tooltip: Vec<Value> = spec
                .encoding
                .tooltip
                .iter()
                .map(|c| json!({ "field": c.field, "type": c.field_type.as_str() }))
                .collect();
            encoding.insert("tooltip".to_string(), Value::Array(tooltip));
        }

        json!({
            "$schema": VEGA_LITE_SCHEMA,
            "width": "container",
            "data": { "values": spec.data },
            "mark": spec.mark.as_str(),
            "encoding": encoding,
        })
    }

    fn channel(channel: &Channel) -> Value {
        let mut out = Map::new();
        out.insert("field".to_string(), json!(channel.field));
        out.insert("type".to_string(), json!(channel.field_type.as_str()));
        if let Some(format) = &channel.format {
            out.insert("axis".to_string(), json!({ "format": format }));
        }
        if let Some(sort) = channel.sort {
            let sort = match sort {
                AxisSort::Ascending => "ascending",
                AxisSort::DescendingByX => "-x",
            };
            out.insert("sort".to_string(), json!(sort));
        }
        Value::Object(out)
    }
}
