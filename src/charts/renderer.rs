//! Static Chart Renderer
//! Draws a `ChartSpec` as an SVG document with plotters. The page embeds
//! these as the no-JavaScript fallback of each interactive chart.

use crate::charts::spec::{AxisSort, ChartSpec, Datum, Mark};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Plot(String),
    #[error("Failed to serialize chart: {0}")]
    Json(#[from] serde_json::Error),
}

fn plot_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Plot(err.to_string())
}

/// Color palette for series
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(52, 152, 219),  // Blue
    RGBColor(231, 76, 60),   // Red
    RGBColor(46, 204, 113),  // Green
    RGBColor(155, 89, 182),  // Purple
    RGBColor(243, 156, 18),  // Orange
    RGBColor(26, 188, 156),  // Teal
    RGBColor(233, 30, 99),   // Pink
    RGBColor(0, 188, 212),   // Cyan
    RGBColor(255, 87, 34),   // Deep Orange
    RGBColor(96, 125, 139),  // Blue Grey
];

const BAR_COLOR: RGBColor = PALETTE[0];
const MAX_X_LABELS: usize = 12;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the chart into an SVG string of the given pixel size.
    pub fn render_svg(spec: &ChartSpec, size: (u32, u32)) -> Result<String, RenderError> {
        let mut buf = String::new();
        {
            let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
            root.fill(&WHITE).map_err(plot_err)?;
            match spec.mark {
                Mark::Line => Self::draw_line_chart(&root, spec)?,
                Mark::Bar => Self::draw_bar_chart(&root, spec)?,
            }
            root.present().map_err(plot_err)?;
        }
        Ok(buf)
    }

    /// One polyline per color category over an ordinal x axis.
    fn draw_line_chart(
        root: &DrawingArea<SVGBackend<'_>, Shift>,
        spec: &ChartSpec,
    ) -> Result<(), RenderError> {
        let x_field = spec.encoding.x.field.as_str();
        let y_field = spec.encoding.y.field.as_str();

        // Ordinal axis: every distinct x value gets one evenly spaced slot.
        let mut categories: Vec<Datum> = spec.values(x_field).cloned().collect();
        categories.sort();
        categories.dedup();
        if spec.encoding.x.sort == Some(AxisSort::DescendingByX) {
            categories.reverse();
        }

        let mut series: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
        for row in &spec.data {
            let (Some(x), Some(y)) = (row.get(x_field), row.get(y_field).and_then(Datum::as_f64))
            else {
                continue;
            };
            let Some(slot) = categories.iter().position(|c| c == x) else {
                continue;
            };
            let name = spec
                .encoding
                .color
                .as_ref()
                .and_then(|c| row.get(&c.field))
                .map(|d| d.to_string())
                .unwrap_or_default();
            series.entry(name).or_default().push((slot as f64, y));
        }

        let y_max = Self::axis_max(spec.values(y_field).filter_map(Datum::as_f64));
        let n = categories.len().max(1);

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)
            .map_err(plot_err)?;

        let x_labels = |x: &f64| Self::slot_label(&categories, *x);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n.min(MAX_X_LABELS))
            .x_label_formatter(&x_labels)
            .y_label_formatter(&|y: &f64| format!("{:.0}", y))
            .x_desc(x_field)
            .y_desc(y_field)
            .draw()
            .map_err(plot_err)?;

        for (idx, (name, points)) in series.iter_mut().enumerate() {
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            let color = PALETTE[idx % PALETTE.len()];
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                .map_err(plot_err)?
                .label(name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        if spec.encoding.color.is_some() {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(plot_err)?;
        }

        Ok(())
    }

    /// Horizontal bars, first category on top.
    fn draw_bar_chart(
        root: &DrawingArea<SVGBackend<'_>, Shift>,
        spec: &ChartSpec,
    ) -> Result<(), RenderError> {
        let x_field = spec.encoding.x.field.as_str();
        let y_field = spec.encoding.y.field.as_str();

        let mut bars: Vec<(String, f64)> = spec
            .data
            .iter()
            .filter_map(|row| {
                let label = row.get(y_field)?.to_string();
                let value = row.get(x_field)?.as_f64()?;
                Some((label, value))
            })
            .collect();
        match spec.encoding.y.sort {
            Some(AxisSort::DescendingByX) => bars.sort_by(|a, b| b.1.total_cmp(&a.1)),
            Some(AxisSort::Ascending) => bars.sort_by(|a, b| a.0.cmp(&b.0)),
            None => {}
        }

        let x_max = Self::axis_max(bars.iter().map(|(_, v)| *v));
        let n = bars.len().max(1);
        // Slot i is drawn at height n - 1 - i so the first bar sits on top.
        let labels: Vec<Datum> = bars
            .iter()
            .rev()
            .map(|(label, _)| Datum::Text(label.clone()))
            .collect();

        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, ("sans-serif", 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(120)
            .build_cartesian_2d(0f64..x_max, -0.5f64..(n as f64 - 0.5))
            .map_err(plot_err)?;

        let integer_axis = spec.encoding.x.format.as_deref() == Some("d");
        let x_labels = |x: &f64| {
            if integer_axis && (x - x.round()).abs() > 1e-6 {
                String::new()
            } else {
                format!("{:.0}", x)
            }
        };
        let y_labels = |y: &f64| Self::slot_label(&labels, *y);
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .x_label_formatter(&x_labels)
            .y_label_formatter(&y_labels)
            .x_desc(x_field)
            .y_desc(y_field)
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
                let y = (n - 1 - i) as f64;
                Rectangle::new([(0.0, y - 0.35), (*value, y + 0.35)], BAR_COLOR.filled())
            }))
            .map_err(plot_err)?;

        Ok(())
    }

    /// Upper bound of a count axis with some headroom.
    fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
        values.fold(0.0, f64::max).max(1.0) * 1.1
    }

    /// Label for a tick on an ordinal axis; ticks between slots stay blank.
    fn slot_label(categories: &[Datum], pos: f64) -> String {
        let slot = pos.round();
        if (pos - slot).abs() > 1e-6 || slot < 0.0 {
            return String::new();
        }
        categories
            .get(slot as usize)
            .map(|d| d.to_string())
            .unwrap_or_default()
    }
}
