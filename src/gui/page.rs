//! Dashboard Page
//! HTML shell around the charts: title, markdown description, and one
//! full-width section per chart. Charts are drawn in the browser by
//! vega-embed, with the static SVG as the `<noscript>` fallback.

use crate::charts::{ChartSpec, RenderError, StaticChartRenderer, VegaLiteRenderer};
use pulldown_cmark::{html, CowStr, Event, Parser};
use serde_json::Value;

pub const PAGE_TITLE: &str = "Walmart Store Openings Dashboard (1962-2006)";

pub const PAGE_DESCRIPTION: &str = "\
This dashboard visualizes the locations and number of Walmart store openings across the United States from **1962** to **2006**.
The first plot shows the number of stores opened by year, and the second plot shows the top 5 cities with the most Walmart stores by the end of 2006.
";

const VEGA_SCRIPTS: [&str; 3] = [
    "https://cdn.jsdelivr.net/npm/vega@5",
    "https://cdn.jsdelivr.net/npm/vega-lite@5",
    "https://cdn.jsdelivr.net/npm/vega-embed@6",
];

const STYLE: &str = "\
body { margin: 0; font-family: \"Source Sans Pro\", sans-serif; color: #31333f; }
main { padding: 2rem 3rem; }
section { margin-top: 2rem; }
.chart { width: 100%; }
.chart svg { width: 100%; height: auto; }
";

/// One chart with its subheading.
#[derive(Debug, Clone)]
struct PageSection {
    heading: String,
    vega: Value,
    fallback_svg: String,
}

/// The whole dashboard page, rendered to a standalone HTML document.
#[derive(Debug, Clone)]
pub struct DashboardPage {
    title: String,
    description: String,
    sections: Vec<PageSection>,
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self::new(PAGE_TITLE, PAGE_DESCRIPTION)
    }
}

impl DashboardPage {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            sections: Vec::new(),
        }
    }

    /// Append a chart below the previous ones. The chart title becomes the
    /// section heading.
    pub fn add_chart(
        &mut self,
        spec: &ChartSpec,
        fallback_size: (u32, u32),
    ) -> Result<(), RenderError> {
        self.sections.push(PageSection {
            heading: spec.title.clone(),
            vega: VegaLiteRenderer::to_json(spec),
            fallback_svg: StaticChartRenderer::render_svg(spec, fallback_size)?,
        });
        Ok(())
    }

    pub fn render_html(&self) -> Result<String, RenderError> {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        out.push_str(&format!("<title>{}</title>\n", escape_text(&self.title)));
        for src in VEGA_SCRIPTS {
            out.push_str(&format!("<script src=\"{}\"></script>\n", src));
        }
        out.push_str(&format!("<style>\n{}</style>\n", STYLE));
        out.push_str("</head>\n<body>\n<main>\n");

        out.push_str(&markdown_to_html(&format!("# {}", self.title)));
        out.push_str(&markdown_to_html(&self.description));

        for (idx, section) in self.sections.iter().enumerate() {
            out.push_str("<section>\n");
            out.push_str(&markdown_to_html(&format!("## {}", section.heading)));
            out.push_str(&format!(
                "<div class=\"chart\" id=\"chart-{}\"></div>\n<noscript><div class=\"chart\">{}</div></noscript>\n",
                idx, section.fallback_svg
            ));
            out.push_str("</section>\n");
        }
        out.push_str("</main>\n<script>\n");

        for (idx, section) in self.sections.iter().enumerate() {
            // Keep "</script>" inside string values from closing the tag.
            let spec = serde_json::to_string(&section.vega)?.replace("</", "<\\/");
            out.push_str(&format!(
                "vegaEmbed(\"#chart-{}\", {}, {{\"actions\": false}}).catch(console.error);\n",
                idx, spec
            ));
        }
        out.push_str("</script>\n</body>\n</html>\n");

        Ok(out)
    }
}

fn markdown_to_html(markdown: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new(markdown));
    out
}

/// Plain text with markup characters escaped, as pulldown-cmark writes text nodes.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    html::push_html(&mut out, std::iter::once(Event::Text(CowStr::Borrowed(text))));
    out
}
