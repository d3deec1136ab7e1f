//! Dashboard Application
//! Runs the pipeline: load the table, aggregate, build the charts, and write
//! the page.

use crate::charts::{ChartPlotter, ChartSpec, RenderError};
use crate::config::DashboardConfig;
use crate::data::{
    CityCount, DataLoader, DataProcessor, DataSource, HttpSource, LoaderError, ProcessorError,
    YearTypeCount,
};
use crate::gui::DashboardPage;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

pub const PAGE_FILE: &str = "index.html";

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything one dashboard build produced.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub year_type_counts: Vec<YearTypeCount>,
    pub top_cities: Vec<CityCount>,
    pub line_chart: ChartSpec,
    pub bar_chart: ChartSpec,
    pub html: String,
}

/// Main application: owns the settings and the cached dataset loader.
pub struct DashboardApp<S> {
    config: DashboardConfig,
    loader: DataLoader<S>,
}

impl DashboardApp<HttpSource> {
    /// App reading the dataset from `config.dataset_url`.
    pub fn from_config(config: DashboardConfig) -> Result<Self, DashboardError> {
        let source = HttpSource::new(config.dataset_url.clone(), config.http_timeout)?;
        Ok(Self::with_source(config, source))
    }
}

impl<S: DataSource> DashboardApp<S> {
    pub fn with_source(config: DashboardConfig, source: S) -> Self {
        Self {
            config,
            loader: DataLoader::new(source),
        }
    }

    pub fn loader(&self) -> &DataLoader<S> {
        &self.loader
    }

    /// Load, aggregate, and render. Aggregates are recomputed from the cached
    /// table on every call.
    pub fn build(&self) -> Result<Dashboard, DashboardError> {
        let df = self.loader.load()?;

        let start = Instant::now();
        let year_type_counts = DataProcessor::count_by_year_and_type(&df)?;
        let top_cities = DataProcessor::top_cities_by_count(&df, self.config.ranking)?;
        info!(
            year_type_groups = year_type_counts.len(),
            top_cities = top_cities.len(),
            elapsed = ?start.elapsed(),
            "aggregations computed"
        );

        let line_chart = ChartPlotter::line_chart(&year_type_counts);
        let bar_chart = ChartPlotter::bar_chart(&top_cities, self.config.ranking);

        let mut page = DashboardPage::default();
        page.add_chart(&line_chart, self.config.fallback_size)?;
        page.add_chart(&bar_chart, self.config.fallback_size)?;
        let html = page.render_html()?;

        Ok(Dashboard {
            year_type_counts,
            top_cities,
            line_chart,
            bar_chart,
            html,
        })
    }

    /// Write the page into the output directory and return its path.
    pub fn write(&self, dashboard: &Dashboard) -> Result<PathBuf, DashboardError> {
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir).map_err(|source| DashboardError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(PAGE_FILE);
        fs::write(&path, &dashboard.html).map_err(|source| DashboardError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), bytes = dashboard.html.len(), "page written");
        Ok(path)
    }

    /// Build, write, and optionally open the page in the default browser.
    pub fn run(&self) -> Result<PathBuf, DashboardError> {
        let dashboard = self.build()?;
        let path = self.write(&dashboard)?;
        if self.config.open_browser {
            open_in_browser(&path);
        }
        Ok(path)
    }
}

fn open_in_browser(path: &Path) {
    match open::that(path) {
        Ok(()) => info!(path = %path.display(), "opened in browser"),
        // The page is already on disk; the user can open it by hand.
        Err(e) => warn!(path = %path.display(), error = %e, "could not launch a browser"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemorySource;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
YEAR,type_store,STRCITY
1962,Discount Store,Rogers
1962,Discount Store,Rogers
1964,Discount Store,Harrison
";

    fn app(id: &str, dir: &TempDir) -> DashboardApp<MemorySource> {
        let config = DashboardConfig {
            output_dir: dir.path().to_path_buf(),
            open_browser: false,
            fallback_size: (640, 240),
            ..DashboardConfig::default()
        };
        DashboardApp::with_source(config, MemorySource::new(id, SAMPLE))
    }

    #[test]
    fn build_is_idempotent_and_fetches_once() {
        let dir = TempDir::new().unwrap();
        let app = app("memory://app/idempotent", &dir);

        let first = app.build().unwrap();
        let second = app.build().unwrap();

        assert_eq!(first.html, second.html);
        assert_eq!(first.year_type_counts, second.year_type_counts);
        assert_eq!(app.loader().source().fetch_count(), 1);
    }

    #[test]
    fn run_writes_the_page() {
        let dir = TempDir::new().unwrap();
        let app = app("memory://app/run", &dir);

        let path = app.run().unwrap();

        assert_eq!(path, dir.path().join(PAGE_FILE));
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("Number of Walmart Stores Opened by Year"));
    }
}
