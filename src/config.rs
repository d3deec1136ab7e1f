//! Dashboard settings. Fixed at startup; nothing is read from flags or the
//! environment.

use crate::data::RankingParams;
use std::path::PathBuf;
use std::time::Duration;

pub const DATASET_URL: &str =
    "https://raw.githubusercontent.com/plotly/datasets/master/1962_2006_walmart_store_openings.csv";

/// Settings for one dashboard build.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub dataset_url: String,
    pub ranking: RankingParams,
    /// Directory the page is written to.
    pub output_dir: PathBuf,
    pub open_browser: bool,
    pub http_timeout: Duration,
    /// Pixel size of the static SVG fallbacks.
    pub fallback_size: (u32, u32),
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_url: DATASET_URL.to_string(),
            ranking: RankingParams::default(),
            output_dir: PathBuf::from("storedash-out"),
            open_browser: true,
            http_timeout: Duration::from_secs(30),
            fallback_size: (960, 400),
        }
    }
}
