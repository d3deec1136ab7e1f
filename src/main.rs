//! Store Openings Dashboard
//!
//! Builds the dashboard page from the remote dataset and opens it in the
//! default browser.

use anyhow::{Context, Result};
use storedash::{DashboardApp, DashboardConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config = DashboardConfig::default();
    let app = DashboardApp::from_config(config).context("failed to set up the dataset source")?;
    let page = app.run().context("failed to build the dashboard")?;

    info!(path = %page.display(), "dashboard ready");
    Ok(())
}
