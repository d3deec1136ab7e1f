//! GUI module - Dashboard page and pipeline driver

mod app;
mod page;

pub use app::{Dashboard, DashboardApp, DashboardError, PAGE_FILE};
pub use page::{DashboardPage, PAGE_DESCRIPTION, PAGE_TITLE};
