//! Store Openings Dashboard
//!
//! Loads the Walmart store openings CSV, counts openings per year and store
//! type, ranks cities by store count, and renders both as an interactive
//! chart page.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;

pub use config::{DashboardConfig, DATASET_URL};
pub use gui::{Dashboard, DashboardApp, DashboardError};
