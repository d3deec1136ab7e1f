//! Data module - CSV loading and aggregation

mod loader;
mod processor;

pub use loader::{
    parse_csv, DataLoader, DataSource, HttpSource, LoaderError, MemorySource, CITY_COL,
    REQUIRED_COLUMNS, TYPE_COL, YEAR_COL,
};
pub use processor::{
    CityCount, DataProcessor, ProcessorError, RankingParams, YearTypeCount,
};
