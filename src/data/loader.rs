//! CSV Data Loader Module
//! Fetches the store openings CSV, normalizes `YEAR`, and memoizes the parsed
//! table for the rest of the process.

use once_cell::sync::Lazy;
use polars::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Opening year. Cast to `Float64`; unparsable values become null.
pub const YEAR_COL: &str = "YEAR";
/// Store category, e.g. "Discount Store" or "Supercenter".
pub const TYPE_COL: &str = "type_store";
/// City the store opened in.
pub const CITY_COL: &str = "STRCITY";

pub const REQUIRED_COLUMNS: [&str; 3] = [YEAR_COL, TYPE_COL, CITY_COL];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing expected column '{0}'")]
    MissingColumn(String),
}

/// Where the raw CSV bytes come from. `id` doubles as the cache key.
pub trait DataSource {
    fn id(&self) -> &str;
    fn fetch(&self) -> Result<Vec<u8>, LoaderError>;
}

/// Remote CSV fetched over HTTP with a blocking client.
pub struct HttpSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoaderError> {
        let url = url.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| LoaderError::Fetch {
                url: url.clone(),
                source,
            })?;
        Ok(Self { url, client })
    }
}

impl DataSource for HttpSource {
    fn id(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<Vec<u8>, LoaderError> {
        info!(url = %self.url, "fetching dataset");
        let bytes = self
            .client
            .get(&self.url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(|source| LoaderError::Fetch {
                url: self.url.clone(),
                source,
            })?;
        Ok(bytes.to_vec())
    }
}

/// In-memory CSV content. Counts how often it was fetched.
pub struct MemorySource {
    id: String,
    bytes: Vec<u8>,
    fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new(id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            bytes: bytes.into(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DataSource for MemorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn fetch(&self) -> Result<Vec<u8>, LoaderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}

static DATASET_CACHE: Lazy<Mutex<HashMap<String, DataFrame>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn dataset_cache() -> MutexGuard<'static, HashMap<String, DataFrame>> {
    DATASET_CACHE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Loads a dataset once per process and hands out clones afterwards.
///
/// Only successful loads are cached, so a failed fetch is attempted again
/// on the next call. There is no invalidation.
pub struct DataLoader<S> {
    source: S,
}

impl<S: DataSource> DataLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether this loader's source already has a cached table.
    pub fn is_cached(&self) -> bool {
        dataset_cache().contains_key(self.source.id())
    }

    /// Load the table, fetching and parsing only on the first call.
    pub fn load(&self) -> Result<DataFrame, LoaderError> {
        let key = self.source.id();
        if let Some(df) = dataset_cache().get(key) {
            debug!(source = key, "dataset cache hit");
            return Ok(df.clone());
        }
        debug!(source = key, "dataset cache miss");

        let start = Instant::now();
        let bytes = self.source.fetch()?;
        let df = parse_csv(bytes)?;
        info!(
            source = key,
            rows = df.height(),
            columns = df.width(),
            elapsed = ?start.elapsed(),
            "dataset loaded"
        );

        dataset_cache().insert(key.to_string(), df.clone());
        Ok(df)
    }
}

/// Parse raw CSV bytes and coerce `YEAR` to a nullable integer.
pub fn parse_csv(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    validate_columns(&df)?;

    // Non-strict cast: anything that is not a number turns into null.
    let df = df
        .lazy()
        .with_column(col(YEAR_COL).cast(DataType::Float64))
        .collect()?;

    Ok(df)
}

fn validate_columns(df: &DataFrame) -> Result<(), LoaderError> {
    let names = df.get_column_names();
    for required in REQUIRED_COLUMNS {
        if !names.iter().any(|name| name.as_str() == required) {
            return Err(LoaderError::MissingColumn(required.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
storenum,YEAR,type_store,STRCITY,STRSTATE
1,1962,Discount Store,Rogers,AR
2,1964,Discount Store,Harrison,AR
3,unknown,Supercenter,Bentonville,AR
";

    #[test]
    fn parses_year_as_nullable_number() {
        let df = parse_csv(SAMPLE.as_bytes().to_vec()).unwrap();

        assert_eq!(df.height(), 3);
        let years = df.column(YEAR_COL).unwrap().f64().unwrap();
        let years: Vec<Option<f64>> = years.into_iter().collect();
        assert_eq!(years, vec![Some(1962.0), Some(1964.0), None]);
    }

    #[test]
    fn year_keeps_fractions_and_large_values() {
        let csv = "YEAR,type_store,STRCITY\n\
                   2006.5,Discount Store,Rogers\n\
                   2006,Discount Store,Rogers\n\
                   1e12,Discount Store,Tulsa\n";

        let df = parse_csv(csv.as_bytes().to_vec()).unwrap();

        let years: Vec<Option<f64>> = df
            .column(YEAR_COL)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(years, vec![Some(2006.5), Some(2006.0), Some(1e12)]);
    }

    #[test]
    fn ragged_row_is_a_parse_error() {
        let err = parse_csv(b"YEAR,type_store,STRCITY\n1962,A,B,EXTRA\n".to_vec()).unwrap_err();

        assert!(matches!(err, LoaderError::CsvError(_)));
    }

    #[test]
    fn keeps_unused_columns() {
        let df = parse_csv(SAMPLE.as_bytes().to_vec()).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(names.contains(&"storenum".to_string()));
        assert!(names.contains(&"STRSTATE".to_string()));
    }

    #[test]
    fn missing_city_column_is_an_error() {
        let csv = "YEAR,type_store\n1962,Discount Store\n";
        let err = parse_csv(csv.as_bytes().to_vec()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == CITY_COL));
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let loader = DataLoader::new(MemorySource::new("memory://loader/cache-hit", SAMPLE));
        assert!(!loader.is_cached());

        let first = loader.load().unwrap();
        let second = loader.load().unwrap();

        assert_eq!(loader.source().fetch_count(), 1);
        assert!(loader.is_cached());
        assert!(first.equals_missing(&second));
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let loader = DataLoader::new(MemorySource::new(
            "memory://loader/missing-column",
            "YEAR,STRCITY\n1962,Rogers\n",
        ));

        assert!(loader.load().is_err());
        assert!(loader.load().is_err());
        assert_eq!(loader.source().fetch_count(), 2);
        assert!(!loader.is_cached());
    }

    #[test]
    fn unreachable_host_is_a_fetch_error() {
        let source =
            HttpSource::new("http://127.0.0.1:9/x.csv", Duration::from_millis(200)).unwrap();
        let loader = DataLoader::new(source);

        let err = loader.load().unwrap_err();

        assert!(matches!(
            err,
            LoaderError::Fetch { ref url, .. } if url == "http://127.0.0.1:9/x.csv"
        ));
        assert!(!loader.is_cached());
    }
}
