//! Data Processor Module
//! Group-by aggregations over the store openings table.

use crate::data::loader::{CITY_COL, TYPE_COL, YEAR_COL};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

/// Name of the count column produced by both aggregations.
const COUNT_COL: &str = "count";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Missing expected column '{0}'")]
    MissingColumn(String),
}

/// Number of stores of one type opened in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearTypeCount {
    pub year: i32,
    pub store_type: String,
    pub count: u32,
}

/// Number of stores in one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCount {
    pub city: String,
    pub count: u32,
}

/// Cutoff and size of the city ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingParams {
    pub cutoff_year: i32,
    pub top_n: usize,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            cutoff_year: 2006,
            top_n: 5,
        }
    }
}

/// Stateless aggregation operations over a loaded table.
pub struct DataProcessor;

impl DataProcessor {
    /// Count rows per `(YEAR, type_store)` pair.
    ///
    /// Rows where either key is null belong to no group, and so do years
    /// that are not a whole number in `i32` range. Output is ordered by
    /// year, then store type.
    pub fn count_by_year_and_type(df: &DataFrame) -> Result<Vec<YearTypeCount>, ProcessorError> {
        require_columns(df, &[YEAR_COL, TYPE_COL])?;

        let grouped = df
            .clone()
            .lazy()
            .select([
                col(YEAR_COL).cast(DataType::Float64),
                col(TYPE_COL).cast(DataType::String),
            ])
            .filter(col(YEAR_COL).is_not_null().and(col(TYPE_COL).is_not_null()))
            .group_by([col(YEAR_COL), col(TYPE_COL)])
            .agg([len().cast(DataType::UInt32).alias(COUNT_COL)])
            .sort_by_exprs(
                [col(YEAR_COL), col(TYPE_COL)],
                SortMultipleOptions::default(),
            )
            .collect()?;

        let years = grouped.column(YEAR_COL)?.f64()?;
        let types = grouped.column(TYPE_COL)?.str()?;
        let counts = grouped.column(COUNT_COL)?.u32()?;

        let rows = years
            .into_iter()
            .zip(types)
            .zip(counts)
            .filter_map(|((year, store_type), count)| {
                Some(YearTypeCount {
                    year: calendar_year(year?)?,
                    store_type: store_type?.to_string(),
                    count: count?,
                })
            })
            .collect();

        Ok(rows)
    }

    /// Rank cities by number of stores opened up to and including
    /// `cutoff_year`, keeping the first `top_n`.
    ///
    /// Null years never satisfy the cutoff. Equal counts are ordered by city
    /// name.
    pub fn top_cities_by_count(
        df: &DataFrame,
        params: RankingParams,
    ) -> Result<Vec<CityCount>, ProcessorError> {
        require_columns(df, &[YEAR_COL, CITY_COL])?;

        let limit = IdxSize::try_from(params.top_n).unwrap_or(IdxSize::MAX);
        let ranked = df
            .clone()
            .lazy()
            .select([
                col(YEAR_COL).cast(DataType::Float64),
                col(CITY_COL).cast(DataType::String),
            ])
            .filter(
                col(YEAR_COL)
                    .lt_eq(lit(f64::from(params.cutoff_year)))
                    .and(col(CITY_COL).is_not_null()),
            )
            .group_by([col(CITY_COL)])
            .agg([len().cast(DataType::UInt32).alias(COUNT_COL)])
            .sort_by_exprs(
                [col(COUNT_COL), col(CITY_COL)],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            )
            .limit(limit)
            .collect()?;

        let cities = ranked.column(CITY_COL)?.str()?;
        let counts = ranked.column(COUNT_COL)?.u32()?;

        let rows = cities
            .into_iter()
            .zip(counts)
            .filter_map(|(city, count)| {
                Some(CityCount {
                    city: city?.to_string(),
                    count: count?,
                })
            })
            .collect();

        Ok(rows)
    }
}

/// Whole-number years that fit an `i32`; anything else is not a calendar year.
fn calendar_year(year: f64) -> Option<i32> {
    if year.fract() != 0.0 || year < f64::from(i32::MIN) || year > f64::from(i32::MAX) {
        return None;
    }
    Some(year as i32)
}

fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<(), ProcessorError> {
    let names = df.get_column_names();
    match columns
        .iter()
        .find(|required| !names.iter().any(|name| name.as_str() == **required))
    {
        Some(missing) => Err(ProcessorError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}
