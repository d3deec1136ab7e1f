//! Chart Plotter Module
//! Binds the aggregate tables to the two dashboard chart descriptions.

use crate::charts::spec::{AxisSort, Channel, ChartSpec, Datum, Encoding, FieldType, Mark, Row};
use crate::data::{CityCount, RankingParams, YearTypeCount};

// Field names as they appear in the chart data and tooltips.
pub const YEAR_FIELD: &str = "YEAR";
pub const COUNT_FIELD: &str = "Store Count";
pub const TYPE_FIELD: &str = "type_store";
pub const CITY_FIELD: &str = "STRCITY";

pub const LINE_CHART_TITLE: &str = "Number of Walmart Stores Opened by Year";

/// Builds the dashboard's chart descriptions.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Stores opened per year, one line per store type.
    pub fn line_chart(counts: &[YearTypeCount]) -> ChartSpec {
        let data = counts
            .iter()
            .map(|c| {
                Row::from([
                    (YEAR_FIELD.to_string(), Datum::from(i64::from(c.year))),
                    (COUNT_FIELD.to_string(), Datum::from(i64::from(c.count))),
                    (TYPE_FIELD.to_string(), Datum::from(c.store_type.as_str())),
                ])
            })
            .collect();

        ChartSpec {
            title: LINE_CHART_TITLE.to_string(),
            mark: Mark::Line,
            encoding: Encoding {
                x: Channel::new(YEAR_FIELD, FieldType::Ordinal).with_sort(AxisSort::Ascending),
                y: Channel::new(COUNT_FIELD, FieldType::Quantitative),
                color: Some(Channel::new(TYPE_FIELD, FieldType::Nominal)),
                tooltip: vec![
                    Channel::new(YEAR_FIELD, FieldType::Ordinal),
                    Channel::new(COUNT_FIELD, FieldType::Quantitative),
                    Channel::new(TYPE_FIELD, FieldType::Nominal),
                ],
            },
            data,
        }
    }

    /// Horizontal bars for the top cities, largest first.
    pub fn bar_chart(cities: &[CityCount], params: RankingParams) -> ChartSpec {
        let data = cities
            .iter()
            .map(|c| {
                Row::from([
                    (CITY_FIELD.to_string(), Datum::from(c.city.as_str())),
                    (COUNT_FIELD.to_string(), Datum::from(i64::from(c.count))),
                ])
            })
            .collect();

        ChartSpec {
            title: Self::bar_chart_title(params),
            mark: Mark::Bar,
            encoding: Encoding {
                x: Channel::new(COUNT_FIELD, FieldType::Quantitative).with_format("d"),
                y: Channel::new(CITY_FIELD, FieldType::Nominal).with_sort(AxisSort::DescendingByX),
                color: None,
                tooltip: vec![
                    Channel::new(CITY_FIELD, FieldType::Nominal),
                    Channel::new(COUNT_FIELD, FieldType::Quantitative),
                ],
            },
            data,
        }
    }

    pub fn bar_chart_title(params: RankingParams) -> String {
        format!(
            "Top {} Cities with the Most Walmart Stores by End of {}",
            params.top_n, params.cutoff_year
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_counts() -> Vec<YearTypeCount> {
        vec![
            YearTypeCount {
                year: 1962,
                store_type: "Discount Store".to_string(),
                count: 2,
            },
            YearTypeCount {
                year: 1988,
                store_type: "Supercenter".to_string(),
                count: 1,
            },
        ]
    }

    #[test]
    fn line_chart_encodes_year_as_ordinal_and_type_as_color() {
        let spec = ChartPlotter::line_chart(&sample_counts());

        assert_eq!(spec.mark, Mark::Line);
        assert_eq!(spec.encoding.x.field, YEAR_FIELD);
        assert_eq!(spec.encoding.x.field_type, FieldType::Ordinal);
        assert_eq!(spec.encoding.y.field, COUNT_FIELD);
        assert_eq!(spec.encoding.y.field_type, FieldType::Quantitative);
        assert_eq!(
            spec.encoding.color.as_ref().map(|c| c.field.as_str()),
            Some(TYPE_FIELD)
        );

        let tooltip: Vec<&str> = spec.encoding.tooltip.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(tooltip, vec![YEAR_FIELD, COUNT_FIELD, TYPE_FIELD]);
    }

    #[test]
    fn line_chart_binds_one_row_per_count() {
        let spec = ChartPlotter::line_chart(&sample_counts());

        assert_eq!(spec.data.len(), 2);
        assert_eq!(spec.data[0][YEAR_FIELD], Datum::Int(1962));
        assert_eq!(spec.data[0][COUNT_FIELD], Datum::Int(2));
        assert_eq!(spec.data[1][TYPE_FIELD], Datum::Text("Supercenter".to_string()));
    }

    #[test]
    fn bar_chart_sorts_cities_by_count_with_integer_axis() {
        let cities = vec![
            CityCount {
                city: "Houston".to_string(),
                count: 12,
            },
            CityCount {
                city: "Dallas".to_string(),
                count: 9,
            },
        ];

        let spec = ChartPlotter::bar_chart(&cities, RankingParams::default());

        assert_eq!(spec.mark, Mark::Bar);
        assert_eq!(spec.encoding.x.field, COUNT_FIELD);
        assert_eq!(spec.encoding.x.format.as_deref(), Some("d"));
        assert_eq!(spec.encoding.y.field, CITY_FIELD);
        assert_eq!(spec.encoding.y.sort, Some(AxisSort::DescendingByX));
        assert!(spec.encoding.color.is_none());

        let tooltip: Vec<&str> = spec.encoding.tooltip.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(tooltip, vec![CITY_FIELD, COUNT_FIELD]);
        assert_eq!(
            spec.title,
            "Top 5 Cities with the Most Walmart Stores by End of 2006"
        );
    }
}
