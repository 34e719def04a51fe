use std::cmp::Ordering;

use super::key::normalize;
use super::model::RentTable;
use super::schema::{BedroomTier, REGION_COLUMN, RentTier, ZIP_COLUMN, column_for};

// ---------------------------------------------------------------------------
// Query / result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Ascending => "Lowest first",
            SortDirection::Descending => "Highest first",
        }
    }
}

/// List query: ZIP codes of one region ranked by one rent column.
#[derive(Debug, Clone, PartialEq)]
pub struct RankQuery {
    /// Matched exactly against the derived region code (case-sensitive).
    pub region_code: String,
    pub bedroom: BedroomTier,
    pub tier: RentTier,
    /// Inclusive lower bound; `None` applies no lower bound.
    pub min_rent: Option<f64>,
    /// Inclusive upper bound; `None` applies no upper bound.
    pub max_rent: Option<f64>,
    pub direction: SortDirection,
    /// Rows to return; `None` returns every match.
    pub page_size: Option<usize>,
}

impl RankQuery {
    /// Unbounded query over a region, returning every match.
    pub fn new(region_code: impl Into<String>, bedroom: BedroomTier, tier: RentTier) -> Self {
        RankQuery {
            region_code: region_code.into(),
            bedroom,
            tier,
            min_rent: None,
            max_rent: None,
            direction: SortDirection::Ascending,
            page_size: None,
        }
    }

    fn in_bounds(&self, value: f64) -> bool {
        self.min_rent.map_or(true, |min| value >= min)
            && self.max_rent.map_or(true, |max| value <= max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    /// Normalized (zero-padded) ZIP code.
    pub postal_code: String,
    pub rent: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankResult {
    pub entries: Vec<RankEntry>,
    /// More matching rows exist beyond this page.
    pub has_more: bool,
    /// Matching rows before pagination.
    pub total_matches: usize,
}

impl RankResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Ranking pipeline
// ---------------------------------------------------------------------------

/// Filter a region's rows by rent column and bounds, sort, and cut a page.
///
/// Pipeline:
/// 1. keep rows whose region code equals `region_code`
/// 2. drop rows with no value in the target column or no ZIP code
/// 3. drop values outside `[min_rent, max_rent]` (each bound optional)
/// 4. stable sort by value, so ties keep source order
/// 5. take the first `page_size` rows
///
/// Stateless: "show more" is the same query with a larger page size.
pub fn rank(table: &RentTable, query: &RankQuery) -> RankResult {
    let column = column_for(query.bedroom, query.tier);

    let mut matches: Vec<RankEntry> = table
        .rows
        .iter()
        .filter(|row| {
            row.get(REGION_COLUMN)
                .as_key_text()
                .is_some_and(|code| code == query.region_code)
        })
        .filter_map(|row| {
            let rent = row.get(column).as_f64()?;
            if !query.in_bounds(rent) {
                return None;
            }
            // A figure with no ZIP code cannot be shown or looked up.
            let zip = row.get(ZIP_COLUMN).as_key_text()?;
            if zip.trim().is_empty() {
                return None;
            }
            let postal_code = normalize(&zip);
            Some(RankEntry { postal_code, rent })
        })
        .collect();

    matches.sort_by(|a, b| {
        let ord = a.rent.partial_cmp(&b.rent).unwrap_or(Ordering::Equal);
        match query.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    let total_matches = matches.len();
    if let Some(page_size) = query.page_size {
        matches.truncate(page_size);
    }
    let has_more = total_matches > matches.len();

    log::debug!(
        "rank {} {} {} -> {total_matches} matches, {} shown",
        query.region_code,
        query.bedroom,
        query.tier,
        matches.len()
    );

    RankResult {
        entries: matches,
        has_more,
        total_matches,
    }
}

/// Top `n` ZIP codes of a region with no rent bounds.
pub fn top_n(
    table: &RentTable,
    region_code: &str,
    bedroom: BedroomTier,
    tier: RentTier,
    direction: SortDirection,
    n: usize,
) -> RankResult {
    let query = RankQuery {
        direction,
        page_size: Some(n),
        ..RankQuery::new(region_code, bedroom, tier)
    };
    rank(table, &query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, RentRow};
    use proptest::prelude::*;

    const TARGET: (BedroomTier, RentTier) = (BedroomTier::Two, RentTier::Standard);

    fn row(zip: &str, region: &str, rent: Option<f64>) -> RentRow {
        let mut row = RentRow::default();
        row.cells
            .insert(ZIP_COLUMN.to_string(), CellValue::String(zip.to_string()));
        row.cells
            .insert(REGION_COLUMN.to_string(), CellValue::String(region.to_string()));
        let value = rent.map_or(CellValue::Null, CellValue::Float);
        row.cells
            .insert(column_for(TARGET.0, TARGET.1).to_string(), value);
        row
    }

    fn query(region: &str) -> RankQuery {
        RankQuery::new(region, TARGET.0, TARGET.1)
    }

    fn zips(result: &RankResult) -> Vec<&str> {
        result.entries.iter().map(|e| e.postal_code.as_str()).collect()
    }

    #[test]
    fn null_rows_are_dropped_and_sorted_ascending() {
        let table = RentTable::new(
            vec![],
            vec![
                row("90001", "CA", Some(1200.0)),
                row("90002", "CA", None),
                row("90003", "CA", Some(900.0)),
            ],
        );

        let result = rank(&table, &query("CA"));
        assert_eq!(zips(&result), vec!["90003", "90001"]);
        assert_eq!(result.entries[0].rent, 900.0);
        assert_eq!(result.total_matches, 2);
        assert!(!result.has_more);
    }

    #[test]
    fn rows_without_zip_are_skipped() {
        let mut no_zip = row("", "CA", Some(800.0));
        no_zip.cells.insert(ZIP_COLUMN.to_string(), CellValue::Null);
        let table = RentTable::new(
            vec![],
            vec![no_zip, row("", "CA", Some(850.0)), row("90001", "CA", Some(1200.0))],
        );

        let result = rank(&table, &query("CA"));
        assert_eq!(zips(&result), vec!["90001"]);
        assert_eq!(result.total_matches, 1);
    }

    #[test]
    fn bounds_are_inclusive() {
        let table = RentTable::new(
            vec![],
            vec![
                row("10001", "NY", Some(950.0)),
                row("10002", "NY", Some(1050.0)),
                row("10003", "NY", Some(1200.0)),
                row("10004", "NY", Some(1100.0)),
            ],
        );
        let q = RankQuery {
            min_rent: Some(1000.0),
            max_rent: Some(1100.0),
            ..query("NY")
        };

        let result = rank(&table, &q);
        assert_eq!(zips(&result), vec!["10002", "10004"]);
    }

    #[test]
    fn inverted_bounds_yield_empty_result() {
        let table = RentTable::new(vec![], vec![row("10001", "NY", Some(1000.0))]);
        let q = RankQuery {
            min_rent: Some(2000.0),
            max_rent: Some(1000.0),
            ..query("NY")
        };
        let result = rank(&table, &q);
        assert!(result.is_empty());
        assert!(!result.has_more);
    }

    #[test]
    fn unknown_region_is_empty() {
        let table = RentTable::new(vec![], vec![row("10001", "NY", Some(1000.0))]);
        let result = rank(&table, &query("ny"));
        assert!(result.is_empty());
        assert_eq!(result.total_matches, 0);
        assert!(!result.has_more);
        assert!(rank(&RentTable::empty(), &query("NY")).is_empty());
    }

    #[test]
    fn page_reports_more_available() {
        let table = RentTable::new(
            vec![],
            (0..5)
                .map(|i| row(&format!("7500{i}"), "TX", Some(1000.0 + f64::from(i))))
                .collect(),
        );
        let q = RankQuery {
            direction: SortDirection::Descending,
            page_size: Some(2),
            ..query("TX")
        };

        let result = rank(&table, &q);
        assert_eq!(zips(&result), vec!["75004", "75003"]);
        assert!(result.has_more);
        assert_eq!(result.total_matches, 5);

        let all = top_n(&table, "TX", TARGET.0, TARGET.1, SortDirection::Descending, 5);
        assert_eq!(all.entries.len(), 5);
        assert!(!all.has_more);
    }

    #[test]
    fn ties_keep_source_order_in_both_directions() {
        let table = RentTable::new(
            vec![],
            vec![
                row("00001", "WA", Some(1000.0)),
                row("00002", "WA", Some(1000.0)),
                row("00003", "WA", Some(900.0)),
            ],
        );
        let asc = rank(&table, &query("WA"));
        assert_eq!(zips(&asc), vec!["00003", "00001", "00002"]);

        let desc = rank(
            &table,
            &RankQuery {
                direction: SortDirection::Descending,
                ..query("WA")
            },
        );
        assert_eq!(zips(&desc), vec!["00001", "00002", "00003"]);
    }

    fn arb_rows() -> impl Strategy<Value = Vec<(u8, Option<u16>)>> {
        prop::collection::vec((0u8..3, prop::option::of(500u16..3000)), 0..40)
    }

    fn build(rows: &[(u8, Option<u16>)]) -> RentTable {
        let regions = ["CA", "NV", "OR"];
        RentTable::new(
            vec![],
            rows.iter()
                .enumerate()
                .map(|(i, (region, rent))| {
                    row(&i.to_string(), regions[usize::from(*region)], rent.map(f64::from))
                })
                .collect(),
        )
    }

    proptest! {
        #[test]
        fn every_entry_satisfies_all_filters(
            rows in arb_rows(),
            min in 500u16..3000,
            span in 0u16..1500,
            descending in any::<bool>(),
        ) {
            let table = build(&rows);
            let direction = if descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            let q = RankQuery {
                min_rent: Some(f64::from(min)),
                max_rent: Some(f64::from(min) + f64::from(span)),
                direction,
                ..query("CA")
            };
            let result = rank(&table, &q);

            for entry in &result.entries {
                let source = table
                    .rows
                    .iter()
                    .find(|r| {
                        r.get(ZIP_COLUMN).as_key_text().map(|z| normalize(&z)).as_ref()
                            == Some(&entry.postal_code)
                    })
                    .expect("entry comes from the table");
                prop_assert_eq!(source.get(REGION_COLUMN), &CellValue::String("CA".into()));
                prop_assert!(entry.rent >= f64::from(min));
                prop_assert!(entry.rent <= f64::from(min) + f64::from(span));
            }
            for pair in result.entries.windows(2) {
                match direction {
                    SortDirection::Ascending => prop_assert!(pair[0].rent <= pair[1].rent),
                    SortDirection::Descending => prop_assert!(pair[0].rent >= pair[1].rent),
                }
            }
        }

        #[test]
        fn larger_pages_extend_smaller_ones(
            rows in arb_rows(),
            small in 0usize..10,
            extra in 0usize..10,
        ) {
            let table = build(&rows);
            let smaller = rank(&table, &RankQuery { page_size: Some(small), ..query("NV") });
            let larger = rank(&table, &RankQuery { page_size: Some(small + extra), ..query("NV") });

            prop_assert!(larger.entries.len() >= smaller.entries.len());
            prop_assert_eq!(&larger.entries[..smaller.entries.len()], &smaller.entries[..]);
            prop_assert_eq!(smaller.total_matches, larger.total_matches);
        }
    }
}
