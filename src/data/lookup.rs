use super::key::normalize;
use super::model::{RentRow, RentTable};
use super::schema::{BedroomTier, ZIP_COLUMN, columns_for};

/// Point query: one ZIP code, one unit size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentQuery {
    /// Raw user input; normalized by [`lookup`].
    pub postal_code: String,
    pub bedroom: BedroomTier,
}

/// The three published figures for one ZIP and bedroom tier, truncated to
/// whole dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentFigures {
    pub bedroom: BedroomTier,
    pub standard: i64,
    pub payment_90: i64,
    pub payment_110: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentResult {
    /// No row carries the normalized ZIP code.
    NotFound,
    /// A row matched but at least one of the three figures is missing.
    DataUnavailable,
    Found(RentFigures),
}

/// First row whose normalized ZIP equals `key` (already normalized).
pub fn find_row<'a>(table: &'a RentTable, key: &str) -> Option<&'a RentRow> {
    table.rows.iter().find(|row| {
        row.get(ZIP_COLUMN)
            .as_key_text()
            .is_some_and(|zip| normalize(&zip) == key)
    })
}

/// Look up the standard, 90% and 110% rents for a ZIP code.
///
/// All-or-nothing: a row with any of the three figures missing yields
/// [`RentResult::DataUnavailable`], never a partial answer.
pub fn lookup(table: &RentTable, query: &RentQuery) -> RentResult {
    let key = normalize(&query.postal_code);
    let Some(row) = find_row(table, &key) else {
        log::debug!("ZIP {key} not found in {} rows", table.len());
        return RentResult::NotFound;
    };

    let cols = columns_for(query.bedroom);
    let figures = (
        row.get(cols.standard).as_f64(),
        row.get(cols.payment_90).as_f64(),
        row.get(cols.payment_110).as_f64(),
    );
    match figures {
        (Some(standard), Some(payment_90), Some(payment_110)) => {
            RentResult::Found(RentFigures {
                bedroom: query.bedroom,
                standard: standard.trunc() as i64,
                payment_90: payment_90.trunc() as i64,
                payment_110: payment_110.trunc() as i64,
            })
        }
        _ => {
            log::debug!("ZIP {key} has incomplete {} figures", query.bedroom);
            RentResult::DataUnavailable
        }
    }
}
