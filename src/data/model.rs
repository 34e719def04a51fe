use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the rent table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, mirroring what a spreadsheet cell can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Interpret the cell as a rent amount.
    ///
    /// Numeric text is accepted (some exports store figures as strings);
    /// anything else, including NaN, counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::String(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(_) | CellValue::Null => return None,
        };
        (!value.is_nan()).then_some(value)
    }

    /// Render the cell as key text for exact-match comparison.
    ///
    /// Whole floats drop their fractional part so a ZIP read as `501.0`
    /// compares like `501`. Null cells have no key.
    pub fn as_key_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::String(s) => Some(s.clone()),
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => {
                Some(format!("{v:.0}"))
            }
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RentRow – one row of the source sheet
// ---------------------------------------------------------------------------

/// One row of the source sheet: normalized column name → value.
#[derive(Debug, Clone, Default)]
pub struct RentRow {
    pub cells: BTreeMap<String, CellValue>,
}

impl RentRow {
    /// Cell for `column`; absent columns read as null.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// RentTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full loaded dataset. Immutable once built; queries only borrow it.
#[derive(Debug, Clone, Default)]
pub struct RentTable {
    /// All rows, in source order.
    pub rows: Vec<RentRow>,
    /// Column names in source order (normalized, derived columns last).
    pub column_names: Vec<String>,
}

impl RentTable {
    pub fn new(column_names: Vec<String>, rows: Vec<RentRow>) -> Self {
        RentTable { rows, column_names }
    }

    /// Table with no rows, substituted when the source cannot be read.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }
}
