use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use calamine::{Data, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataSourceError;
use super::model::{CellValue, RentRow, RentTable};
use super::schema::{AREA_NAME_COLUMN, REGION_COLUMN};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the rent table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – first worksheet, header in row 1
///   (the published format)
/// * `.csv`     – header row, then one row per ZIP code
/// * `.parquet` – flat scalar columns
/// * `.json`    – `[{ "ZIP Code": "00501", "SAFMR 0BR": 1500, ... }, ...]`
pub fn load_file(path: &Path) -> Result<RentTable, DataSourceError> {
    if !path.exists() {
        return Err(DataSourceError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let sheet = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_spreadsheet(path)?,
        "csv" => read_csv(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        "json" => read_json(path)?,
        other => {
            return Err(DataSourceError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: other.to_string(),
            });
        }
    };

    Ok(build_table(sheet))
}

// ---------------------------------------------------------------------------
// Raw sheet → RentTable
// ---------------------------------------------------------------------------

/// Header row plus records, as read from any source format.
#[derive(Debug, Default)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub records: Vec<Vec<CellValue>>,
}

/// Normalize headers, key each record by column, and derive region codes.
pub fn build_table(sheet: RawSheet) -> RentTable {
    let mut column_names = unique_column_names(&sheet.headers);

    let mut rows: Vec<RentRow> = sheet
        .records
        .into_iter()
        .map(|record| {
            let mut values = record.into_iter();
            let cells: BTreeMap<String, CellValue> = column_names
                .iter()
                .map(|name| (name.clone(), values.next().unwrap_or(CellValue::Null)))
                .collect();
            RentRow { cells }
        })
        .collect();

    if !column_names.iter().any(|c| c == REGION_COLUMN) {
        for row in &mut rows {
            let code = derive_region_code(row.get(AREA_NAME_COLUMN));
            row.cells.insert(REGION_COLUMN.to_string(), code);
        }
        column_names.push(REGION_COLUMN.to_string());
    }

    RentTable::new(column_names, rows)
}

/// Replace embedded line breaks with a space, then trim.
///
/// The published sheet wraps long headers (`"SAFMR\n2BR -\n90%\nPayment\nStandard"`);
/// after this they read `"SAFMR 2BR - 90% Payment Standard"`.
pub fn normalize_header(raw: &str) -> String {
    raw.replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}

/// Normalized, non-empty, unique names. Blank headers become `Unnamed: {i}`,
/// repeats get a `.{n}` suffix.
fn unique_column_names(headers: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    headers
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let mut name = normalize_header(raw);
            if name.is_empty() {
                name = format!("Unnamed: {i}");
            }
            let base = name.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{n}");
                n += 1;
            }
            name
        })
        .collect()
}

/// Region code from a compound area name: the first two characters of the
/// text after the last comma (`"Abilene, TX MSA"` → `"TX"`).
///
/// Malformed names are not rejected; whatever substring results is kept.
pub fn derive_region_code(area_name: &CellValue) -> CellValue {
    let Some(text) = area_name.as_key_text() else {
        return CellValue::Null;
    };
    let last = text.rsplit(',').next().unwrap_or("").trim();
    CellValue::String(last.chars().take(2).collect())
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn read_spreadsheet(path: &Path) -> Result<RawSheet, DataSourceError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| DataSourceError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DataSourceError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|source| DataSourceError::Spreadsheet {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| header.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();
    let records = rows
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();

    Ok(RawSheet { headers, records })
}

fn spreadsheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::String(s) if s.is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with the published column names (quoted multi-line headers are
/// fine), then one record per ZIP code. Short records are padded with nulls.
fn read_csv(path: &Path) -> Result<RawSheet, DataSourceError> {
    let csv_err = |source| DataSourceError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        records.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(RawSheet { headers, records })
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Every column is read as a scalar cell; nested types are rendered as text.
fn read_parquet(path: &Path) -> Result<RawSheet, DataSourceError> {
    let file = File::open(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parquet_err = |source| DataSourceError::Parquet {
        path: path.to_path_buf(),
        source,
    };
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(parquet_err)?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|source| DataSourceError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        for row in 0..batch.num_rows() {
            records.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| arrow_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawSheet { headers, records })
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => {
            CellValue::Integer(i64::from(col.as_primitive::<Int32Type>().value(row)))
        }
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => {
            CellValue::Float(f64::from(col.as_primitive::<Float32Type>().value(row)))
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => array_value_to_string(col, row).map_or(CellValue::Null, CellValue::String),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Columns are the
/// union of keys across records; missing keys read as null.
fn read_json(path: &Path) -> Result<RawSheet, DataSourceError> {
    let malformed = |message: String| DataSourceError::Malformed {
        path: path.to_path_buf(),
        message,
    };

    let text = std::fs::read_to_string(path).map_err(|source| DataSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| DataSourceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let items = root
        .as_array()
        .ok_or_else(|| malformed("expected a top-level JSON array".to_string()))?;

    let mut objects = Vec::with_capacity(items.len());
    let mut headers: Vec<String> = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| malformed(format!("record {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let records = objects
        .into_iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(CellValue::Null, json_cell))
                .collect()
        })
        .collect();

    Ok(RawSheet { headers, records })
}

fn json_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}
