//! CSV tables
//!
//! Two views of a CSV asset:
//! - [`read_records`]: one ordered map per row, keyed by the header row, all
//!   values kept as strings
//! - [`read_frame`]: a column-oriented [`DataFrame`] with inferred or
//!   caller-specified column types

use crate::error::{AssetError, AssetResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// One CSV row keyed by header
pub type Record = IndexMap<String, String>;

/// Column type for frame coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Text, kept verbatim
    Str,
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// `true`/`false` (also `1`/`0`), case-insensitive
    Bool,
}

impl ColumnType {
    fn name(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        }
    }
}

/// A single frame cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Empty field
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    /// Borrow as text if this is a string cell
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view (ints widen to float)
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Whether the field was empty
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Named, typed column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Header name
    pub name: String,
    /// Resolved type
    pub dtype: ColumnType,
    /// One cell per row
    pub values: Vec<Cell>,
}

/// Column-oriented table read from CSV
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataFrame {
    columns: Vec<Column>,
}

impl DataFrame {
    /// All columns in header order
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column by header name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Header names in order
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// True when there are no rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells of one row, in column order
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.len() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }
}

fn open_reader(path: &Path) -> AssetResult<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| AssetError::io_error(path, e))?;
    Ok(csv::ReaderBuilder::new().flexible(true).from_reader(file))
}

/// Read raw rows: header names plus each row padded/truncated to header width
fn read_raw(path: &Path) -> AssetResult<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = open_reader(path)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AssetError::csv_error(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(|e| AssetError::csv_error(path, e))?;
        if record.len() > headers.len() {
            tracing::warn!(
                "Row {} of {} has {} fields but the header has {}; extra fields dropped.",
                i + 1,
                path.display(),
                record.len(),
                headers.len()
            );
        }
        let mut row: Vec<String> = record.iter().take(headers.len()).map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }
    Ok((headers, rows))
}

/// Read a CSV file as a list of header-keyed rows; every value is a string
///
/// # Errors
/// Returns error if the file cannot be opened or is not well-formed CSV.
pub fn read_records(path: &Path) -> AssetResult<Vec<Record>> {
    let (headers, rows) = read_raw(path)?;
    Ok(rows
        .into_iter()
        .map(|row| headers.iter().cloned().zip(row).collect())
        .collect())
}

/// Read a CSV file as a typed frame
///
/// Columns named in `dtypes` are coerced to that type; all others are
/// inferred (int, then float, then bool, else string). Empty fields become
/// [`Cell::Null`].
///
/// # Errors
/// Returns error if the file cannot be read or a cell cannot be coerced to
/// its requested column type.
pub fn read_frame(path: &Path, dtypes: Option<&HashMap<String, ColumnType>>) -> AssetResult<DataFrame> {
    let (headers, rows) = read_raw(path)?;

    let mut columns = Vec::with_capacity(headers.len());
    for (idx, name) in headers.into_iter().enumerate() {
        let raw: Vec<&str> = rows.iter().map(|r| r[idx].as_str()).collect();
        let dtype = dtypes
            .and_then(|d| d.get(&name).copied())
            .unwrap_or_else(|| infer_type(&raw));
        let values = raw
            .iter()
            .enumerate()
            .map(|(row, value)| coerce(value, dtype, &name, row))
            .collect::<AssetResult<Vec<_>>>()?;
        columns.push(Column { name, dtype, values });
    }

    Ok(DataFrame { columns })
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Some(false)
    } else {
        None
    }
}

fn infer_type(values: &[&str]) -> ColumnType {
    let present: Vec<&str> = values.iter().copied().filter(|v| !v.is_empty()).collect();
    if present.is_empty() {
        return ColumnType::Str;
    }
    if present.iter().all(|v| v.trim().parse::<i64>().is_ok()) {
        ColumnType::Int
    } else if present.iter().all(|v| v.trim().parse::<f64>().is_ok()) {
        ColumnType::Float
    } else if present
        .iter()
        .all(|v| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false"))
    {
        ColumnType::Bool
    } else {
        ColumnType::Str
    }
}

fn coerce(value: &str, dtype: ColumnType, column: &str, row: usize) -> AssetResult<Cell> {
    if value.is_empty() {
        return Ok(Cell::Null);
    }
    let trimmed = value.trim();
    let cell = match dtype {
        ColumnType::Str => Some(Cell::Str(value.to_string())),
        ColumnType::Int => trimmed.parse().ok().map(Cell::Int),
        ColumnType::Float => trimmed.parse().ok().map(Cell::Float),
        ColumnType::Bool => parse_bool(trimmed).map(Cell::Bool),
    };
    cell.ok_or_else(|| AssetError::Coercion {
        column: column.to_string(),
        row,
        value: value.to_string(),
        expected: dtype.name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn records_keyed_by_header() {
        let file = write_csv("name,age\nann,31\nbob,\n");
        let records = read_records(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "ann");
        assert_eq!(records[0]["age"], "31");
        assert_eq!(records[1]["age"], "");
        let keys: Vec<_> = records[0].keys().cloned().collect();
        assert_eq!(keys, vec!["name".to_string(), "age".to_string()]);
    }

    #[test]
    fn short_rows_are_padded() {
        let file = write_csv("a,b,c\n1\n");
        let records = read_records(file.path()).unwrap();
        assert_eq!(records[0]["c"], "");
    }

    #[test]
    fn frame_infers_types() {
        let file = write_csv("id,score,label,flag\n1,0.5,x,true\n2,1,y,False\n");
        let frame = read_frame(file.path(), None).unwrap();

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.column_names(), vec!["id", "score", "label", "flag"]);
        assert_eq!(frame.column("id").unwrap().dtype, ColumnType::Int);
        assert_eq!(frame.column("score").unwrap().dtype, ColumnType::Float);
        assert_eq!(frame.column("label").unwrap().dtype, ColumnType::Str);
        assert_eq!(frame.column("flag").unwrap().dtype, ColumnType::Bool);
        assert_eq!(frame.column("score").unwrap().values[1], Cell::Float(1.0));
    }

    #[test]
    fn frame_respects_dtypes() {
        let file = write_csv("code,n\n007,3\n010,\n");
        let dtypes = HashMap::from([("code".to_string(), ColumnType::Str)]);
        let frame = read_frame(file.path(), Some(&dtypes)).unwrap();

        let code = frame.column("code").unwrap();
        assert_eq!(code.values[0], Cell::Str("007".to_string()));
        assert!(frame.column("n").unwrap().values[1].is_null());
        assert_eq!(frame.row(0).unwrap()[1], &Cell::Int(3));
        assert!(frame.row(2).is_none());
    }

    #[test]
    fn frame_coercion_failure_is_error() {
        let file = write_csv("n\n1\nabc\n");
        let dtypes = HashMap::from([("n".to_string(), ColumnType::Int)]);
        let err = read_frame(file.path(), Some(&dtypes)).unwrap_err();
        assert!(matches!(err, AssetError::Coercion { row: 1, .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_records(&dir.path().join("nope.csv")).unwrap_err();
        assert!(err.is_not_found());
    }
}
