use serde_json::{Map, Value};
use thiserror::Error;

pub type Record = Map<String, Value>;

static MISSING: Value = Value::Null;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableShapeError {
    #[error("response body is a JSON {0}, not a table")]
    NotTabular(&'static str),
    #[error("row {row} is not an object")]
    RowNotObject { row: usize },
    #[error("column `{column}` holds a nested value")]
    NestedValue { column: String },
    #[error("column `{column}` has {found} entries, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl ResultTable {
    pub fn from_records(rows: Vec<Record>) -> Result<Self, TableShapeError> {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for (key, value) in row {
                if !is_scalar(value) {
                    return Err(TableShapeError::NestedValue {
                        column: key.clone(),
                    });
                }
                if !columns.iter().any(|column| column == key) {
                    columns.push(key.clone());
                }
            }
        }
        Ok(Self { columns, rows })
    }

    // Row objects, equal-length column arrays, or columns keyed by row index.
    pub fn from_json(body: Value) -> Result<Self, TableShapeError> {
        match body {
            Value::Array(items) => {
                let rows = items
                    .into_iter()
                    .enumerate()
                    .map(|(row, item)| match item {
                        Value::Object(record) => Ok(record),
                        _ => Err(TableShapeError::RowNotObject { row }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Self::from_records(rows)
            }
            Value::Object(columns) => from_columns(columns),
            Value::Null => Err(TableShapeError::NotTabular("null")),
            Value::Bool(_) => Err(TableShapeError::NotTabular("boolean")),
            Value::Number(_) => Err(TableShapeError::NotTabular("number")),
            Value::String(_) => Err(TableShapeError::NotTabular("string")),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cells<'a>(&'a self, row: &'a Record) -> impl Iterator<Item = &'a Value> + 'a {
        self.columns
            .iter()
            .map(move |column| row.get(column).unwrap_or(&MISSING))
    }
}

fn from_columns(columns: Map<String, Value>) -> Result<ResultTable, TableShapeError> {
    let names: Vec<String> = columns.keys().cloned().collect();
    let rows = column_rows(columns)?;
    let mut table = ResultTable::from_records(rows)?;
    table.columns = names;
    Ok(table)
}

fn column_rows(columns: Map<String, Value>) -> Result<Vec<Record>, TableShapeError> {
    if columns.is_empty() {
        return Ok(Vec::new());
    }

    if columns.values().all(Value::is_array) {
        let mut expected = None;
        let mut rows: Vec<Record> = Vec::new();
        let arrays = columns.into_iter().filter_map(|(column, values)| match values {
            Value::Array(values) => Some((column, values)),
            _ => None,
        });
        for (column, values) in arrays {
            let expected = *expected.get_or_insert(values.len());
            if values.len() != expected {
                return Err(TableShapeError::RaggedColumn {
                    column,
                    expected,
                    found: values.len(),
                });
            }
            if rows.is_empty() {
                rows.resize_with(expected, Record::new);
            }
            for (row, value) in rows.iter_mut().zip(values) {
                row.insert(column.clone(), value);
            }
        }
        return Ok(rows);
    }

    if columns.values().all(Value::is_object) {
        let mut index: Vec<String> = Vec::new();
        let mut rows: Vec<Record> = Vec::new();
        let objects = columns.into_iter().filter_map(|(column, cells)| match cells {
            Value::Object(cells) => Some((column, cells)),
            _ => None,
        });
        for (column, cells) in objects {
            for (key, value) in cells {
                let position = match index.iter().position(|existing| *existing == key) {
                    Some(position) => position,
                    None => {
                        index.push(key);
                        rows.push(Record::new());
                        rows.len() - 1
                    }
                };
                rows[position].insert(column.clone(), value);
            }
        }
        return Ok(rows);
    }

    Err(TableShapeError::NotTabular("object of mixed values"))
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
