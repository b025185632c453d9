//! CSV reading (with per-column type inference) and writing.

use std::io::{Read, Write};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Cell contents treated as missing values when reading.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Options controlling CSV parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field separator.
    pub delimiter: u8,
    /// Cell contents (compared after trimming) that are read as [`Value::Null`].
    pub na_values: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CsvOptions {
    fn is_na(&self, raw: &str) -> bool {
        let trimmed = raw.trim();
        self.na_values.iter().any(|na| na == trimmed)
    }
}

/// Read a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - The first record is the header row.
/// - Records shorter than the header are padded with nulls; longer records are an error.
/// - Column types are inferred from the non-null cells (see [`infer_column_type`]).
pub fn read_csv_from_path(path: impl AsRef<Path>, options: &CsvOptions) -> IngestionResult<DataSet> {
    let mut rdr = reader_builder(options).from_path(path)?;
    read_csv_from_reader(&mut rdr, options)
}

/// Read CSV content held in memory.
pub fn read_csv_from_str(input: &str, options: &CsvOptions) -> IngestionResult<DataSet> {
    let mut rdr = reader_builder(options).from_reader(input.as_bytes());
    read_csv_from_reader(&mut rdr, options)
}

/// Read CSV data from an existing CSV reader.
///
/// The reader should be `flexible` so short records can be padded instead of rejected.
pub fn read_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    options: &CsvOptions,
) -> IngestionResult<DataSet> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() || (headers.len() == 1 && headers[0].trim().is_empty()) {
        return Err(IngestionError::EmptyInput);
    }
    let names = normalize_headers(&headers);
    let width = names.len();

    let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based line numbers; +1 again because the header is line 1.
        let user_row = row_idx0 + 2;
        let record = result?;
        if record.len() > width {
            return Err(IngestionError::SchemaMismatch {
                message: format!(
                    "expected {width} fields in line {user_row}, saw {}",
                    record.len()
                ),
            });
        }

        let mut row: Vec<Option<String>> = Vec::with_capacity(width);
        for idx in 0..width {
            let cell = record
                .get(idx)
                .filter(|raw| !options.is_na(raw))
                .map(str::to_owned);
            row.push(cell);
        }
        raw_rows.push(row);
    }

    let mut fields = Vec::with_capacity(width);
    for (idx, name) in names.into_iter().enumerate() {
        let data_type = infer_column_type(raw_rows.iter().filter_map(|row| row[idx].as_deref()));
        fields.push(Field::new(name, data_type));
    }

    let rows = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(fields.iter())
                .map(|(cell, field)| match cell {
                    // Inference guarantees every non-null cell parses as the column type.
                    Some(raw) => parse_cell(&raw, field.data_type).unwrap_or(Value::Utf8(raw)),
                    None => Value::Null,
                })
                .collect()
        })
        .collect();

    Ok(DataSet::new(Schema::new(fields), rows))
}

/// Infer the narrowest [`DataType`] that every given (non-null) cell parses as.
///
/// Order of preference: `Int64`, `Float64`, `Bool`, `Date`, `DateTime`, then `Utf8`. A column with
/// no cells is `Float64`.
pub fn infer_column_type<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> DataType {
    let mut cells = cells.peekable();
    if cells.peek().is_none() {
        return DataType::Float64;
    }

    const CANDIDATES: [DataType; 5] = [
        DataType::Int64,
        DataType::Float64,
        DataType::Bool,
        DataType::Date,
        DataType::DateTime,
    ];
    CANDIDATES
        .into_iter()
        .find(|&t| cells.clone().all(|raw| parse_cell(raw, t).is_some()))
        .unwrap_or(DataType::Utf8)
}

/// Parse one raw cell as `data_type`. Returns `None` if it does not fit.
///
/// Numbers, booleans and dates are parsed from the trimmed text; `Utf8` keeps the raw text.
pub fn parse_cell(raw: &str, data_type: DataType) -> Option<Value> {
    let trimmed = raw.trim();
    match data_type {
        DataType::Utf8 => Some(Value::Utf8(raw.to_owned())),
        DataType::Int64 => trimmed.parse::<i64>().ok().map(Value::Int64),
        DataType::Float64 => trimmed.parse::<f64>().ok().map(Value::Float64),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool),
        DataType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok().map(Value::Date),
        DataType::DateTime => parse_datetime(trimmed).map(Value::DateTime),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Make header names unique and non-empty: blanks become `Unnamed: <i>`, repeats get `.1`, `.2`.
fn normalize_headers(headers: &csv::StringRecord) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(headers.len());
    for (idx, raw) in headers.iter().enumerate() {
        let base = if raw.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            raw.to_owned()
        };
        let mut name = base.clone();
        let mut n = 1;
        while names.contains(&name) {
            name = format!("{base}.{n}");
            n += 1;
        }
        names.push(name);
    }
    names
}

fn reader_builder(options: &CsvOptions) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .flexible(true)
        .delimiter(options.delimiter);
    builder
}

/// Write a dataset as CSV with a header row. Nulls are written as empty cells.
pub fn write_csv_to_path(dataset: &DataSet, path: impl AsRef<Path>) -> IngestionResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    write_csv(dataset, &mut wtr)
}

/// Write a dataset to an existing CSV writer and flush it.
pub fn write_csv<W: Write>(dataset: &DataSet, wtr: &mut csv::Writer<W>) -> IngestionResult<()> {
    wtr.write_record(dataset.schema.field_names())?;
    for row in &dataset.rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_types_per_column() {
        let input = "id,score,flag,day,stamp,name\n\
                     1,1.5,true,2024-01-02,2024-01-02 10:00:00,Ada\n\
                     2,2,False,2024-02-03,2024-02-03,Grace\n";
        let ds = read_csv_from_str(input, &CsvOptions::default()).unwrap();
        let types: Vec<DataType> = ds.schema.fields.iter().map(|f| f.data_type).collect();
        assert_eq!(
            types,
            vec![
                DataType::Int64,
                DataType::Float64,
                DataType::Bool,
                DataType::Date,
                DataType::DateTime,
                DataType::Utf8,
            ]
        );
        assert_eq!(ds.rows[1][1], Value::Float64(2.0));
        assert_eq!(ds.rows[1][2], Value::Bool(false));
    }

    #[test]
    fn empty_cells_and_na_markers_are_null() {
        let ds = read_csv_from_str("a,b\n1,\nNA,x\n", &CsvOptions::default()).unwrap();
        assert_eq!(ds.rows[0][1], Value::Null);
        assert_eq!(ds.rows[1][0], Value::Null);
        assert_eq!(ds.schema.fields[0].data_type, DataType::Int64);
    }

    #[test]
    fn short_records_are_padded() {
        let ds = read_csv_from_str("a,b,c\n1\n", &CsvOptions::default()).unwrap();
        assert_eq!(ds.rows[0], vec![Value::Int64(1), Value::Null, Value::Null]);
    }

    #[test]
    fn long_records_are_rejected() {
        let err = read_csv_from_str("a,b\n1,2,3\n", &CsvOptions::default()).unwrap_err();
        assert!(err.to_string().contains("expected 2 fields in line 2, saw 3"));
    }

    #[test]
    fn empty_input_has_no_columns() {
        let err = read_csv_from_str("", &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, IngestionError::EmptyInput));
    }

    #[test]
    fn duplicate_and_blank_headers_are_renamed() {
        let ds = read_csv_from_str("a,a,\n1,2,3\n", &CsvOptions::default()).unwrap();
        assert_eq!(ds.column_names(), vec!["a", "a.1", "Unnamed: 2"]);
    }

    #[test]
    fn text_cells_keep_surrounding_whitespace() {
        let ds = read_csv_from_str("name\n  Ada \n", &CsvOptions::default()).unwrap();
        assert_eq!(ds.rows[0][0], Value::Utf8("  Ada ".to_string()));
    }

    #[test]
    fn write_csv_renders_nulls_as_empty() {
        let ds = read_csv_from_str("a,b\n1,\n2,x\n", &CsvOptions::default()).unwrap();
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&ds, &mut wtr).unwrap();
        let bytes = wtr.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "a,b\n1,\n2,x\n");
    }
}
