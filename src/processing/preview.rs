//! Fixed-width text rendering of a dataset.

use crate::types::{DataSet, Value};

const NULL_TEXT: &str = "NaN";

/// Render every row of `dataset` as a right-aligned text table.
///
/// The first line holds the column names; each following line starts with the row position.
/// Line breaks inside cells and names are shown escaped (`\n`, `\r`) so every row stays on one
/// line. Callers pass [`DataSet::head`] to bound the output.
///
/// ```rust
/// use csv_cleaner::types::{DataSet, DataType, Field, Schema, Value};
/// use csv_cleaner::processing::render_preview;
///
/// let ds = DataSet::new(
///     Schema::new(vec![Field::new("a", DataType::Int64), Field::new("b", DataType::Float64)]),
///     vec![vec![Value::Int64(2), Value::Float64(3.0)], vec![Value::Int64(10), Value::Null]],
/// );
/// assert_eq!(render_preview(&ds), "    a    b\n0   2  3.0\n1  10  NaN");
/// ```
pub fn render_preview(dataset: &DataSet) -> String {
    let names: Vec<String> = dataset.column_names().iter().map(|n| escape_breaks(n)).collect();
    if dataset.rows.is_empty() {
        return format!("Empty DataFrame\nColumns: [{}]\nIndex: []", names.join(", "));
    }

    let cells: Vec<Vec<String>> = dataset
        .rows
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let label_width = (dataset.rows.len() - 1).to_string().len();
    let widths: Vec<usize> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|c| c.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(cells.len() + 1);
    let mut header = " ".repeat(label_width);
    for (name, width) in names.iter().zip(&widths) {
        header.push_str(&pad(name, *width));
    }
    lines.push(header);

    for (pos, row) in cells.iter().enumerate() {
        let mut line = format!("{pos:<label_width$}");
        for (idx, width) in widths.iter().enumerate() {
            line.push_str(&pad(row.get(idx).map_or(NULL_TEXT, String::as_str), *width));
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => NULL_TEXT.to_owned(),
        other => escape_breaks(&other.to_string()),
    }
}

fn escape_breaks(text: &str) -> String {
    text.replace('\r', "\\r").replace('\n', "\\n")
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("  {}{text}", " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::csv::{read_csv_from_str, CsvOptions};

    #[test]
    fn empty_dataset_lists_columns() {
        let ds = read_csv_from_str("a,b\n", &CsvOptions::default()).unwrap();
        assert_eq!(render_preview(&ds), "Empty DataFrame\nColumns: [a, b]\nIndex: []");
    }

    #[test]
    fn header_and_rows_are_aligned() {
        let ds = read_csv_from_str("name,n\nAnn,1\nBartholomew,\n", &CsvOptions::default()).unwrap();
        let text = render_preview(&ds);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "          name    n");
        assert_eq!(lines[1], "0          Ann    1");
        assert_eq!(lines[2], "1  Bartholomew  NaN");
    }

    #[test]
    fn quoted_line_breaks_stay_on_one_row() {
        let ds = read_csv_from_str("note,n\n\"two\nlines\",1\n", &CsvOptions::default()).unwrap();
        assert_eq!(ds.row_count(), 1);
        assert_eq!(render_preview(&ds), "         note  n\n0  two\\nlines  1");
    }
}
