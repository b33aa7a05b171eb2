use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::table::{Column, Table, Tabular};
use crate::value::Value;

/// Outcome of a CSV write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvWriteSummary {
    pub path: PathBuf,
    pub rows: u64,
    pub bytes: u64,
}

/// Read a CSV file with a header row into a table.
pub fn read_table(path: &Path) -> Result<Table> {
    let file = File::open(path)?;
    read_table_from_reader(file)
}

/// Read CSV from any reader; column types are inferred per column.
pub fn read_table_from_reader<R: Read>(reader: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        for (col_idx, field) in record.iter().enumerate() {
            cells[col_idx].push(parse_cell(field));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| Column::new(name, infer_column(raw)))
        .collect();

    Table::new(columns)
}

/// Write a table to `directory/filename`.
///
/// Checks run in order: filename suffix, directory existence, tabular input,
/// non-empty table. With `include_index` a leading unnamed column carries
/// the row labels.
pub fn write_csv<T: Tabular + ?Sized>(
    data: &T,
    directory: &Path,
    filename: &str,
    include_index: bool,
) -> Result<CsvWriteSummary> {
    if !filename.ends_with(".csv") {
        return Err(CoreError::InvalidFilename(filename.to_string()));
    }
    if !directory.is_dir() {
        return Err(CoreError::DirectoryNotFound(directory.to_path_buf()));
    }
    let table = data
        .as_table()
        .ok_or_else(|| CoreError::NotTabular(data.kind()))?;
    if table.is_empty() {
        return Err(CoreError::EmptyTable);
    }

    let path = directory.join(filename);
    let writer = BufWriter::new(File::create(&path)?);
    let bytes = write_table(table, writer, include_index)?;

    Ok(CsvWriteSummary {
        path,
        rows: table.n_rows() as u64,
        bytes,
    })
}

fn write_table<W: Write>(table: &Table, writer: W, include_index: bool) -> Result<u64> {
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    let mut header = Vec::with_capacity(table.n_cols() + 1);
    if include_index {
        header.push(String::new());
    }
    header.extend(table.column_names().into_iter().map(str::to_string));
    writer.write_record(&header)?;

    for (row, label) in table.index().iter().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        if include_index {
            record.push(label.to_string());
        }
        record.extend(table.row(row).into_iter().map(Value::to_csv));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

fn parse_cell(field: &str) -> Option<String> {
    let trimmed = field.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn infer_column(raw: Vec<Option<String>>) -> Vec<Value> {
    let present = || raw.iter().flatten();

    if present().all(|cell| cell.parse::<i64>().is_ok()) {
        return raw
            .iter()
            .map(|cell| {
                cell.as_deref()
                    .and_then(|v| v.parse::<i64>().ok())
                    .map(Value::Int)
                    .unwrap_or(Value::Null)
            })
            .collect();
    }

    if present().all(|cell| cell.parse::<f64>().is_ok()) {
        return raw
            .iter()
            .map(|cell| {
                cell.as_deref()
                    .and_then(|v| v.parse::<f64>().ok())
                    .map(Value::Float)
                    .unwrap_or(Value::Null)
            })
            .collect();
    }

    raw.into_iter().map(Value::from).collect()
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_types_per_column() {
        let data = "a,b,c,d\n1,1.5,x,\n2,,y,\nNA,3,4,\n";
        let table = read_table_from_reader(data.as_bytes()).expect("read csv");

        let a = table.column("a").expect("a");
        assert_eq!(a.values, vec![Value::Int(1), Value::Int(2), Value::Null]);

        let b = table.column("b").expect("b");
        assert_eq!(
            b.values,
            vec![Value::Float(1.5), Value::Null, Value::Float(3.0)]
        );

        let c = table.column("c").expect("c");
        assert_eq!(c.values[2], Value::from("4"));

        let d = table.column("d").expect("d");
        assert_eq!(d.null_count(), 3);
    }

    #[test]
    fn writes_index_column_when_requested() {
        let table = read_table_from_reader("a,b\n1,x\n2,\n".as_bytes())
            .expect("read csv")
            .take_rows(&[1, 0]);

        let mut buf = Vec::new();
        let bytes = write_table(&table, &mut buf, true).expect("write csv");
        let text = String::from_utf8(buf).expect("utf8");

        assert_eq!(text, ",a,b\n1,2,\n0,1,x\n");
        assert_eq!(bytes as usize, text.len());
    }
}
