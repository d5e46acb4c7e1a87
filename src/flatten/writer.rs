use crate::flatten::flattener::FlatMap;
use crate::format::DatabaseRow;
use anyhow::{Context, Result};
use std::io::Write;

/// Writes flattened records as JSON Lines, one object per record
pub struct FlatWriter<W: Write> {
    writer: W,
    records: usize,
}

impl<W: Write> FlatWriter<W> {
    pub fn new(writer: W) -> Self {
        FlatWriter { writer, records: 0 }
    }

    pub fn write_record(&mut self, record: &FlatMap) -> Result<()> {
        let json = serde_json::to_string(record).context("Failed to serialize record")?;
        writeln!(self.writer, "{}", json).context("Failed to write record")?;
        self.records += 1;
        Ok(())
    }

    /// Number of records written so far
    pub fn records_written(&self) -> usize {
        self.records
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Writes flattened records as SQL INSERT statements for a single table
///
/// Values are rendered with [`DatabaseRow`], which only doubles single
/// quotes. Use parameterized queries when the input is untrusted.
pub struct SqlWriter<W: Write> {
    writer: W,
    table: String,
}

impl<W: Write> SqlWriter<W> {
    pub fn new(writer: W, table: impl Into<String>) -> Self {
        SqlWriter {
            writer,
            table: table.into(),
        }
    }

    pub fn write_record(&mut self, record: &FlatMap) -> Result<()> {
        // A record with no columns has nothing to insert
        if record.is_empty() {
            return Ok(());
        }
        let row = DatabaseRow::from_flat(record);
        writeln!(self.writer, "{}", row.insert_statement(&self.table))
            .context("Failed to write statement")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::Flattener;
    use serde_json::json;

    #[test]
    fn test_flat_writer() {
        let record = Flattener::default()
            .flatten(json!({"name": "Alice", "address": {"city": "Boston"}}))
            .unwrap();

        let mut writer = FlatWriter::new(Vec::new());
        writer.write_record(&record).unwrap();
        writer.write_record(&record).unwrap();
        assert_eq!(writer.records_written(), 2);

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"name":"Alice","address_city":"Boston"}"#);
    }

    #[test]
    fn test_sql_writer() {
        let record = Flattener::default()
            .flatten(json!({"id": 1, "note": "it's", "tags": [], "gone": null}))
            .unwrap();

        let mut writer = SqlWriter::new(Vec::new(), "events");
        writer.write_record(&record).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            output,
            "INSERT INTO events (id,note,tags,gone) VALUES (1,'it''s','[]',NULL);\n"
        );
    }

    #[test]
    fn test_sql_writer_skips_empty_records() {
        let mut writer = SqlWriter::new(Vec::new(), "events");
        writer.write_record(&FlatMap::new()).unwrap();
        assert!(writer.into_inner().is_empty());
    }
}
