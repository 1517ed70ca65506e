//! Boundary types for table extraction and columnar output.
//!
//! Parsing markup into tables and encoding tables into columnar files are
//! done by collaborators outside this crate. They plug in through
//! [`TableParser`] and [`ColumnarEncoder`]; the cache never inspects content.

use bytes::Bytes;

use crate::Error;
use crate::store::{BlobStore, KeyScheme};

/// One table row: cell strings in column order.
pub type Row = Vec<String>;

/// A table with named columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Build a table whose first row is the header.
    ///
    /// Returns `None` for an empty row list.
    pub fn from_header_rows(mut rows: Vec<Row>) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let columns = rows.remove(0);
        Some(Self { columns, rows })
    }

    /// Rows whose cell count differs from the header.
    pub fn ragged_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows.iter().enumerate().filter(|(_, row)| row.len() != self.columns.len())
    }
}

/// Turns expanded content into its tables, in document order.
pub trait TableParser: Send + Sync {
    fn parse_tables(&self, text: &str) -> Result<Vec<Vec<Row>>, Error>;
}

/// Serializes a table into a columnar file.
pub trait ColumnarEncoder: Send + Sync {
    /// File extension of the produced format, without a dot.
    fn extension(&self) -> &str;

    fn encode(&self, table: &Table) -> Result<Bytes, Error>;
}

/// Encode `table` and write it under the origin's extracted-tables prefix.
///
/// Returns the key written.
pub async fn put_table(
    store: &BlobStore, keys: &KeyScheme, name: &str, table: &Table, encoder: &dyn ColumnarEncoder,
) -> Result<String, Error> {
    if let Some((index, row)) = table.ragged_rows().next() {
        tracing::warn!(%name, index, cells = row.len(), columns = table.columns.len(), "table has ragged rows");
    }

    let key = keys.extracted_table_key(name, encoder.extension());
    let bytes = encoder.encode(table)?;
    store.put_bytes(&key, bytes).await?;
    tracing::info!(%key, rows = table.rows.len(), "wrote extracted table");
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TextEncoding;

    struct PipeParser;

    impl TableParser for PipeParser {
        fn parse_tables(&self, text: &str) -> Result<Vec<Vec<Row>>, Error> {
            Ok(text
                .split("\n\n")
                .map(|block| {
                    block
                        .lines()
                        .map(|line| line.split('|').map(|c| c.trim().to_string()).collect::<Row>())
                        .collect::<Vec<Row>>()
                })
                .collect())
        }
    }

    struct TsvEncoder;

    impl ColumnarEncoder for TsvEncoder {
        fn extension(&self) -> &str {
            "tsv"
        }

        fn encode(&self, table: &Table) -> Result<Bytes, Error> {
            let mut out = table.columns.join("\t");
            for row in &table.rows {
                out.push('\n');
                out.push_str(&row.join("\t"));
            }
            Ok(Bytes::from(out))
        }
    }

    #[test]
    fn test_from_header_rows() {
        let table = Table::from_header_rows(vec![
            vec!["release_date".into(), "release_title".into()],
            vec!["May 9, 2000".into(), "Pokémon the First Movie".into()],
        ])
        .unwrap();
        assert_eq!(table.columns, vec!["release_date", "release_title"]);
        assert_eq!(table.rows.len(), 1);
        assert!(Table::from_header_rows(Vec::new()).is_none());
    }

    #[test]
    fn test_ragged_rows() {
        let table = Table {
            columns: vec!["a".into(), "b".into()],
            rows: vec![vec!["1".into(), "2".into()], vec!["3".into()]],
        };
        let ragged: Vec<usize> = table.ragged_rows().map(|(i, _)| i).collect();
        assert_eq!(ragged, vec![1]);
    }

    #[tokio::test]
    async fn test_parse_and_put_table() {
        let store = BlobStore::open_in_memory();
        let keys = KeyScheme::new("bulbapedia", "wikitext");

        let tables = PipeParser.parse_tables("date | title\n2000 | First Movie\n\nx | y").unwrap();
        let table = Table::from_header_rows(tables[0].clone()).unwrap();

        let key = put_table(&store, &keys, "ost_releases_info.en", &table, &TsvEncoder).await.unwrap();

        assert_eq!(key, "sources/bulbapedia/extracted_tables/ost_releases_info.en.tsv");
        assert_eq!(store.get_text(&key, TextEncoding::Utf8).await.unwrap(), "date\ttitle\n2000\tFirst Movie");
    }
}
