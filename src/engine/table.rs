//! Delimited-text parsing into an immutable header list plus string rows.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One data row: column name to trimmed cell text, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<String, String>,
}

impl Row {
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Cell text for `column`, or `None` when the row has no such column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Cell text for `column`, treating an absent column as empty.
    pub fn get_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A parsed dataset. The header list is the schema; rows never carry
/// columns outside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedTable {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl ParsedTable {
    /// Build a table from an explicit schema and rows. Rows are aligned to
    /// `headers`: missing columns become empty strings, extra ones are dropped.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        let headers = dedupe_headers(headers);
        let rows = rows
            .into_iter()
            .map(|row| {
                Row::from_pairs(
                    headers
                        .iter()
                        .map(|h| (h.clone(), row.get_or_empty(h).to_string())),
                )
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    /// The first `n` rows, as shown to the planner and in previews.
    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }
}

/// Parse comma-separated text with a header row.
///
/// Quoted fields may contain commas, quotes (`""`) and line breaks. Every
/// header and cell is trimmed, blank lines are skipped, and short or long
/// records are aligned to the header positionally. Never fails: records the
/// reader cannot decode are logged and skipped.
pub fn parse_csv(text: &str) -> ParsedTable {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = reader
        .records()
        .enumerate()
        .filter_map(|(idx, result)| match result {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(record = idx, error = %err, "skipping unreadable CSV record");
                None
            }
        })
        .filter(|record| !is_blank(record));

    let Some(header_record) = records.next() else {
        return ParsedTable::default();
    };
    let headers = dedupe_headers(header_record.iter().map(str::to_string).collect());

    let mut rows = Vec::new();
    let mut ragged = 0usize;
    for record in records {
        if record.len() != headers.len() {
            ragged += 1;
        }
        rows.push(Row::from_pairs(
            headers
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), record.get(i).unwrap_or("").to_string())),
        ));
    }

    if ragged > 0 {
        warn!(records = ragged, "CSV records with a field count different from the header");
    }
    debug!(columns = headers.len(), rows = rows.len(), "parsed CSV");
    ParsedTable { headers, rows }
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() == 0 || (record.len() == 1 && record[0].is_empty())
}

/// Repeated names get `_1`, `_2`, ... so every column stays addressable.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for name in headers {
        let mut candidate = name.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{name}_{n}");
            n += 1;
        }
        seen.push(candidate);
    }
    seen
}
