use crate::app::ports::TabularSink;
use crate::constants::{DEFAULT_EXPORT_SOURCE, EVENTS_TABLE, PAIRINGS_TABLE, PARTICIPANTS_TABLE};
use crate::error::{Result, ScraperError};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::{Null, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Joined view used by the default export when no `csv_output` exists yet.
const DEFAULT_EXPORT_VIEW: &str = r#"
    CREATE VIEW IF NOT EXISTS csv_output AS
    SELECT
        p."Event"        AS "Event",
        e."event_name"   AS "Event Display Name",
        p."Round"        AS "Round",
        p."Table"        AS "Table",
        p."Seat"         AS "Seat",
        p."Gem ID"       AS "Gem ID",
        pa."Name"        AS "Name",
        pa."Format"      AS "Format",
        pa."Hero"        AS "Hero",
        p."Outcome"      AS "Outcome"
    FROM pairings p
    LEFT JOIN participants pa
        ON pa."Gem ID" = p."Gem ID" AND pa."Event Name" = p."Event"
    LEFT JOIN events e
        ON e."event_url_portion" = p."Event"
"#;

/// A single value in a [`Frame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Null,
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<Option<String>> for Cell {
    fn from(s: Option<String>) -> Self {
        s.map(Cell::Text).unwrap_or(Cell::Null)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Text(s) => ToSqlOutput::from(s.as_str()),
            Cell::Int(v) => ToSqlOutput::from(*v),
            Cell::Null => ToSqlOutput::from(Null),
        })
    }
}

/// Named key column carried alongside a frame's rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIndex {
    pub name: String,
    pub keys: Vec<String>,
}

/// Column-named rows ready for a [`TabularSink`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub index: Option<RowIndex>,
}

impl Frame {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            index: None,
        }
    }

    pub fn with_index(mut self, name: impl Into<String>) -> Self {
        self.index = Some(RowIndex {
            name: name.into(),
            keys: Vec::new(),
        });
        self
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn push_keyed(&mut self, key: impl Into<String>, row: Vec<Cell>) {
        if let Some(index) = self.index.as_mut() {
            index.keys.push(key.into());
        }
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names and rows as they will be written, index first when requested.
    pub fn materialize(&self, use_row_index: bool) -> Result<(Vec<String>, Vec<Vec<Cell>>)> {
        for row in &self.rows {
            if row.len() != self.columns.len() {
                return Err(ScraperError::Sink(format!(
                    "row has {} cells but frame has {} columns",
                    row.len(),
                    self.columns.len()
                )));
            }
        }
        if !use_row_index {
            return Ok((self.columns.clone(), self.rows.clone()));
        }

        let index = self
            .index
            .as_ref()
            .ok_or_else(|| ScraperError::Sink("row index requested for an unindexed frame".into()))?;
        if index.keys.len() != self.rows.len() {
            return Err(ScraperError::Sink(format!(
                "index has {} keys for {} rows",
                index.keys.len(),
                self.rows.len()
            )));
        }

        let columns = std::iter::once(index.name.clone())
            .chain(self.columns.iter().cloned())
            .collect();
        let rows = index
            .keys
            .iter()
            .zip(&self.rows)
            .map(|(key, row)| {
                std::iter::once(Cell::Text(key.clone()))
                    .chain(row.iter().cloned())
                    .collect()
            })
            .collect();
        Ok((columns, rows))
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn column_type(rows: &[Vec<Cell>], col: usize) -> &'static str {
    let mut saw_int = false;
    for row in rows {
        match row.get(col) {
            Some(Cell::Text(_)) => return "TEXT",
            Some(Cell::Int(_)) => saw_int = true,
            _ => {}
        }
    }
    if saw_int {
        "INTEGER"
    } else {
        "TEXT"
    }
}

/// Append-only SQLite store. Each append opens its own connection and commits
/// before returning; nothing spans tables.
pub struct SqliteSink {
    path: PathBuf,
}

impl SqliteSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Connection::open(&self.path)?)
    }

    /// Reads every row of `source` (a table or view) and writes it to `out` as
    /// CSV with a header row. Returns the number of data rows written.
    pub fn export_csv(&self, source: &str, out: &Path) -> Result<usize> {
        if !IDENTIFIER.is_match(source) {
            return Err(ScraperError::Config(format!(
                "export source '{}' is not a plain table or view name",
                source
            )));
        }

        let conn = self.connect()?;
        if source == DEFAULT_EXPORT_SOURCE && !relation_exists(&conn, source)? {
            for table in [PAIRINGS_TABLE, PARTICIPANTS_TABLE, EVENTS_TABLE] {
                if !relation_exists(&conn, table)? {
                    return Err(ScraperError::Config(format!(
                        "cannot build the default {} view: table '{}' does not exist yet",
                        DEFAULT_EXPORT_SOURCE, table
                    )));
                }
            }
            debug!("Creating default {} view", DEFAULT_EXPORT_SOURCE);
            conn.execute_batch(DEFAULT_EXPORT_VIEW)?;
        }

        let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_ident(source)))?;
        let headers: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = headers.len();

        let mut writer = csv::Writer::from_path(out)?;
        writer.write_record(&headers)?;

        let mut rows = stmt.query([])?;
        let mut count = 0usize;
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(width);
            for i in 0..width {
                record.push(value_to_string(row.get_ref(i)?));
            }
            writer.write_record(&record)?;
            count += 1;
        }
        writer.flush()?;

        info!("Exported {} rows from {} to {}", count, source, out.display());
        Ok(count)
    }
}

fn relation_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

impl TabularSink for SqliteSink {
    fn append(&self, table: &str, frame: &Frame, use_row_index: bool) -> Result<()> {
        let (columns, rows) = frame.materialize(use_row_index)?;
        let mut conn = self.connect()?;

        let column_defs: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} {}", quote_ident(c), column_type(&rows, i)))
            .collect();
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} ({})",
                quote_ident(table),
                column_defs.join(", ")
            ),
            [],
        )?;

        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            columns.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", "),
            (1..=columns.len()).map(|i| format!("?{}", i)).collect::<Vec<_>>().join(", ")
        );

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&insert)?;
            for row in &rows {
                stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;

        debug!("Appended {} rows to {}", rows.len(), table);
        Ok(())
    }
}

/// Recorded append, as seen by [`InMemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendedTable {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// In-memory sink for development/testing
#[derive(Default)]
pub struct InMemorySink {
    appends: Mutex<Vec<AppendedTable>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every append so far, in call order.
    pub fn appends(&self) -> Vec<AppendedTable> {
        self.appends
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// All rows appended to `table`, across calls.
    pub fn rows(&self, table: &str) -> Vec<Vec<Cell>> {
        self.appends()
            .into_iter()
            .filter(|a| a.table == table)
            .flat_map(|a| a.rows)
            .collect()
    }
}

impl TabularSink for InMemorySink {
    fn append(&self, table: &str, frame: &Frame, use_row_index: bool) -> Result<()> {
        let (columns, rows) = frame.materialize(use_row_index)?;
        let mut appends = self
            .appends
            .lock()
            .map_err(|_| ScraperError::Sink("in-memory sink lock poisoned".into()))?;
        appends.push(AppendedTable {
            table: table.to_string(),
            columns,
            rows,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn keyed_frame() -> Frame {
        let mut frame = Frame::new(["Name", "Copies"]).with_index("Gem ID");
        frame.push_keyed("12345", vec![Cell::from("Jane"), Cell::from(3i64)]);
        frame.push_keyed("678", vec![Cell::from("Sam"), Cell::Null]);
        frame
    }

    #[test]
    fn test_materialize_with_index() {
        let (columns, rows) = keyed_frame().materialize(true).unwrap();
        assert_eq!(columns, vec!["Gem ID", "Name", "Copies"]);
        assert_eq!(rows[1], vec![Cell::from("678"), Cell::from("Sam"), Cell::Null]);
    }

    #[test]
    fn test_materialize_rejects_missing_index() {
        let frame = Frame::new(["a"]);
        assert!(frame.materialize(true).is_err());
        assert!(frame.materialize(false).is_ok());
    }

    #[test]
    fn test_sqlite_append_and_export() {
        let dir = tempdir().unwrap();
        let sink = SqliteSink::new(dir.path().join("wt.db"));

        sink.append("participants", &keyed_frame(), true).unwrap();
        sink.append("participants", &keyed_frame(), true).unwrap();

        let out = dir.path().join("out.csv");
        let written = sink.export_csv("participants", &out).unwrap();
        assert_eq!(written, 4);

        let text = std::fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Gem ID,Name,Copies"));
        assert_eq!(lines.next(), Some("12345,Jane,3"));
        assert_eq!(lines.next(), Some("678,Sam,"));
    }

    #[test]
    fn test_export_rejects_non_identifier() {
        let dir = tempdir().unwrap();
        let sink = SqliteSink::new(dir.path().join("wt.db"));
        let out = dir.path().join("out.csv");
        assert!(matches!(
            sink.export_csv("pairings; DROP TABLE pairings", &out),
            Err(ScraperError::Config(_))
        ));
    }

    #[test]
    fn test_default_view_needs_base_tables() {
        let dir = tempdir().unwrap();
        let sink = SqliteSink::new(dir.path().join("fresh.db"));
        let out = dir.path().join("out.csv");
        assert!(matches!(
            sink.export_csv(DEFAULT_EXPORT_SOURCE, &out),
            Err(ScraperError::Config(_))
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_in_memory_sink_records_order() {
        let sink = InMemorySink::new();
        sink.append("participants", &keyed_frame(), true).unwrap();
        sink.append("events", &Frame::new(["event_url_portion"]), false).unwrap();
        let tables: Vec<String> = sink.appends().into_iter().map(|a| a.table).collect();
        assert_eq!(tables, vec!["participants", "events"]);
        assert_eq!(sink.rows("participants").len(), 2);
    }
}
