//! Core Store implementation

use std::fs;
use std::path::Path;
use std::time::Duration;

use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use tracing::{debug, info};

use crate::DB_FILE_NAME;
use crate::error::{StoreError, StoreResult};
use crate::record::{Filter, Order, Record};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    data TEXT NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (collection, id)
);

CREATE TABLE IF NOT EXISTS record_indexes (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    field TEXT NOT NULL,
    value,
    PRIMARY KEY (collection, id, field)
);

CREATE INDEX IF NOT EXISTS idx_record_indexes_lookup
    ON record_indexes (collection, field, value);
"#;

/// SQLite-backed record store
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a store in the given directory
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let db_path = dir.join(DB_FILE_NAME);
        debug!(db_path = %db_path.display(), "open: called");
        Self::bootstrap(Connection::open(&db_path)?)
    }

    /// Open a throwaway in-memory store
    pub fn open_in_memory() -> StoreResult<Self> {
        debug!("open_in_memory: called");
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> StoreResult<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;
        info!("Store opened");
        Ok(Self { conn })
    }

    /// Insert a new record, failing if the id is taken
    pub fn create<T: Record>(&mut self, record: T) -> StoreResult<String> {
        debug!(collection = T::collection_name(), id = %record.id(), "create: called");
        insert_record(&self.conn, &record)?;
        Ok(record.id().to_string())
    }

    /// Insert a batch of records atomically
    pub fn create_many<T: Record>(&mut self, records: Vec<T>) -> StoreResult<Vec<String>> {
        debug!(collection = T::collection_name(), count = records.len(), "create_many: called");
        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(records.len());
        for record in &records {
            insert_record(&tx, record)?;
            ids.push(record.id().to_string());
        }
        tx.commit()?;
        Ok(ids)
    }

    /// Fetch a record by id
    pub fn get<T: Record>(&self, id: &str) -> StoreResult<Option<T>> {
        debug!(collection = T::collection_name(), %id, "get: called");
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM records WHERE collection = ?1 AND id = ?2",
                params![T::collection_name(), id],
                |row| row.get(0),
            )
            .optional()?;

        match data {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Replace an existing record
    pub fn update<T: Record>(&mut self, record: T) -> StoreResult<()> {
        debug!(collection = T::collection_name(), id = %record.id(), "update: called");
        update_record(&self.conn, &record)
    }

    /// Replace a batch of existing records atomically
    pub fn update_many<T: Record>(&mut self, records: Vec<T>) -> StoreResult<usize> {
        debug!(collection = T::collection_name(), count = records.len(), "update_many: called");
        let tx = self.conn.transaction()?;
        for record in &records {
            update_record(&tx, record)?;
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// Delete a record by id
    pub fn delete<T: Record>(&mut self, id: &str) -> StoreResult<()> {
        debug!(collection = T::collection_name(), %id, "delete: called");
        let tx = self.conn.transaction()?;
        let removed = delete_record(&tx, T::collection_name(), id)?;
        tx.commit()?;

        if removed == 0 {
            return Err(StoreError::NotFound {
                collection: T::collection_name(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete every record matching all filters; an empty filter list clears the collection
    pub fn delete_where<T: Record>(&mut self, filters: &[Filter]) -> StoreResult<usize> {
        debug!(collection = T::collection_name(), filter_count = filters.len(), "delete_where: called");
        let ids = self.matching_ids::<T>(filters)?;

        let tx = self.conn.transaction()?;
        let mut removed = 0;
        for id in &ids {
            removed += delete_record(&tx, T::collection_name(), id)?;
        }
        tx.commit()?;

        info!(collection = T::collection_name(), removed, "Deleted records");
        Ok(removed)
    }

    /// List records matching all filters in insertion order
    pub fn list<T: Record>(&self, filters: &[Filter]) -> StoreResult<Vec<T>> {
        debug!(collection = T::collection_name(), filter_count = filters.len(), "list: called");
        self.query(filters, None)
    }

    /// List records matching all filters, sorted by an indexed field
    pub fn list_ordered<T: Record>(&self, filters: &[Filter], order_by: &str, order: Order) -> StoreResult<Vec<T>> {
        debug!(collection = T::collection_name(), %order_by, ?order, "list_ordered: called");
        self.query(filters, Some((order_by, order)))
    }

    /// Recompute index rows for every record of a type
    pub fn rebuild_indexes<T: Record>(&mut self) -> StoreResult<usize> {
        debug!(collection = T::collection_name(), "rebuild_indexes: called");
        let records: Vec<T> = self.query(&[], None)?;

        let tx = self.conn.transaction()?;
        for record in &records {
            write_indexes(&tx, record)?;
        }
        tx.commit()?;

        Ok(records.len())
    }

    fn matching_ids<T: Record>(&self, filters: &[Filter]) -> StoreResult<Vec<String>> {
        let mut sql = String::from("SELECT r.id FROM records r WHERE r.collection = ?");
        let mut values = vec![Value::Text(T::collection_name().to_string())];
        push_filters(&mut sql, &mut values, filters);

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    fn query<T: Record>(&self, filters: &[Filter], order: Option<(&str, Order)>) -> StoreResult<Vec<T>> {
        let mut sql = String::from("SELECT r.data FROM records r");
        let mut values = Vec::new();

        if let Some((field, _)) = order {
            sql.push_str(
                " LEFT JOIN record_indexes o ON o.collection = r.collection AND o.id = r.id AND o.field = ?",
            );
            values.push(Value::Text(field.to_string()));
        }

        sql.push_str(" WHERE r.collection = ?");
        values.push(Value::Text(T::collection_name().to_string()));
        push_filters(&mut sql, &mut values, filters);

        match order {
            Some((_, dir)) => sql.push_str(&format!(" ORDER BY o.value {0}, r.rowid {0}", dir.as_sql())),
            None => sql.push_str(" ORDER BY r.rowid"),
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(serde_json::from_str(&row?)?);
        }
        Ok(records)
    }
}

fn push_filters(sql: &mut String, values: &mut Vec<Value>, filters: &[Filter]) {
    for filter in filters {
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM record_indexes i WHERE i.collection = r.collection \
             AND i.id = r.id AND i.field = ? AND i.value {} ?)",
            filter.op.as_sql()
        ));
        values.push(Value::Text(filter.field.clone()));
        values.push(filter.value.to_sql());
    }
}

fn insert_record<T: Record>(conn: &Connection, record: &T) -> StoreResult<()> {
    let collection = T::collection_name();
    let exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM records WHERE collection = ?1 AND id = ?2",
            params![collection, record.id()],
            |row| row.get(0),
        )
        .optional()?;

    if exists.is_some() {
        return Err(StoreError::AlreadyExists {
            collection,
            id: record.id().to_string(),
        });
    }

    let data = serde_json::to_string(record)?;
    conn.execute(
        "INSERT INTO records (collection, id, data, updated_at) VALUES (?1, ?2, ?3, ?4)",
        params![collection, record.id(), data, record.updated_at()],
    )?;
    write_indexes(conn, record)
}

fn update_record<T: Record>(conn: &Connection, record: &T) -> StoreResult<()> {
    let collection = T::collection_name();
    let data = serde_json::to_string(record)?;
    let changed = conn.execute(
        "UPDATE records SET data = ?3, updated_at = ?4 WHERE collection = ?1 AND id = ?2",
        params![collection, record.id(), data, record.updated_at()],
    )?;

    if changed == 0 {
        return Err(StoreError::NotFound {
            collection,
            id: record.id().to_string(),
        });
    }
    write_indexes(conn, record)
}

fn delete_record(conn: &Connection, collection: &str, id: &str) -> StoreResult<usize> {
    conn.execute(
        "DELETE FROM record_indexes WHERE collection = ?1 AND id = ?2",
        params![collection, id],
    )?;
    let removed = conn.execute(
        "DELETE FROM records WHERE collection = ?1 AND id = ?2",
        params![collection, id],
    )?;
    Ok(removed)
}

fn write_indexes<T: Record>(conn: &Connection, record: &T) -> StoreResult<()> {
    let collection = T::collection_name();
    conn.execute(
        "DELETE FROM record_indexes WHERE collection = ?1 AND id = ?2",
        params![collection, record.id()],
    )?;

    let mut stmt =
        conn.prepare_cached("INSERT INTO record_indexes (collection, id, field, value) VALUES (?1, ?2, ?3, ?4)")?;
    for (field, value) in record.indexed_fields() {
        stmt.execute(params![collection, record.id(), field, value.to_sql()])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FilterOp, IndexValue};
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        body: String,
        done: bool,
        rank: i64,
        updated_at: i64,
    }

    impl Note {
        fn new(id: &str, rank: i64, done: bool) -> Self {
            Self {
                id: id.to_string(),
                body: format!("note {}", id),
                done,
                rank,
                updated_at: crate::now_ms(),
            }
        }
    }

    impl Record for Note {
        fn id(&self) -> &str {
            &self.id
        }

        fn updated_at(&self) -> i64 {
            self.updated_at
        }

        fn collection_name() -> &'static str {
            "notes"
        }

        fn indexed_fields(&self) -> HashMap<String, IndexValue> {
            let mut fields = HashMap::new();
            fields.insert("done".to_string(), IndexValue::Bool(self.done));
            fields.insert("rank".to_string(), IndexValue::Int(self.rank));
            fields
        }
    }

    #[test]
    fn test_create_and_get() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store.create(Note::new("a", 1, false)).unwrap();
        assert_eq!(id, "a");

        let note: Note = store.get("a").unwrap().unwrap();
        assert_eq!(note.body, "note a");
        assert!(store.get::<Note>("missing").unwrap().is_none());
    }

    #[test]
    fn test_create_duplicate_fails() {
        let mut store = Store::open_in_memory().unwrap();
        store.create(Note::new("a", 1, false)).unwrap();
        let result = store.create(Note::new("a", 2, false));
        assert!(matches!(result, Err(StoreError::AlreadyExists { .. })));
    }

    #[test]
    fn test_create_many_is_atomic() {
        let mut store = Store::open_in_memory().unwrap();
        store.create(Note::new("b", 1, false)).unwrap();

        // "b" collides, so nothing from the batch should land
        let result = store.create_many(vec![Note::new("a", 1, false), Note::new("b", 2, false)]);
        assert!(result.is_err());
        assert!(store.get::<Note>("a").unwrap().is_none());
    }

    #[test]
    fn test_update_and_filter() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .create_many(vec![Note::new("a", 1, false), Note::new("b", 2, false)])
            .unwrap();

        let mut b: Note = store.get("b").unwrap().unwrap();
        b.done = true;
        store.update(b).unwrap();

        let done: Vec<Note> = store.list(&[Filter::eq("done", true)]).unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, "b");

        let pending: Vec<Note> = store.list(&[Filter::eq("done", false)]).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "a");
    }

    #[test]
    fn test_update_missing_fails() {
        let mut store = Store::open_in_memory().unwrap();
        let result = store.update(Note::new("ghost", 1, false));
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_list_ordered() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .create_many(vec![
                Note::new("a", 2, false),
                Note::new("b", 3, false),
                Note::new("c", 1, false),
            ])
            .unwrap();

        let asc: Vec<Note> = store.list_ordered(&[], "rank", Order::Asc).unwrap();
        assert_eq!(asc.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(), vec!["c", "a", "b"]);

        let desc: Vec<Note> = store.list_ordered(&[], "rank", Order::Desc).unwrap();
        assert_eq!(desc.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_range_filter() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .create_many(vec![
                Note::new("a", 1, false),
                Note::new("b", 5, false),
                Note::new("c", 9, false),
            ])
            .unwrap();

        let filter = Filter {
            field: "rank".to_string(),
            op: FilterOp::Gte,
            value: IndexValue::Int(5),
        };
        let notes: Vec<Note> = store.list(&[filter]).unwrap();
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn test_delete_and_delete_where() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .create_many(vec![
                Note::new("a", 1, true),
                Note::new("b", 2, false),
                Note::new("c", 3, true),
            ])
            .unwrap();

        store.delete::<Note>("b").unwrap();
        assert!(matches!(store.delete::<Note>("b"), Err(StoreError::NotFound { .. })));

        let removed = store.delete_where::<Note>(&[Filter::eq("done", true)]).unwrap();
        assert_eq!(removed, 2);
        assert!(store.list::<Note>(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_delete_where_without_filters_clears_collection() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .create_many(vec![Note::new("a", 1, true), Note::new("b", 2, false)])
            .unwrap();

        assert_eq!(store.delete_where::<Note>(&[]).unwrap(), 2);
        assert!(store.list::<Note>(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_persists_across_open() {
        let temp = TempDir::new().unwrap();
        {
            let mut store = Store::open(temp.path()).unwrap();
            store.create(Note::new("a", 1, false)).unwrap();
        }

        let mut store = Store::open(temp.path()).unwrap();
        assert!(temp.path().join(DB_FILE_NAME).exists());
        assert_eq!(store.rebuild_indexes::<Note>().unwrap(), 1);
        assert!(store.get::<Note>("a").unwrap().is_some());
    }
}
