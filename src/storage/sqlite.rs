//! Relational backend on libsql.
//!
//! One table per logical record category, created on first store:
//! `CREATE TABLE IF NOT EXISTS "<name>" (id INTEGER PRIMARY KEY
//! AUTOINCREMENT, data TEXT)`, then one insert per record with the record's
//! canonical JSON string.

use async_trait::async_trait;
use libsql::{params, Builder};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{DocsiftError, Result};
use crate::storage::{sanitize_table_name, RecordStore};

pub struct SqliteStore {
    db: Mutex<Option<libsql::Database>>,
}

impl SqliteStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let db = if url == ":memory:" {
            Builder::new_local(":memory:").build().await?
        } else {
            let path = url.strip_prefix("file:").unwrap_or(url);
            Builder::new_local(path).build().await?
        };

        Ok(Self {
            db: Mutex::new(Some(db)),
        })
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn store(&self, table_name: &str, record: &Value) -> Result<()> {
        let guard = self.db.lock().await;
        let db = guard.as_ref().ok_or(DocsiftError::StorageClosed)?;
        let conn = db.connect()?;

        let table = sanitize_table_name(table_name);
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS \"{table}\" \
                 (id INTEGER PRIMARY KEY AUTOINCREMENT, data TEXT)"
            ),
            (),
        )
        .await?;

        conn.execute(
            &format!("INSERT INTO \"{table}\" (data) VALUES (?1)"),
            params![serde_json::to_string(record)?],
        )
        .await?;

        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.db.lock().await.take();
        Ok(())
    }
}
