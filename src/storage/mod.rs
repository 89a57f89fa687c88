//! Pluggable storage backends for extracted records.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::{ImageRecord, TableRecord, TextRecord, UrlRecord};

mod files;
mod sqlite;

pub use files::FileStore;
pub use sqlite::SqliteStore;

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
///
/// Two distinct inputs can sanitize to the same identifier (for example
/// `a-b` and `a.b`); records for both then land in one table. Callers that
/// need distinct tables must pass distinct sanitized names.
pub fn sanitize_table_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Persists extracted records, one row (or line) per record, serialized to
/// canonical JSON. Instances are single-owner and not thread safe.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store one serialized record under the sanitized `table_name`.
    async fn store(&self, table_name: &str, record: &Value) -> Result<()>;

    /// Release the underlying handle. Idempotent; stores after `close` fail.
    async fn close(&self) -> Result<()>;

    async fn store_text(&self, table_name: &str, record: &TextRecord) -> Result<()> {
        self.store(table_name, &serde_json::to_value(record)?).await
    }

    async fn store_urls(&self, table_name: &str, records: &[UrlRecord]) -> Result<()> {
        for record in records {
            self.store(table_name, &serde_json::to_value(record)?).await?;
        }
        Ok(())
    }

    async fn store_images(&self, table_name: &str, records: &[ImageRecord]) -> Result<()> {
        for record in records {
            self.store(table_name, &serde_json::to_value(record)?).await?;
        }
        Ok(())
    }

    async fn store_tables(&self, table_name: &str, records: &[TableRecord]) -> Result<()> {
        for record in records {
            self.store(table_name, &serde_json::to_value(record)?).await?;
        }
        Ok(())
    }
}
