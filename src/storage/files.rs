//! Flat-file backend: one JSON-lines file per logical record category under
//! the output root, one serialized record per line. Image records also dump
//! their raw bytes under `media/`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::ImageRecord;
use crate::storage::{sanitize_table_name, RecordStore};

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn store(&self, table_name: &str, record: &Value) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        let path = self
            .root
            .join(format!("{}.jsonl", sanitize_table_name(table_name)));
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", serde_json::to_string(record)?)?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    async fn store_images(&self, table_name: &str, records: &[ImageRecord]) -> Result<()> {
        let media_dir = self.root.join("media");
        fs::create_dir_all(&media_dir)?;

        let mut index = 0usize;
        for record in records {
            // Skip names taken by earlier batches so appends never clobber.
            let blob_path = loop {
                let candidate = media_dir.join(format!(
                    "page{}_{}.{}",
                    record.page_number, index, record.ext
                ));
                index += 1;
                if !candidate.exists() {
                    break candidate;
                }
            };
            fs::write(blob_path, &record.data)?;
            self.store(table_name, &serde_json::to_value(record)?).await?;
        }
        Ok(())
    }
}
