use std::path::Path;

use crate::error::Result;
use crate::loaders::FileLoader;
use crate::readers::{DocumentReader, DocxDocument};

pub struct DocxLoader;

impl FileLoader for DocxLoader {
    fn accepted_extensions(&self) -> &'static [&'static str] {
        &["docx"]
    }

    fn format_name(&self) -> &'static str {
        "DOCX"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn DocumentReader>> {
        let bytes = std::fs::read(path)?;
        Ok(Box::new(DocxDocument::from_bytes(&bytes)?))
    }
}
