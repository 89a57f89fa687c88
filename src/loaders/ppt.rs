use std::path::Path;

use crate::error::Result;
use crate::loaders::FileLoader;
use crate::readers::{DocumentReader, PptxDocument};

/// Accepts both `.ppt` and `.pptx`. A genuine legacy binary PPT is not an
/// OOXML package, so it fails in the parser and that error propagates.
pub struct PptLoader;

impl FileLoader for PptLoader {
    fn accepted_extensions(&self) -> &'static [&'static str] {
        &["ppt", "pptx"]
    }

    fn format_name(&self) -> &'static str {
        "PPT"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn DocumentReader>> {
        let bytes = std::fs::read(path)?;
        Ok(Box::new(PptxDocument::from_bytes(&bytes)?))
    }
}
