use std::path::Path;

use crate::error::Result;
use crate::loaders::FileLoader;
use crate::readers::{DocumentReader, PdfDocument};

pub struct PdfLoader;

impl FileLoader for PdfLoader {
    fn accepted_extensions(&self) -> &'static [&'static str] {
        &["pdf"]
    }

    fn format_name(&self) -> &'static str {
        "PDF"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn DocumentReader>> {
        Ok(Box::new(PdfDocument::open(path)?))
    }
}
