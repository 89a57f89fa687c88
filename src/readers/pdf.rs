//! PDF reader using lopdf.

use std::path::Path;

use lopdf::{Dictionary, Document, Object};

use crate::error::{DocsiftError, Result};
use crate::models::{DocumentKind, ImageRecord, TableRecord, UrlRecord};
use crate::readers::DocumentReader;

pub struct PdfDocument {
    doc: Document,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let doc = Document::load(path)
            .map_err(|e| DocsiftError::Parse(format!("PDF parse error: {e}")))?;
        Ok(Self { doc })
    }

    /// Resources may live on the page itself or be inherited from an
    /// ancestor Pages node.
    fn page_resources<'a>(&'a self, page_dict: &'a Dictionary) -> Result<Option<&'a Dictionary>> {
        let mut dict = page_dict;
        loop {
            if let Ok(resources) = dict.get(b"Resources") {
                let resources = resolve(&self.doc, resources)?;
                return Ok(resources.as_dict().ok());
            }
            match dict.get(b"Parent") {
                Ok(parent) => match resolve(&self.doc, parent)?.as_dict() {
                    Ok(parent_dict) => dict = parent_dict,
                    Err(_) => return Ok(None),
                },
                Err(_) => return Ok(None),
            }
        }
    }
}

impl DocumentReader for PdfDocument {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    fn text(&self) -> Result<String> {
        let mut text = String::new();
        for (page_number, _page_id) in self.doc.get_pages() {
            let content = self
                .doc
                .extract_text(&[page_number])
                .map_err(|e| DocsiftError::Parse(format!("PDF text extraction failed: {e}")))?;
            text.push_str(&content);
            if !content.ends_with('\n') {
                text.push('\n');
            }
        }
        Ok(text)
    }

    fn urls(&self) -> Result<Vec<UrlRecord>> {
        let mut records = Vec::new();

        for (page_number, page_id) in self.doc.get_pages() {
            let Ok(page_dict) = self.doc.get_dictionary(page_id) else {
                continue;
            };
            let Ok(annots) = page_dict.get(b"Annots") else {
                continue;
            };
            let annots = resolve(&self.doc, annots)?;
            let Ok(items) = annots.as_array() else {
                continue;
            };

            for item in items {
                let Ok(annot) = resolve(&self.doc, item)?.as_dict() else {
                    continue;
                };
                if !name_is(annot.get(b"Subtype").ok(), b"Link") {
                    continue;
                }
                let Ok(action) = annot.get(b"A") else {
                    continue;
                };
                let Ok(action) = resolve(&self.doc, action)?.as_dict() else {
                    continue;
                };
                if !name_is(action.get(b"S").ok(), b"URI") {
                    continue;
                }
                let Ok(uri) = action.get(b"URI") else {
                    continue;
                };
                if let Object::String(bytes, _) = resolve(&self.doc, uri)? {
                    let url = String::from_utf8_lossy(bytes).into_owned();
                    if url.is_empty() {
                        continue;
                    }
                    // Link annotations carry no display text of their own.
                    records.push(UrlRecord {
                        linked_text: url.clone(),
                        url,
                        page_number: page_number as usize,
                    });
                }
            }
        }

        Ok(records)
    }

    fn images(&self) -> Result<Vec<ImageRecord>> {
        let mut records = Vec::new();

        for (page_number, page_id) in self.doc.get_pages() {
            let Ok(page_dict) = self.doc.get_dictionary(page_id) else {
                continue;
            };
            let Some(resources) = self.page_resources(page_dict)? else {
                continue;
            };
            let Ok(xobjects) = resources.get(b"XObject") else {
                continue;
            };
            let Ok(xobjects) = resolve(&self.doc, xobjects)?.as_dict() else {
                continue;
            };

            for (_name, entry) in xobjects.iter() {
                let Object::Stream(stream) = resolve(&self.doc, entry)? else {
                    continue;
                };
                if !name_is(stream.dict.get(b"Subtype").ok(), b"Image") {
                    continue;
                }

                let width = stream.dict.get(b"Width").ok().and_then(|o| o.as_i64().ok());
                let height = stream
                    .dict
                    .get(b"Height")
                    .ok()
                    .and_then(|o| o.as_i64().ok());
                let dimensions = match (width, height) {
                    (Some(w), Some(h)) => Some((w as u32, h as u32)),
                    _ => None,
                };

                records.push(ImageRecord {
                    data: stream.content.clone(),
                    ext: image_ext(&stream.dict),
                    page_number: page_number as usize,
                    dimensions,
                });
            }
        }

        Ok(records)
    }

    fn tables(&self) -> Result<Vec<TableRecord>> {
        // PDF has no table objects; table recovery from glyph positions is a
        // non-goal here.
        Ok(Vec::new())
    }
}

fn resolve<'a>(doc: &'a Document, mut object: &'a Object) -> Result<&'a Object> {
    let mut depth = 0;
    while let Object::Reference(id) = object {
        object = doc
            .get_object(*id)
            .map_err(|e| DocsiftError::Parse(format!("broken PDF reference: {e}")))?;
        depth += 1;
        if depth > 8 {
            return Err(DocsiftError::Parse("PDF reference chain too deep".into()));
        }
    }
    Ok(object)
}

fn name_is(object: Option<&Object>, expected: &[u8]) -> bool {
    matches!(object, Some(Object::Name(name)) if name.as_slice() == expected)
}

/// DCTDecode streams are complete JPEG payloads and JPXDecode streams are
/// JPEG 2000; anything else is kept as an undecoded blob.
fn image_ext(dict: &Dictionary) -> String {
    let filter = match dict.get(b"Filter") {
        Ok(Object::Name(name)) => Some(name.as_slice()),
        Ok(Object::Array(filters)) => filters.iter().find_map(|f| match f {
            Object::Name(name) => Some(name.as_slice()),
            _ => None,
        }),
        _ => None,
    };

    match filter {
        Some(b"DCTDecode") => "jpg",
        Some(b"JPXDecode") => "jp2",
        _ => "bin",
    }
    .to_string()
}
