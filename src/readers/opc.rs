//! Helpers shared by the OOXML readers: zip part access, relationship
//! (`.rels`) parsing and part-target resolution.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{DocsiftError, Result};

#[derive(Debug, Clone)]
pub(crate) struct Relationship {
    pub target: String,
    pub rel_type: String,
    pub external: bool,
}

pub(crate) fn read_part_string(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    path: &str,
) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| DocsiftError::Parse(format!("failed to read {path}: {e}")))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| DocsiftError::Parse(format!("failed to read {path} content: {e}")))?;

    Ok(content)
}

pub(crate) fn read_part_bytes(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    path: &str,
) -> Result<Vec<u8>> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| DocsiftError::Parse(format!("failed to read {path}: {e}")))?;

    let mut content = Vec::new();
    file.read_to_end(&mut content)
        .map_err(|e| DocsiftError::Parse(format!("failed to read {path} content: {e}")))?;

    Ok(content)
}

/// Parse a `.rels` part into an id -> relationship map.
pub(crate) fn parse_relationships(xml: &str) -> HashMap<String, Relationship> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut mapping = HashMap::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"Relationship" {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => {
                                id = std::str::from_utf8(&attr.value).ok().map(String::from);
                            }
                            b"Target" => {
                                target = std::str::from_utf8(&attr.value).ok().map(String::from);
                            }
                            b"Type" => {
                                rel_type = std::str::from_utf8(&attr.value).ok().map(String::from);
                            }
                            b"TargetMode" => {
                                external = attr.value.as_ref() == b"External";
                            }
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        mapping.insert(
                            id,
                            Relationship {
                                target,
                                rel_type,
                                external,
                            },
                        );
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    mapping
}

/// Resolve a relationship target relative to the directory of the part that
/// declared it, e.g. `../media/image1.png` relative to `ppt/slides`.
pub(crate) fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for part in target.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// File extension of a package part name, lower-cased.
pub(crate) fn part_extension(name: &str) -> String {
    name.rsplit('.')
        .next()
        .filter(|ext| !ext.contains('/'))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}

pub(crate) fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
}
