mod kind;
mod record;

pub use kind::DocumentKind;
pub use record::{ImageRecord, TableRecord, TextRecord, UrlRecord};
