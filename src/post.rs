//! Defines [`PostRecord`], the unit of information about one rendered post
//! shared by the index builder and the feed builder.

use crate::source::Metadata;
use gtmpl::Value;
use std::collections::HashMap;

/// One rendered post: its parsed front matter, its output file name
/// (relative to the output directory), and its rendered HTML fragment.
/// Records are produced by the post pipeline in source-file-name order and
/// are read, never mutated, by the index and feed builders.
#[derive(Debug)]
pub struct PostRecord {
    pub metadata: Metadata,
    pub url: String,
    pub content: String,
}

impl PostRecord {
    /// Converts a [`PostRecord`] into a [`Value::Object`] with fields
    /// `metadata`, `url`, and `content` for the index template.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("metadata".to_owned(), (&self.metadata).into());
        m.insert("url".to_owned(), Value::String(self.url.clone()));
        m.insert("content".to_owned(), Value::String(self.content.clone()));
        Value::Object(m)
    }
}
