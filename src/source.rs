//! Parsing source documents into front matter and body. A source file
//! optionally begins with a front-matter block delimited by fence lines
//! (`---`); the block is YAML and the rest of the file is markdown.
//!
//! There are two entry points with deliberately different contracts:
//! [`parse_page`] tolerates sources with no front matter at all, while
//! [`parse_post`] requires the block to exist. See the function docs.

use serde_yaml::Value as Yaml;
use std::collections::BTreeMap;
use std::fmt;

/// A front-matter delimiter: a line consisting solely of three hyphens.
const FENCE: &str = "---";

/// A parsed source document: front-matter metadata plus the markdown body.
#[derive(Debug)]
pub struct Document {
    pub metadata: Metadata,
    pub body: String,
}

/// Front-matter metadata: an ordered mapping from string keys to YAML
/// values. No schema is enforced; `title` and `date` are the only keys
/// consumed downstream.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Metadata(BTreeMap<String, Yaml>);

impl Metadata {
    pub fn empty() -> Metadata {
        Metadata(BTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Yaml)> {
        self.0.iter()
    }

    /// Looks up `key`, rendering scalar values as strings. Sequences,
    /// mappings, and nulls yield `None`.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Yaml::String(s) => Some(s.clone()),
            Yaml::Number(n) => Some(n.to_string()),
            Yaml::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn parse(input: &str) -> Result<Metadata> {
        // YAML reads a blank block as `null`, not as an empty mapping.
        if input.trim().is_empty() {
            return Ok(Metadata::empty());
        }
        Ok(Metadata(serde_yaml::from_str(input)?))
    }
}

/// Parses a page document. Pages tolerate sources with no front matter:
/// anything short of a fence line yields empty metadata and an empty body.
pub fn parse_page(input: &str) -> Result<Document> {
    let segments = split_fences(input);
    match segments.len() {
        0 | 1 => Ok(Document {
            metadata: Metadata::empty(),
            body: String::new(),
        }),
        _ => document(&segments),
    }
}

/// Parses a post document. Unlike pages, a post must carry a front-matter
/// block; a source with no fence line at all is an error.
pub fn parse_post(input: &str) -> Result<Document> {
    let segments = split_fences(input);
    match segments.len() {
        0 | 1 => Err(Error::MissingFrontmatter),
        _ => document(&segments),
    }
}

fn document(segments: &[&str]) -> Result<Document> {
    Ok(Document {
        metadata: Metadata::parse(segments[1])?,
        // Everything after the metadata block is body. The fence lines
        // themselves are dropped; `---` embedded within a line is not.
        body: segments[2..].concat(),
    })
}

// Splits `input` into segments separated by fence lines. A fence is a line
// consisting solely of `---` (trailing CR/LF excluded). Text before the
// first fence forms the first segment and is never consumed downstream.
fn split_fences(input: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut segment_start = 0;
    let mut offset = 0;
    for line in input.split_inclusive('\n') {
        let trimmed = line.strip_suffix('\n').unwrap_or(line);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        if trimmed == FENCE {
            segments.push(&input[segment_start..offset]);
            segment_start = offset + line.len();
        }
        offset += line.len();
    }
    segments.push(&input[segment_start..]);
    segments
}

/// Represents the result of a document-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a source document.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source has no front-matter block at all (no
    /// fence line found).
    MissingFrontmatter,

    /// Returned when the front-matter block fails to parse as a YAML
    /// mapping.
    DeserializeYaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingFrontmatter => {
                write!(f, "Post must carry a `---` front-matter block")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingFrontmatter => None,
            Error::DeserializeYaml(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_page_without_frontmatter() -> Result<()> {
        let document = parse_page("Hello **world**\n")?;
        assert!(document.metadata.is_empty());
        assert_eq!(document.body, "");
        Ok(())
    }

    #[test]
    fn test_post_without_frontmatter() {
        assert!(matches!(
            parse_post("Hello **world**\n"),
            Err(Error::MissingFrontmatter)
        ));
    }

    #[test]
    fn test_metadata_without_body() -> Result<()> {
        let document = parse_post("---\ntitle: T\n")?;
        assert_eq!(document.metadata.get_str("title"), Some("T".to_owned()));
        assert_eq!(document.body, "");
        Ok(())
    }

    #[test]
    fn test_metadata_and_body() -> Result<()> {
        let document = parse_post("---\ntitle: T\ndate: D\n---\n# Hi\n")?;
        assert_eq!(document.metadata.get_str("title"), Some("T".to_owned()));
        assert_eq!(document.metadata.get_str("date"), Some("D".to_owned()));
        assert_eq!(document.body, "# Hi\n");
        Ok(())
    }

    #[test]
    fn test_body_segments_concatenated() -> Result<()> {
        let document = parse_post("---\ntitle: T\n---\nfirst\n---\nsecond\n")?;
        assert_eq!(document.body, "first\nsecond\n");
        Ok(())
    }

    #[test]
    fn test_inline_dashes_are_content() -> Result<()> {
        let document = parse_post("---\ntitle: T\n---\na --- b\n----\n")?;
        assert_eq!(document.body, "a --- b\n----\n");
        Ok(())
    }

    #[test]
    fn test_empty_metadata_block() -> Result<()> {
        let document = parse_post("---\n\n---\nbody\n")?;
        assert!(document.metadata.is_empty());
        assert_eq!(document.body, "body\n");
        Ok(())
    }

    #[test]
    fn test_crlf_fences() -> Result<()> {
        let document = parse_post("---\r\ntitle: T\r\n---\r\nbody\r\n")?;
        assert_eq!(document.metadata.get_str("title"), Some("T".to_owned()));
        assert_eq!(document.body, "body\r\n");
        Ok(())
    }

    #[test]
    fn test_malformed_metadata() {
        assert!(matches!(
            parse_post("---\n- just\n- a list\n---\nbody\n"),
            Err(Error::DeserializeYaml(_))
        ));
    }

    #[test]
    fn test_scalar_metadata_values() -> Result<()> {
        let document = parse_post("---\nyear: 2021\ndraft: true\ntags: [a, b]\n---\n")?;
        assert_eq!(document.metadata.get_str("year"), Some("2021".to_owned()));
        assert_eq!(document.metadata.get_str("draft"), Some("true".to_owned()));
        assert_eq!(document.metadata.get_str("tags"), None);
        assert_eq!(document.metadata.get_str("missing"), None);
        Ok(())
    }
}
