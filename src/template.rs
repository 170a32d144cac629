//! Loads the three named site templates from the template directory. The
//! templates use Go-style `{{...}}` variable substitution; the page and
//! post templates see `{metadata, content}` and the index template sees
//! `{title, posts}`. Loading fails fast so a missing or unparsable
//! template aborts the run before any page is rendered.

use gtmpl::Template;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Template for standalone pages.
pub const PAGE_TEMPLATE: &str = "page_template.html";

/// Template for posts.
pub const POST_TEMPLATE: &str = "post_template.html";

/// Template for the aggregated post listing.
pub const INDEX_TEMPLATE: &str = "index_template.html";

/// The three parsed templates a site build needs.
pub struct TemplateSet {
    page: Template,
    post: Template,
    index: Template,
}

impl TemplateSet {
    /// Loads and parses all three templates from `template_directory`.
    pub fn load(template_directory: &Path) -> Result<TemplateSet> {
        Ok(TemplateSet {
            page: load_template(template_directory, PAGE_TEMPLATE)?,
            post: load_template(template_directory, POST_TEMPLATE)?,
            index: load_template(template_directory, INDEX_TEMPLATE)?,
        })
    }

    pub fn page(&self) -> &Template {
        &self.page
    }

    pub fn post(&self) -> &Template {
        &self.post
    }

    pub fn index(&self) -> &Template {
        &self.index
    }
}

// Loads the template file contents and parses the result into a template.
fn load_template(dir: &Path, name: &str) -> Result<Template> {
    let path = dir.join(name);
    let mut contents = String::new();
    File::open(&path)
        .map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::TemplateNotFound { path: path.clone() },
            _ => Error::OpenTemplateFile {
                path: path.clone(),
                err,
            },
        })?
        .read_to_string(&mut contents)
        .map_err(|err| Error::OpenTemplateFile {
            path: path.clone(),
            err,
        })?;

    let mut template = Template::default();
    template
        .parse(&contents)
        .map_err(|err| Error::ParseTemplate { path, err })?;
    Ok(template)
}

/// Represents the result of a template-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the site templates.
#[derive(Debug)]
pub enum Error {
    /// Returned when a named template file is absent from the template
    /// directory.
    TemplateNotFound { path: PathBuf },

    /// Returned for other I/O problems while reading template files.
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate { path: PathBuf, err: String },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::TemplateNotFound { path } => {
                write!(f, "Template file `{}` not found", path.display())
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file `{}`: {}", path.display(), err)
            }
            Error::ParseTemplate { path, err } => {
                write!(f, "Parsing template file `{}`: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::TemplateNotFound { path: _ } => None,
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate { .. } => None,
        }
    }
}
