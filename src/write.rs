//! The page and post pipelines: reads markdown sources, renders them
//! through the site templates, and writes HTML files into the output
//! directory. Also builds the aggregated index page and copies the
//! stylesheet.

use crate::markdown;
use crate::post::PostRecord;
use crate::source::{self, Document};
use crate::template::TemplateSet;
use gtmpl::{Context, Template, Value};
use std::collections::HashMap;
use std::fmt;
use std::fs::{read_dir, File};
use std::io;
use std::path::{Path, PathBuf};

const MARKDOWN_EXTENSION: &str = ".md";
const HTML_EXTENSION: &str = ".html";

/// The file name of the aggregated post listing.
pub const INDEX_FILE: &str = "index.html";

/// The stylesheet looked up next to the templates and copied verbatim.
pub const STYLESHEET_FILE: &str = "style.css";

/// The title passed to the index template.
const INDEX_TITLE: &str = "Blog Index";

/// Responsible for templating and writing HTML pages to disk.
pub struct Writer<'a> {
    /// The parsed site templates.
    pub templates: &'a TemplateSet,

    /// The directory receiving every output file. Pages and posts share
    /// this namespace; a page and a post with the same base name silently
    /// overwrite one another.
    pub output_directory: &'a Path,
}

impl Writer<'_> {
    /// Renders every page source in `source_directory` and returns the
    /// number of pages written. Pages tolerate missing front matter.
    pub fn write_pages(&self, source_directory: &Path) -> Result<usize> {
        let sources = markdown_sources(source_directory)?;
        for (file_name, path) in &sources {
            let document = parse_source(path, source::parse_page)?;
            self.write_document(
                self.templates.page(),
                &document,
                &html_file_name(file_name),
            )?;
        }
        Ok(sources.len())
    }

    /// Renders every post source in `source_directory` and returns the
    /// ordered list of [`PostRecord`]s for the index and feed builders.
    /// Unlike pages, posts must carry a front-matter block.
    pub fn write_posts(&self, source_directory: &Path) -> Result<Vec<PostRecord>> {
        let sources = markdown_sources(source_directory)?;
        let mut records = Vec::with_capacity(sources.len());
        for (file_name, path) in &sources {
            let document = parse_source(path, source::parse_post)?;
            let url = html_file_name(file_name);
            let content = self.write_document(self.templates.post(), &document, &url)?;
            records.push(PostRecord {
                metadata: document.metadata,
                url,
                content,
            });
        }
        Ok(records)
    }

    /// Renders the aggregated listing for `posts` to `index.html`,
    /// overwriting unconditionally.
    pub fn write_index(&self, posts: &[PostRecord]) -> Result<()> {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), INDEX_TITLE.into());
        m.insert(
            "posts".to_owned(),
            Value::Array(posts.iter().map(PostRecord::to_value).collect()),
        );
        self.render_to_file(
            self.templates.index(),
            &self.output_directory.join(INDEX_FILE),
            Value::Object(m),
        )
    }

    /// Copies `style.css` from `template_directory` into the output
    /// directory, byte for byte. A missing stylesheet is skipped, not an
    /// error; returns whether a copy happened.
    pub fn copy_stylesheet(&self, template_directory: &Path) -> Result<bool> {
        let src = template_directory.join(STYLESHEET_FILE);
        if !src.is_file() {
            return Ok(false);
        }
        std::fs::copy(&src, self.output_directory.join(STYLESHEET_FILE))?;
        Ok(true)
    }

    // Renders the document's markdown body, templates it under `file_name`
    // in the output directory, and returns the rendered HTML fragment.
    fn write_document(
        &self,
        template: &Template,
        document: &Document,
        file_name: &str,
    ) -> Result<String> {
        let content = markdown::to_html(&document.body);
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("metadata".to_owned(), (&document.metadata).into());
        m.insert("content".to_owned(), Value::String(content.clone()));
        self.render_to_file(
            template,
            &self.output_directory.join(file_name),
            Value::Object(m),
        )?;
        Ok(content)
    }

    /// Takes a single context [`Value`], templates it, and writes it to
    /// disk. Building a [`Context`] from an already-assembled [`Value`]
    /// cannot fail.
    fn render_to_file(&self, template: &Template, path: &Path, value: Value) -> Result<()> {
        let context = Context::from(value).unwrap();
        template.execute(&mut File::create(path)?, &context)?;
        Ok(())
    }
}

// Collects the markdown sources in `dir` as (file name, full path) pairs,
// sorted by file name so output order is stable across platforms.
fn markdown_sources(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut sources = Vec::new();
    for result in read_dir(dir)? {
        let entry = result?;
        let os_file_name = entry.file_name();
        let file_name = os_file_name.to_string_lossy();
        if file_name.ends_with(MARKDOWN_EXTENSION) {
            sources.push((file_name.into_owned(), entry.path()));
        }
    }
    sources.sort();
    Ok(sources)
}

fn html_file_name(file_name: &str) -> String {
    format!(
        "{}{}",
        file_name.strip_suffix(MARKDOWN_EXTENSION).unwrap_or(file_name),
        HTML_EXTENSION
    )
}

fn parse_source(
    path: &Path,
    parse: impl Fn(&str) -> source::Result<Document>,
) -> Result<Document> {
    use std::io::Read;
    let mut contents = String::new();
    File::open(path)?.read_to_string(&mut contents)?;
    parse(&contents).map_err(|err| Error::Parse {
        path: path.to_owned(),
        err,
    })
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in the page or post pipelines.
#[derive(Debug)]
pub enum Error {
    /// Returned when a source file fails to parse.
    Parse { path: PathBuf, err: source::Error },

    /// An error during templating.
    Template(String),

    /// An error reading sources or writing output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`].
    /// This allows us to use the `?` operator for fallible template
    /// operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse { path, err } => {
                write!(f, "Parsing `{}`: {}", path.display(), err)
            }
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse { path: _, err } => Some(err),
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::template::{INDEX_TEMPLATE, PAGE_TEMPLATE, POST_TEMPLATE};
    use tempfile::TempDir;

    struct Fixture {
        #[allow(dead_code)]
        root: TempDir,
        templates: TemplateSet,
        pages: PathBuf,
        posts: PathBuf,
        includes: PathBuf,
        output: PathBuf,
    }

    fn fixture() -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let pages = root.path().join("_pages");
        let posts = root.path().join("_posts");
        let includes = root.path().join("_includes");
        let output = root.path().join("output");
        for dir in &[&pages, &posts, &includes, &output] {
            std::fs::create_dir_all(dir).unwrap();
        }

        std::fs::write(includes.join(PAGE_TEMPLATE), "<main>{{.content}}</main>").unwrap();
        std::fs::write(
            includes.join(POST_TEMPLATE),
            "<article><h1>{{.metadata.title}}</h1>{{.content}}</article>",
        )
        .unwrap();
        std::fs::write(
            includes.join(INDEX_TEMPLATE),
            "<h1>{{.title}}</h1><ul>{{range .posts}}<li><a href=\"{{.url}}\">{{.metadata.title}}</a></li>{{end}}</ul>",
        )
        .unwrap();

        let templates = TemplateSet::load(&includes).unwrap();
        Fixture {
            root,
            templates,
            pages,
            posts,
            includes,
            output,
        }
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_page_output() {
        let f = fixture();
        std::fs::write(f.pages.join("about.md"), "---\n---\nHello **world**\n").unwrap();

        let writer = Writer {
            templates: &f.templates,
            output_directory: &f.output,
        };
        assert_eq!(writer.write_pages(&f.pages).unwrap(), 1);
        assert_eq!(
            read(&f.output.join("about.html")),
            "<main><p>Hello <strong>world</strong></p>\n</main>"
        );
    }

    // A page source with no fence line at all still produces an output
    // file, with empty metadata and empty content.
    #[test]
    fn test_page_without_frontmatter_renders_empty() {
        let f = fixture();
        std::fs::write(f.pages.join("bare.md"), "Hello **world**\n").unwrap();

        let writer = Writer {
            templates: &f.templates,
            output_directory: &f.output,
        };
        assert_eq!(writer.write_pages(&f.pages).unwrap(), 1);
        assert_eq!(read(&f.output.join("bare.html")), "<main></main>");
    }

    #[test]
    fn test_posts_in_file_name_order() {
        let f = fixture();
        std::fs::write(f.posts.join("b.md"), "---\ntitle: B\n---\nsecond\n").unwrap();
        std::fs::write(f.posts.join("a.md"), "---\ntitle: A\n---\nfirst\n").unwrap();

        let writer = Writer {
            templates: &f.templates,
            output_directory: &f.output,
        };
        let records = writer.write_posts(&f.posts).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "a.html");
        assert_eq!(records[0].metadata.get_str("title"), Some("A".to_owned()));
        assert_eq!(records[0].content, "<p>first</p>\n");
        assert_eq!(records[1].url, "b.html");

        assert_eq!(
            read(&f.output.join("a.html")),
            "<article><h1>A</h1><p>first</p>\n</article>"
        );
        assert!(f.output.join("b.html").is_file());

        writer.write_index(&records).unwrap();
        assert_eq!(
            read(&f.output.join(INDEX_FILE)),
            "<h1>Blog Index</h1><ul><li><a href=\"a.html\">A</a></li><li><a href=\"b.html\">B</a></li></ul>"
        );
    }

    #[test]
    fn test_post_without_frontmatter_fails() {
        let f = fixture();
        std::fs::write(f.posts.join("c.md"), "no front matter\n").unwrap();

        let writer = Writer {
            templates: &f.templates,
            output_directory: &f.output,
        };
        match writer.write_posts(&f.posts) {
            Err(Error::Parse { path, err }) => {
                assert_eq!(path, f.posts.join("c.md"));
                assert!(matches!(err, source::Error::MissingFrontmatter));
            }
            other => panic!("expected a parse error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_non_markdown_files_skipped() {
        let f = fixture();
        std::fs::write(f.pages.join("notes.txt"), "not markdown").unwrap();

        let writer = Writer {
            templates: &f.templates,
            output_directory: &f.output,
        };
        assert_eq!(writer.write_pages(&f.pages).unwrap(), 0);
    }

    #[test]
    fn test_missing_stylesheet_skipped() {
        let f = fixture();
        let writer = Writer {
            templates: &f.templates,
            output_directory: &f.output,
        };
        assert!(!writer.copy_stylesheet(&f.includes).unwrap());
        assert!(!f.output.join(STYLESHEET_FILE).exists());
    }

    #[test]
    fn test_stylesheet_copied() {
        let f = fixture();
        std::fs::write(f.includes.join(STYLESHEET_FILE), "body { margin: 0 }").unwrap();

        let writer = Writer {
            templates: &f.templates,
            output_directory: &f.output,
        };
        assert!(writer.copy_stylesheet(&f.includes).unwrap());
        assert_eq!(
            read(&f.output.join(STYLESHEET_FILE)),
            "body { margin: 0 }"
        );
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let f = fixture();
        std::fs::write(f.pages.join("about.md"), "---\ntitle: T\n---\nHello\n").unwrap();

        let writer = Writer {
            templates: &f.templates,
            output_directory: &f.output,
        };
        writer.write_pages(&f.pages).unwrap();
        let first = read(&f.output.join("about.html"));
        writer.write_pages(&f.pages).unwrap();
        assert_eq!(read(&f.output.join("about.html")), first);
    }
}
