//! Exports the [`build_site`] function which stitches together the
//! high-level steps of building the output site: loading the templates,
//! rendering pages and posts ([`crate::write`]), building the aggregated
//! index, copying the stylesheet, and generating the RSS feed
//! ([`crate::feed`]).

use crate::config::Config;
use crate::feed::{self, Error as FeedError};
use crate::template::{Error as TemplateError, TemplateSet};
use crate::write::{Error as WriteError, Writer, INDEX_FILE, STYLESHEET_FILE};
use chrono::Utc;
use std::fmt;
use std::fs::File;

/// Builds the site from a [`Config`] object. This calls into
/// [`TemplateSet::load`], the [`Writer`] pipelines, and
/// [`feed::write_feed`], which do the heavy lifting.
///
/// A failure anywhere aborts the run and can leave the output directory
/// partially written; the output directory is regenerated from scratch on
/// the next run, never patched incrementally.
pub fn build_site(config: &Config) -> Result<()> {
    let templates = TemplateSet::load(&config.template_directory)?;

    std::fs::create_dir_all(&config.output_directory)?;

    let writer = Writer {
        templates: &templates,
        output_directory: &config.output_directory,
    };

    let page_count = writer.write_pages(&config.pages_source_directory)?;
    crate::log!("pages"; "rendered {} pages", page_count);

    // The post records feed both the index and the feed builder; both run
    // only after every post file is on disk.
    let posts = writer.write_posts(&config.posts_source_directory)?;
    crate::log!("posts"; "rendered {} posts", posts.len());

    writer.write_index(&posts)?;
    crate::log!("index"; "{}", INDEX_FILE);

    if writer.copy_stylesheet(&config.template_directory)? {
        crate::log!("css"; "{} copied", STYLESHEET_FILE);
    }

    let feed_file = File::create(config.output_directory.join(feed::FEED_FILE))?;
    feed::write_feed(config, &posts, Utc::now(), feed_file)?;
    crate::log!("rss"; "{}", feed::FEED_FILE);

    Ok(())
}

/// The result of building a site.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can occur loading templates,
/// rendering pages and posts, writing the feed, and in other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading the site templates.
    Template(TemplateError),

    /// Returned for errors rendering and writing pages, posts, and the
    /// index.
    Write(WriteError),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<TemplateError> for Error {
    /// Converts [`TemplateError`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: TemplateError) -> Error {
        Error::Template(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
