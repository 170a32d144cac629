//! Support for serializing [`PostRecord`]s into an RSS 2.0 feed.

use crate::config::Config;
use crate::post::PostRecord;
use chrono::{DateTime, Utc};
use rss::extension::atom::{AtomExtensionBuilder, Link};
use rss::{Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use rss::Error as RssError;
use std::fmt;
use std::io::Write;

/// The file name of the generated feed, relative to both the output
/// directory and the site root.
pub const FEED_FILE: &str = "rss.xml";

/// Fallback item title for posts whose metadata lacks a `title` key.
const UNTITLED: &str = "No title";

/// RFC-822-style timestamp format used for the `pubDate` fallback.
const PUB_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Serializes `posts` as an RSS 2.0 document and writes it to `w`,
/// preceded by the XML declaration.
///
/// `now` is the generation timestamp substituted as the `pubDate` of any
/// post whose metadata lacks a `date` key. It is a parameter rather than a
/// clock read so that callers control it; when the fallback is in play, two
/// runs over the same sources legally emit different feeds.
pub fn write_feed<W: Write>(
    config: &Config,
    posts: &[PostRecord],
    now: DateTime<Utc>,
    mut w: W,
) -> Result<()> {
    let channel = channel(config, posts, now)?;
    w.write_all(br#"<?xml version="1.0" encoding="utf-8"?>"#)?;
    channel.write_to(w)?;
    Ok(())
}

fn channel(config: &Config, posts: &[PostRecord], now: DateTime<Utc>) -> Result<Channel> {
    let mut self_link = Link::default();
    self_link.href = config.site_root.join(FEED_FILE)?.to_string();
    self_link.rel = "self".to_owned();
    self_link.mime_type = Some("application/rss+xml".to_owned());

    Ok(ChannelBuilder::default()
        .title(config.title.clone())
        .link(config.site_root.to_string())
        .description(config.description.clone())
        .atom_ext(Some(
            AtomExtensionBuilder::default().links(vec![self_link]).build(),
        ))
        .items(items(config, posts, now)?)
        .build())
}

fn items(config: &Config, posts: &[PostRecord], now: DateTime<Utc>) -> Result<Vec<Item>> {
    let mut items = Vec::with_capacity(posts.len());
    for post in posts {
        let link = config.site_root.join(&post.url)?.to_string();
        let title = post
            .metadata
            .get_str("title")
            .unwrap_or_else(|| UNTITLED.to_owned());
        let pub_date = post
            .metadata
            .get_str("date")
            .unwrap_or_else(|| now.format(PUB_DATE_FORMAT).to_string());

        items.push(
            ItemBuilder::default()
                .title(title)
                .link(link.clone())
                .description(post.content.clone())
                .pub_date(pub_date)
                .guid(GuidBuilder::default().value(link).permalink(true).build())
                .build(),
        );
    }
    Ok(items)
}

/// Represents the result of a fallible feed operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating the feed. Variants include I/O, RSS
/// serialization, and URL-joining issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when the channel fails to serialize as XML.
    Rss(RssError),

    /// Returned when an item link cannot be joined onto the site root.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Rss(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Rss(err) => Some(err),
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<RssError> for Error {
    /// Converts [`RssError`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: RssError) -> Error {
        Error::Rss(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts [`url::ParseError`]s into [`Error`]. This allows us to use
    /// the `?` operator when joining item links onto the site root.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}
