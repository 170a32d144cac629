use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file that marks a site's root directory.
pub const PROJECT_FILE: &str = "enkel.yaml";

fn default_title() -> String {
    "Blog RSS Feed".to_owned()
}

fn default_description() -> String {
    "Latest blog posts".to_owned()
}

fn default_pages_directory() -> PathBuf {
    PathBuf::from("_pages")
}

fn default_posts_directory() -> PathBuf {
    PathBuf::from("_posts")
}

fn default_template_directory() -> PathBuf {
    PathBuf::from("_includes")
}

/// The site project file as written by the user. Directories are relative
/// to the project root; only `site_root` is required.
#[derive(Deserialize)]
struct Project {
    #[serde(default = "default_title")]
    title: String,

    site_root: Url,

    #[serde(default = "default_description")]
    description: String,

    #[serde(default = "default_pages_directory")]
    pages_directory: PathBuf,

    #[serde(default = "default_posts_directory")]
    posts_directory: PathBuf,

    #[serde(default = "default_template_directory")]
    template_directory: PathBuf,
}

/// Fully-resolved site configuration: the site identity used by the feed
/// builder plus the directories every pipeline reads from and writes to.
pub struct Config {
    pub title: String,
    pub description: String,
    pub site_root: Url,
    pub pages_source_directory: PathBuf,
    pub posts_source_directory: PathBuf,
    pub template_directory: PathBuf,
    pub output_directory: PathBuf,
}

impl Config {
    /// Searches `dir` and its ancestors for a project file and loads it.
    /// `output_directory` overrides the default `{project_root}/output`.
    pub fn from_directory(dir: &Path, output_directory: Option<PathBuf>) -> Result<Config> {
        let dir = dir
            .canonicalize()
            .map_err(|e| anyhow!("Resolving project directory `{}`: {}", dir.display(), e))?;
        Config::search_ancestors(&dir, output_directory)
    }

    fn search_ancestors(dir: &Path, output_directory: Option<PathBuf>) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_directory)
        } else {
            match dir.parent() {
                Some(parent) => Config::search_ancestors(parent, output_directory),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path, output_directory: Option<PathBuf>) -> Result<Config> {
        let file = File::open(path)
            .map_err(|e| anyhow!("Opening project file `{}`: {}", path.display(), e))?;
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path `{}`",
                path.display()
            )),
            Some(project_root) => Ok(Config {
                title: project.title,
                description: project.description,
                site_root: ensure_trailing_slash(project.site_root)?,
                pages_source_directory: project_root.join(&project.pages_directory),
                posts_source_directory: project_root.join(&project.posts_directory),
                template_directory: project_root.join(&project.template_directory),
                output_directory: output_directory
                    .unwrap_or_else(|| project_root.join("output")),
            }),
        }
    }
}

// `Url::join` treats a base without a trailing slash as a file and strips
// the last path segment, so the configured site root must end in `/`.
fn ensure_trailing_slash(url: Url) -> Result<Url> {
    if url.path().ends_with('/') {
        Ok(url)
    } else {
        Ok(Url::parse(&format!("{}/", url))?)
    }
}
