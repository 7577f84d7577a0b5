//! Static file application.
//!
//! A request path is probed against the filesystem and mapped to a single
//! [`Resolution`]; the checks run in a fixed order and the first match wins.

use std::path::{Component, Path, PathBuf};

use crate::app::Application;
use crate::http::body::Body;
use crate::http::context::RequestContext;
use crate::http::response::{StartResponse, StatusCode};

const INDEX_FILE: &str = "index.html";

/// What a request path resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing exists at the path, or the path escapes the root.
    NotFound,
    /// A regular file.
    ExistingFile(PathBuf),
    /// A directory containing `index.html`; holds the index file path.
    IndexFile(PathBuf),
    /// A directory without an index page.
    DirectoryListing(PathBuf),
    /// Exists but is neither a file nor a directory.
    Fallback,
}

/// Maps a request path under `root` to a [`Resolution`].
pub fn resolve(root: &Path, request_path: &str) -> Resolution {
    let Some(full_path) = join_request_path(root, request_path) else {
        return Resolution::NotFound;
    };

    if !full_path.exists() || !within_root(root, &full_path) {
        return Resolution::NotFound;
    }
    if full_path.is_file() {
        return Resolution::ExistingFile(full_path);
    }
    if full_path.is_dir() {
        let index = full_path.join(INDEX_FILE);
        if index.is_file() && within_root(root, &index) {
            return Resolution::IndexFile(index);
        }
        return Resolution::DirectoryListing(full_path);
    }
    Resolution::Fallback
}

/// Whether `path`, with symlinks followed, still lies under `root`.
fn within_root(root: &Path, path: &Path) -> bool {
    match (root.canonicalize(), path.canonicalize()) {
        (Ok(root), Ok(path)) => path.starts_with(root),
        _ => false,
    }
}

/// Joins the request path onto the root. `None` if it contains `..`.
fn join_request_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let path = request_path.split(['?', '#']).next().unwrap_or_default();
    let relative = Path::new(path.trim_start_matches('/'));

    let mut full = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => full.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(full)
}

/// Guesses a content type from the file extension.
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Serves files below a root directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn send(
        start: &mut StartResponse,
        status: StatusCode,
        content_type: &str,
        content: Vec<u8>,
    ) -> anyhow::Result<Body> {
        start.begin_response(
            status.to_string(),
            [
                ("Content-Type".to_string(), content_type.to_string()),
                ("Content-Length".to_string(), content.len().to_string()),
            ],
        )?;
        Ok(Body::from(content))
    }

    fn send_file(start: &mut StartResponse, request_path: &str, file: &Path) -> anyhow::Result<Body> {
        match std::fs::read(file) {
            Ok(content) => Self::send(start, StatusCode::Ok, content_type(file), content),
            Err(e) => {
                let message = format!("'{}' cannot be read: {}", file.display(), e);
                Self::send_error(start, request_path, &message)
            }
        }
    }

    fn send_listing(start: &mut StartResponse, request_path: &str, dir: &Path) -> anyhow::Result<Body> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                let message = format!("'{}' cannot be listed: {}", request_path, e);
                return Self::send_error(start, request_path, &message);
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();

        let bullets: Vec<String> = names
            .iter()
            .map(|name| format!("<li>{}</li>", escape_html(name)))
            .collect();

        let page = format!(
            "<html>\n<head><title>List Page</title></head>\n<body>\n<ul>\n{}\n</ul>\n</body>\n</html>\n",
            bullets.join("\n")
        );
        Self::send(start, StatusCode::Ok, "text/html", page.into_bytes())
    }

    fn send_error(start: &mut StartResponse, request_path: &str, message: &str) -> anyhow::Result<Body> {
        tracing::debug!(path = request_path, reason = message, "Static lookup failed");
        let page = format!(
            "<html>\n<head><title>Error Page</title></head>\n<body>\n<h1>Error accessing {}</h1>\n<p>{}</p>\n</body>\n</html>\n",
            escape_html(request_path),
            escape_html(message)
        );
        Self::send(start, StatusCode::NotFound, "text/html", page.into_bytes())
    }
}

impl Application for StaticFiles {
    fn call(&self, ctx: &RequestContext, start: &mut StartResponse) -> anyhow::Result<Body> {
        let request_path = ctx.path_info();

        match resolve(&self.root, request_path) {
            Resolution::NotFound => {
                Self::send_error(start, request_path, &format!("'{}' not found", request_path))
            }
            Resolution::ExistingFile(file) | Resolution::IndexFile(file) => {
                Self::send_file(start, request_path, &file)
            }
            Resolution::DirectoryListing(dir) => Self::send_listing(start, request_path, &dir),
            Resolution::Fallback => {
                Self::send_error(start, request_path, &format!("Unknown object '{}'", request_path))
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_components_never_escape_root() {
        let root = Path::new("/srv/www");
        assert_eq!(join_request_path(root, "/../etc/passwd"), None);
        assert_eq!(join_request_path(root, "/a/../../b"), None);
    }

    #[test]
    fn query_string_is_ignored() {
        let root = Path::new("/srv/www");
        assert_eq!(
            join_request_path(root, "/docs/index.html?v=2"),
            Some(PathBuf::from("/srv/www/docs/index.html"))
        );
    }

    #[test]
    fn content_type_by_extension() {
        assert_eq!(content_type(Path::new("a/b.HTML")), "text/html");
        assert_eq!(content_type(Path::new("style.css")), "text/css");
        assert_eq!(content_type(Path::new("blob")), "application/octet-stream");
    }
}
