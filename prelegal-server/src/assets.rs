use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

const INDEX: &str = "index.html";

/// File under `root` that answers the percent-encoded `request_path`.
///
/// Tries the exact file, then `<path>/index.html`, then `<path>.html`, and
/// otherwise falls back to the root `index.html` so client-side routes load
/// the app. Paths that try to leave `root` once decoded get the fallback too.
pub fn resolve_asset(root: &Path, request_path: &str) -> PathBuf {
    let index = root.join(INDEX);
    let Ok(decoded) = urlencoding::decode(request_path) else {
        return index;
    };
    let relative = decoded.trim_start_matches('/');
    if relative.is_empty() {
        return index;
    }
    let relative = Path::new(relative);
    if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
        return index;
    }

    let exact = root.join(relative);
    if exact.is_file() {
        return exact;
    }
    let dir_index = exact.join(INDEX);
    if dir_index.is_file() {
        return dir_index;
    }
    let mut html: OsString = exact.into_os_string();
    html.push(".html");
    let html = PathBuf::from(html);
    if html.is_file() {
        return html;
    }
    index
}
