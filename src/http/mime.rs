use std::path::Path;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type for a stored file, chosen by extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("txt") => "text/plain",
        Some("html") => "text/html",
        Some("json") => "application/json",
        _ => OCTET_STREAM,
    }
}
