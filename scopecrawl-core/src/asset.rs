/// File extensions (lower-case, without the dot) that mark a URL as a
/// downloadable asset rather than a navigable page.
pub const ASSET_EXTENSIONS: &[&str] = &[
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "rtf", "csv",
    // archives
    "zip", "rar", "7z", "tar", "gz", "tgz", "bz2", "xz",
    // images
    "jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "tif", "tiff", "ico",
    // audio
    "mp3", "wav", "ogg", "m4a", "flac", "aac",
    // video
    "mp4", "avi", "mov", "wmv", "mkv", "webm", "flv",
];

/// Whether a URL path points at a known non-HTML asset.
///
/// Only the extension of the last path segment is considered, compared
/// case-insensitively.
pub fn is_asset(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    match last_segment.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ASSET_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}
