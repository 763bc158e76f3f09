//! Reading product images from disk.

use std::path::Path;

use storefront::form::ImageUpload;

use crate::config::ConfigError;

/// Reads the image at `path` for upload.
pub(crate) async fn load_image(path: &Path) -> Result<ImageUpload, ConfigError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ConfigError::ImageFileName(path.to_path_buf()))?
        .to_string();

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ConfigError::ReadImage {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(ImageUpload {
        file_name,
        content_type: content_type_for(path).map(str::to_string),
        bytes,
    })
}

/// MIME type for common image extensions.
pub(crate) fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();

    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
