use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::error::AppResult;

/// Write an uploaded product image under `{upload_root}/uploads/products/`
/// with a generated unique filename that preserves the original extension,
/// and return its public URL. The file lands on disk before the database
/// write; there is no cleanup of orphans when that write later fails.
pub async fn save_product_image(
    upload_root: &str,
    original_name: &str,
    bytes: &[u8],
) -> AppResult<String> {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let file_name = match extension {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4().simple()),
        None => Uuid::new_v4().simple().to_string(),
    };

    let dir = storage_dir(upload_root);
    fs::create_dir_all(&dir)
        .await
        .map_err(anyhow::Error::from)?;
    fs::write(dir.join(&file_name), bytes)
        .await
        .map_err(anyhow::Error::from)?;

    Ok(format!("/uploads/products/{file_name}"))
}

pub fn storage_dir(upload_root: &str) -> PathBuf {
    Path::new(upload_root).join("uploads").join("products")
}

/// Content type for serving stored images. `.jfif` is an uncommon
/// photographic extension that must be served as standard JPEG.
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") | Some("jfif") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jfif_maps_to_jpeg() {
        assert_eq!(content_type_for("photo.jfif"), "image/jpeg");
        assert_eq!(content_type_for("photo.JFIF"), "image/jpeg");
    }

    #[test]
    fn common_image_types() {
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a.webp"), "image/webp");
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        assert_eq!(content_type_for("archive.zip"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
