//! MIME checks for downloaded images.

use std::path::Path;

use tokio::io::AsyncReadExt;

/// Whether a `Content-Type` header value names an image.
pub fn is_image_content_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .unwrap_or(value)
        .trim()
        .to_lowercase()
        .starts_with("image/")
}

/// Detect an image MIME type from the file's leading bytes.
///
/// Returns `None` for empty, unreadable or non-image files.
pub async fn sniff_image(path: &Path) -> Option<&'static str> {
    // Read first 8KB for magic byte detection
    let mut file = tokio::fs::File::open(path).await.ok()?;
    let mut buffer = [0u8; 8192];
    let bytes_read = file.read(&mut buffer).await.ok()?;
    if bytes_read == 0 {
        return None;
    }

    let detected = infer::get(&buffer[..bytes_read])?;
    (detected.matcher_type() == infer::MatcherType::Image).then(|| detected.mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

    #[test]
    fn test_is_image_content_type() {
        assert!(is_image_content_type("image/jpeg"));
        assert!(is_image_content_type("Image/WebP; charset=binary"));
        assert!(!is_image_content_type("text/html; charset=utf-8"));
        assert!(!is_image_content_type(""));
    }

    #[tokio::test]
    async fn test_sniff_image() {
        let dir = tempfile::tempdir().unwrap();

        let jpeg = dir.path().join("a.jpg");
        tokio::fs::write(&jpeg, JPEG_MAGIC).await.unwrap();
        assert_eq!(sniff_image(&jpeg).await, Some("image/jpeg"));

        let html = dir.path().join("b.jpg");
        tokio::fs::write(&html, b"<html>blocked</html>").await.unwrap();
        assert_eq!(sniff_image(&html).await, None);

        let empty = dir.path().join("c.jpg");
        tokio::fs::write(&empty, b"").await.unwrap();
        assert_eq!(sniff_image(&empty).await, None);

        assert_eq!(sniff_image(&dir.path().join("missing.jpg")).await, None);
    }
}
