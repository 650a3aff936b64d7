//! Validation and naming for uploaded recipe images.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

/// Allowed image formats for recipe images.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum file size for images (8MB).
pub const MAX_FILE_SIZE: usize = 8 * 1024 * 1024;

/// Human-readable limit: whole MB when the limit is at least 1 MiB, else
/// KB or bytes.
fn format_size(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Validate image data: check the size and that the format is allowed.
///
/// Returns the content type on success (e.g., "image/jpeg").
pub fn validate_image(data: &[u8], max_size: usize) -> Result<String, String> {
    if data.is_empty() {
        return Err("Image file is empty".to_string());
    }

    if data.len() > max_size {
        return Err(format!("Image size must be less than {}.", format_size(max_size)));
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {}", e))?;

    let format = reader
        .format()
        .ok_or_else(|| "Could not detect image format".to_string())?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(format!(
            "Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP",
            format
        ));
    }

    Ok(format.to_mime_type().to_string())
}

/// Storage path for a new upload: `{unix_millis}-{file name}`, with the file
/// name reduced to `[A-Za-z0-9._-]` so the path is safe inside a URL.
pub fn blob_path(file_name: &str, unix_millis: i64) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);

    let mut clean: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    if clean.trim_matches(['-', '.']).is_empty() {
        clean = "image".to_string();
    }

    format!("{}-{}", unix_millis, clean)
}

/// Blob path referenced by a public URL: its last `/`-separated segment.
pub fn blob_path_from_url(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_validate_png() {
        assert_eq!(
            validate_image(&png_bytes(), MAX_FILE_SIZE),
            Ok("image/png".to_string())
        );
    }

    #[test]
    fn test_validate_invalid_format() {
        assert!(validate_image(b"not an image", MAX_FILE_SIZE).is_err());
    }

    #[test]
    fn test_validate_too_large() {
        let data = png_bytes();
        let err = validate_image(&data, data.len() - 1).unwrap_err();
        assert!(err.starts_with("Image size must be less than"));
    }

    #[test]
    fn test_size_limit_message_below_one_megabyte() {
        let data = vec![0u8; 4096];
        assert_eq!(
            validate_image(&data, 2048).unwrap_err(),
            "Image size must be less than 2KB."
        );
        assert_eq!(
            validate_image(&data, 100).unwrap_err(),
            "Image size must be less than 100 bytes."
        );
        assert_eq!(
            validate_image(&vec![0u8; MAX_FILE_SIZE + 1], MAX_FILE_SIZE).unwrap_err(),
            "Image size must be less than 8MB."
        );
    }

    #[test]
    fn test_blob_path_sanitizes_name() {
        assert_eq!(
            blob_path("my photo (1).jpg", 1700000000000),
            "1700000000000-my-photo--1-.jpg"
        );
        assert_eq!(blob_path("../../etc/passwd", 5), "5-passwd");
        assert_eq!(blob_path("", 5), "5-image");
    }

    #[test]
    fn test_blob_path_from_url() {
        assert_eq!(
            blob_path_from_url("http://localhost:3000/api/images/17-pasta.png"),
            Some("17-pasta.png")
        );
        assert_eq!(blob_path_from_url("http://host/"), None);
    }
}
