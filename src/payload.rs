//! Turning picked image files into embeddable data-URL payloads.
use std::{fs, path::Path};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, error};

use crate::{JournalError, Result};

/// Mime type for an image file, judged by its extension.
pub fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime)
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Whether `payload` is an inline base64 image, `data:image/<type>;base64,<data>`.
pub fn is_image_data_url(payload: &str) -> bool {
    let Some(rest) = payload.strip_prefix("data:image/") else {
        return false;
    };
    match rest.split_once(";base64,") {
        Some((subtype, data)) => !subtype.is_empty() && !subtype.contains(';') && !data.is_empty(),
        None => false,
    }
}

/// Reads an image file into a data-URL payload.
pub fn read_image_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(JournalError::FileNotFound {
            file_path: path.display().to_string(),
        });
    }

    let mime = image_mime(path).ok_or_else(|| JournalError::UnsupportedImage {
        file_path: path.display().to_string(),
    })?;

    let bytes = fs::read(path).map_err(|e| {
        error!("Failed to read image {}: {}", path.display(), e);
        JournalError::Io(e)
    })?;
    debug!("Encoded {} ({} bytes) as {}", path.display(), bytes.len(), mime);
    Ok(encode_data_url(mime, &bytes))
}

/// Reads every picked file, in order.
pub fn read_image_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<String>> {
    paths.iter().map(|p| read_image_file(p.as_ref())).collect()
}
