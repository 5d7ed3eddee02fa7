// ── Image upload ──
//
// Images go to the `admin-image-upload` function as a base64 data URL;
// the function stores them and answers with a public URL. Type and size
// are checked locally before anything is read or sent.

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use yikang_api::ServiceClient;

use crate::auth::AuthClient;
use crate::error::CoreError;
use crate::validate::FormErrors;

pub const UPLOAD_FUNCTION: &str = "admin-image-upload";
pub const DEFAULT_FOLDER: &str = "uploads";
/// 5 MiB.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

const INVALID_TYPE: &str = "请选择有效的图片文件";
const TOO_LARGE: &str = "图片大小不能超过 5MB";
const LOGIN_REQUIRED: &str = "需要登录才能上传图片";
const READ_FAILED: &str = "文件读取失败";

/// MIME type for an image file name, from its extension.
pub fn image_mime(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        _ => return None,
    };
    Some(mime)
}

/// Type and size check; returns the MIME type on success.
pub fn validate_image(file_name: &str, size: u64) -> Result<&'static str, FormErrors> {
    let mut errors = FormErrors::new();
    let Some(mime) = image_mime(file_name) else {
        errors.push("file", INVALID_TYPE);
        return Err(errors);
    };
    if size > MAX_IMAGE_BYTES {
        errors.push("file", TOO_LARGE);
        return Err(errors);
    }
    Ok(mime)
}

/// `data:<mime>;base64,<payload>`
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest<'a> {
    image_data: String,
    file_name: &'a str,
    folder: &'a str,
}

#[derive(Deserialize)]
struct UploadResponse {
    data: UploadedImage,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedImage {
    public_url: String,
}

pub struct ImageUploader {
    client: Arc<ServiceClient>,
    auth: Arc<AuthClient>,
}

impl ImageUploader {
    pub fn new(client: Arc<ServiceClient>, auth: Arc<AuthClient>) -> Self {
        Self { client, auth }
    }

    /// Validate, then upload in-memory bytes. Returns the public URL.
    pub async fn upload_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
        folder: Option<&str>,
    ) -> Result<String, CoreError> {
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        let mime = validate_image(file_name, size).map_err(CoreError::Validation)?;
        self.auth.require_user(LOGIN_REQUIRED)?;

        let request = UploadRequest {
            image_data: data_url(mime, bytes),
            file_name,
            folder: folder.unwrap_or(DEFAULT_FOLDER),
        };
        debug!(file_name, size, folder = request.folder, "uploading image");

        let response: UploadResponse = self
            .client
            .invoke(UPLOAD_FUNCTION, &request)
            .await
            .inspect_err(|e| error!(error = %e, "image upload failed"))?;
        Ok(response.data.public_url)
    }

    /// Validate from metadata first, then read and upload a file.
    pub async fn upload_file(&self, path: &Path, folder: Option<&str>) -> Result<String, CoreError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_owned();
        let read_failed = |e: std::io::Error| CoreError::Internal(format!("{READ_FAILED}: {e}"));

        let size = tokio::fs::metadata(path).await.map_err(read_failed)?.len();
        validate_image(&file_name, size).map_err(CoreError::Validation)?;

        let bytes = tokio::fs::read(path).await.map_err(read_failed)?;
        self.upload_bytes(&file_name, &bytes, folder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(image_mime("cover.PNG"), Some("image/png"));
        assert_eq!(image_mime("a.b.jpeg"), Some("image/jpeg"));
        assert_eq!(image_mime("notes.pdf"), None);
        assert_eq!(image_mime("noext"), None);
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert_eq!(validate_image("x.png", MAX_IMAGE_BYTES), Ok("image/png"));
        let errors = validate_image("x.png", MAX_IMAGE_BYTES + 1).unwrap_err();
        assert_eq!(errors.get("file"), Some("图片大小不能超过 5MB"));
        let errors = validate_image("x.txt", 1).unwrap_err();
        assert_eq!(errors.get("file"), Some("请选择有效的图片文件"));
    }

    #[test]
    fn data_url_shape() {
        assert_eq!(data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }
}
