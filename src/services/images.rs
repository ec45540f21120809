//! # 레시피 이미지 파일 서비스
//!
//! 클라이언트는 이미지를 `data:image/png;base64,iVBORw0...` 형태의 data URI로 보냅니다.
//! 이 모듈은 data URI를 해석하고 디코딩해서 미디어 디렉토리에 파일로 저장합니다.
//!
//! ## 저장 위치
//! ```text
//! <MEDIA_PATH>/recipes/images/<uuid>.<ext>
//! ```
//! DB에는 미디어 루트 기준 상대 경로(`recipes/images/<uuid>.<ext>`)만 저장합니다.

use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::fs;

use crate::error::AppError;

/// 미디어 루트 아래 레시피 이미지 하위 디렉토리
pub const RECIPE_IMAGE_DIR: &str = "recipes/images";

/// 해석된 data URI
#[derive(Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// 파일 확장자 (`image/png` → "png")
    pub extension: String,
    pub bytes: Vec<u8>,
}

fn invalid_image() -> AppError {
    AppError::field("image", "Image must be a base64 data URI (data:image/<type>;base64,...)")
}

/// `data:image/<ext>;base64,<payload>` 형식을 해석하고 payload를 디코딩합니다.
///
/// 형식이 다르거나 base64 디코딩에 실패하면 `image` 필드 에러를 반환합니다.
pub fn parse_data_uri(data_uri: &str) -> Result<DecodedImage, AppError> {
    let rest = data_uri.trim().strip_prefix("data:image/").ok_or_else(invalid_image)?;
    let (extension, payload) = rest.split_once(";base64,").ok_or_else(invalid_image)?;

    // 확장자는 파일 이름에 그대로 들어가므로 영숫자만 허용합니다 ("svg+xml" 같은 값은 거절)
    let extension = extension.to_ascii_lowercase();
    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid_image());
    }

    let bytes = STANDARD.decode(payload.trim()).map_err(|_| invalid_image())?;
    if bytes.is_empty() {
        return Err(invalid_image());
    }

    Ok(DecodedImage { extension, bytes })
}

/// data URI를 디코딩해 새 파일로 저장하고, 미디어 루트 기준 상대 경로를 반환합니다.
pub async fn save_image(media_path: &str, data_uri: &str) -> Result<String, AppError> {
    let image = parse_data_uri(data_uri)?;

    let relative_path = format!(
        "{RECIPE_IMAGE_DIR}/{}.{}",
        uuid::Uuid::now_v7(),
        image.extension
    );
    let full_path = PathBuf::from(media_path).join(&relative_path);

    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(&full_path, &image.bytes).await?;

    tracing::debug!(path = %relative_path, size = image.bytes.len(), "recipe image saved");
    Ok(relative_path)
}

/// 저장된 이미지를 지웁니다. 실패는 로그만 남기고 무시합니다.
///
/// 이미지 교체/레시피 삭제 후 정리용이므로, 파일이 이미 없어도 요청은 성공해야 합니다.
pub async fn remove_image(media_path: &str, relative_path: &str) {
    let full_path = PathBuf::from(media_path).join(relative_path);
    if let Err(e) = fs::remove_file(&full_path).await {
        tracing::warn!(path = %full_path.display(), "failed to remove image: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 투명 PNG
    const PNG_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn parses_extension_and_payload() {
        let image = parse_data_uri(PNG_URI).unwrap();
        assert_eq!(image.extension, "png");
        assert_eq!(&image.bytes[1..4], b"PNG");
    }

    #[test]
    fn rejects_uri_without_base64_marker() {
        assert!(matches!(
            parse_data_uri("data:image/png,iVBORw0KGgo="),
            Err(AppError::Validation(_))
        ));
        assert!(parse_data_uri("https://example.com/a.png").is_err());
        assert!(parse_data_uri("data:image/png;base64,###").is_err());
        assert!(parse_data_uri("data:image/svg+xml;base64,PHN2Zz4=").is_err());
    }

    #[tokio::test]
    async fn save_then_remove_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().to_str().unwrap();

        let relative = save_image(media, PNG_URI).await.unwrap();
        assert!(relative.starts_with("recipes/images/"));
        assert!(relative.ends_with(".png"));

        let full = dir.path().join(&relative);
        assert!(full.exists());

        remove_image(media, &relative).await;
        assert!(!full.exists());

        // 이미 지워진 파일이어도 패닉하지 않습니다
        remove_image(media, &relative).await;
    }
}
