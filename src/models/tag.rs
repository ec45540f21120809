//! # 태그 모델 정의
//!
//! 태그(Tag)는 레시피를 분류하는 라벨입니다 (예: "Завтрак", "Обед", "Ужин").
//! 관리자가 미리 적재해 두고, 사용자는 레시피를 작성할 때 태그 ID를 골라 붙입니다.
//!
//! ## 구조체 역할
//! - `Tag`: 데이터베이스에 저장된 태그 (응답용)
//! - `NewTag`: 적재 도구가 태그를 만들 때 쓰는 입력
//!
//! 색상 코드는 `#RGB`~`#RRGGBB` 형식의 16진수 문자열이어야 하며,
//! `is_valid_color()`로 검사합니다.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// 태그 엔티티: DB의 `tags` 테이블 한 행(row)에 대응합니다.
///
/// # derive 매크로 설명
/// - `Serialize`: API 응답에서 JSON으로 변환
/// - `sqlx::FromRow`: SQL 쿼리 결과(행)를 이 구조체로 자동 매핑
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// 태그 고유 식별자 (UUIDv7 형식 문자열)
    pub id: String,
    /// 태그 이름 (고유)
    pub name: String,
    /// 태그 색상 코드 (예: "#E26C2D")
    pub color: String,
    /// URL 친화적인 식별자 (고유). 레시피 목록의 `tags` 필터에서 사용합니다
    pub slug: String,
}

/// 태그 생성 입력: `load_data` 바이너리가 JSON 파일에서 읽어 들입니다.
///
/// `slug`가 없으면 이름으로부터 `slug::slugify()`로 만들어 씁니다.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub color: String,
    pub slug: Option<String>,
}

impl NewTag {
    /// 명시된 slug(앞뒤 공백 제거) 또는 이름에서 만든 slug
    pub fn resolved_slug(&self) -> String {
        match &self.slug {
            Some(slug) if !slug.trim().is_empty() => slug.trim().to_string(),
            _ => slug::slugify(&self.name),
        }
    }
}

/// 색상 코드 정규식. `LazyLock`은 처음 사용될 때 한 번만 컴파일합니다.
static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    // 정규식 리터럴은 고정값이므로 컴파일 실패는 프로그래머 오류입니다
    Regex::new(r"^#[0-9A-Fa-f]{3,6}$").expect("color regex is valid")
});

/// 색상 코드가 `#` + 16진수 3~6자리 형식인지 확인합니다.
pub fn is_valid_color(color: &str) -> bool {
    COLOR_RE.is_match(color)
}
