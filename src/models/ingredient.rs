//! # 재료 모델 정의
//!
//! 재료(Ingredient)는 이름과 측정 단위의 쌍입니다 (예: "мука" / "г").
//! 재료 목록은 `load_data` 바이너리로 JSON 파일에서 한꺼번에 적재합니다.

use serde::{Deserialize, Serialize};

/// 재료 엔티티: DB의 `ingredients` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
}

/// 재료 생성 입력 (적재 파일의 한 항목)
#[derive(Debug, Clone, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

/// `GET /api/ingredients/?name=<접두사>` 쿼리 파라미터
///
/// `name`이 있으면 대소문자를 구분하지 않는 접두사 검색을 수행합니다.
#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    pub name: Option<String>,
}
