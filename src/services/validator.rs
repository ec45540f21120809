//! # 레시피 검증기
//!
//! 레시피 생성/수정 요청을 DB에 쓰기 전에 검사합니다. 부작용은 없습니다.
//!
//! ## 검사 순서
//! 1. 태그와 재료가 둘 다 비었으면 두 필드 모두에 에러
//! 2. 태그만 비었으면 `tags` 에러
//! 3. 재료만 비었으면 `ingredients` 에러
//! 4. 재료를 제출 순서대로 하나씩:
//!    - 존재하지 않는 ID → 404
//!    - 앞에서 이미 나온 ID → "Ingredients must be unique"
//!    - 음수 수량 → "Amount must be non-negative"
//!    - `MAX_AMOUNT`를 넘는 수량 → "Amount is too large"
//! 5. 태그 ID 존재 확인 (중복은 하나로 합침)
//! 6. 조리 시간(1..=`MAX_COOKING_TIME`), 이름, 설명, (생성 시) 필수 필드
//!
//! 1~3단계는 DB가 필요 없는 순수 함수 `check_presence()`로 분리되어 있습니다.

use std::collections::HashSet;

use sqlx::SqlitePool;

use crate::{
    db,
    error::{AppError, FieldErrors},
    models::IngredientAmount,
};

const TAGS_REQUIRED: &str = "At least one tag is required";
const INGREDIENTS_REQUIRED: &str = "At least one ingredient is required";
const INGREDIENTS_UNIQUE: &str = "Ingredients must be unique";
const AMOUNT_NON_NEGATIVE: &str = "Amount must be non-negative";
const AMOUNT_TOO_LARGE: &str = "Amount is too large";
const FIELD_REQUIRED: &str = "This field is required";

/// 재료 수량 상한. 장바구니 합산(`SUM`)이 i64를 넘지 않도록 i32 범위로 제한합니다.
pub const MAX_AMOUNT: i64 = i32::MAX as i64;
/// 조리 시간 상한(분)
pub const MAX_COOKING_TIME: i64 = i16::MAX as i64;

/// 검증을 통과한 태그/재료 집합. `db::recipes`의 쓰기 함수가 그대로 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecipe {
    /// 중복이 제거된 태그 ID (처음 나온 순서 유지)
    pub tag_ids: Vec<String>,
    /// 제출 순서 그대로의 재료 항목
    pub ingredients: Vec<IngredientAmount>,
}

/// 검증 대상 스칼라 필드
///
/// 생성과 수정 요청이 같은 규칙을 공유하도록 참조만 모아 둡니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarFields<'a> {
    pub name: Option<&'a str>,
    pub text: Option<&'a str>,
    pub image: Option<&'a str>,
    pub cooking_time: Option<i64>,
}

/// 검사 모드. 생성 시에는 스칼라 필드가 모두 필수입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// 태그/재료 존재 여부만 검사합니다 (1~3단계).
///
/// 둘 다 비어 있으면 두 필드를 한 번에 알려줍니다.
pub fn check_presence(
    tags: Option<&[String]>,
    ingredients: Option<&[IngredientAmount]>,
) -> Result<(), AppError> {
    let tags_missing = tags.map_or(true, <[String]>::is_empty);
    let ingredients_missing = ingredients.map_or(true, <[IngredientAmount]>::is_empty);

    let mut fields = FieldErrors::new();
    if tags_missing {
        fields.insert("tags".to_string(), TAGS_REQUIRED.to_string());
    }
    if ingredients_missing {
        fields.insert("ingredients".to_string(), INGREDIENTS_REQUIRED.to_string());
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(fields))
    }
}

/// 스칼라 필드 규칙 (6단계). 여러 필드가 틀렸으면 한 번에 모아서 돌려줍니다.
pub fn check_scalars(fields: &ScalarFields<'_>, mode: Mode) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();

    match fields.name {
        Some(name) if name.trim().is_empty() => {
            errors.insert("name".to_string(), "Name must not be blank".to_string());
        }
        None if mode == Mode::Create => {
            errors.insert("name".to_string(), FIELD_REQUIRED.to_string());
        }
        _ => {}
    }

    match fields.text {
        Some(text) if text.trim().is_empty() => {
            errors.insert("text".to_string(), "Text must not be blank".to_string());
        }
        None if mode == Mode::Create => {
            errors.insert("text".to_string(), FIELD_REQUIRED.to_string());
        }
        _ => {}
    }

    match fields.cooking_time {
        Some(minutes) if minutes < 1 => {
            errors.insert(
                "cooking_time".to_string(),
                "Cooking time must be at least 1 minute".to_string(),
            );
        }
        Some(minutes) if minutes > MAX_COOKING_TIME => {
            errors.insert(
                "cooking_time".to_string(),
                format!("Cooking time must not exceed {MAX_COOKING_TIME} minutes"),
            );
        }
        None if mode == Mode::Create => {
            errors.insert("cooking_time".to_string(), FIELD_REQUIRED.to_string());
        }
        _ => {}
    }

    if fields.image.is_none() && mode == Mode::Create {
        errors.insert("image".to_string(), FIELD_REQUIRED.to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// 레시피 요청 전체를 검증합니다.
///
/// ## 에러
/// - `Validation`: 태그/재료 누락, 중복 재료, 음수 수량, 스칼라 필드 규칙 위반
/// - `NotFound`: 존재하지 않는 재료 또는 태그 ID
pub async fn validate_recipe(
    pool: &SqlitePool,
    tags: Option<&[String]>,
    ingredients: Option<&[IngredientAmount]>,
    scalars: &ScalarFields<'_>,
    mode: Mode,
) -> Result<ValidatedRecipe, AppError> {
    check_presence(tags, ingredients)?;
    let tags = tags.unwrap_or_default();
    let ingredients = ingredients.unwrap_or_default();

    let mut seen: HashSet<&str> = HashSet::new();
    for item in ingredients {
        if db::get_ingredient(pool, &item.id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        if !seen.insert(item.id.as_str()) {
            return Err(AppError::field("ingredients", INGREDIENTS_UNIQUE));
        }
        if item.amount < 0 {
            return Err(AppError::field("ingredients", AMOUNT_NON_NEGATIVE));
        }
        if item.amount > MAX_AMOUNT {
            return Err(AppError::field("ingredients", AMOUNT_TOO_LARGE));
        }
    }

    let mut tag_ids: Vec<String> = Vec::with_capacity(tags.len());
    for tag_id in tags {
        if tag_ids.contains(tag_id) {
            continue;
        }
        if db::get_tag(pool, tag_id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        tag_ids.push(tag_id.clone());
    }

    check_scalars(scalars, mode)?;

    Ok(ValidatedRecipe {
        tag_ids,
        ingredients: ingredients.to_vec(),
    })
}
