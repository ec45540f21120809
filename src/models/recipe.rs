//! # 레시피 모델 정의
//!
//! 레시피와 그에 딸린 재료 수량, 태그, 즐겨찾기/장바구니/구독 응답에서
//! 사용하는 데이터 구조체들을 정의합니다.
//!
//! ## 구조체 역할
//! | 구조체 | 방향 | 설명 |
//! |--------|------|------|
//! | `Recipe` | DB → 서버 | `recipes` 테이블 한 행 |
//! | `RecipeIngredientRow` | DB → 응답 | 재료 이름/단위가 JOIN된 수량 행 |
//! | `RecipeResponse` | 서버 → 클라이언트 | 레시피 상세 응답 |
//! | `RecipeShort` | 서버 → 클라이언트 | 즐겨찾기/장바구니/구독 응답의 요약 레시피 |
//! | `CreateRecipeRequest` | 클라이언트 → 서버 | `POST /recipes/` 본문 |
//! | `UpdateRecipeRequest` | 클라이언트 → 서버 | `PATCH /recipes/{id}/` 본문 |
//! | `RecipeFilter` | 쿼리 문자열 → 서버 | 목록 필터 |
//! | `CartLine` | DB → 쇼핑 목록 | 재료별 합산 수량 |

use serde::{Deserialize, Serialize};

use super::{Tag, UserResponse};

/// 레시피 엔티티: DB의 `recipes` 테이블 한 행에 대응합니다.
///
/// `image`에는 미디어 루트 기준 상대 경로가 저장됩니다 (예: "recipes/images/<uuid>.png").
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    pub id: String,
    pub author_id: String,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
    pub pub_date: String,
}

/// 레시피에 포함된 재료 한 줄: `recipe_ingredients`와 `ingredients`를 JOIN한 결과
///
/// JSON에서는 `id`가 재료(ingredient)의 ID입니다. 조인 테이블 행의 ID가 아닙니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecipeIngredientRow {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// 요청 본문의 재료 항목: 재료 ID + 수량
///
/// 수량은 음수 검사를 해야 하므로 부호 있는 정수(i64)로 받습니다.
/// u64로 받으면 음수가 JSON 파싱 단계에서 막혀 "수량은 0 이상" 메시지를 줄 수 없습니다.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientAmount {
    pub id: String,
    pub amount: i64,
}

/// 레시피 생성 요청: `POST /api/recipes/`
///
/// 모든 필드가 Option인 이유: 누락된 필드를 serde의 파싱 에러(422)로 거절하지 않고
/// 검증기가 필드별 메시지(400)로 알려주기 위해서입니다.
#[derive(Debug, Default, Deserialize)]
pub struct CreateRecipeRequest {
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
    pub name: Option<String>,
    /// `data:image/png;base64,...` 형식의 data URI
    pub image: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

/// 레시피 수정 요청: `PATCH /api/recipes/{id}/`
///
/// 스칼라 필드(name, image, text, cooking_time)는 누락 시 기존 값을 유지합니다.
/// 태그와 재료는 항상 통째로 교체되므로 생성과 똑같이 검증됩니다.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecipeRequest {
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<IngredientAmount>>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

/// DB에 쓸 스칼라 필드 묶음 (이미지는 이미 파일로 저장된 뒤의 상대 경로)
///
/// 생성 시에는 모든 필드가 Some이고, 수정 시에는 None이 "변경 안 함"을 뜻합니다.
#[derive(Debug, Default, Clone)]
pub struct RecipeFields {
    pub name: Option<String>,
    pub image: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

/// 레시피 상세 응답
#[derive(Debug, Clone, Serialize)]
pub struct RecipeResponse {
    pub id: String,
    pub tags: Vec<Tag>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientRow>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    /// 이미지 URL (예: "/media/recipes/images/<uuid>.png")
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
    pub pub_date: String,
}

/// 요약 레시피: 즐겨찾기/장바구니 추가 응답, 구독 목록의 `recipes` 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeShort {
    pub id: String,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

impl RecipeShort {
    pub fn new(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: media_url(&recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// 저장된 상대 경로를 클라이언트가 쓸 수 있는 URL로 바꿉니다.
pub fn media_url(relative_path: &str) -> String {
    format!("/media/{}", relative_path.trim_start_matches('/'))
}

/// 레시피 목록 필터
///
/// 쿼리 문자열 `?author=..&tags=a&tags=b,c&is_favorited=1` 에서 만들어집니다.
/// `tags`는 여러 번 반복되거나 쉼표로 구분될 수 있고, 하나라도 일치하면 포함(OR)합니다.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeFilter {
    /// `(키, 값)` 쌍 목록에서 필터를 만듭니다. 알 수 없는 키는 무시합니다.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut filter = RecipeFilter::default();
        for (key, value) in pairs {
            match key.as_str() {
                "author" if !value.is_empty() => filter.author = Some(value.clone()),
                "tags" => filter.tags.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|slug| !slug.is_empty())
                        .map(str::to_string),
                ),
                "is_favorited" => filter.is_favorited = is_truthy(value),
                "is_in_shopping_cart" => filter.is_in_shopping_cart = is_truthy(value),
                _ => {}
            }
        }
        filter.tags.sort();
        filter.tags.dedup();
        filter
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// 쇼핑 목록의 한 줄: 같은 (이름, 단위) 재료의 수량 합계
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// 구독 목록/구독 응답에 쓰이는 작성자 표현
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeShort>,
    pub recipes_count: i64,
}

/// `?recipes_limit=N` 쿼리 파라미터
///
/// 숫자가 아닌 값은 무시(제한 없음)해야 하므로 문자열로 받아 직접 파싱합니다.
#[derive(Debug, Default, Deserialize)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<String>,
}

impl RecipesLimitQuery {
    pub fn limit(&self) -> Option<i64> {
        self.recipes_limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|limit| *limit >= 0)
    }
}
