//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `favorites`: 즐겨찾기 추가/삭제/조회
//! - `follows`: 작성자 구독(팔로우) 관계
//! - `ingredients`: 재료 조회와 적재
//! - `recipes`: 레시피 조회와 트랜잭션 기반 생성/수정/삭제
//! - `shopping_cart`: 장바구니 추가/삭제와 재료 합산
//! - `tags`: 태그 조회와 적재
//! - `users`: 사용자와 리프레시 토큰

pub mod favorites;
pub mod follows;
pub mod ingredients;
pub mod recipes;
pub mod shopping_cart;
pub mod tags;
pub mod users;

// `users`는 이름이 겹치기 쉬운 함수(find_by_id 등)가 많아 재공개하지 않고
// `db::users::find_by_id`처럼 모듈 경로로 사용합니다.
pub use favorites::*;
pub use follows::*;
pub use ingredients::*;
pub use recipes::*;
pub use shopping_cart::*;
pub use tags::*;

use std::{str::FromStr, time::Duration};

use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

/// SQLite 연결 풀을 만듭니다.
///
/// 파일이 없으면 새로 만들고(`create_if_missing`), 외래 키 검사를 켭니다.
/// 레시피를 지울 때 재료/태그/즐겨찾기/장바구니 행이 `ON DELETE CASCADE`로 함께 지워지려면
/// 외래 키 검사가 켜져 있어야 합니다.
///
/// 다른 연결이 쓰기 잠금을 잡고 있으면 `busy_timeout` 동안 기다린 뒤 재시도합니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// `./migrations`의 마이그레이션 중 아직 실행되지 않은 것만 순서대로 실행합니다.
///
/// `sqlx::migrate!`는 컴파일 타임에 SQL 파일들을 바이너리에 포함시킵니다.
pub async fn migrate(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
