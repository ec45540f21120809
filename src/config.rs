//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키 (필수)
//! - `MEDIA_PATH`: 레시피 이미지 저장 디렉토리
//! - `HOST`, `PORT`: 서버 바인딩 주소와 포트
//! - `DATABASE_MAX_CONNECTIONS`: 연결 풀 크기
//! - `ACCESS_TOKEN_TTL_MINUTES`: 액세스 토큰 유효 시간(분)
//! - `CORS_ALLOW_ORIGIN`: 허용할 출처. 없으면 모든 출처 허용

use std::env;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/foodgram.db?mode=rwc")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 레시피 이미지가 저장되는 루트 디렉토리
    pub media_path: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 8000)
    pub port: u16,
    /// 연결 풀의 최대 연결 수 (기본값: 5)
    pub max_connections: u32,
    /// 액세스 토큰 유효 시간, 분 단위 (기본값: 15)
    pub access_token_ttl_minutes: i64,
    /// CORS 허용 출처. None이면 Any
    pub cors_allow_origin: Option<String>,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 `VarError`를 반환합니다.
    /// 숫자 항목은 파싱에 실패하면 기본값으로 대체됩니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            media_path: env::var("MEDIA_PATH").unwrap_or_else(|_| "data/media".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 8000),
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 5),
            access_token_ttl_minutes: parse_or("ACCESS_TOKEN_TTL_MINUTES", 15),
            // 빈 문자열은 "설정 안 함"으로 취급합니다
            cors_allow_origin: env::var("CORS_ALLOW_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
        })
    }
}

/// 환경변수를 읽어 `T`로 파싱하고, 없거나 파싱에 실패하면 `default`를 돌려줍니다.
///
/// `T: FromStr`: 문자열에서 파싱 가능한 모든 타입(u16, u32, i64 …)에 쓸 수 있는 제네릭 함수입니다.
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
