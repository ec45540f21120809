//! # 비즈니스 로직 서비스 모듈
//!
//! 라우트 핸들러와 DB 계층 사이의 도메인 로직을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `images`: data URI 이미지 디코딩과 미디어 디렉토리 파일 관리
//! - `loader`: 재료/태그 JSON 일괄 적재 (중복은 건너뜀)
//! - `shopping_list`: 합산된 장바구니 재료를 텍스트 파일로 렌더링
//! - `validator`: 레시피 생성/수정 요청 검증

pub mod images;
pub mod loader;
pub mod shopping_list;
pub mod validator;
