//! # 쇼핑 목록 렌더링
//!
//! `db::aggregate_cart()`가 합산한 재료 목록을 다운로드용 텍스트로 만듭니다.
//!
//! ```text
//! Shopping list for: alice
//!
//! Date: 2024-05-01
//!
//! - Flour (g) - 500
//! - Sugar (g) - 50
//!
//! Foodgram (2024)
//! ```
//!
//! 날짜를 인자로 받기 때문에 같은 입력이면 항상 같은 결과가 나옵니다.

use chrono::{Datelike, NaiveDate};

use crate::models::CartLine;

pub fn render(username: &str, date: NaiveDate, lines: &[CartLine]) -> String {
    let header = format!(
        "Shopping list for: {username}\n\nDate: {}\n\n",
        date.format("%Y-%m-%d")
    );

    let body = lines
        .iter()
        .map(|line| format!("- {} ({}) - {}", line.name, line.measurement_unit, line.amount))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{header}{body}\n\nFoodgram ({})", date.year())
}

/// `Content-Disposition`에 쓰는 파일 이름
pub fn file_name(username: &str) -> String {
    format!("{username}_shopping_list.txt")
}

/// 첨부파일 `Content-Disposition` 헤더 값
///
/// 사용자 이름에 비ASCII 문자가 올 수 있으므로 두 형태를 함께 씁니다.
/// - `filename="..."`: ASCII가 아닌 문자를 `_`로 바꾼 대체 이름
/// - `filename*=UTF-8''...`: RFC 5987 퍼센트 인코딩된 원래 이름
pub fn content_disposition(username: &str) -> String {
    let name = file_name(username);
    let fallback: String = name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();

    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        percent_encode(&name)
    )
}

/// RFC 5987 `attr-char`가 아닌 바이트를 `%XX`로 인코딩합니다.
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => out.push(char::from(byte)),
            b'!' | b'#' | b'$' | b'&' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~' => {
                out.push(char::from(byte))
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
