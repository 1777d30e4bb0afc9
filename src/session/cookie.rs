use axum::http::header::COOKIE;
use axum::http::HeaderMap;

use super::SessionId;

/// Session id from the request cookies. Unparseable values are ignored.
pub fn session_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| value.trim_matches('"').parse().ok())
}

/// `Set-Cookie` value binding the browser to `id`
pub fn session_cookie(cookie_name: &str, id: &SessionId, ttl_secs: u64) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", cookie_name, id);
    if ttl_secs > 0 {
        cookie.push_str(&format!("; Max-Age={}", ttl_secs));
    }
    cookie
}
