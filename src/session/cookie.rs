const SESSION_COOKIE: &str = "session";

/// Pulls the `session=` value out of a `Cookie` header.
pub fn session_id(cookie_header: Option<&str>) -> Option<&str> {
    cookie_header?
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("session="))
        .find(|value| !value.is_empty())
}

/// `Set-Cookie` value handing `id` to the client.
pub fn set_cookie(id: &str) -> String {
    format!("{}={}; Path=/", SESSION_COOKIE, id)
}
