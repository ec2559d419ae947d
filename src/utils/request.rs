use actix_web::HttpRequest;
use actix_web::http::header;

/// Client address: first `X-Forwarded-For` entry when present, else the peer address.
pub fn client_ip(req: &HttpRequest) -> Option<String> {
    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match forwarded {
        Some(ip) => Some(ip.to_string()),
        None => req.peer_addr().map(|addr| addr.ip().to_string()),
    }
}

pub fn user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Cuts `value` to at most `max_chars` characters.
pub fn truncate_chars(value: String, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .peer_addr("127.0.0.1:40000".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_client_ip_falls_back_to_peer() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.10:5555".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req).as_deref(), Some("192.0.2.10"));
    }

    #[test]
    fn test_user_agent() {
        let req = TestRequest::default()
            .insert_header((header::USER_AGENT, "Mozilla/5.0"))
            .to_http_request();
        assert_eq!(user_agent(&req).as_deref(), Some("Mozilla/5.0"));
        assert_eq!(user_agent(&TestRequest::default().to_http_request()), None);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("Ông Ba".to_string(), 3), "Ông");
        assert_eq!(truncate_chars("short".to_string(), 64), "short");
    }
}
