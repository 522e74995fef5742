//! One line per request in the classic combined log layout.
//!
//! Templates use `%(x)s` placeholders:
//!
//! | token | value |
//! |---|---|
//! | `h` | remote address |
//! | `l` | `-` |
//! | `u` | `-` (no authenticated user) |
//! | `t` | request time, `[17/Oct/2026:09:12:03 +0000]` |
//! | `r` | request line |
//! | `m` / `U` / `q` / `H` | method / path / query / protocol |
//! | `s` | status code |
//! | `b` / `B` | response length, `-` / `0` when unknown |
//! | `f` | referer |
//! | `a` | user agent |
//! | `D` / `T` / `L` | duration in microseconds / seconds / decimal seconds |
//! | `p` | process id |
//!
//! Unknown tokens render as `-`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method, Uri, Version},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, FixedOffset, Local};

pub const ACCESS_LOG_TARGET: &str = "access";

pub const DEFAULT_ACCESS_LOG_FORMAT: &str =
    r#"%(h)s %(l)s %(u)s %(t)s "%(r)s" %(s)s %(b)s "%(f)s" "%(a)s" %(D)s"#;

/// Peer address of the connection a request arrived on.
#[derive(Debug, Clone, Copy)]
pub struct RemoteAddr(pub SocketAddr);

#[derive(Debug, Clone)]
pub struct AccessRecord {
    pub remote_addr: Option<SocketAddr>,
    pub time: DateTime<FixedOffset>,
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub status: u16,
    pub response_length: Option<u64>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub duration: Duration,
}

impl AccessRecord {
    pub fn request_line(&self) -> String {
        format!(
            "{} {} {}",
            self.method,
            self.uri
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/"),
            protocol(self.version)
        )
    }

    fn token(&self, name: &str) -> String {
        match name {
            "h" => self
                .remote_addr
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|| "-".to_string()),
            "l" | "u" => "-".to_string(),
            "t" => self.time.format("[%d/%b/%Y:%H:%M:%S %z]").to_string(),
            "r" => self.request_line(),
            "m" => self.method.to_string(),
            "U" => self.uri.path().to_string(),
            "q" => self.uri.query().unwrap_or_default().to_string(),
            "H" => protocol(self.version).to_string(),
            "s" => self.status.to_string(),
            "b" => self
                .response_length
                .map(|len| len.to_string())
                .unwrap_or_else(|| "-".to_string()),
            "B" => self.response_length.unwrap_or(0).to_string(),
            "f" => self.referer.clone().unwrap_or_else(|| "-".to_string()),
            "a" => self.user_agent.clone().unwrap_or_else(|| "-".to_string()),
            "D" => self.duration.as_micros().to_string(),
            "T" => self.duration.as_secs().to_string(),
            "L" => format!("{:.6}", self.duration.as_secs_f64()),
            "p" => format!("<{}>", std::process::id()),
            _ => "-".to_string(),
        }
    }
}

fn protocol(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}

/// Expands every `%(name)s` placeholder in `template`.
pub fn render(template: &str, record: &AccessRecord) -> String {
    let mut line = String::with_capacity(template.len() + 64);
    let mut rest = template;
    while let Some(start) = rest.find("%(") {
        line.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find(")s") {
            Some(end) => {
                line.push_str(&record.token(&after[..end]));
                rest = &after[end + 2..];
            }
            None => {
                line.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    line.push_str(rest);
    line
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub async fn log_access(
    State(template): State<Arc<str>>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let time = Local::now().fixed_offset();
    let remote_addr = request
        .extensions()
        .get::<RemoteAddr>()
        .map(|RemoteAddr(addr)| *addr);
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();
    let referer = header_value(request.headers(), header::REFERER);
    let user_agent = header_value(request.headers(), header::USER_AGENT);

    let response = next.run(request).await;

    let response_length = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok());
    let record = AccessRecord {
        remote_addr,
        time,
        method,
        uri,
        version,
        status: response.status().as_u16(),
        response_length,
        referer,
        user_agent,
        duration: started.elapsed(),
    };
    tracing::info!(target: ACCESS_LOG_TARGET, "{}", render(&template, &record));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AccessRecord {
        AccessRecord {
            remote_addr: Some("10.0.0.7:52144".parse().unwrap()),
            time: DateTime::parse_from_rfc3339("2026-10-17T09:12:03+00:00").unwrap(),
            method: Method::GET,
            uri: "/api/summary?verbose=1".parse().unwrap(),
            version: Version::HTTP_11,
            status: 200,
            response_length: Some(187),
            referer: None,
            user_agent: Some("curl/8.5.0".to_string()),
            duration: Duration::from_micros(1534),
        }
    }

    #[test]
    fn renders_default_combined_format() {
        let line = render(DEFAULT_ACCESS_LOG_FORMAT, &record());
        assert_eq!(
            line,
            r#"10.0.0.7 - - [17/Oct/2026:09:12:03 +0000] "GET /api/summary?verbose=1 HTTP/1.1" 200 187 "-" "curl/8.5.0" 1534"#
        );
    }

    #[test]
    fn unknown_length_and_tokens_render_as_dash() {
        let mut record = record();
        record.response_length = None;
        record.remote_addr = None;
        assert_eq!(render("%(h)s %(b)s %(B)s %(zz)s", &record), "- - 0 -");
    }

    #[test]
    fn keeps_literal_text_and_unterminated_placeholders() {
        let record = record();
        assert_eq!(render("status=%(s)s", &record), "status=200");
        assert_eq!(render("%(m)s %(U)s ?%(q)s", &record), "GET /api/summary ?verbose=1");
        assert_eq!(render("trailing %(s", &record), "trailing %(s");
        assert_eq!(render("100%", &record), "100%");
    }
}
