use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// Size limits on the request head. A limit of zero disables that check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    pub request_line: usize,
    pub request_fields: usize,
    pub request_field_size: usize,
}

impl RequestLimits {
    pub fn check<B>(&self, request: &axum::http::Request<B>) -> Result<(), AppError> {
        if self.request_line > 0 {
            // METHOD SP target SP HTTP/x.y
            let target = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().len())
                .unwrap_or(1);
            let line = request.method().as_str().len() + 1 + target + 1 + "HTTP/1.1".len();
            if line > self.request_line {
                return Err(AppError::new(
                    StatusCode::URI_TOO_LONG,
                    format!("request line exceeds {} bytes", self.request_line),
                ));
            }
        }

        let headers = request.headers();
        if self.request_fields > 0 && headers.len() > self.request_fields {
            return Err(AppError::new(
                StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE,
                format!("more than {} header fields", self.request_fields),
            ));
        }

        if self.request_field_size > 0 {
            for (name, value) in headers {
                // name ": " value
                if name.as_str().len() + 2 + value.len() > self.request_field_size {
                    return Err(AppError::new(
                        StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE,
                        format!("header `{name}` exceeds {} bytes", self.request_field_size),
                    ));
                }
            }
        }

        Ok(())
    }
}

pub async fn enforce_limits(
    State(limits): State<RequestLimits>,
    request: Request,
    next: Next,
) -> Response {
    if let Err(rejection) = limits.check(&request) {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "rejected request head: {}",
            rejection.message()
        );
        return rejection.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::http::{Request, StatusCode};

    use super::RequestLimits;

    const LIMITS: RequestLimits = RequestLimits {
        request_line: 64,
        request_fields: 3,
        request_field_size: 32,
    };

    #[test]
    fn accepts_small_requests() {
        let request = Request::get("/api/health")
            .header("accept", "application/json")
            .body(())
            .unwrap();
        assert!(LIMITS.check(&request).is_ok());
    }

    #[test]
    fn rejects_long_request_line() {
        let path = format!("/api/health?pad={}", "x".repeat(64));
        let request = Request::get(path).body(()).unwrap();
        let err = LIMITS.check(&request).unwrap_err();
        assert_eq!(err.status(), StatusCode::URI_TOO_LONG);
    }

    #[test]
    fn rejects_too_many_fields() {
        let request = Request::get("/")
            .header("a", "1")
            .header("b", "2")
            .header("c", "3")
            .header("d", "4")
            .body(())
            .unwrap();
        let err = LIMITS.check(&request).unwrap_err();
        assert_eq!(err.status(), StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE);
    }

    #[test]
    fn rejects_oversized_field() {
        let request = Request::get("/")
            .header("x-padding", "y".repeat(40))
            .body(())
            .unwrap();
        let err = LIMITS.check(&request).unwrap_err();
        assert_eq!(err.status(), StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE);
        assert!(err.message().contains("x-padding"));
    }

    #[test]
    fn zero_disables_every_check() {
        let unlimited = RequestLimits {
            request_line: 0,
            request_fields: 0,
            request_field_size: 0,
        };
        let request = Request::get(format!("/{}", "p".repeat(10_000)))
            .header("x-padding", "y".repeat(10_000))
            .body(())
            .unwrap();
        assert!(unlimited.check(&request).is_ok());
    }
}
