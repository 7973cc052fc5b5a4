use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Format a byte count with dot-separated thousands ("12.345")
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Logs method, path, status, body size and duration of every request
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Buffer the body to learn its real size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                "{} {} -> {} | {}ms | body error: {}",
                method,
                uri.path(),
                parts.status.as_u16(),
                start.elapsed().as_millis(),
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let duration = start.elapsed();
    if parts.status.is_success() {
        tracing::info!(
            "{} {} -> {} | {}ms | {} bytes",
            method,
            uri.path(),
            parts.status.as_u16(),
            duration.as_millis(),
            format_number(bytes.len())
        );
    } else {
        tracing::warn!(
            "{} {} -> {} | {}ms | {} bytes",
            method,
            uri.path(),
            parts.status.as_u16(),
            duration.as_millis(),
            format_number(bytes.len())
        );
    }

    Response::from_parts(parts, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.000");
        assert_eq!(format_number(1234567), "1.234.567");
    }
}
