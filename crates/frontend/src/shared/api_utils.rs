//! API utilities for frontend-backend communication.
//!
//! The backend serves the bundle, so every request goes to the page's own
//! origin. Dashboard endpoints answer with `ApiEnvelope`; error envelopes
//! arrive with 4xx/5xx statuses and still carry the message.

use contracts::shared::ApiEnvelope;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Origin of the current page, e.g. "http://localhost:3000"
pub fn api_base() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Build a full API URL from a path
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Turn a response body into the envelope's payload or error message
pub fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, String> {
    match serde_json::from_str::<ApiEnvelope<T>>(body) {
        Ok(envelope) => envelope.into_result(),
        Err(e) if (200..300).contains(&status) => Err(format!("Failed to parse response: {}", e)),
        Err(_) => Err(format!("HTTP error: {}", status)),
    }
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))?;
    parse_envelope(status, &body)
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let response = Request::get(&api_url(path))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_envelope(response).await
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, String> {
    let response = Request::post(&api_url(path))
        .json(body)
        .map_err(|e| format!("Failed to encode request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_envelope(response).await
}

/// POST returning a file; yields the bytes and the server-suggested file name
pub async fn post_for_file<B: Serialize>(
    path: &str,
    body: &B,
) -> Result<(Vec<u8>, Option<String>), String> {
    let response = Request::post(&api_url(path))
        .json(body)
        .map_err(|e| format!("Failed to encode request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        let message = match read_envelope::<()>(response).await {
            Err(e) => e,
            Ok(()) => "Respuesta inesperada del servidor".to_string(),
        };
        return Err(message);
    }

    let file_name = response
        .headers()
        .get("content-disposition")
        .and_then(|v| filename_from_disposition(&v));
    let bytes = response
        .binary()
        .await
        .map_err(|e| format!("Failed to read file: {}", e))?;
    Ok((bytes, file_name))
}

/// `attachment; filename="x.csv"` -> `x.csv`
pub fn filename_from_disposition(header: &str) -> Option<String> {
    header.split(';').find_map(|part| {
        let value = part.trim().strip_prefix("filename=")?;
        let value = value.trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}
