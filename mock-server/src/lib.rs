use std::time::Duration;

use axum::{
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;

/// What `/echo` saw: the raw request, reflected back as JSON.
#[derive(Debug, Serialize)]
pub struct EchoReply {
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", get(fixed_status))
        .route("/json", get(json_fruit))
        .route("/text", get(plain_text))
        .route("/slow/{ms}", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<EchoReply> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    Json(EchoReply {
        method: method.to_string(),
        headers,
        body,
    })
}

async fn fixed_status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn json_fruit() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        r#"{"fruit":"Strawberry"}"#,
    )
}

async fn plain_text() -> &'static str {
    "plain body"
}

async fn slow(Path(ms): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    "late"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_reply_serializes_to_json() {
        let reply = EchoReply {
            method: "POST".to_string(),
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            body: "hello".to_string(),
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["headers"][0][0], "content-type");
        assert_eq!(json["headers"][0][1], "text/plain");
        assert_eq!(json["body"], "hello");
    }

    #[test]
    fn out_of_range_status_codes_map_to_400() {
        assert_eq!(StatusCode::from_u16(42).ok(), None);
        assert_eq!(StatusCode::from_u16(299).unwrap().as_u16(), 299);
    }
}
