use std::{collections::BTreeMap, path::Path as FsPath, time::Duration};

use axum::{
    body::Bytes,
    extract::Path,
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::get,
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Longest delay `/delay/{ms}` will honour.
pub const MAX_DELAY_MS: u64 = 60_000;

/// What the server saw of a request, returned by `/echo`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Lower-cased header names; repeated headers are joined with `, `.
    pub headers: BTreeMap<String, String>,
    /// Body decoded as UTF-8, lossily.
    pub body: String,
    pub body_bytes: Vec<u8>,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", get(echo).post(echo))
        .route("/delay/{ms}", get(delay))
        .route("/status/{code}", get(status))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "echo server listening");
    }
    axum::serve(listener, app()).await
}

/// Serve `app()` over TLS on an already bound listener.
pub async fn run_tls(
    listener: std::net::TcpListener,
    tls: RustlsConfig,
) -> Result<(), std::io::Error> {
    listener.set_nonblocking(true)?;
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "echo server listening with tls");
    }
    axum_server::from_tcp_rustls(listener, tls)
        .serve(app().into_make_service())
        .await
}

/// TLS settings from a PEM certificate chain and private key held in memory.
pub async fn tls_config(
    cert_pem: Vec<u8>,
    key_pem: Vec<u8>,
) -> Result<RustlsConfig, std::io::Error> {
    install_crypto_provider();
    RustlsConfig::from_pem(cert_pem, key_pem).await
}

/// TLS settings from PEM files on disk.
pub async fn tls_config_from_files(
    cert: &FsPath,
    key: &FsPath,
) -> Result<RustlsConfig, std::io::Error> {
    install_crypto_provider();
    RustlsConfig::from_pem_file(cert, key).await
}

// rustls is compiled with more than one provider here; pin the process default.
fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in &headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        seen.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    tracing::debug!(%method, %uri, body_len = body.len(), "echoing request");

    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: seen,
        body: String::from_utf8_lossy(&body).into_owned(),
        body_bytes: body.to_vec(),
    })
}

async fn delay(Path(ms): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(ms.min(MAX_DELAY_MS))).await;
    "done"
}

async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, status.as_str().to_string()),
        Err(_) => (StatusCode::BAD_REQUEST, format!("invalid status code {code}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_serializes_to_json() {
        let echo = Echo {
            method: "GET".to_string(),
            path: "/echo".to_string(),
            query: Some("a=1".to_string()),
            headers: BTreeMap::from([("user-agent".to_string(), "probe".to_string())]),
            body: String::new(),
            body_bytes: Vec::new(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["method"], "GET");
        assert_eq!(json["query"], "a=1");
        assert_eq!(json["headers"]["user-agent"], "probe");
        assert_eq!(json["body_bytes"], serde_json::json!([]));
    }

    #[test]
    fn echo_without_query_serializes_null() {
        let echo = Echo {
            method: "POST".to_string(),
            path: "/echo".to_string(),
            query: None,
            headers: BTreeMap::new(),
            body: "a=1".to_string(),
            body_bytes: b"a=1".to_vec(),
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert!(json["query"].is_null());
        assert_eq!(json["body"], "a=1");
    }
}
