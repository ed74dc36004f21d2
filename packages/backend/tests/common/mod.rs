use std::io::Write;
use std::net::{IpAddr, Ipv4Addr};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::{NamedTempFile, TempDir};

use tango_backend::config::Config;
use tango_backend::create_app;

/// App over a throwaway data directory with a fixed RNG seed. The TempDir
/// must stay alive for the duration of the test.
pub async fn create_test_app() -> (Router, TempDir) {
    let data_dir = tempfile::tempdir().unwrap();
    let config = Config {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        log_level: "warn".to_string(),
        data_dir: data_dir.path().to_path_buf(),
        default_deck_url: None,
        decks_file: None,
        calendar_url: None,
        rng_seed: Some(42),
    };
    (create_app(&config).await, data_dir)
}

/// Write a JSON row-array deck to a temp file and return its handle.
pub fn deck_file(rows_json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{rows_json}").unwrap();
    file
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn request_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
