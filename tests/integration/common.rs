//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use quizloop_client::HttpBackend;
use quizloop_session::{Config, QuestionBank};
use tokio::net::TcpListener;

/// Path to the sample question bank fixture.
pub fn bank_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/questions.json")
}

/// Loads the sample question bank.
pub fn sample_bank() -> QuestionBank {
    QuestionBank::load(bank_path()).expect("Failed to load question bank fixture")
}

/// Serves `router` on an ephemeral localhost port.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    addr
}

/// Config pointing at a server on `addr`.
pub fn config_for(addr: SocketAddr) -> Config {
    Config {
        base_url: format!("http://{addr}"),
        request_timeout_secs: 5,
        topic: "e-waste".to_string(),
        ..Config::default()
    }
}

/// HTTP backend talking to a server on `addr`.
pub fn backend_for(addr: SocketAddr) -> HttpBackend {
    HttpBackend::from_config(&config_for(addr)).expect("Failed to build backend")
}
