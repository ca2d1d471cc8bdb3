//! Exercises the HTTP backend against a one-shot local server.
//!
//! Each test binds a `TcpListener` on an ephemeral port, serves exactly one
//! canned response, and hands back the raw request it received.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::time::Duration;

use greentrack_core::{CompletionError, CompletionRequest, CompletionService, FaultCategory};
use greentrack_llm::{BackendConfig, OpenAiBackend};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one HTTP response, returning the raw request text.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut received = Vec::new();
        let mut buf = [0_u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.expect("read");
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
            if request_complete(&received) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&received).into_owned()
    });
    (format!("http://{addr}/v1/chat/completions"), handle)
}

fn request_complete(received: &[u8]) -> bool {
    let text = String::from_utf8_lossy(received);
    let Some(split) = text.find("\r\n\r\n") else {
        return false;
    };
    let length = text[..split]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    received.len() >= split + 4 + length
}

fn backend(endpoint: String, api_key: Option<&str>) -> OpenAiBackend {
    OpenAiBackend::new(BackendConfig {
        endpoint,
        api_key: api_key.map(ToOwned::to_owned),
        api_key_env: "OPENAI_API_KEY".to_owned(),
        model: "gpt-4o-mini".to_owned(),
        max_tokens: 150,
        temperature: 0.7,
        timeout: Duration::from_secs(5),
    })
}

fn request() -> CompletionRequest {
    CompletionRequest {
        system: "You are a helpful carbon footprint assistant.".to_owned(),
        user: "How can I cut my emissions?".to_owned(),
    }
}

#[tokio::test]
async fn successful_reply_is_returned() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"choices":[{"message":{"role":"assistant","content":"Cycle to work."}}]}"#,
    )
    .await;
    let reply = backend(url, Some("sk-test")).complete(&request()).await;
    assert_eq!(reply, Ok("Cycle to work.".to_owned()));

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /v1/chat/completions"));
    assert!(raw.to_ascii_lowercase().contains("authorization: bearer sk-test"));
    assert!(raw.contains(r#""model":"gpt-4o-mini""#));
    assert!(raw.contains(r#""role":"system""#));
    assert!(raw.contains("How can I cut my emissions?"));
}

#[tokio::test]
async fn error_status_is_rejected() {
    let (url, server) = serve_once(
        "401 Unauthorized",
        r#"{"error":{"message":"Incorrect API key provided"}}"#,
    )
    .await;
    let reply = backend(url, Some("sk-revoked")).complete(&request()).await;
    assert_eq!(reply, Err(CompletionError::Rejected { status: 401 }));

    let raw = server.await.unwrap();
    assert!(raw.to_ascii_lowercase().contains("authorization: bearer sk-revoked"));
}

#[tokio::test]
async fn missing_key_fails_before_any_request() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let reply = backend(format!("http://{addr}/v1/chat/completions"), None)
        .complete(&request())
        .await;

    let err = reply.unwrap_err();
    assert_eq!(
        err,
        CompletionError::MissingCredentials {
            variable: "OPENAI_API_KEY".to_owned()
        }
    );
    assert_eq!(err.category(), FaultCategory::Configuration);
    assert_eq!(
        err.transcript_message(),
        "Error: No API key configured. Set OPENAI_API_KEY and try again."
    );
    let accepted = tokio::time::timeout(Duration::from_millis(200), listener.accept()).await;
    assert!(accepted.is_err(), "a connection reached the server");
}

#[tokio::test]
async fn garbage_body_is_decode_error() {
    let (url, _server) = serve_once("200 OK", "<html>gateway</html>").await;
    let reply = backend(url, Some("sk-test")).complete(&request()).await;
    assert!(matches!(reply, Err(CompletionError::Decode { .. })));
}

#[tokio::test]
async fn no_choices_is_empty() {
    let (url, _server) = serve_once("200 OK", r#"{"choices":[]}"#).await;
    let reply = backend(url, Some("sk-test")).complete(&request()).await;
    assert_eq!(reply, Err(CompletionError::Empty));
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let reply = backend(format!("http://{addr}/v1/chat/completions"), Some("sk-test"))
        .complete(&request())
        .await;
    assert!(matches!(reply, Err(CompletionError::Transport { .. })));
}

#[tokio::test]
async fn malformed_endpoint_is_setup_error() {
    let reply = backend("not a url".to_owned(), None)
        .complete(&request())
        .await;
    let err = reply.unwrap_err();
    assert!(matches!(err, CompletionError::Setup { .. }));
    assert_eq!(err.transcript_message(), "Error: Invalid API endpoint");
}
