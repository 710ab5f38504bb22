use aispiration_core::completion::prompt::QuotePrompt;
use aispiration_core::{CompletionClient, CompletionConfig, CompletionError, OpenAiCompletionClient};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves one canned HTTP response and returns the raw request it received.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buffer = [0_u8; 4096];
        loop {
            let read = socket.read(&mut buffer).await.unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buffer[..read]);
            if request_is_complete(&request) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    (url, handle)
}

fn request_is_complete(request: &[u8]) -> bool {
    let text = String::from_utf8_lossy(request);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    request.len() >= header_end + 4 + content_length
}

fn client_for(url: String, api_key: &str) -> OpenAiCompletionClient {
    let config = CompletionConfig {
        base_url: url,
        timeout: Some(Duration::from_secs(5)),
        ..CompletionConfig::default()
    };
    OpenAiCompletionClient::new(api_key, config).unwrap()
}

#[tokio::test]
async fn successful_response_returns_first_choice() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"choices":[{"message":{"role":"assistant","content":"坚持就是胜利。—— 佚名"}}]}"#,
    )
    .await;
    let client = client_for(url, "sk-test");

    let text = client
        .complete(&QuotePrompt::new("激励", Some("坚定".to_string())))
        .await
        .unwrap();
    assert_eq!(text, "坚持就是胜利。—— 佚名");

    let request = server.await.unwrap();
    let lowered = request.to_ascii_lowercase();
    assert!(request.starts_with("POST /v1/chat/completions"));
    assert!(lowered.contains("authorization: bearer sk-test"));
    assert!(request.contains("\"model\":\"gpt-4o-mini\""));
    assert!(request.contains("\"max_tokens\":100"));
    assert!(request.contains("\"role\":\"system\""));
}

#[tokio::test]
async fn rate_limit_status_maps_to_status_error() {
    let (url, server) = serve_once(
        "429 Too Many Requests",
        r#"{"error":{"message":"Rate limit reached"}}"#,
    )
    .await;
    let client = client_for(url, "sk-test");

    let err = client.complete(&QuotePrompt::default()).await.unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(
        err,
        CompletionError::Status {
            status: 429,
            message: "Rate limit reached".to_string()
        }
    );
    server.await.unwrap();
}

#[tokio::test]
async fn ok_status_without_choices_is_invalid_response() {
    let (url, server) = serve_once("200 OK", r#"{"choices":[]}"#).await;
    let client = client_for(url, "sk-test");

    let err = client.complete(&QuotePrompt::default()).await.unwrap_err();
    assert!(matches!(err, CompletionError::InvalidResponse(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn blank_api_key_fails_without_network() {
    let client = client_for("http://127.0.0.1:9/unused".to_string(), "  ");

    let err = client.complete(&QuotePrompt::default()).await.unwrap_err();
    assert_eq!(err, CompletionError::MissingApiKey);
}
