//! Integration tests for the Geminius library.
//!
//! The `local_*` tests run the client against a one-shot HTTP server on the loopback interface.
//! The `live_*` tests require an API key in the environment and are skipped without one.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use futures::StreamExt;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use geminius::chat::{ChatSession, FALLBACK_REPLY, TurnOutcome};
    use geminius::{
        ChatSettings, ClientLogger, Content, ContentRole, ConversationHandle, Error, Gemini,
        GenerateContentRequest, GenerateContentResponse, KnownModel, Message, Model, ModelClient,
        Part, Renderer,
    };

    /// Serves exactly one request with the given status line and body, returning the raw request.
    async fn serve_once(status: &'static str, content_type: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/v1beta/", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: {content_type}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        (base_url, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8(buf).unwrap()
    }

    fn client(base_url: String) -> Gemini {
        Gemini::with_options(
            Some("test-key".to_string()),
            Some(base_url),
            Some(Duration::from_secs(10)),
        )
        .unwrap()
    }

    fn sse(chunks: &[&str]) -> String {
        chunks
            .iter()
            .map(|text| {
                let chunk = serde_json::json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": text}]},
                        "index": 0
                    }]
                });
                format!("data: {chunk}\r\n\r\n")
            })
            .collect()
    }

    #[derive(Default)]
    struct Transcript {
        text: String,
        errors: Vec<String>,
    }

    impl Renderer for Transcript {
        fn start_response(&mut self) {}
        fn print_text(&mut self, text: &str) {
            self.text.push_str(text);
        }
        fn finish_response(&mut self) {}
        fn print_message(&mut self, _: &Message) {}
        fn print_error(&mut self, error: &str) {
            self.errors.push(error.to_string());
        }
        fn print_warning(&mut self, _: &str) {}
        fn print_success(&mut self, _: &str) {}
        fn print_info(&mut self, _: &str) {}
    }

    #[tokio::test]
    async fn local_conversation_streams_fragments() {
        let (base_url, server) =
            serve_once("200 OK", "text/event-stream", sse(&["Hi", " there", "!"])).await;
        let client = client(base_url);
        let history = vec![Content::text(ContentRole::Model, "Hello, I'm a bot.")];
        let settings = ChatSettings::new(Model::Known(KnownModel::Gemini25Flash));

        let conversation = client.start_conversation(&settings, history);
        let fragments: Vec<String> = conversation
            .send(vec![Part::text("Hello")])
            .await
            .unwrap()
            .map(|fragment| fragment.unwrap())
            .collect()
            .await;

        assert_eq!(fragments, vec!["Hi", " there", "!"]);
        let request = server.await.unwrap();
        assert!(
            request.starts_with(
                "POST /v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse HTTP/1.1"
            ),
            "{request}"
        );
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["contents"][0]["role"], "model");
        assert_eq!(body["contents"][1]["role"], "user");
        assert_eq!(body["contents"][1]["parts"][0]["text"], "Hello");
    }

    #[derive(Default)]
    struct CountingLogger {
        requests: AtomicUsize,
        chunks: AtomicUsize,
        errors: AtomicUsize,
    }

    impl ClientLogger for CountingLogger {
        fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
            assert_eq!(model, &Model::default());
            assert_eq!(request.contents.len(), 1);
            self.requests.fetch_add(1, Ordering::Relaxed);
        }

        fn log_stream_chunk(&self, chunk: &GenerateContentResponse) {
            assert!(!chunk.candidates.is_empty());
            self.chunks.fetch_add(1, Ordering::Relaxed);
        }

        fn log_error(&self, _: &Error) {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[tokio::test]
    async fn local_logger_sees_request_and_chunks() {
        let (base_url, server) =
            serve_once("200 OK", "text/event-stream", sse(&["one", "two"])).await;
        let logger = Arc::new(CountingLogger::default());
        let client = client(base_url).with_logger(logger.clone());
        let request = GenerateContentRequest::new(vec![Content::text(ContentRole::User, "Hi")]);

        let chunks: Vec<_> = client
            .stream(&Model::default(), &request)
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(chunks.len(), 2);
        assert_eq!(logger.requests.load(Ordering::Relaxed), 1);
        assert_eq!(logger.chunks.load(Ordering::Relaxed), 2);
        assert_eq!(logger.errors.load(Ordering::Relaxed), 0);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn local_attachment_is_sent_inline() {
        let (base_url, server) = serve_once("200 OK", "text/event-stream", sse(&["A cat."])).await;
        let mut session = ChatSession::with_client(client(base_url), ChatSettings::default());
        let mut renderer = Transcript::default();

        session.upload(
            geminius::Attachment::new("cat.png", "image/png", &b"\x89PNG"[..]),
            &mut renderer,
        );
        let outcome = session.submit("Describe this", &mut renderer).await;

        assert_eq!(outcome.reply(), Some("A cat."));
        assert_eq!(renderer.text, "A cat.");
        let request = server.await.unwrap();
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        let parts = &body["contents"][1]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "iVBORw==");
        assert_eq!(parts[1]["text"], "Describe this");
    }

    #[tokio::test]
    async fn local_api_error_becomes_fallback() {
        let body = serde_json::json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })
        .to_string();
        let (base_url, server) = serve_once("400 Bad Request", "application/json", body).await;
        let mut session = ChatSession::with_client(client(base_url), ChatSettings::default());
        let mut renderer = Transcript::default();

        let outcome = session.submit("Hello", &mut renderer).await;

        match outcome {
            TurnOutcome::Failed { error, reply } => {
                assert!(error.to_string().contains("API key not valid"), "{error}");
                assert_eq!(reply, FALLBACK_REPLY);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(renderer.text, FALLBACK_REPLY);
        assert_eq!(renderer.errors.len(), 1);
        assert_eq!(
            session.messages().last(),
            Some(&Message::assistant(FALLBACK_REPLY))
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn local_generate_returns_whole_response() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "4"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 1, "totalTokenCount": 6}
        })
        .to_string();
        let (base_url, server) = serve_once("200 OK", "application/json", body).await;
        let client = client(base_url);
        let request =
            GenerateContentRequest::new(vec![Content::text(ContentRole::User, "What is 2+2?")]);

        let response = client.generate(&Model::default(), &request).await.unwrap();

        assert_eq!(response.text().unwrap(), "4");
        let request = server.await.unwrap();
        assert!(request.contains(":generateContent HTTP/1.1"), "{request}");
    }

    #[tokio::test]
    async fn local_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);
        let client = client(base_url);
        let request = GenerateContentRequest::new(vec![Content::text(ContentRole::User, "Hi")]);

        let err = client.stream(&Model::default(), &request).await.err().unwrap();

        assert!(err.is_remote_service());
        assert!(!matches!(err, Error::Configuration { .. }));
    }

    #[tokio::test]
    async fn live_simple_request() {
        // This test requires GOOGLE_API_KEY to be set
        let api_key = std::env::var("GOOGLE_API_KEY").ok();
        if api_key.is_none() {
            eprintln!("Skipping test: GOOGLE_API_KEY not set");
            return;
        }

        let client = Gemini::new(api_key).expect("Failed to create client");
        let request = GenerateContentRequest::new(vec![Content::text(
            ContentRole::User,
            "Say 'test passed'",
        )]);

        let response = client.generate(&Model::default(), &request).await;
        assert!(
            response.is_ok(),
            "Request should succeed with valid API key"
        );
    }

    #[tokio::test]
    async fn live_streaming_conversation() {
        let api_key = std::env::var("GOOGLE_API_KEY").ok();
        if api_key.is_none() {
            eprintln!("Skipping test: GOOGLE_API_KEY not set");
            return;
        }

        let client = Gemini::new(api_key).expect("Failed to create client");
        let mut session = ChatSession::with_client(client, ChatSettings::default());
        let mut renderer = Transcript::default();

        let outcome = session.submit("Count to 3", &mut renderer).await;
        assert!(outcome.is_completed(), "Stream request should succeed");
        assert_eq!(session.messages().len(), 3);
    }
}
