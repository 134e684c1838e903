use std::env;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::Stream;
use futures::future;
use futures::stream::{StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use url::Url;

use crate::backend::{ChatSettings, ConversationHandle, FragmentStream, ModelClient};
use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS, STREAM_TTFB,
};
use crate::sse::process_sse;
use crate::types::{Content, ContentRole, GenerateContentRequest, GenerateContentResponse, Model, Part};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Environment variables consulted, in order, when no API key is passed explicitly.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// A boxed stream of decoded response chunks.
pub type ResponseStream = Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>;

/// Client for the Gemini API.
#[derive(Clone)]
pub struct Gemini {
    api_key: HeaderValue,
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl Gemini {
    /// Create a new Gemini client.
    ///
    /// The API key can be provided directly or read from the `GOOGLE_API_KEY` or `GEMINI_API_KEY`
    /// environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => api_key_from_env().ok_or_else(|| {
                Error::configuration(
                    "API key not provided and neither GOOGLE_API_KEY nor GEMINI_API_KEY is set",
                )
            })?,
        };
        let api_key = validate_api_key(&api_key)?;

        let mut base_url = base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that observes every request and streamed chunk.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Start a chat seeded with `history`.
    pub fn start_chat(&self, settings: &ChatSettings, history: Vec<Content>) -> GeminiChat {
        GeminiChat {
            client: self.clone(),
            settings: settings.clone(),
            history,
        }
    }

    /// Build the URL for a model method such as `generateContent`.
    fn endpoint(&self, model: &Model, method: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("./models/{model}:{method}"))?)
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", self.api_key.clone());
        headers
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|val| val.to_str().ok())
            .map(String::from);

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        error_from_body(status_code, &error_body, request_id, retry_after)
    }

    /// Send a request and return the HTTP response, mapping transport failures and error
    /// statuses.
    async fn post(&self, url: Url, headers: HeaderMap, request: &GenerateContentRequest) -> Result<Response> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self
            .client
            .post(url)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            });
        let response = match result {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => Err(Self::process_error_response(response).await),
            Err(err) => Err(err),
        };
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if let Err(err) = &response {
            CLIENT_REQUEST_ERRORS.click();
            if let Some(logger) = &self.logger {
                logger.log_error(err);
            }
        }
        response
    }

    /// Send a request and get a non-streaming response.
    pub async fn generate(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.endpoint(model, "generateContent")?;
        if let Some(logger) = &self.logger {
            logger.log_request(model, request);
        }
        let response = self.post(url, self.default_headers(), request).await?;
        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                Error::serialization(
                    format!("Failed to parse response: {}", e),
                    Some(Box::new(e)),
                )
            })
    }

    /// Send a request and get a streaming response.
    ///
    /// Returns a stream of response chunks that can be processed incrementally.
    pub async fn stream(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<ResponseStream> {
        let mut url = self.endpoint(model, "streamGenerateContent")?;
        url.set_query(Some("alt=sse"));

        let mut headers = self.default_headers();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );

        if let Some(logger) = &self.logger {
            logger.log_request(model, request);
        }
        let start = Instant::now();
        let response = self.post(url, headers, request).await?;
        STREAM_TTFB.add(start.elapsed().as_secs_f64());

        let chunks = process_sse(response.bytes_stream());
        match self.logger.clone() {
            Some(logger) => Ok(Box::pin(chunks.inspect(move |chunk| match chunk {
                Ok(chunk) => logger.log_stream_chunk(chunk),
                Err(err) => logger.log_error(err),
            }))),
            None => Ok(Box::pin(chunks)),
        }
    }
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ModelClient for Gemini {
    type Conversation = GeminiChat;

    fn start_conversation(&self, settings: &ChatSettings, history: Vec<Content>) -> GeminiChat {
        self.start_chat(settings, history)
    }
}

/// A Gemini conversation seeded with history, waiting for its next user turn.
#[derive(Debug)]
pub struct GeminiChat {
    client: Gemini,
    settings: ChatSettings,
    history: Vec<Content>,
}

impl GeminiChat {
    /// The history this chat was started with.
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Build the request that sending `parts` would issue.
    pub fn request_for(&self, parts: Vec<Part>) -> GenerateContentRequest {
        let mut contents = self.history.clone();
        contents.push(Content::new(ContentRole::User, parts));
        GenerateContentRequest::new(contents)
            .with_system_instruction(self.settings.system_instruction.clone())
            .with_generation_config(self.settings.generation_config.clone())
    }
}

#[async_trait::async_trait]
impl ConversationHandle for GeminiChat {
    async fn send(self, parts: Vec<Part>) -> Result<FragmentStream> {
        let request = self.request_for(parts);
        let chunks = self.client.stream(&self.settings.model, &request).await?;
        Ok(Box::pin(
            chunks
                .and_then(|chunk| future::ready(chunk.text()))
                .try_filter(|text| future::ready(!text.is_empty())),
        ))
    }
}

fn api_key_from_env() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|key| !key.trim().is_empty())
}

fn validate_api_key(key: &str) -> Result<HeaderValue> {
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::configuration("API key is empty"));
    }
    let mut value = HeaderValue::from_str(key)
        .map_err(|_| Error::configuration("API key contains characters not allowed in a header"))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Map an error status and body to an [`Error`].
///
/// Gemini reports errors as `{"error": {"code": 400, "message": "...", "status": "..."}}`; if the
/// body is not in that shape it is used verbatim as the message.
fn error_from_body(
    status_code: u16,
    body: &str,
    request_id: Option<String>,
    retry_after: Option<u64>,
) -> Error {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: Option<ErrorDetail>,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: Option<String>,
        status: Option<String>,
    }

    let parsed_error = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error);
    let status = parsed_error.as_ref().and_then(|e| e.status.clone());
    let error_message = parsed_error
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string());

    match status_code {
        400 => Error::bad_request(error_message),
        401 => Error::authentication(error_message),
        403 => Error::permission(error_message),
        404 => Error::not_found(error_message),
        408 => Error::timeout(error_message, None),
        429 => Error::rate_limit(error_message, retry_after),
        500 => Error::internal_server(error_message, request_id),
        502..=504 => Error::service_unavailable(error_message, retry_after),
        _ => Error::api(status_code, status, error_message, request_id),
    }
}
