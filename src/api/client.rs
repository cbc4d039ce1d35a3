//! Blocking HTTP client for the interview backend.
//!
//! Every call is synchronous. Async callers run them through
//! `tokio::task::spawn_blocking`.

use super::errors::ApiError;
use super::feed_transport::{feed_agent, FeedShutdown};
use super::mjpeg::{boundary_from_content_type, MjpegReader, DEFAULT_BOUNDARY};
use super::types::{Identity, QuestionRequest, ResumeAnalysis};
use crate::config::ClientConfig;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Connect timeout for the endless video feed. Reads are unbounded; the
/// feed is ended through its [`FeedShutdown`].
const STREAM_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest error body echoed back to the user.
const MAX_ERROR_CHARS: usize = 200;

type Response = ureq::http::Response<ureq::Body>;

pub struct ApiClient {
    base_url: String,
    session_cookie: Option<String>,
    agent: ureq::Agent,
    session_agent: ureq::Agent,
    stream_config: ureq::config::Config,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.request_timeout()))
            .http_status_as_error(false)
            .build()
            .into();
        let session_agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(config.session_check_timeout())
            .http_status_as_error(false)
            .build()
            .into();
        let stream_config = ureq::Agent::config_builder()
            .timeout_connect(Some(STREAM_CONNECT_TIMEOUT))
            .http_status_as_error(false)
            .build();

        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session_cookie: config.session_cookie.clone(),
            agent,
            session_agent,
            stream_config,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Where the user goes to sign in with Google.
    pub fn auth_url(&self) -> String {
        self.url("/auth/google")
    }

    /// Asks the backend who the current session belongs to.
    pub fn user_info(&self) -> Result<Identity, ApiError> {
        let response = self
            .with_cookie(self.session_agent.get(&self.url("/api/user-info")))
            .call()?;
        let body = read_json(response)?;
        serde_json::from_value(body).map_err(ApiError::decode)
    }

    /// Ends the server-side session. Any answer below 400 counts as success,
    /// including the redirect the backend sends towards its web frontend,
    /// which is not followed.
    pub fn logout(&self) -> Result<(), ApiError> {
        let request = self
            .session_agent
            .get(&self.url("/logout"))
            .config()
            .max_redirects(0)
            .build();
        let mut response = self.with_cookie(request).call()?;
        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(ApiError::Status {
                status,
                message: error_message(&body),
            });
        }
        Ok(())
    }

    /// Opens the camera feed. The returned reader yields frames until the
    /// server closes the connection or `shutdown` is closed.
    pub fn open_video_feed(
        &self,
        shutdown: &FeedShutdown,
    ) -> Result<MjpegReader<ureq::BodyReader<'static>>, ApiError> {
        let agent = feed_agent(self.stream_config.clone(), shutdown);
        let mut response = self
            .with_cookie(agent.get(&self.url("/api/video-feed")))
            .call()?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(ApiError::Status {
                status,
                message: error_message(&body),
            });
        }

        let boundary = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .and_then(boundary_from_content_type)
            .unwrap_or_else(|| DEFAULT_BOUNDARY.to_string());

        Ok(MjpegReader::new(response.into_body().into_reader(), &boundary))
    }

    /// Uploads a PDF resume and returns the keywords extracted from it.
    pub fn upload_resume(&self, path: &Path) -> Result<ResumeAnalysis, ApiError> {
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(ApiError::InvalidInput {
                message: "Please upload a PDF file".to_string(),
            });
        }

        let contents = std::fs::read(path).map_err(|e| ApiError::InvalidInput {
            message: format!("Cannot read {}: {}", path.display(), e),
        })?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("resume.pdf");

        let boundary = format!("interview-coach-{}", uuid::Uuid::new_v4().simple());
        let body = multipart_file_body(&boundary, "resume", filename, "application/pdf", &contents);

        let response = self
            .with_cookie(self.agent.post(&self.url("/api/upload-resume")))
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={}", boundary),
            )
            .send(&body[..])?;
        let body = read_json(response)?;
        serde_json::from_value(body).map_err(ApiError::decode)
    }

    /// Generates a question set. Returns the raw response, which carries the
    /// `session_id` and the categorized `questions`.
    pub fn generate_questions(&self, request: &QuestionRequest) -> Result<Value, ApiError> {
        let payload = serde_json::to_value(request).map_err(ApiError::decode)?;
        self.post_json("/api/generate-questions", &payload)
    }

    pub fn submit_answer(
        &self,
        session_id: i64,
        question_index: usize,
        answer: &str,
    ) -> Result<(), ApiError> {
        let payload = serde_json::json!({
            "session_id": session_id,
            "question_index": question_index,
            "answer": answer,
        });
        self.post_json("/api/submit-answer", &payload)?;
        Ok(())
    }

    /// Closes the interview and returns the scored feedback object.
    pub fn complete_interview(&self, session_id: i64) -> Result<Value, ApiError> {
        let payload = serde_json::json!({ "session_id": session_id });
        let mut response = self.post_json("/api/complete-interview", &payload)?;
        match response.get_mut("feedback").map(Value::take) {
            Some(feedback) if feedback.is_object() => Ok(feedback),
            _ => Err(ApiError::decode("response has no feedback object")),
        }
    }

    fn post_json(&self, path: &str, payload: &Value) -> Result<Value, ApiError> {
        let body = serde_json::to_string(payload).map_err(ApiError::decode)?;
        let response = self
            .with_cookie(self.agent.post(&self.url(path)))
            .header("Content-Type", "application/json")
            .send(&body)?;
        read_json(response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_cookie<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        match &self.session_cookie {
            Some(cookie) => request.header("Cookie", cookie),
            None => request,
        }
    }
}

/// Reads a JSON body, turning non-2xx answers into [`ApiError::Status`].
fn read_json(mut response: Response) -> Result<Value, ApiError> {
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(ApiError::transport)?;

    if !(200..300).contains(&status) {
        return Err(ApiError::Status {
            status,
            message: error_message(&body),
        });
    }
    serde_json::from_str(&body).map_err(ApiError::decode)
}

/// Pulls the backend's `{"error": "..."}` message out of a failed response,
/// falling back to the start of the raw body.
fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(message) = json.get("error").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no details".to_string();
    }
    trimmed.chars().take(MAX_ERROR_CHARS).collect()
}

fn multipart_file_body(
    boundary: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    contents: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(contents.len() + 256);
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            boundary,
            field,
            filename.replace('"', "_"),
            content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
