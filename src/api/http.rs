//! HTTP implementation of [`GradingApi`].
//!
//! `ureq` is a blocking client, so every call runs inside
//! `tokio::task::spawn_blocking`; the async seam above it stays free of
//! blocking I/O.

use std::time::Duration;

use tracing::debug;

use crate::config::AppConfig;
use crate::errors::{GradebookError, Result};
use crate::models::ApiResponse;
use crate::models::{
    grades::{entities::StudentGradesSnapshot, requests::RecordAssessmentRequest},
    students::{entities::Student, responses::StudentListData},
    terms::entities::Term,
};

use super::GradingApi;

pub struct HttpGradingApi {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpGradingApi {
    pub fn from_config() -> Result<Self> {
        let config = AppConfig::get();
        Ok(Self::new(
            &config.api.base_url,
            Duration::from_secs(config.api.connect_timeout),
            Duration::from_secs(config.api.request_timeout),
        ))
    }

    pub fn new(base_url: &str, connect_timeout: Duration, request_timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout_read(request_timeout)
            .timeout_write(request_timeout)
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Run a blocking request off the async runtime and decode the Athena
    /// envelope.
    async fn execute_envelope<T>(
        &self,
        request: impl FnOnce(&ureq::Agent) -> std::result::Result<ureq::Response, ureq::Error>
        + Send
        + 'static,
        fallback: &'static str,
    ) -> Result<ApiResponse<T>>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || decode(request(&agent), fallback))
            .await
            .map_err(|e| GradebookError::network(format!("Request task failed: {e}")))?
    }

    /// As [`Self::execute_envelope`], unwrapping the payload.
    async fn execute<T>(
        &self,
        request: impl FnOnce(&ureq::Agent) -> std::result::Result<ureq::Response, ureq::Error>
        + Send
        + 'static,
        fallback: &'static str,
    ) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        self.execute_envelope(request, fallback)
            .await?
            .into_data(fallback)
    }
}

/// Turn a ureq result into a decoded envelope. Non-2xx responses still
/// carry an envelope whose `message` is the user-visible error text.
fn decode<T>(
    result: std::result::Result<ureq::Response, ureq::Error>,
    fallback: &'static str,
) -> Result<ApiResponse<T>>
where
    T: serde::de::DeserializeOwned,
{
    match result {
        Ok(response) => response
            .into_json::<ApiResponse<T>>()
            .map_err(|e| GradebookError::serialization(format!("Malformed response: {e}"))),
        Err(ureq::Error::Status(code, response)) => {
            debug!("Request failed with HTTP {code}");
            match response.into_json::<ApiResponse<T>>() {
                Ok(envelope) => {
                    let reason = envelope
                        .message
                        .unwrap_or_else(|| format!("{fallback} (HTTP {code})"));
                    Err(GradebookError::server_rejected(reason))
                }
                Err(_) => Err(GradebookError::server_rejected(format!(
                    "{fallback} (HTTP {code})"
                ))),
            }
        }
        Err(ureq::Error::Transport(transport)) => {
            Err(GradebookError::network(transport.to_string()))
        }
    }
}

#[async_trait::async_trait]
impl GradingApi for HttpGradingApi {
    async fn record_assessment(&self, request: RecordAssessmentRequest) -> Result<()> {
        let url = self.url("/grading/assessments/record");
        let payload = serde_json::to_value(&request)?;
        debug!(
            "Recording {} assessment: week {}, score {}",
            request.assessment_type, request.week, request.score
        );
        self.execute_envelope::<serde_json::Value>(
            move |agent| agent.post(&url).send_json(payload),
            "Failed to record assessment",
        )
        .await?
        .ensure_success("Failed to record assessment")
    }

    async fn student_grades(
        &self,
        student_id: &str,
        term_id: &str,
    ) -> Result<StudentGradesSnapshot> {
        let url = self.url(&format!("/grading/students/{student_id}/assessments/{term_id}"));
        self.execute(
            move |agent| agent.get(&url).call(),
            "Failed to fetch student grades",
        )
        .await
    }

    async fn active_term_by_school(&self, school_id: &str) -> Result<Term> {
        let url = self.url(&format!("/terms/active/school/{school_id}"));
        self.execute(
            move |agent| agent.get(&url).call(),
            "Failed to fetch active term for school",
        )
        .await
    }

    async fn students_by_school(&self, school_id: &str) -> Result<Vec<Student>> {
        let url = self.url(&format!("/students/school/{school_id}"));
        let data: StudentListData = self
            .execute(
                move |agent| agent.get(&url).call(),
                "Failed to fetch students",
            )
            .await?;
        Ok(data.students)
    }
}
