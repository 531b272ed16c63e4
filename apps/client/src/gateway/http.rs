//! `Gateway` over HTTP with `reqwest`.
//!
//! Single attempt per call, no retries. Failures are classified once here:
//! transport → `Network`, non-2xx → `Server` with the body's `message` or the
//! operation's fallback text, undecodable 2xx → `Server` "Malformed response".

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::requests::{
    CodeExchangeRequest, CoverLetterRequest, FavoriteToggle, FeedbackRequest,
    GenerateBulletsRequest, HtmlPdfRequest, ImproveBulletRequest, JobQuery, LoginRequest,
    NewBulletRequest, RegisterRequest, ResumePdfRequest, RewriteRequest,
};
use super::Gateway;
use crate::config::Config;
use crate::errors::GatewayError;
use crate::models::job::JobPagePayload;
use crate::models::resume::{
    rewritten_resume, BulletsPayload, CoverLetterPayload, ImprovedBulletPayload,
    NewBulletPayload,
};
use crate::models::{AuthPayload, ResumeFile, Session, UploadedResume, User};

const PDF_MIME: &str = "application/pdf";

/// Filter metadata endpoints each answer with one of these keys.
#[derive(Debug, Default, Deserialize)]
struct MetadataPayload {
    #[serde(default)]
    states: Vec<String>,
    #[serde(default)]
    firms: Vec<String>,
    #[serde(default)]
    practices: Vec<String>,
}

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// `timeout` of `None` leaves the transport default (no deadline).
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        Self::new(config.api_base_url.clone(), config.http_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and turns any non-2xx status into a `Server` error.
    async fn send(&self, request: RequestBuilder, fallback: &str) -> Result<Response, GatewayError> {
        let response = request.send().await.map_err(|e| {
            warn!("Request failed before a response arrived: {e}");
            GatewayError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = GatewayError::from_response(status.as_u16(), &body, fallback);
        warn!("Backend returned {}: {}", status.as_u16(), err);
        Err(err)
    }

    async fn json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, GatewayError> {
        let response = self.send(request, fallback).await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| GatewayError::malformed(status, e))
    }

    /// Acknowledgement bodies are informational; an empty one reads as `null`.
    async fn ack(&self, request: RequestBuilder, fallback: &str) -> Result<Value, GatewayError> {
        let response = self.send(request, fallback).await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|e| GatewayError::malformed(status, e))
    }

    async fn pdf(&self, request: RequestBuilder, fallback: &str) -> Result<Bytes, GatewayError> {
        let response = self.send(request.header(ACCEPT, PDF_MIME), fallback).await?;
        Ok(response.bytes().await?)
    }

    async fn authenticate<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<Session, GatewayError> {
        debug!("POST {path}");
        let payload: AuthPayload = self
            .json(self.client.post(self.url(path)).json(body), fallback)
            .await?;
        payload.into_session()
    }

    async fn metadata(&self, path: &str, fallback: &str) -> Result<MetadataPayload, GatewayError> {
        debug!("GET {path}");
        self.json(self.client.get(self.url(path)), fallback).await
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn login(&self, req: &LoginRequest) -> Result<Session, GatewayError> {
        self.authenticate("/users/login", req, "Login failed").await
    }

    async fn google_login(&self, req: &CodeExchangeRequest) -> Result<Session, GatewayError> {
        self.authenticate("/users/google-code-login", req, "Google login failed")
            .await
    }

    async fn register(&self, req: &RegisterRequest) -> Result<Session, GatewayError> {
        self.authenticate("/users/register", req, "Registration failed")
            .await
    }

    async fn fetch_user(&self, user_id: &str) -> Result<User, GatewayError> {
        debug!("GET /users/{user_id}");
        let payload: AuthPayload = self
            .json(
                self.client.get(self.url(&format!("/users/{user_id}"))),
                "Failed to fetch user",
            )
            .await?;
        payload
            .user
            .or(payload.data)
            .filter(User::is_present)
            .ok_or_else(|| GatewayError::malformed(200, "missing user"))
    }

    async fn submit_feedback(&self, req: &FeedbackRequest) -> Result<Value, GatewayError> {
        debug!("POST /users/userfeedback");
        self.ack(
            self.client.post(self.url("/users/userfeedback")).json(req),
            "Failed to submit feedback",
        )
        .await
    }

    async fn fetch_jobs(&self, query: &JobQuery) -> Result<JobPagePayload, GatewayError> {
        query.validate()?;
        debug!("GET /scraping/jobs page={} size={}", query.page, query.page_size);
        self.json(
            self.client
                .get(self.url("/scraping/jobs"))
                .query(&query.to_query_pairs()),
            "Failed to fetch jobs",
        )
        .await
    }

    async fn fetch_favorite_jobs(&self, user_id: &str) -> Result<JobPagePayload, GatewayError> {
        debug!("GET /users/{user_id}/favorite-jobs");
        self.json(
            self.client
                .get(self.url(&format!("/users/{user_id}/favorite-jobs"))),
            "Failed to fetch favorite jobs",
        )
        .await
    }

    async fn toggle_favorite(&self, req: &FavoriteToggle) -> Result<Value, GatewayError> {
        debug!("POST /users/favorite-jobs job={}", req.job_id);
        self.ack(
            self.client.post(self.url("/users/favorite-jobs")).json(req),
            "Failed to update favorite",
        )
        .await
    }

    async fn trigger_scraping(&self) -> Result<Value, GatewayError> {
        debug!("POST /scraping/trigger");
        self.ack(
            self.client.post(self.url("/scraping/trigger")),
            "Failed to trigger scraping",
        )
        .await
    }

    async fn upload_resume(&self, file: &ResumeFile) -> Result<UploadedResume, GatewayError> {
        debug!("POST /resume/upload ({} bytes)", file.bytes.len());
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(file.mime_type())?;
        let payload: Value = self
            .json(
                self.client
                    .post(self.url("/resume/upload"))
                    .multipart(Form::new().part("file", part)),
                "File upload failed",
            )
            .await?;
        Ok(UploadedResume::from_payload(payload))
    }

    async fn generate_bullets(
        &self,
        req: &GenerateBulletsRequest,
    ) -> Result<Vec<String>, GatewayError> {
        debug!("POST /resume/generate-bullets");
        let payload: BulletsPayload = self
            .json(
                self.client.post(self.url("/resume/generate-bullets")).json(req),
                "Failed to generate bullets",
            )
            .await?;
        Ok(payload.bullets)
    }

    async fn improve_bullet(&self, req: &ImproveBulletRequest) -> Result<String, GatewayError> {
        debug!("POST /resume/improve-bullet");
        let payload: ImprovedBulletPayload = self
            .json(
                self.client.post(self.url("/resume/improve-bullet")).json(req),
                "Failed to improve bullet",
            )
            .await?;
        payload
            .improved_bullet
            .ok_or_else(|| GatewayError::malformed(200, "missing improved_bullet"))
    }

    async fn generate_new_bullet(&self, req: &NewBulletRequest) -> Result<String, GatewayError> {
        debug!("POST /resume/generate-new-bullet");
        let payload: NewBulletPayload = self
            .json(
                self.client
                    .post(self.url("/resume/generate-new-bullet"))
                    .json(req),
                "Failed to generate new bullet",
            )
            .await?;
        payload
            .bullet
            .ok_or_else(|| GatewayError::malformed(200, "missing bullet"))
    }

    async fn generate_cover_letter(
        &self,
        req: &CoverLetterRequest,
    ) -> Result<String, GatewayError> {
        debug!("POST /resume/generate-cover-letter tone={}", req.tone);
        let payload: CoverLetterPayload = self
            .json(
                self.client
                    .post(self.url("/resume/generate-cover-letter"))
                    .json(req),
                "Failed to generate cover letter",
            )
            .await?;
        Ok(payload.into_text())
    }

    async fn regenerate_cover_letter(
        &self,
        req: &CoverLetterRequest,
    ) -> Result<String, GatewayError> {
        debug!("POST /resume/regenerate-cover-letter tone={}", req.tone);
        let payload: CoverLetterPayload = self
            .json(
                self.client
                    .post(self.url("/resume/regenerate-cover-letter"))
                    .json(req),
                "Failed to regenerate cover letter",
            )
            .await?;
        Ok(payload.into_text())
    }

    async fn rewrite_resume(&self, req: &RewriteRequest) -> Result<Value, GatewayError> {
        debug!("POST /resume/rewrite");
        let payload: Value = self
            .json(
                self.client.post(self.url("/resume/rewrite")).json(req),
                "Failed to rewrite resume",
            )
            .await?;
        Ok(rewritten_resume(payload))
    }

    async fn export_pdf(&self, req: &HtmlPdfRequest) -> Result<Bytes, GatewayError> {
        debug!("POST /pdf/export file={}", req.file_name);
        self.pdf(
            self.client.post(self.url("/pdf/export")).json(req),
            "Failed to export PDF",
        )
        .await
    }

    async fn export_resume_pdf(&self, req: &ResumePdfRequest) -> Result<Bytes, GatewayError> {
        debug!("POST /pdf/resume-export file={}", req.file_name);
        self.pdf(
            self.client.post(self.url("/pdf/resume-export")).json(req),
            "Failed to export resume PDF",
        )
        .await
    }

    async fn fetch_states(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self
            .metadata("/scraping/states", "Failed to fetch states")
            .await?
            .states)
    }

    async fn fetch_firms(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self
            .metadata("/scraping/firms", "Failed to fetch firms")
            .await?
            .firms)
    }

    async fn fetch_practice_areas(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self
            .metadata("/scraping/practices", "Failed to fetch practice areas")
            .await?
            .practices)
    }
}
