//! Remote Gateway: the only code that talks to the backend.
//!
//! `Gateway` is a trait so the store can be driven by `HttpGateway` in
//! production and by a stub in tests. The store holds an `Arc<dyn Gateway>`.

pub mod http;
pub mod requests;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

pub use http::HttpGateway;
pub use requests::{
    pdf_file_stem, CodeExchangeRequest, CoverLetterRequest, FavoriteToggle, FeedbackRequest,
    GenerateBulletsRequest, HtmlPdfRequest, ImproveBulletRequest, JobQuery, LoginRequest,
    NewBulletRequest, RegisterRequest, RegistrationForm, ResumePdfRequest, RewriteRequest,
    SortOrder, Tone,
};

use crate::errors::GatewayError;
use crate::models::job::JobPagePayload;
use crate::models::{ResumeFile, Session, UploadedResume, User};

/// One method per backend operation. Implementations issue exactly one
/// request per call and keep no state between calls.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<Session, GatewayError>;

    async fn google_login(&self, req: &CodeExchangeRequest) -> Result<Session, GatewayError>;

    async fn register(&self, req: &RegisterRequest) -> Result<Session, GatewayError>;

    async fn fetch_user(&self, user_id: &str) -> Result<User, GatewayError>;

    async fn submit_feedback(&self, req: &FeedbackRequest) -> Result<Value, GatewayError>;

    async fn fetch_jobs(&self, query: &JobQuery) -> Result<JobPagePayload, GatewayError>;

    async fn fetch_favorite_jobs(&self, user_id: &str) -> Result<JobPagePayload, GatewayError>;

    async fn toggle_favorite(&self, req: &FavoriteToggle) -> Result<Value, GatewayError>;

    async fn trigger_scraping(&self) -> Result<Value, GatewayError>;

    async fn upload_resume(&self, file: &ResumeFile) -> Result<UploadedResume, GatewayError>;

    async fn generate_bullets(
        &self,
        req: &GenerateBulletsRequest,
    ) -> Result<Vec<String>, GatewayError>;

    async fn improve_bullet(&self, req: &ImproveBulletRequest) -> Result<String, GatewayError>;

    async fn generate_new_bullet(&self, req: &NewBulletRequest) -> Result<String, GatewayError>;

    async fn generate_cover_letter(
        &self,
        req: &CoverLetterRequest,
    ) -> Result<String, GatewayError>;

    async fn regenerate_cover_letter(
        &self,
        req: &CoverLetterRequest,
    ) -> Result<String, GatewayError>;

    async fn rewrite_resume(&self, req: &RewriteRequest) -> Result<Value, GatewayError>;

    async fn export_pdf(&self, req: &HtmlPdfRequest) -> Result<Bytes, GatewayError>;

    async fn export_resume_pdf(&self, req: &ResumePdfRequest) -> Result<Bytes, GatewayError>;

    async fn fetch_states(&self) -> Result<Vec<String>, GatewayError>;

    async fn fetch_firms(&self) -> Result<Vec<String>, GatewayError>;

    async fn fetch_practice_areas(&self) -> Result<Vec<String>, GatewayError>;
}
