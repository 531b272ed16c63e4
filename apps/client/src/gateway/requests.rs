//! Request bodies and query builders for every backend operation.
//!
//! Client-side validation lives here so a bad request is rejected before a
//! single byte goes over the wire.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::errors::GatewayError;

const MIN_PASSWORD_LEN: usize = 6;

// ────────────────────────────────────────────────────────────────────────────
// Authentication
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Authorization code handed back by the federated provider.
#[derive(Debug, Clone, Serialize)]
pub struct CodeExchangeRequest {
    pub code: String,
}

/// What the sign-up form collects. Converted into a `RegisterRequest` only
/// after `validate` passes.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<RegisterRequest, GatewayError> {
        if self.full_name.trim().is_empty() {
            return Err(GatewayError::validation("Name is required"));
        }
        if self.email.trim().is_empty() {
            return Err(GatewayError::validation("Email is required"));
        }
        if self.password != self.confirm_password {
            return Err(GatewayError::validation("Passwords do not match"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(GatewayError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(RegisterRequest {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub user_id: String,
    pub feedback_type: String,
    pub user_feedback: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }
}

/// Server-side job search. Empty filters are left out of the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub page: u32,
    pub page_size: u32,
    pub state: Option<String>,
    pub practice_area: Option<String>,
    pub year_eligibility: Option<String>,
    pub search_term: Option<String>,
    pub firm: Option<String>,
    pub sort_by: SortOrder,
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            state: None,
            practice_area: None,
            year_eligibility: None,
            search_term: None,
            firm: None,
            sort_by: SortOrder::Newest,
        }
    }
}

impl JobQuery {
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.page < 1 {
            return Err(GatewayError::validation("Page must be at least 1"));
        }
        if self.page_size < 1 {
            return Err(GatewayError::validation("Page size must be at least 1"));
        }
        Ok(())
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        let optional = [
            ("state", &self.state),
            ("practice", &self.practice_area),
            ("year_eligibility", &self.year_eligibility),
            ("query", &self.search_term),
            ("firm", &self.firm),
        ];
        for (key, value) in optional {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        }
        pairs.push(("sort_by", self.sort_by.as_str().to_string()));
        pairs
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteToggle {
    pub user_id: String,
    pub job_id: String,
    pub is_favorite: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Resume & AI
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Confident,
    Enthusiastic,
    Friendly,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Confident => "confident",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Friendly => "friendly",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body shared by generate and regenerate cover letter.
#[derive(Debug, Clone, Serialize)]
pub struct CoverLetterRequest {
    pub resume_text: String,
    pub job_description: String,
    pub job_title: String,
    pub company: String,
    pub tone: Tone,
}

impl CoverLetterRequest {
    pub fn new(resume_text: impl Into<String>, job_description: impl Into<String>) -> Self {
        Self {
            resume_text: resume_text.into(),
            job_description: job_description.into(),
            job_title: "Applicant".to_string(),
            company: "Company".to_string(),
            tone: Tone::default(),
        }
    }

    /// Blank title or company fall back to the generic defaults.
    pub fn for_job(mut self, job_title: &str, company: &str) -> Self {
        if !job_title.trim().is_empty() {
            self.job_title = job_title.trim().to_string();
        }
        if !company.trim().is_empty() {
            self.company = company.trim().to_string();
        }
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.resume_text.trim().is_empty() {
            return Err(GatewayError::validation("Please upload a resume first"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateBulletsRequest {
    pub role: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImproveBulletRequest {
    pub bullet_text: String,
    pub job_title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBulletRequest {
    pub job_title: String,
    pub company: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewriteRequest {
    pub resume_text: String,
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// PDF export
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct HtmlPdfRequest {
    pub html: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
}

impl HtmlPdfRequest {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            file_name: "resume".to_string(),
        }
    }

    pub fn named(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

/// Structured resume rendered server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePdfRequest {
    pub personal_info: Value,
    pub summary: String,
    pub experience: Vec<Value>,
    pub education: Vec<Value>,
    pub skills: Vec<String>,
    pub file_name: String,
}

impl Default for ResumePdfRequest {
    fn default() -> Self {
        Self {
            personal_info: Value::Object(Default::default()),
            summary: String::new(),
            experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            file_name: "resume".to_string(),
        }
    }
}

/// Download name for an exported cover letter: lowercase, whitespace runs
/// become `_`, anything outside `[a-z0-9_]` is dropped.
pub fn pdf_file_stem(job_title: &str, company: &str) -> String {
    let raw = format!("{} {}", job_title.trim(), company.trim()).to_lowercase();
    let mut stem = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.trim().chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            stem.push(c);
        }
    }
    if stem.trim_matches('_').is_empty() {
        "cover_letter".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;

    fn form(password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            full_name: "Ada Lovelace".into(),
            email: "ada@law.edu".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn test_registration_mismatch_rejected() {
        let err = form("secret1", "secret2").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_registration_short_password_rejected() {
        let err = form("abc", "abc").validate().unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }

    #[test]
    fn test_registration_requires_name_and_email() {
        let mut f = form("secret1", "secret1");
        f.full_name = "  ".into();
        assert!(f.validate().is_err());
        let mut f = form("secret1", "secret1");
        f.email.clear();
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_registration_valid_form_serializes() {
        let req = form("secret1", "secret1").validate().unwrap();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"full_name": "Ada Lovelace", "email": "ada@law.edu", "password": "secret1"})
        );
    }

    #[test]
    fn test_query_pairs_omit_empty_filters() {
        let query = JobQuery {
            state: Some("Georgia".into()),
            practice_area: Some("".into()),
            search_term: Some("  ".into()),
            firm: Some("Cravath".into()),
            ..JobQuery::page(2, 20)
        };
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("page_size", "20".to_string()),
                ("state", "Georgia".to_string()),
                ("firm", "Cravath".to_string()),
                ("sort_by", "newest".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_uses_backend_key_names() {
        let query = JobQuery {
            practice_area: Some("Tax".into()),
            search_term: Some("summer".into()),
            year_eligibility: Some("1L".into()),
            sort_by: SortOrder::Oldest,
            ..JobQuery::default()
        };
        let pairs = query.to_query_pairs();
        assert!(pairs.contains(&("practice", "Tax".to_string())));
        assert!(pairs.contains(&("query", "summer".to_string())));
        assert!(pairs.contains(&("year_eligibility", "1L".to_string())));
        assert!(pairs.contains(&("sort_by", "oldest".to_string())));
    }

    #[test]
    fn test_query_validation() {
        assert!(JobQuery::default().validate().is_ok());
        assert!(JobQuery::page(0, 9).validate().is_err());
        assert!(JobQuery::page(1, 0).validate().is_err());
    }

    #[test]
    fn test_cover_letter_defaults() {
        let req = CoverLetterRequest::new("resume", "jd").for_job(" ", "");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "resume_text": "resume",
                "job_description": "jd",
                "job_title": "Applicant",
                "company": "Company",
                "tone": "professional"
            })
        );
        let req = req.for_job("Summer Associate", "Cravath").with_tone(Tone::Friendly);
        assert_eq!(req.job_title, "Summer Associate");
        assert_eq!(serde_json::to_value(req.tone).unwrap(), json!("friendly"));
    }

    #[test]
    fn test_cover_letter_requires_resume_text() {
        let err = CoverLetterRequest::new("  ", "jd").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_feedback_is_camel_case() {
        let req = FeedbackRequest {
            user_id: "7".into(),
            feedback_type: "bug".into(),
            user_feedback: "Filters reset".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"userId": "7", "feedbackType": "bug", "userFeedback": "Filters reset"})
        );
    }

    #[test]
    fn test_pdf_request_shapes() {
        let html = serde_json::to_value(HtmlPdfRequest::new("<p>x</p>")).unwrap();
        assert_eq!(html, json!({"html": "<p>x</p>", "fileName": "resume"}));

        let structured = serde_json::to_value(ResumePdfRequest::default()).unwrap();
        assert_eq!(structured["fileName"], "resume");
        assert!(structured.get("personalInfo").is_some());
    }

    #[test]
    fn test_pdf_file_stem() {
        assert_eq!(
            pdf_file_stem("Summer Associate", "King & Spalding"),
            "summer_associate_king__spalding"
        );
        assert_eq!(pdf_file_stem("1L  Fellow", "A.B.C"), "1l_fellow_abc");
        assert_eq!(pdf_file_stem("", ""), "cover_letter");
        assert_eq!(pdf_file_stem("&&", "!!"), "cover_letter");
    }
}
