use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A resume file picked by the user, held in memory until uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Best-effort MIME type from the file extension.
    pub fn mime_type(&self) -> &'static str {
        let lower = self.file_name.to_lowercase();
        if lower.ends_with(".pdf") {
            "application/pdf"
        } else if lower.ends_with(".docx") {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        } else if lower.ends_with(".doc") {
            "application/msword"
        } else if lower.ends_with(".txt") {
            "text/plain"
        } else {
            "application/octet-stream"
        }
    }
}

/// The resume the user is working with during a browsing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TempResume {
    pub file: Option<ResumeFile>,
    pub extracted_text: String,
    pub remote_url: Option<String>,
}

impl TempResume {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            extracted_text: text.into(),
            ..Default::default()
        }
    }

    pub fn has_text(&self) -> bool {
        !self.extracted_text.trim().is_empty()
    }
}

/// Result of a resume upload: the parsed structure and where the file lives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedResume {
    pub parsed: Value,
    pub file_url: Option<String>,
}

impl UploadedResume {
    /// Accepts `{parsed_data, file_url}` or a bare parsed structure.
    pub fn from_payload(payload: Value) -> Self {
        let file_url = ["file_url", "fileUrl", "url"]
            .iter()
            .find_map(|k| payload.get(*k).and_then(Value::as_str))
            .map(str::to_string);
        let parsed = payload.get("parsed_data").cloned().unwrap_or(payload);
        Self { parsed, file_url }
    }
}

/// Cover-letter endpoints answer either `{cover_letter}` or a bare string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CoverLetterPayload {
    Wrapped { cover_letter: String },
    Plain(String),
}

impl CoverLetterPayload {
    pub fn into_text(self) -> String {
        match self {
            CoverLetterPayload::Wrapped { cover_letter } => cover_letter,
            CoverLetterPayload::Plain(text) => text,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulletsPayload {
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImprovedBulletPayload {
    pub improved_bullet: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBulletPayload {
    pub bullet: Option<String>,
}

/// Unwraps `{rewritten_resume}` if present, otherwise keeps the whole body.
pub fn rewritten_resume(payload: Value) -> Value {
    payload.get("rewritten_resume").cloned().unwrap_or(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uploaded_resume_unwraps_parsed_data() {
        let uploaded = UploadedResume::from_payload(json!({
            "parsed_data": {"name": "Ada"},
            "file_url": "https://files.test/r.pdf"
        }));
        assert_eq!(uploaded.parsed, json!({"name": "Ada"}));
        assert_eq!(uploaded.file_url.as_deref(), Some("https://files.test/r.pdf"));
    }

    #[test]
    fn test_uploaded_resume_keeps_bare_payload() {
        let uploaded = UploadedResume::from_payload(json!({"name": "Ada"}));
        assert_eq!(uploaded.parsed, json!({"name": "Ada"}));
        assert!(uploaded.file_url.is_none());
    }

    #[test]
    fn test_cover_letter_payload_shapes() {
        let wrapped: CoverLetterPayload =
            serde_json::from_value(json!({"cover_letter": "Dear Hiring Partner"})).unwrap();
        assert_eq!(wrapped.into_text(), "Dear Hiring Partner");

        let plain: CoverLetterPayload = serde_json::from_value(json!("Dear Recruiter")).unwrap();
        assert_eq!(plain.into_text(), "Dear Recruiter");
    }

    #[test]
    fn test_rewritten_resume_unwrap() {
        assert_eq!(
            rewritten_resume(json!({"rewritten_resume": {"summary": "s"}})),
            json!({"summary": "s"})
        );
        assert_eq!(rewritten_resume(json!({"summary": "s"})), json!({"summary": "s"}));
    }

    #[test]
    fn test_temp_resume_has_text() {
        assert!(!TempResume::default().has_text());
        assert!(!TempResume::from_text("   ").has_text());
        assert!(TempResume::from_text("J.D. Candidate").has_text());
    }

    #[test]
    fn test_mime_type_by_extension() {
        assert_eq!(ResumeFile::new("CV.PDF", Vec::<u8>::new()).mime_type(), "application/pdf");
        assert_eq!(ResumeFile::new("cv.bin", Vec::<u8>::new()).mime_type(), "application/octet-stream");
    }
}
