use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ────────────────────────────────────────────────────────────────────────────
// Wire shapes
// ────────────────────────────────────────────────────────────────────────────

/// A job exactly as the scraping backend returns it. Every field is optional;
/// defaults are applied once by the normalizer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJob {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub firm: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub salary: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub deadline: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub practice_area: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub class_year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub posting_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_favorite: Option<bool>,
}

/// One page of jobs plus the server's pagination counters.
///
/// Field aliases cover the camelCase variants some endpoints still emit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPagePayload {
    #[serde(default, alias = "data")]
    pub jobs: Vec<RawJob>,
    #[serde(default, alias = "totalJobs")]
    pub total_jobs: Option<u64>,
    #[serde(default, alias = "newJobs24h")]
    pub new_jobs_24h: Option<u64>,
    #[serde(default, alias = "lastUpdated")]
    pub last_updated: Option<String>,
    #[serde(default, alias = "currentPage")]
    pub page: Option<u32>,
    #[serde(default, alias = "pageSize")]
    pub page_size: Option<u32>,
}

impl JobPagePayload {
    pub fn meta(&self) -> PageMeta {
        let defaults = PageMeta::default();
        PageMeta {
            total_count: self.total_jobs.unwrap_or(defaults.total_count),
            current_page: self.page.filter(|p| *p >= 1).unwrap_or(defaults.current_page),
            page_size: self.page_size.filter(|s| *s >= 1).unwrap_or(defaults.page_size),
            new_count: self.new_jobs_24h.unwrap_or(defaults.new_count),
            last_updated_at: self.last_updated.clone(),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Accepts `true`, non-zero numbers and `"true"`/`"1"`/`"yes"` as set.
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => Some(n.as_f64().is_some_and(|n| n != 0.0)),
        Some(Value::String(s)) => {
            let s = s.trim().to_ascii_lowercase();
            Some(matches!(s.as_str(), "true" | "1" | "yes"))
        }
        _ => None,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Canonical shapes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Summer Internship")]
    SummerInternship,
    Program,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::SummerInternship => "Summer Internship",
            JobType::Program => "Program",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single in-memory job shape every consumer reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub firm_name: String,
    pub job_title: String,
    pub location: String,
    pub salary: Option<String>,
    pub application_deadline: Option<NaiveDate>,
    pub job_description: String,
    pub job_type: JobType,
    pub area_of_law: Option<String>,
    pub job_url: String,
    pub source_url: String,
    pub state: String,
    pub class_year: String,
    pub posting_date: String,
    pub created_at: String,
    pub is_favorite: bool,
}

/// Pagination counters committed alongside each job page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total_count: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub new_count: u64,
    pub last_updated_at: Option<String>,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            total_count: 0,
            current_page: 1,
            page_size: crate::config::DEFAULT_PAGE_SIZE,
            new_count: 0,
            last_updated_at: None,
        }
    }
}
