//! Maps raw scraping-backend jobs into canonical `JobRecord`s.
//!
//! Applied identically to search results and favorites, so mis-scraped rows
//! never reach the store whichever endpoint produced them.

use chrono::{DateTime, NaiveDate};
use tracing::debug;

use crate::models::{JobRecord, JobType, RawJob};

/// Titles containing this (case-insensitive) are scraper noise: postings
/// that explicitly exclude first-year students.
const EXCLUDED_TITLE_FRAGMENT: &str = "no 1l";

/// Returns `None` for rows without a firm or title, or with an excluded title.
pub fn normalize(raw: &RawJob) -> Option<JobRecord> {
    let firm_name = non_blank(raw.firm.as_deref())?;
    let job_title = non_blank(raw.title.as_deref())?;

    let title_lower = job_title.to_lowercase();
    if title_lower.contains(EXCLUDED_TITLE_FRAGMENT) {
        return None;
    }

    let job_type = if title_lower.contains("summer") {
        JobType::SummerInternship
    } else {
        JobType::Program
    };

    Some(JobRecord {
        id: raw
            .id
            .clone()
            .or_else(|| raw.job_id.clone())
            .unwrap_or_default(),
        firm_name: firm_name.to_string(),
        job_title: job_title.to_string(),
        location: text(&raw.location),
        salary: non_blank(raw.salary.as_deref()).map(str::to_string),
        application_deadline: raw.deadline.as_deref().and_then(parse_deadline),
        job_description: text(&raw.description),
        job_type,
        area_of_law: non_blank(raw.practice_area.as_deref()).map(str::to_string),
        job_url: text(&raw.url),
        source_url: text(&raw.source),
        state: text(&raw.state),
        class_year: text(&raw.class_year),
        posting_date: text(&raw.posting_date),
        created_at: text(&raw.created_at),
        is_favorite: raw.is_favorite.unwrap_or(false),
    })
}

/// Normalizes a batch, dropping rejected rows and keeping input order.
pub fn normalize_all(raw_jobs: &[RawJob]) -> Vec<JobRecord> {
    let jobs: Vec<JobRecord> = raw_jobs.iter().filter_map(normalize).collect();
    if jobs.len() != raw_jobs.len() {
        debug!(
            "Normalizer dropped {} of {} jobs",
            raw_jobs.len() - jobs.len(),
            raw_jobs.len()
        );
    }
    jobs
}

/// Accepts `YYYY-MM-DD`, RFC 3339, or a date-time whose first ten characters
/// are a date.
pub fn parse_deadline(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.date_naive()))
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
