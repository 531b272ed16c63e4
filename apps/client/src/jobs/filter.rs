//! Client-side filtering and pagination over the held job collection.
//!
//! Everything here is pure: the store calls `derive_page` whenever the
//! collection or the selection changes.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PAGE_SIZE;
use crate::jobs::locations::resolve_state;
use crate::models::JobRecord;

/// Dropdown value that disables a filter.
pub const ALL: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub search_text: String,
    pub state: String,
    pub practice_area: String,
    pub year_eligibility: String,
    pub firm: String,
    pub page_number: u32,
    pub page_size: u32,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            state: String::new(),
            practice_area: String::new(),
            year_eligibility: String::new(),
            firm: String::new(),
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A single edit to the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    SearchText(String),
    State(String),
    PracticeArea(String),
    YearEligibility(String),
    Firm(String),
    PageSize(u32),
    Page(u32),
}

impl FilterSelection {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// Applies a change. Anything other than a page change sends the user
    /// back to page 1.
    pub fn apply(&mut self, change: FilterChange) {
        match change {
            FilterChange::Page(page) => {
                self.page_number = page.max(1);
                return;
            }
            FilterChange::SearchText(v) => self.search_text = v,
            FilterChange::State(v) => self.state = v,
            FilterChange::PracticeArea(v) => self.practice_area = v,
            FilterChange::YearEligibility(v) => self.year_eligibility = v,
            FilterChange::Firm(v) => self.firm = v,
            FilterChange::PageSize(size) => self.page_size = size.max(1),
        }
        self.page_number = 1;
    }
}

/// One page of the filtered collection.
#[derive(Debug, Clone, PartialEq)]
pub struct VisiblePage {
    pub jobs: Vec<JobRecord>,
    pub total_matching: usize,
    pub total_pages: usize,
    pub page_number: u32,
    pub page_size: u32,
}

impl VisiblePage {
    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        (self.page_number as usize) < self.total_pages
    }
}

fn is_active(value: &str) -> bool {
    !value.is_empty() && value != ALL
}

/// True when the job passes every active filter (logical AND).
pub fn matches(job: &JobRecord, selection: &FilterSelection) -> bool {
    let search = selection.search_text.to_lowercase();
    let matches_search = search.is_empty()
        || job.job_title.to_lowercase().contains(&search)
        || job.firm_name.to_lowercase().contains(&search)
        || job.job_description.to_lowercase().contains(&search);

    let matches_state =
        !is_active(&selection.state) || resolve_state(&job.location) == Some(selection.state.as_str());

    let matches_area = !is_active(&selection.practice_area)
        || job
            .area_of_law
            .as_deref()
            .is_some_and(|area| area.to_lowercase().contains(&selection.practice_area.to_lowercase()));

    let matches_year = !is_active(&selection.year_eligibility)
        || job
            .class_year
            .to_lowercase()
            .contains(&selection.year_eligibility.to_lowercase());

    let matches_firm = !is_active(&selection.firm) || job.firm_name == selection.firm;

    matches_search && matches_state && matches_area && matches_year && matches_firm
}

/// Filters, then slices `[(page-1)*size, page*size)`. Pages past the end are
/// empty rather than clamped.
pub fn derive_page(jobs: &[JobRecord], selection: &FilterSelection) -> VisiblePage {
    let page_size = selection.page_size.max(1);
    let page_number = selection.page_number.max(1);

    let matching: Vec<&JobRecord> = jobs.iter().filter(|j| matches(j, selection)).collect();
    let total_matching = matching.len();
    let total_pages = total_matching.div_ceil(page_size as usize);

    let start = (page_number as usize - 1).saturating_mul(page_size as usize);
    let page_jobs = matching
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .cloned()
        .collect();

    VisiblePage {
        jobs: page_jobs,
        total_matching,
        total_pages,
        page_number,
        page_size,
    }
}

pub fn derive_visible(jobs: &[JobRecord], selection: &FilterSelection) -> Vec<JobRecord> {
    derive_page(jobs, selection).jobs
}

/// Sorted, de-duplicated states that at least one job resolves to.
pub fn state_options(jobs: &[JobRecord]) -> Vec<&'static str> {
    jobs.iter()
        .filter_map(|j| resolve_state(&j.location))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, de-duplicated practice areas, splitting multi-value fields on
/// `,` and `/`.
pub fn practice_area_options(jobs: &[JobRecord]) -> Vec<String> {
    jobs.iter()
        .filter_map(|j| j.area_of_law.as_deref())
        .flat_map(|area| area.split([',', '/']))
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// A deadline is urgent when it falls within the next seven days.
pub fn is_deadline_urgent(deadline: Option<NaiveDate>, today: NaiveDate) -> bool {
    deadline.is_some_and(|d| {
        let days = (d - today).num_days();
        days > 0 && days <= 7
    })
}
