//! The client state store.
//!
//! `Store` is an injectable handle: clone it freely, every clone sees the
//! same state. State changes only through the named actions below. Async
//! actions run their gateway call with no lock held, then commit under one
//! short write lock if the lifecycle tracker allows it.

pub mod lifecycle;

use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, info, warn};

pub use lifecycle::{CommitPolicy, LifecycleEntry, LifecycleTracker, Operation, Status, Ticket};

use crate::errors::GatewayError;
use crate::gateway::{
    CodeExchangeRequest, CoverLetterRequest, FavoriteToggle, FeedbackRequest, Gateway,
    GenerateBulletsRequest, HtmlPdfRequest, ImproveBulletRequest, JobQuery, LoginRequest,
    NewBulletRequest, RegistrationForm, ResumePdfRequest, RewriteRequest,
};
use crate::jobs::filter::{derive_page, FilterChange, FilterSelection, VisiblePage};
use crate::jobs::normalizer::normalize_all;
use crate::models::job::JobPagePayload;
use crate::models::{JobRecord, PageMeta, ResumeFile, Session, TempResume, UploadedResume, User};
use crate::session::SessionPersistence;

/// Which listing the held job collection came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobSource {
    #[default]
    Search,
    Favorites,
}

/// Everything the store holds. Handed out only as clones.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub session: Option<Session>,
    pub jobs: Vec<JobRecord>,
    pub job_source: JobSource,
    pub pagination: PageMeta,
    pub selected_job: Option<JobRecord>,
    pub filter: FilterSelection,
    pub temp_resume: TempResume,
    pub uploaded_resume: Option<UploadedResume>,
    pub cover_letter: Option<String>,
    pub generated_bullets: Vec<String>,
    pub improved_bullet: Option<String>,
    pub new_bullet: Option<String>,
    pub rewritten_resume: Option<Value>,
    pub exported_pdf: Option<Bytes>,
    pub scraping_result: Option<Value>,
    pub states: Vec<String>,
    pub firms: Vec<String>,
    pub practice_areas: Vec<String>,
    pub error: Option<String>,
    pub lifecycle: LifecycleTracker,
    policy: CommitPolicy,
}

struct Inner {
    gateway: Arc<dyn Gateway>,
    persistence: SessionPersistence,
    state: RwLock<StoreState>,
}

#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl Store {
    /// Builds a store and restores any persisted session.
    pub fn new(gateway: Arc<dyn Gateway>, persistence: SessionPersistence) -> Self {
        let state = StoreState {
            session: persistence.restore(),
            ..StoreState::default()
        };

        Self {
            inner: Arc::new(Inner {
                gateway,
                persistence,
                state: RwLock::new(state),
            }),
        }
    }

    pub fn with_policy(self, policy: CommitPolicy) -> Self {
        self.write().policy = policy;
        self
    }

    /// Sets the default page size of the filter selection.
    pub fn with_page_size(self, page_size: u32) -> Self {
        self.write().filter.apply(FilterChange::PageSize(page_size));
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner.state.write().unwrap_or_else(|e| e.into_inner())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Reads
    // ────────────────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> StoreState {
        self.read().clone()
    }

    pub fn policy(&self) -> CommitPolicy {
        self.read().policy
    }

    pub fn session(&self) -> Option<Session> {
        self.read().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().session.is_some()
    }

    pub fn jobs(&self) -> Vec<JobRecord> {
        self.read().jobs.clone()
    }

    pub fn job_source(&self) -> JobSource {
        self.read().job_source
    }

    pub fn pagination(&self) -> PageMeta {
        self.read().pagination.clone()
    }

    pub fn selected_job(&self) -> Option<JobRecord> {
        self.read().selected_job.clone()
    }

    pub fn filter(&self) -> FilterSelection {
        self.read().filter.clone()
    }

    pub fn temp_resume(&self) -> TempResume {
        self.read().temp_resume.clone()
    }

    pub fn uploaded_resume(&self) -> Option<UploadedResume> {
        self.read().uploaded_resume.clone()
    }

    pub fn cover_letter(&self) -> Option<String> {
        self.read().cover_letter.clone()
    }

    pub fn exported_pdf(&self) -> Option<Bytes> {
        self.read().exported_pdf.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn status(&self, op: Operation) -> Status {
        self.read().lifecycle.status(op)
    }

    pub fn lifecycle(&self, op: Operation) -> LifecycleEntry {
        self.read().lifecycle.entry(op)
    }

    pub fn visible_page(&self) -> VisiblePage {
        let state = self.read();
        derive_page(&state.jobs, &state.filter)
    }

    pub fn visible_jobs(&self) -> Vec<JobRecord> {
        self.visible_page().jobs
    }

    // ────────────────────────────────────────────────────────────────────────
    // Synchronous actions
    // ────────────────────────────────────────────────────────────────────────

    /// Replaces the session and persists it.
    pub fn set_session(&self, session: Session) {
        let mut state = self.write();
        commit_session(&self.inner.persistence, &mut state, session);
    }

    /// Logout. Clears the session and everything tied to it, and removes the
    /// persisted blob. Safe to call when already signed out.
    pub fn clear_session(&self) {
        let mut state = self.write();
        let was_signed_in = state.session.take().is_some();
        state.selected_job = None;
        state.temp_resume = TempResume::default();
        state.uploaded_resume = None;
        state.jobs.clear();
        state.pagination = PageMeta::default();
        if let Err(e) = self.inner.persistence.clear() {
            warn!("Failed to remove persisted session: {e}");
        }
        if was_signed_in {
            info!("Session cleared");
        }
    }

    pub fn set_selected_job(&self, job: Option<JobRecord>) {
        self.write().selected_job = job;
    }

    pub fn set_temp_resume(&self, resume: TempResume) {
        self.write().temp_resume = resume;
    }

    pub fn clear_temp_resume(&self) {
        self.write().temp_resume = TempResume::default();
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    pub fn set_filter(&self, change: FilterChange) {
        self.write().filter.apply(change);
    }

    // ────────────────────────────────────────────────────────────────────────
    // Async actions
    // ────────────────────────────────────────────────────────────────────────

    /// Runs one gateway call under the lifecycle for `op`. `commit` runs
    /// under the write lock only if the settlement is allowed to commit.
    async fn track<T, Fut, C>(&self, op: Operation, call: Fut, commit: C) -> Result<T, GatewayError>
    where
        Fut: Future<Output = Result<T, GatewayError>> + Send,
        C: FnOnce(&Inner, &mut StoreState, &T) + Send,
        T: Send,
    {
        let ticket = {
            let mut state = self.write();
            state.error = None;
            state.lifecycle.begin(op)
        };
        debug!("{op} pending (seq {})", ticket.seq);

        let result = call.await;

        let mut state = self.write();
        let policy = state.policy;
        match &result {
            Ok(value) => {
                if state.lifecycle.settle(ticket, Ok(()), policy) {
                    commit(self.inner.as_ref(), &mut *state, value);
                }
            }
            Err(e) => {
                if state.lifecycle.settle(ticket, Err(e.to_string()), policy) {
                    state.error = Some(e.to_string());
                }
            }
        }
        drop(state);
        result
    }

    fn require_user_id(&self) -> Result<String, GatewayError> {
        self.read()
            .session
            .as_ref()
            .and_then(Session::user_id)
            .ok_or_else(|| GatewayError::validation("You must be signed in"))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(GatewayError::validation("Email and password are required"));
        }
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.track(Operation::Login, self.inner.gateway.login(&req), |inner, state, session| {
            commit_session(&inner.persistence, state, session.clone())
        })
        .await
    }

    pub async fn login_with_code(&self, code: &str) -> Result<Session, GatewayError> {
        if code.trim().is_empty() {
            return Err(GatewayError::validation("Authorization code is required"));
        }
        let req = CodeExchangeRequest {
            code: code.to_string(),
        };
        self.track(
            Operation::GoogleLogin,
            self.inner.gateway.google_login(&req),
            |inner, state, session| commit_session(&inner.persistence, state, session.clone()),
        )
        .await
    }

    /// Validates the form locally; an invalid form never reaches the backend.
    pub async fn register(&self, form: &RegistrationForm) -> Result<Session, GatewayError> {
        let req = form.validate()?;
        self.track(Operation::Register, self.inner.gateway.register(&req), |inner, state, session| {
            commit_session(&inner.persistence, state, session.clone())
        })
        .await
    }

    /// Re-reads the signed-in user's record and persists the refreshed session.
    pub async fn refresh_user(&self) -> Result<User, GatewayError> {
        let user_id = self.require_user_id()?;
        let expected = user_id.clone();
        self.track(
            Operation::FetchUser,
            self.inner.gateway.fetch_user(&user_id),
            move |inner, state, user| {
                // the user may have signed out or switched while in flight
                let Some(current) = state.session.clone() else {
                    return;
                };
                if current.user_id().as_deref() != Some(expected.as_str()) {
                    return;
                }
                let refreshed = Session {
                    user: user.clone(),
                    ..current
                };
                commit_session(&inner.persistence, state, refreshed);
            },
        )
        .await
    }

    pub async fn submit_feedback(&self, feedback_type: &str, text: &str) -> Result<Value, GatewayError> {
        if text.trim().is_empty() {
            return Err(GatewayError::validation("Feedback cannot be empty"));
        }
        let req = FeedbackRequest {
            user_id: self.require_user_id()?,
            feedback_type: feedback_type.to_string(),
            user_feedback: text.trim().to_string(),
        };
        self.track(
            Operation::SubmitFeedback,
            self.inner.gateway.submit_feedback(&req),
            |_, _, _| {},
        )
        .await
    }

    /// Fetches a page of jobs and replaces the held collection with its
    /// normalized contents. Favorites require a signed-in user.
    pub async fn fetch_jobs(&self, source: JobSource, query: &JobQuery) -> Result<Vec<JobRecord>, GatewayError> {
        query.validate()?;
        let user_id = match source {
            JobSource::Favorites => Some(self.require_user_id()?),
            JobSource::Search => None,
        };
        let expected = user_id.clone();

        let gateway = &self.inner.gateway;
        let call = async move {
            let payload = match &user_id {
                Some(id) => gateway.fetch_favorite_jobs(id).await?,
                None => gateway.fetch_jobs(query).await?,
            };
            Ok::<_, GatewayError>(FetchedPage::from_payload(payload, source))
        };

        let page = self
            .track(Operation::FetchJobs, call, move |_, state, page| {
                // favorites belong to whoever asked; drop them after a sign-out or switch
                if let Some(expected) = &expected {
                    let current = state.session.as_ref().and_then(Session::user_id);
                    if current.as_deref() != Some(expected.as_str()) {
                        return;
                    }
                }
                state.jobs = page.jobs.clone();
                state.pagination = page.meta.clone();
                state.job_source = source;
            })
            .await?;
        Ok(page.jobs)
    }

    /// Flips the favorite flag of a held job on the backend, then in place.
    /// Returns the new flag.
    pub async fn toggle_favorite(&self, job_id: &str) -> Result<bool, GatewayError> {
        let user_id = self.require_user_id()?;
        let current = {
            let state = self.read();
            state
                .jobs
                .iter()
                .chain(state.selected_job.iter())
                .find(|j| j.id == job_id)
                .map(|j| j.is_favorite)
        };
        let Some(current) = current else {
            return Err(GatewayError::validation(format!("Unknown job '{job_id}'")));
        };

        let req = FavoriteToggle {
            user_id,
            job_id: job_id.to_string(),
            is_favorite: !current,
        };
        let is_favorite = req.is_favorite;
        self.track(
            Operation::ToggleFavorite,
            self.inner.gateway.toggle_favorite(&req),
            |_, state, _| {
                if let Some(job) = state.jobs.iter_mut().find(|j| j.id == req.job_id) {
                    job.is_favorite = is_favorite;
                }
                if let Some(job) = state.selected_job.as_mut().filter(|j| j.id == req.job_id) {
                    job.is_favorite = is_favorite;
                }
            },
        )
        .await?;
        Ok(is_favorite)
    }

    pub async fn trigger_scraping(&self) -> Result<Value, GatewayError> {
        self.track(
            Operation::TriggerScraping,
            self.inner.gateway.trigger_scraping(),
            |_, state, result| state.scraping_result = Some(result.clone()),
        )
        .await
    }

    pub async fn upload_resume(&self, file: ResumeFile) -> Result<UploadedResume, GatewayError> {
        if file.bytes.is_empty() {
            return Err(GatewayError::validation("Resume file is empty"));
        }
        self.track(
            Operation::UploadResume,
            self.inner.gateway.upload_resume(&file),
            |_, state, uploaded| state.uploaded_resume = Some(uploaded.clone()),
        )
        .await
    }

    pub async fn generate_bullets(&self, role: &str, description: &str) -> Result<Vec<String>, GatewayError> {
        let req = GenerateBulletsRequest {
            role: role.to_string(),
            description: description.to_string(),
        };
        self.track(
            Operation::GenerateBullets,
            self.inner.gateway.generate_bullets(&req),
            |_, state, bullets| state.generated_bullets = bullets.clone(),
        )
        .await
    }

    pub async fn improve_bullet(&self, bullet_text: &str, job_title: &str) -> Result<String, GatewayError> {
        if bullet_text.trim().is_empty() {
            return Err(GatewayError::validation("Bullet text is required"));
        }
        let req = ImproveBulletRequest {
            bullet_text: bullet_text.to_string(),
            job_title: job_title.to_string(),
        };
        self.track(
            Operation::ImproveBullet,
            self.inner.gateway.improve_bullet(&req),
            |_, state, bullet| state.improved_bullet = Some(bullet.clone()),
        )
        .await
    }

    pub async fn generate_new_bullet(&self, job_title: &str, company: &str) -> Result<String, GatewayError> {
        let req = NewBulletRequest {
            job_title: job_title.to_string(),
            company: company.to_string(),
        };
        self.track(
            Operation::GenerateNewBullet,
            self.inner.gateway.generate_new_bullet(&req),
            |_, state, bullet| state.new_bullet = Some(bullet.clone()),
        )
        .await
    }

    pub async fn generate_cover_letter(&self, req: &CoverLetterRequest) -> Result<String, GatewayError> {
        req.validate()?;
        self.track(
            Operation::GenerateCoverLetter,
            self.inner.gateway.generate_cover_letter(req),
            |_, state, letter| state.cover_letter = Some(letter.clone()),
        )
        .await
    }

    pub async fn regenerate_cover_letter(&self, req: &CoverLetterRequest) -> Result<String, GatewayError> {
        req.validate()?;
        self.track(
            Operation::RegenerateCoverLetter,
            self.inner.gateway.regenerate_cover_letter(req),
            |_, state, letter| state.cover_letter = Some(letter.clone()),
        )
        .await
    }

    pub async fn rewrite_resume(&self, resume_text: &str, job_description: &str) -> Result<Value, GatewayError> {
        if resume_text.trim().is_empty() {
            return Err(GatewayError::validation("Please upload a resume first"));
        }
        let req = RewriteRequest {
            resume_text: resume_text.to_string(),
            job_description: job_description.to_string(),
        };
        self.track(
            Operation::RewriteResume,
            self.inner.gateway.rewrite_resume(&req),
            |_, state, resume| state.rewritten_resume = Some(resume.clone()),
        )
        .await
    }

    pub async fn export_pdf(&self, req: &HtmlPdfRequest) -> Result<Bytes, GatewayError> {
        if req.html.trim().is_empty() {
            return Err(GatewayError::validation("Nothing to export"));
        }
        self.track(
            Operation::ExportPdf,
            self.inner.gateway.export_pdf(req),
            |_, state, pdf| state.exported_pdf = Some(pdf.clone()),
        )
        .await
    }

    pub async fn export_resume_pdf(&self, req: &ResumePdfRequest) -> Result<Bytes, GatewayError> {
        self.track(
            Operation::ExportResumePdf,
            self.inner.gateway.export_resume_pdf(req),
            |_, state, pdf| state.exported_pdf = Some(pdf.clone()),
        )
        .await
    }

    /// Fetches states, firms and practice areas concurrently, each under its
    /// own lifecycle key. Returns the first failure, if any.
    pub async fn fetch_filter_metadata(&self) -> Result<(), GatewayError> {
        let gateway = &self.inner.gateway;
        let (states, firms, areas) = tokio::join!(
            self.track(Operation::FetchStates, gateway.fetch_states(), |_, state, v| {
                state.states = v.clone()
            }),
            self.track(Operation::FetchFirms, gateway.fetch_firms(), |_, state, v| {
                state.firms = v.clone()
            }),
            self.track(
                Operation::FetchPracticeAreas,
                gateway.fetch_practice_areas(),
                |_, state, v| state.practice_areas = v.clone()
            ),
        );
        states?;
        firms?;
        areas?;
        Ok(())
    }
}

/// A job page after normalization, ready to commit.
struct FetchedPage {
    jobs: Vec<JobRecord>,
    meta: PageMeta,
}

impl FetchedPage {
    fn from_payload(payload: JobPagePayload, source: JobSource) -> Self {
        let mut jobs = normalize_all(&payload.jobs);
        let mut meta = payload.meta();
        if source == JobSource::Favorites {
            for job in &mut jobs {
                job.is_favorite = true;
            }
            if payload.total_jobs.is_none() {
                meta.total_count = jobs.len() as u64;
            }
        }
        Self { jobs, meta }
    }
}

/// Replaces the session and persists it. A failed write is logged; the
/// in-memory session stays authoritative.
fn commit_session(persistence: &SessionPersistence, state: &mut StoreState, session: Session) {
    if let Err(e) = persistence.persist(&session) {
        warn!("Failed to persist session: {e}");
    }
    info!(
        "Session set for user {}",
        session.user_id().unwrap_or_else(|| "<unknown>".to_string())
    );
    state.session = Some(session);
}
