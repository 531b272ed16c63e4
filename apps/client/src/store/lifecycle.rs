//! Per-operation request lifecycle: `Idle → Pending → Fulfilled | Rejected`.
//!
//! Every call to an async action takes a `Ticket`. When the call settles the
//! tracker decides, per `CommitPolicy`, whether its outcome may be committed.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lifecycle key, one per backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
    Login,
    GoogleLogin,
    Register,
    FetchUser,
    SubmitFeedback,
    FetchJobs,
    ToggleFavorite,
    TriggerScraping,
    UploadResume,
    GenerateBullets,
    ImproveBullet,
    GenerateNewBullet,
    GenerateCoverLetter,
    RegenerateCoverLetter,
    RewriteResume,
    ExportPdf,
    ExportResumePdf,
    FetchStates,
    FetchFirms,
    FetchPracticeAreas,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Login => "user/login",
            Operation::GoogleLogin => "user/googleLogin",
            Operation::Register => "user/register",
            Operation::FetchUser => "user/getUserById",
            Operation::SubmitFeedback => "user/submitFeedback",
            Operation::FetchJobs => "scraping/getJobs",
            Operation::ToggleFavorite => "user/toggleFavorite",
            Operation::TriggerScraping => "scraping/trigger",
            Operation::UploadResume => "resume/upload",
            Operation::GenerateBullets => "resume/generateBullets",
            Operation::ImproveBullet => "resume/improveBullet",
            Operation::GenerateNewBullet => "resume/generateNewBullet",
            Operation::GenerateCoverLetter => "resume/generateCoverLetter",
            Operation::RegenerateCoverLetter => "resume/regenerateCoverLetter",
            Operation::RewriteResume => "resume/rewrite",
            Operation::ExportPdf => "pdf/export",
            Operation::ExportResumePdf => "pdf/resumeExport",
            Operation::FetchStates => "scraping/states",
            Operation::FetchFirms => "scraping/firms",
            Operation::FetchPracticeAreas => "scraping/practices",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected,
}

/// How same-key settlements that race each other are committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitPolicy {
    /// Every settlement commits; whichever settles last wins.
    #[default]
    LastSettled,
    /// Only settlements newer than the last committed one commit.
    LatestIssued,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleEntry {
    pub status: Status,
    pub last_error: Option<String>,
    issued: u64,
    committed: u64,
}

impl LifecycleEntry {
    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }
}

/// Handed out by `begin`; carries the call's per-key sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub operation: Operation,
    pub seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct LifecycleTracker {
    entries: HashMap<Operation, LifecycleEntry>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, op: Operation) -> LifecycleEntry {
        self.entries.get(&op).cloned().unwrap_or_default()
    }

    pub fn status(&self, op: Operation) -> Status {
        self.entries.get(&op).map(|e| e.status).unwrap_or_default()
    }

    /// Moves the key to `Pending` and clears its last error.
    pub fn begin(&mut self, op: Operation) -> Ticket {
        let entry = self.entries.entry(op).or_default();
        entry.issued += 1;
        entry.status = Status::Pending;
        entry.last_error = None;
        Ticket {
            operation: op,
            seq: entry.issued,
        }
    }

    /// Records the outcome if the policy lets this ticket commit. Returns
    /// whether it did; the caller applies the payload only on `true`.
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<(), String>, policy: CommitPolicy) -> bool {
        let entry = self.entries.entry(ticket.operation).or_default();

        if policy == CommitPolicy::LatestIssued && ticket.seq <= entry.committed {
            debug!(
                "Discarding stale {} settlement (seq {} <= committed {})",
                ticket.operation, ticket.seq, entry.committed
            );
            return false;
        }

        entry.committed = ticket.seq;
        match outcome {
            Ok(()) => {
                entry.status = Status::Fulfilled;
                entry.last_error = None;
            }
            Err(message) => {
                entry.status = Status::Rejected;
                entry.last_error = Some(message);
            }
        }
        debug!("{} settled as {:?} (seq {})", ticket.operation, entry.status, ticket.seq);
        true
    }
}
