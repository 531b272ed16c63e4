pub mod job;
pub mod resume;
pub mod session;
pub mod user;

pub use job::{JobPagePayload, JobRecord, JobType, PageMeta, RawJob};
pub use resume::{ResumeFile, TempResume, UploadedResume};
pub use session::{AuthPayload, Session};
pub use user::User;
