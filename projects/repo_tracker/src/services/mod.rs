pub mod error;
pub mod pull_requests;
pub mod repositories;

pub use error::{Classify, ErrorKind};
pub use pull_requests::PullRequestService;
pub use repositories::RepositoryService;
