pub mod status;
pub mod submission;

pub use status::{Status, StatusRecord};
pub use submission::{parse_timestamp, MergedItem, Submission};
