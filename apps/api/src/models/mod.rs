pub mod evaluation;
pub mod job;
pub mod resume;

pub use evaluation::{EvaluationResult, Verdict};
pub use job::StructuredJobDescription;
pub use resume::{StructuredResume, TextItem};
