//! Batch pipelines for NovelCast.
//!
//! Both pipelines share one structural pattern: discover inputs, diff
//! against already-produced outputs, process each missing item, publish
//! the result atomically, clean up temp artifacts. Processing is strictly
//! sequential, one item and one collection at a time, which also throttles
//! the remote synthesis service.
//!
//! Failure handling is asymmetric: the speech pipeline logs a failed
//! chapter and continues, while the video pipeline aborts the remaining
//! batch on the first encoder failure.

pub mod discovery;
pub mod error;
pub mod retry;
pub mod speech;
pub mod video;

pub use discovery::{completed_stems, list_collections, stems_with_ext};
pub use error::{PipelineError, PipelineResult};
pub use retry::RetrySettings;
pub use speech::{PassReport, SpeechOptions, SpeechPipeline, SpeechSummary};
pub use video::{BatchOutcome, VideoPipeline};
