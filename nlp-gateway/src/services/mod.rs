pub mod backend;
pub mod metrics;
pub mod prompts;
pub mod providers;
pub mod sentiment;

pub use backend::{BackendError, BackendMode, LiveBackend, MockBackend, NlpBackend};
pub use sentiment::{SentimentAnalysis, SentimentLabel};
