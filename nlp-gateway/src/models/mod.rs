//! Wire types for the gateway's HTTP surface.

pub mod catalog;
pub mod envelope;
pub mod health;
pub mod requests;

pub use catalog::{ModelDescriptor, ModelStatus};
pub use envelope::AiResponse;
pub use health::HealthStatus;
pub use requests::{
    SentimentAnalysisRequest, SummarizationRequest, TextGenerationRequest, TranslationRequest,
};
