//! Shastra Chat Common Library
//!
//! Shared code for the Shastra Chat service:
//! - The retrieval-augmented chat core (terms, retrieval, prompt,
//!   citations, pipeline)
//! - Database models and repository pattern
//! - Completion-service client abstraction
//! - Error types and handling
//! - Configuration management
//! - Authentication utilities
//! - Metrics

pub mod auth;
pub mod completion;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod rag;

// Re-export commonly used types
pub use completion::CompletionClient;
pub use config::AppConfig;
pub use db::{DbPool, Repository};
pub use errors::{AppError, Result};
pub use rag::citations::Citation;
pub use rag::mode::ChatMode;
pub use rag::pipeline::{ChatAnswer, ChatPipeline, ChatQuery, REFUSAL_MESSAGE};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
