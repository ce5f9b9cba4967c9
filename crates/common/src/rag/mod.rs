//! Retrieval-augmented chat core
//!
//! Everything between an accepted query and the assembled response:
//! term extraction, context retrieval, prompt construction, citation
//! extraction, and the orchestrating pipeline.

pub mod citations;
pub mod context;
pub mod mode;
pub mod pipeline;
pub mod prompt;
pub mod retrieve;
pub mod terms;
