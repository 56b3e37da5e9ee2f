//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for external services like object storage and language models.

pub mod llm;
pub mod storage;
