//! Core types shared across TabSync facilities
//!
//! This crate provides foundational types used by the error handling and
//! logging facilities, plus the key type identifying a reconcilable source:
//!
//! - **Correlation types**: RequestId, TraceId
//! - **Source identity**: SourceKey

pub mod correlation;
pub mod key;

pub use correlation::{RequestId, TraceId};
pub use key::SourceKey;
