//! # CNAE Core
//!
//! Core types and logic for the CNAE company lookup relay.
//!
//! This crate provides:
//! - Type definitions for the lookup request and the consolidated report
//! - Input validation (API key, CNAE codes, limit, result mode)
//! - Consolidation of multi-code upstream payloads into one flat report
//!
//! ## Example
//!
//! ```rust
//! use cnae_core::{validate_codes, CnaeInput};
//!
//! let outcome = validate_codes(&CnaeInput::Multiple(vec![
//!     "7112-0/00".to_string(),
//!     "abc".to_string(),
//! ]));
//!
//! assert_eq!(outcome.validos, vec!["7112000"]);
//! assert_eq!(outcome.invalidos, vec!["abc"]);
//! assert!(!outcome.todos_validos());
//! ```

pub mod consolidate;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use consolidate::*;
pub use types::*;
pub use validation::*;
