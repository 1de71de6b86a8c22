//! Inference endpoint abstraction
//!
//! The assistant only needs one capability from a language model:
//! turn a prompt into text. This module defines that seam and the
//! Ollama implementation behind it.

pub mod errors;
pub mod ollama;
pub mod provider;

pub use errors::*;
pub use provider::*;
