//! Continuum - portable identity, voice, context and memory for LLM conversations
//!
//! A profile is a handful of human-edited Markdown files. This crate keeps
//! them on disk, appends to the memory log, and condenses the whole profile
//! into a bounded export that fits in an LLM context window.

pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod memory;
pub mod status;
pub mod storage;
pub mod testing;
pub mod tools;
pub mod voice;

pub use error::{ContinuumError, Result};
