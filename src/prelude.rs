//! Convenience re-exports for common usage patterns.
//!
//! This prelude module provides the most commonly used items for quick starts.
//! Import everything with:
//!
//! ```
//! use error_trace::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - **Macros**: [`traced!`], [`wrap!`], [`bail!`], [`metadata!`]
//! - **Types**: [`TracedError`], [`TracedResult`], [`Metadata`], [`Value`]
//! - **Traits**: [`ResultExt`]
//!
//! # Examples
//!
//! ```
//! use error_trace::prelude::*;
//!
//! fn load_config() -> TracedResult<String> {
//!     std::fs::read_to_string("config.toml")
//!         .wrap_err("loading configuration")
//! }
//! ```

// Macros
pub use crate::{bail, metadata, traced, wrap};

// Core types
pub use crate::types::{Metadata, TracedError, TracedResult, Value};

// Traits
pub use crate::traits::ResultExt;
