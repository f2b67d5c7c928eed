//! Unified align.input.v1 schema
//!
//! This module defines the JSON envelope the host application exports for
//! scoring, along with per-record validation and the adapter that bridges a
//! parsed document to engine input.

mod input;
mod adapter;

pub use input::*;
pub use adapter::*;
