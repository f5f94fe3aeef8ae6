//! Life parameter input schema
//!
//! This module defines the questionnaire-shaped input record, its validation
//! rules, and the adapter that turns validated input into `LifeParameters`.

mod adapter;
mod raw_input;

pub use adapter::*;
pub use raw_input::*;
