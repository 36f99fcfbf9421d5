//! Reads a stack of toy blocks from a camera frame.
//!
//! [`identify::identify_stack`] turns one RGB frame into an ordered list of
//! [`identify::BlockDescriptor`]s (color + width in stud units). The rest of
//! the crate is plumbing around it: frame sources, annotated output and the
//! order payload built from the block -> instruction table and posted to the
//! robot controller.

pub mod capture;
pub mod config;
pub mod error;
pub mod identify;
pub mod orders;
pub mod output;
pub mod sender;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{ColorEntry, Config, InstructionRule, Tuning};
pub use error::{ConfigError, IdentifyError};
pub use identify::{identify_frame, identify_stack, BlockDescriptor, BlockKey, Rect};
