//! soxcut - cut timed segments out of an audio file and splice them back
//! together with SoX cross-fades.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod planner;
pub mod segments;
pub mod splice;
pub mod timecode;
pub mod tool;
pub mod types;

pub use error::{Result, SoxcutError};
pub use tool::{AudioTool, SoxTool, ToolError};
