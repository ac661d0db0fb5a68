//! Utility modules for common functionality

pub mod logger;
pub mod progress;
pub(crate) mod string_utils;
pub(crate) mod tag_utils;
