//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Session time
//! - Logging setup

pub mod logging;
pub mod math;
pub mod time;
