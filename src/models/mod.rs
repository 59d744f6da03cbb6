//! Data models.
//!
//! This module contains the resolved run configuration handed from the
//! option resolver to the test pipeline.
pub mod options;
