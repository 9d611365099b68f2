//! # Unit Components
//!
//! This module organizes the unit tests by pipeline stage, from the bit
//! primitives everything is built on up to whole-pipeline translations.




/// Unit tests for channel-select derivation and re-insertion.
pub mod denormalize;
