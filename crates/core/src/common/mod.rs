//! Common types shared across the translation pipeline.
//!
//! This module provides the fundamental building blocks the rest of the crate
//! is written in terms of:
//! 1. **Address Types:** Strong types for normalized and system addresses.
//! 2. **Bit Primitives:** Bit-range extraction, expansion, and removal on
//!    64-bit values.
//! 3. **Error Handling:** Stage-tagged translation failures and collaborator
//!    access errors.

/// Address type definitions (normalized and system addresses).
pub mod addr;

/// Bit-manipulation primitives for building interleave masks.
pub mod bits;

/// Error types for translation and register access.
pub mod error;

pub use addr::{NormAddr, SysAddr};
pub use bits::{expand_bits, get_bit, remove_bits};
pub use error::{AccessError, TranslationError};
