//! Normalized and system address types.
//!
//! This module defines strong types for the two address spaces the translation
//! moves between, preventing accidental mixing at compile time:
//! 1. **Normalized:** The per-channel address reported by a memory controller.
//! 2. **System:** The flat physical address space address used by software.

use std::fmt;

/// A normalized address: the per-channel address a memory controller reports
/// when it detects an error, before interleaving has been reversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct NormAddr(pub u64);

/// A system physical address: the flat address space location of a DRAM byte,
/// after all interleaving and base/hole offsets are accounted for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SysAddr(pub u64);

impl NormAddr {
    /// Creates a new normalized address from a raw 64-bit value.
    #[inline]
    pub fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline]
    pub fn val(&self) -> u64 {
        self.0
    }
}

impl SysAddr {
    /// Creates a new system address from a raw 64-bit value.
    #[inline]
    pub fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline]
    pub fn val(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NormAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Display for SysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
