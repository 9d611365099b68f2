//! Error definitions for address translation.
//!
//! This module defines the error surface of the crate:
//! 1. **Access Errors:** Transport failures reported by the external
//!    register-access collaborator.
//! 2. **Translation Errors:** Stage-tagged failures of the translation
//!    pipeline. Every failure is terminal for the call; nothing is retried.
//!
//! A wrong silent translation would misattribute a hardware fault to the
//! wrong DRAM location, so unrecognized generations and interleave modes are
//! always explicit failures, never a best-guess result.

use thiserror::Error;

use crate::fabric::map::InterleaveMode;

/// A failure reported by the external register-access collaborator, e.g. a
/// hardware or transport error on an indirect configuration-register read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("register access failed: {reason}")]
pub struct AccessError {
    /// Collaborator-supplied description of the failure.
    pub reason: String,
}

impl AccessError {
    /// Creates an access error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A terminal failure of the translation pipeline, tagged with the stage that
/// produced it.
///
/// Structural precondition violations inside the dehash stage (disallowed
/// die/socket interleave counts, an unexpected interleave bit position) point
/// at a configuration inconsistency upstream, not at a recoverable condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// The fabric configuration was never resolved to a known generation.
    #[error("hardware generation is unknown")]
    UnknownGeneration,

    /// The collaborator could not resolve a node for the reported location.
    #[error("failed to resolve node for socket {socket_id} die {die_id}: {source}")]
    NodeResolution {
        /// Socket the error was reported against.
        socket_id: u8,
        /// Die within the socket.
        die_id: u8,
        /// Underlying collaborator failure.
        source: AccessError,
    },

    /// The collaborator could not produce an address map for the node.
    #[error("failed to fetch address map for node {node_id} instance {inst_id}: {source}")]
    MapFetch {
        /// Resolved node identifier.
        node_id: u16,
        /// Channel instance within the node.
        inst_id: u8,
        /// Underlying collaborator failure.
        source: AccessError,
    },

    /// The interleave mode is not recognized by the denormalizer.
    #[error("cannot denormalize interleave mode {mode:?}")]
    Denormalize {
        /// Offending interleave mode.
        mode: InterleaveMode,
    },

    /// The physical channel instance is absent from the map's remap table.
    #[error("channel instance {inst_id} not present in remap table")]
    RemapLookup {
        /// Physical channel instance that was looked up.
        inst_id: u8,
    },

    /// Adding the DRAM base and legacy hole failed on a register read.
    #[error("failed to add DRAM base and legacy hole: {source}")]
    BaseAndHole {
        /// Underlying collaborator failure.
        source: AccessError,
    },

    /// The interleave mode is not recognized by the dehasher.
    #[error("cannot dehash interleave mode {mode:?}")]
    Dehash {
        /// Offending interleave mode.
        mode: InterleaveMode,
    },

    /// The interleave bit position is outside the generation's allowed set.
    #[error("invalid interleave bit position {pos}")]
    InterleaveBit {
        /// Offending bit position.
        pos: u8,
    },

    /// The die interleave count exceeds the generation's documented bound.
    #[error("invalid die interleave count {count}")]
    DieInterleave {
        /// Offending count.
        count: u8,
    },

    /// The socket interleave count exceeds the generation's documented bound.
    #[error("invalid socket interleave count {count}")]
    SocketInterleave {
        /// Offending count.
        count: u8,
    },

    /// The final address lies above the map's DRAM limit.
    #[error("translated address {addr:#x} exceeds DRAM limit {limit:#x}")]
    LimitExceeded {
        /// Address produced by the pipeline.
        addr: u64,
        /// DRAM limit it was checked against.
        limit: u64,
    },
}
