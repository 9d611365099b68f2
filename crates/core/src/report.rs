//! Memory-controller error-record decoding.
//!
//! Error records name the failing channel through vendor-specific fields: the
//! channel instance lives in a sub-field of the instance-identifier word, and
//! the die is a system-wide index that must be reduced modulo the number of
//! internal nodes per socket. This module performs that derivation and feeds
//! the result into the translation pipeline.

use serde::{Deserialize, Serialize};

use crate::common::addr::{NormAddr, SysAddr};
use crate::common::error::TranslationError;
use crate::fabric::access::Fabric;
use crate::translate::Translator;

/// Channel-number field within the instance-identifier word (bits 31:20).
const CHANNEL_NUM_MASK: u64 = 0xFFF0_0000;
const CHANNEL_NUM_SHIFT: u32 = 20;

/// A raw memory-controller error record, as supplied by the platform's
/// error-ingestion path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Socket the reporting controller sits in.
    pub socket_id: u8,
    /// System-wide die index of the reporting controller.
    pub die_index: u16,
    /// Vendor instance-identifier word carrying the channel number.
    pub instance_id: u64,
    /// Normalized address reported by the controller.
    pub normalized_addr: u64,
}

impl ErrorRecord {
    /// Extracts the channel instance from the instance-identifier word.
    #[inline]
    pub fn channel_instance(&self) -> u8 {
        ((self.instance_id & CHANNEL_NUM_MASK) >> CHANNEL_NUM_SHIFT) as u8
    }

    /// Reduces the system-wide die index to a per-socket die identifier.
    #[inline]
    pub fn die_id(&self, nodes_per_socket: u8) -> u8 {
        (self.die_index % u16::from(nodes_per_socket.max(1))) as u8
    }
}

impl<F: Fabric + ?Sized> Translator<'_, F> {
    /// Decodes an error record and translates its normalized address.
    ///
    /// # Errors
    ///
    /// Propagates any stage failure from [`Translator::translate`].
    pub fn translate_record(&self, record: &ErrorRecord) -> Result<SysAddr, TranslationError> {
        let die_id = record.die_id(self.config().nodes_per_socket);

        self.translate(
            record.socket_id,
            die_id,
            record.channel_instance(),
            NormAddr::new(record.normalized_addr),
        )
    }
}
