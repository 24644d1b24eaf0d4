//! Discriminator derivation (§4.3).
//!
//! Anchor's convention: the first 8 bytes of `sha256("<namespace>:<name>")`.
//! `snake_case` conversion happens at the call site — callers pass the
//! already-namespaced preimage.

use sha2::{Digest, Sha256};

pub fn sighash(namespace: &str, name: &str) -> [u8; 8] {
    let preimage = format!("{namespace}:{name}");
    let hash = Sha256::digest(preimage.as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

pub fn instruction_sighash(snake_case_name: &str) -> [u8; 8] {
    sighash("global", snake_case_name)
}

pub fn account_sighash(name: &str) -> [u8; 8] {
    sighash("account", name)
}

pub fn event_sighash(name: &str) -> [u8; 8] {
    sighash("event", name)
}

/// The program-wide discriminator encoding chosen in the Context Builder
/// pass (§4.3). The choice is made once, from the first instruction, and
/// applies uniformly; a later instruction carrying a different shape is a
/// logic error the generator does not attempt to reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscriminatorEncoding {
    /// 8-byte discriminator, either explicit in the IDL or derived via
    /// sighash when absent.
    Anchor,
    Uint8,
    Uint32,
    Uvarint32,
}

impl DiscriminatorEncoding {
    pub fn from_instruction(instr: &crate::types::Instruction) -> Self {
        if let Some(discriminant) = &instr.discriminant {
            return match discriminant.kind {
                crate::types::DiscriminantKind::U8 => DiscriminatorEncoding::Uint8,
                crate::types::DiscriminantKind::U32 => DiscriminatorEncoding::Uint32,
                crate::types::DiscriminantKind::Uvarint32 => DiscriminatorEncoding::Uvarint32,
            };
        }
        DiscriminatorEncoding::Anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sighash_matches_known_value() {
        let disc = instruction_sighash("initialize");
        assert_eq!(disc.len(), 8);
        assert_eq!(&disc[..], &Sha256::digest(b"global:initialize")[..8]);
    }

    #[test]
    fn account_and_event_namespaces_differ() {
        assert_ne!(account_sighash("Vault"), event_sighash("Vault"));
    }
}
