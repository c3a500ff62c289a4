//! Configuration for an OpenSwap settlement instance.

use serde::{Deserialize, Serialize};

use crate::Address;

/// Configuration for a single settlement engine instance.
///
/// The `instance` address is the domain-separation identity: it is mixed
/// into every offer hash, so a signature produced for one instance can
/// never settle on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// This instance's identity, included in all signed offer hashes.
    pub instance: Address,
}

impl EngineConfig {
    #[must_use]
    pub fn new(instance: Address) -> Self {
        Self { instance }
    }
}
