// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// WireGuard key pair of this installation. Only the private key is kept, the public key is
/// derived on demand.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct DeviceKeys {
    private_key: String,
}

impl DeviceKeys {
    pub fn generate_new() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        DeviceKeys {
            private_key: BASE64.encode(secret.as_bytes()),
        }
    }

    pub fn from_private_key(private_key: impl Into<String>) -> Self {
        DeviceKeys {
            private_key: private_key.into(),
        }
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Base64 encoded public key, `None` if the private key is not a valid 32 byte key.
    pub fn public_key(&self) -> Option<String> {
        let decoded = Zeroizing::new(BASE64.decode(&self.private_key).ok()?);
        let bytes: [u8; 32] = decoded.as_slice().try_into().ok()?;
        let secret = StaticSecret::from(bytes);
        Some(BASE64.encode(PublicKey::from(&secret).as_bytes()))
    }
}

impl fmt::Debug for DeviceKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceKeys")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
