// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use fpn_vpn_api_client::VerifyResponse;
use serde::{Deserialize, Serialize};

use crate::DeviceKeys;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub verification_token: String,
    pub device_keys: DeviceKeys,
}

impl Credentials {
    pub fn new(verification_token: impl Into<String>, device_keys: DeviceKeys) -> Self {
        Credentials {
            verification_token: verification_token.into(),
            device_keys,
        }
    }

    /// Credentials for a fresh login, a new device key pair is generated for this installation.
    pub fn from_verification(verification: &VerifyResponse) -> Self {
        Self::new(verification.token.clone(), DeviceKeys::generate_new())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("verification_token", &"<redacted>")
            .field("device_keys", &self.device_keys)
            .finish()
    }
}

/// Bookkeeping of an in-app purchase, used to reconcile receipts with the logged in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IapInfo {
    pub purchaser: String,
    pub did_upload_receipt: bool,
}

impl IapInfo {
    pub fn new(purchaser: impl Into<String>) -> Self {
        IapInfo {
            purchaser: purchaser.into(),
            did_upload_receipt: false,
        }
    }
}
