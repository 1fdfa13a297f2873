// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardianApiError {
    #[error("maximum number of devices reached")]
    MaxDevicesReached,

    #[error("unauthorized")]
    Unauthorized,

    #[error("endpoint failure ({status}): {message}")]
    EndpointFailure { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl GuardianApiError {
    pub fn is_max_devices_reached(&self) -> bool {
        matches!(self, GuardianApiError::MaxDevicesReached)
    }
}

pub type Result<T> = std::result::Result<T, GuardianApiError>;
