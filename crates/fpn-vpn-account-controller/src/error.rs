// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::{io, path::PathBuf};

use fpn_vpn_api_client::{Device, GuardianApiError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create directory {dir}")]
    CreateDirectory { dir: PathBuf, source: io::Error },

    #[error("failed to read config file {file}")]
    ReadConfig { file: PathBuf, source: io::Error },

    #[error("failed to parse config file {file}")]
    ParseConfig {
        file: PathBuf,
        source: Box<toml::de::Error>,
    },

    #[error("failed to serialize config")]
    SerializeConfig(#[source] toml::ser::Error),

    #[error("failed to write config file {file}")]
    WriteConfig { file: PathBuf, source: io::Error },

    #[error("the account manager must be created within a tokio runtime")]
    NoRuntime(#[source] tokio::runtime::TryCurrentError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("maximum number of devices reached")]
    MaxDevicesReached,

    #[error("could not add device")]
    CouldNotAddDevice,

    #[error("could not get the server list")]
    CouldNotGetServers,
}

// A full device quota is the only soft failure, everything else means the device is unusable.
impl From<DeviceManagementError> for LoginError {
    fn from(error: DeviceManagementError) -> Self {
        match error {
            DeviceManagementError::MaxDevicesReached => LoginError::MaxDevicesReached,
            _ => LoginError::CouldNotAddDevice,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceManagementError {
    #[error("could not add device")]
    CouldNotAddDevice,

    #[error("no device public key")]
    NoPublicKey,

    #[error("maximum number of devices reached")]
    MaxDevicesReached,

    #[error("could not remove device {0}")]
    CouldNotRemoveDevice(Device),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("no account found")]
    NoAccountFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("coordination service failure: {0}")]
    Api(String),
}

impl From<GuardianApiError> for AccountError {
    fn from(error: GuardianApiError) -> Self {
        match error {
            GuardianApiError::Unauthorized => AccountError::Unauthorized,
            other => AccountError::Api(other.to_string()),
        }
    }
}
