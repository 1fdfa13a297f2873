// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use fpn_vpn_store::{AccountStorePaths, OnDiskAccountStore};
use serde::{Deserialize, Serialize};

use crate::error::Error;

const DEFAULT_DATA_DIR_NAME: &str = "fpn-vpn";
pub const DEFAULT_CONFIG_FILE: &str = "fpn-vpn-account.toml";

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DATA_DIR_NAME)
}

fn default_device_name() -> String {
    format!("{} device", std::env::consts::OS)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountManagerConfig {
    /// Name this device is registered under with the coordination service.
    pub device_name: String,

    /// Directory the account store persists into.
    pub data_dir: PathBuf,
}

impl Default for AccountManagerConfig {
    fn default() -> Self {
        AccountManagerConfig {
            device_name: default_device_name(),
            data_dir: default_data_dir(),
        }
    }
}

impl fmt::Display for AccountManagerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "device name: {}, data dir: {}",
            self.device_name,
            self.data_dir.display()
        )
    }
}

impl AccountManagerConfig {
    /// Read the config, creating the file with defaults if it does not exist yet.
    pub fn read_from_file(file_path: &Path) -> Result<Self, Error> {
        if !file_path.exists() {
            return Self::default().create_file(file_path);
        }

        let content = fs::read_to_string(file_path).map_err(|source| Error::ReadConfig {
            file: file_path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| Error::ParseConfig {
            file: file_path.to_path_buf(),
            source: Box::new(source),
        })?;
        tracing::info!("Read config: {}", config);
        Ok(config)
    }

    pub fn write_to_file(&self, file_path: &Path) -> Result<(), Error> {
        let content = toml::to_string(self).map_err(Error::SerializeConfig)?;
        fs::write(file_path, content).map_err(|source| Error::WriteConfig {
            file: file_path.to_path_buf(),
            source,
        })?;
        tracing::info!("Config file updated at {}", file_path.display());
        Ok(())
    }

    fn create_file(self, file_path: &Path) -> Result<Self, Error> {
        tracing::info!("Creating config file at {}", file_path.display());
        if let Some(config_dir) = file_path.parent() {
            fs::create_dir_all(config_dir).map_err(|source| Error::CreateDirectory {
                dir: config_dir.to_path_buf(),
                source,
            })?;
        }
        self.write_to_file(file_path)?;
        Ok(self)
    }

    pub fn account_store(&self) -> OnDiskAccountStore {
        OnDiskAccountStore::new(AccountStorePaths::new(&self.data_dir))
    }
}
