// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
};

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

use fpn_vpn_api_client::{Device, User, VpnCity, VpnCountry};
use serde::{de::DeserializeOwned, Serialize};

use crate::{AccountStore, Credentials, IapInfo};

#[derive(Debug, thiserror::Error)]
pub enum OnDiskAccountStoreError {
    #[error("failed to create directory {dir}")]
    CreateDirectory { dir: PathBuf, source: io::Error },

    #[error("failed to set permissions on {path}")]
    SetPermissions { path: PathBuf, source: io::Error },

    #[error("failed to read {path}")]
    ReadFile { path: PathBuf, source: io::Error },

    #[error("failed to write {path}")]
    WriteFile { path: PathBuf, source: io::Error },

    #[error("failed to remove {path}")]
    RemoveFile { path: PathBuf, source: io::Error },

    #[error("failed to parse {path}")]
    Deserialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize {path}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub struct AccountStorePaths {
    pub data_dir: PathBuf,
    pub credentials_file: PathBuf,
    pub user_file: PathBuf,
    pub selected_city_file: PathBuf,
    pub current_device_file: PathBuf,
    pub vpn_servers_file: PathBuf,
    pub iap_info_file: PathBuf,
}

impl AccountStorePaths {
    pub fn new<P: AsRef<Path>>(base_data_directory: P) -> Self {
        let base_dir = base_data_directory.as_ref();
        AccountStorePaths {
            data_dir: base_dir.to_path_buf(),
            credentials_file: base_dir.join("credentials.json"),
            user_file: base_dir.join("user.json"),
            selected_city_file: base_dir.join("selected_city.json"),
            current_device_file: base_dir.join("current_device.json"),
            vpn_servers_file: base_dir.join("vpn_servers.json"),
            iap_info_file: base_dir.join("iap_info.json"),
        }
    }

    fn all_files(&self) -> [&Path; 6] {
        [
            self.credentials_file.as_path(),
            self.user_file.as_path(),
            self.selected_city_file.as_path(),
            self.current_device_file.as_path(),
            self.vpn_servers_file.as_path(),
            self.iap_info_file.as_path(),
        ]
    }
}

pub struct OnDiskAccountStore {
    paths: AccountStorePaths,
}

impl OnDiskAccountStore {
    pub fn new(paths: AccountStorePaths) -> Self {
        OnDiskAccountStore { paths }
    }

    pub fn paths(&self) -> &AccountStorePaths {
        &self.paths
    }

    fn ensure_data_dir(&self) -> Result<(), OnDiskAccountStoreError> {
        let dir = &self.paths.data_dir;
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| {
                OnDiskAccountStoreError::CreateDirectory {
                    dir: dir.clone(),
                    source,
                }
            })?;
            tracing::info!("Created account data dir at {}", dir.display());
        }

        // rwx------
        restrict_mode(dir, 0o700)
    }

    fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>, OnDiskAccountStoreError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(OnDiskAccountStoreError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_reader(BufReader::new(file))
            .map(Some)
            .map_err(|source| OnDiskAccountStoreError::Deserialize {
                path: path.to_path_buf(),
                source,
            })
    }

    fn save<T: Serialize + ?Sized>(
        &self,
        path: &Path,
        value: &T,
    ) -> Result<(), OnDiskAccountStoreError> {
        self.save_with_mode(path, value, 0o644)
    }

    fn save_with_mode<T: Serialize + ?Sized>(
        &self,
        path: &Path,
        value: &T,
        mode: u32,
    ) -> Result<(), OnDiskAccountStoreError> {
        self.ensure_data_dir()?;
        let json =
            serde_json::to_vec_pretty(value).map_err(|source| OnDiskAccountStoreError::Serialize {
                path: path.to_path_buf(),
                source,
            })?;

        // The mode only applies when the file is created, an existing file is restricted first
        if path.exists() {
            restrict_mode(path, mode)?;
        }
        open_for_write(path, mode)
            .and_then(|mut file| file.write_all(&json))
            .map_err(|source| OnDiskAccountStoreError::WriteFile {
                path: path.to_path_buf(),
                source,
            })
    }

    fn remove(&self, path: &Path) -> Result<(), OnDiskAccountStoreError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(OnDiskAccountStoreError::RemoveFile {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(unix)]
fn open_for_write(path: &Path, mode: u32) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)
}

#[cfg(not(unix))]
fn open_for_write(path: &Path, _mode: u32) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

// Drop any permission bits beyond `mode`, leaving stricter permissions alone
#[cfg(unix)]
fn restrict_mode(path: &Path, mode: u32) -> Result<(), OnDiskAccountStoreError> {
    let map_err = |source| OnDiskAccountStoreError::SetPermissions {
        path: path.to_path_buf(),
        source,
    };
    let current = fs::metadata(path).map_err(map_err)?.permissions().mode() & 0o777;
    if current & !mode == 0 {
        return Ok(());
    }
    fs::set_permissions(path, fs::Permissions::from_mode(current & mode)).map_err(map_err)
}

#[cfg(not(unix))]
fn restrict_mode(_path: &Path, _mode: u32) -> Result<(), OnDiskAccountStoreError> {
    Ok(())
}

impl AccountStore for OnDiskAccountStore {
    type StorageError = OnDiskAccountStoreError;

    fn load_credentials(&self) -> Result<Option<Credentials>, Self::StorageError> {
        self.load(&self.paths.credentials_file)
    }

    fn save_credentials(&self, credentials: &Credentials) -> Result<(), Self::StorageError> {
        // rw-------
        self.save_with_mode(&self.paths.credentials_file, credentials, 0o600)
    }

    fn load_user(&self) -> Result<Option<User>, Self::StorageError> {
        self.load(&self.paths.user_file)
    }

    fn save_user(&self, user: &User) -> Result<(), Self::StorageError> {
        self.save(&self.paths.user_file, user)
    }

    fn load_selected_city(&self) -> Result<Option<VpnCity>, Self::StorageError> {
        self.load(&self.paths.selected_city_file)
    }

    fn save_selected_city(&self, city: &VpnCity) -> Result<(), Self::StorageError> {
        self.save(&self.paths.selected_city_file, city)
    }

    fn load_current_device(&self) -> Result<Option<Device>, Self::StorageError> {
        self.load(&self.paths.current_device_file)
    }

    fn save_current_device(&self, device: &Device) -> Result<(), Self::StorageError> {
        self.save(&self.paths.current_device_file, device)
    }

    fn load_vpn_servers(&self) -> Result<Option<Vec<VpnCountry>>, Self::StorageError> {
        self.load(&self.paths.vpn_servers_file)
    }

    fn save_vpn_servers(&self, servers: &[VpnCountry]) -> Result<(), Self::StorageError> {
        self.save(&self.paths.vpn_servers_file, servers)
    }

    fn load_iap_info(&self) -> Result<Option<IapInfo>, Self::StorageError> {
        self.load(&self.paths.iap_info_file)
    }

    fn save_iap_info(&self, iap_info: &IapInfo) -> Result<(), Self::StorageError> {
        self.save(&self.paths.iap_info_file, iap_info)
    }

    fn remove_iap_info(&self) -> Result<(), Self::StorageError> {
        self.remove(&self.paths.iap_info_file)
    }

    fn remove_all(&self) -> Result<(), Self::StorageError> {
        for path in self.paths.all_files() {
            self.remove(path)?;
        }
        tracing::info!("Removed all stored account data");
        Ok(())
    }
}
