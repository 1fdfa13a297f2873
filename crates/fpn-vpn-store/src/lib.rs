// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::error::Error;

use fpn_vpn_api_client::{Device, User, VpnCity, VpnCountry};

pub use credentials::{Credentials, IapInfo};
pub use device_keys::DeviceKeys;
pub use ephemeral::InMemAccountStore;
pub use on_disk::{AccountStorePaths, OnDiskAccountStore, OnDiskAccountStoreError};

mod credentials;
mod device_keys;
mod ephemeral;
mod on_disk;

/// Durable key-value storage for everything the account manager needs to restore a session.
///
/// Loads return `Ok(None)` when nothing has been stored for that key.
pub trait AccountStore: Send + Sync + 'static {
    type StorageError: Error + Send + Sync + 'static;

    fn load_credentials(&self) -> Result<Option<Credentials>, Self::StorageError>;

    fn save_credentials(&self, credentials: &Credentials) -> Result<(), Self::StorageError>;

    fn load_user(&self) -> Result<Option<User>, Self::StorageError>;

    fn save_user(&self, user: &User) -> Result<(), Self::StorageError>;

    fn load_selected_city(&self) -> Result<Option<VpnCity>, Self::StorageError>;

    fn save_selected_city(&self, city: &VpnCity) -> Result<(), Self::StorageError>;

    fn load_current_device(&self) -> Result<Option<Device>, Self::StorageError>;

    fn save_current_device(&self, device: &Device) -> Result<(), Self::StorageError>;

    fn load_vpn_servers(&self) -> Result<Option<Vec<VpnCountry>>, Self::StorageError>;

    fn save_vpn_servers(&self, servers: &[VpnCountry]) -> Result<(), Self::StorageError>;

    fn load_iap_info(&self) -> Result<Option<IapInfo>, Self::StorageError>;

    fn save_iap_info(&self, iap_info: &IapInfo) -> Result<(), Self::StorageError>;

    fn remove_iap_info(&self) -> Result<(), Self::StorageError>;

    /// Wipe every stored key.
    fn remove_all(&self) -> Result<(), Self::StorageError>;
}
