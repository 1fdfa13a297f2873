// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::convert::Infallible;

use fpn_vpn_api_client::{Device, User, VpnCity, VpnCountry};
use parking_lot::Mutex;

use crate::{AccountStore, Credentials, IapInfo};

#[derive(Default)]
struct StoredAccount {
    credentials: Option<Credentials>,
    user: Option<User>,
    selected_city: Option<VpnCity>,
    current_device: Option<Device>,
    vpn_servers: Option<Vec<VpnCountry>>,
    iap_info: Option<IapInfo>,
}

/// Account store that only lives as long as the process.
#[derive(Default)]
pub struct InMemAccountStore {
    inner: Mutex<StoredAccount>,
}

impl InMemAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemAccountStore {
    type StorageError = Infallible;

    fn load_credentials(&self) -> Result<Option<Credentials>, Self::StorageError> {
        Ok(self.inner.lock().credentials.clone())
    }

    fn save_credentials(&self, credentials: &Credentials) -> Result<(), Self::StorageError> {
        self.inner.lock().credentials = Some(credentials.clone());
        Ok(())
    }

    fn load_user(&self) -> Result<Option<User>, Self::StorageError> {
        Ok(self.inner.lock().user.clone())
    }

    fn save_user(&self, user: &User) -> Result<(), Self::StorageError> {
        self.inner.lock().user = Some(user.clone());
        Ok(())
    }

    fn load_selected_city(&self) -> Result<Option<VpnCity>, Self::StorageError> {
        Ok(self.inner.lock().selected_city.clone())
    }

    fn save_selected_city(&self, city: &VpnCity) -> Result<(), Self::StorageError> {
        self.inner.lock().selected_city = Some(city.clone());
        Ok(())
    }

    fn load_current_device(&self) -> Result<Option<Device>, Self::StorageError> {
        Ok(self.inner.lock().current_device.clone())
    }

    fn save_current_device(&self, device: &Device) -> Result<(), Self::StorageError> {
        self.inner.lock().current_device = Some(device.clone());
        Ok(())
    }

    fn load_vpn_servers(&self) -> Result<Option<Vec<VpnCountry>>, Self::StorageError> {
        Ok(self.inner.lock().vpn_servers.clone())
    }

    fn save_vpn_servers(&self, servers: &[VpnCountry]) -> Result<(), Self::StorageError> {
        self.inner.lock().vpn_servers = Some(servers.to_vec());
        Ok(())
    }

    fn load_iap_info(&self) -> Result<Option<IapInfo>, Self::StorageError> {
        Ok(self.inner.lock().iap_info.clone())
    }

    fn save_iap_info(&self, iap_info: &IapInfo) -> Result<(), Self::StorageError> {
        self.inner.lock().iap_info = Some(iap_info.clone());
        Ok(())
    }

    fn remove_iap_info(&self) -> Result<(), Self::StorageError> {
        self.inner.lock().iap_info = None;
        Ok(())
    }

    fn remove_all(&self) -> Result<(), Self::StorageError> {
        *self.inner.lock() = StoredAccount::default();
        Ok(())
    }
}
