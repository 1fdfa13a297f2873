// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use fpn_vpn_api_client::{random_us_city, Device, GuardianApi, VerifyResponse, VpnCity, VpnCountry};
use fpn_vpn_store::{AccountStore, Credentials, OnDiskAccountStore};
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{
    account::{Account, SessionAccount},
    commands::{register_device, remove_device, update_account, update_servers},
    config::AccountManagerConfig,
    error::{AccountError, DeviceManagementError, Error, LoginError},
    iap,
    notifications::{self, NotificationBus},
    services::VpnServices,
    shared_state::SharedSessionState,
    util::{load_or_log, save_or_log},
};

/// Orchestrates login, device registration, server list refresh and logout, and keeps the
/// session state and the account store consistent with each other.
pub struct AccountManager<A, S> {
    // The client used to talk to the coordination service
    api: Arc<A>,

    // Session state observed by the UI, owns the account store
    state: SharedSessionState<S>,

    // Tunnel and monitors stopped on logout and on subscription expiry
    services: VpnServices,

    // Name this device is registered under
    device_name: String,

    // Cancels the expired subscription listener when the manager is dropped
    _expiry_listener: DropGuard,
}

impl<A> AccountManager<A, OnDiskAccountStore>
where
    A: GuardianApi,
{
    pub fn from_config(
        api: Arc<A>,
        config: &AccountManagerConfig,
        services: VpnServices,
        notifications: &NotificationBus,
    ) -> Result<Self, Error> {
        Self::new(
            api,
            Arc::new(config.account_store()),
            services,
            notifications,
            config.device_name.clone(),
        )
    }
}

impl<A, S> AccountManager<A, S>
where
    A: GuardianApi,
    S: AccountStore,
{
    /// Fails with [`Error::NoRuntime`] outside of a tokio runtime, the expired subscription
    /// listener is spawned onto the current one.
    pub fn new(
        api: Arc<A>,
        store: Arc<S>,
        services: VpnServices,
        notifications: &NotificationBus,
        device_name: impl Into<String>,
    ) -> Result<Self, Error> {
        let cancel_token = CancellationToken::new();
        notifications::spawn_expired_subscription_listener(
            notifications,
            services.clone(),
            cancel_token.clone(),
        )
        .inspect_err(|err| tracing::error!("Failed to start the subscription listener: {}", err))
        .map_err(Error::NoRuntime)?;

        Ok(AccountManager {
            api,
            state: SharedSessionState::new(store),
            services,
            device_name: device_name.into(),
            _expiry_listener: cancel_token.drop_guard(),
        })
    }

    pub fn shared_state(&self) -> SharedSessionState<S> {
        self.state.clone()
    }

    pub fn account(&self) -> Option<Account> {
        self.state.account()
    }

    pub fn available_servers(&self) -> Vec<VpnCountry> {
        self.state.available_servers()
    }

    pub fn selected_city(&self) -> Option<VpnCity> {
        self.state.selected_city()
    }

    pub fn is_subscription_active(&self) -> bool {
        self.state.is_subscription_active()
    }

    pub fn subscribe_subscription_active(&self) -> watch::Receiver<bool> {
        self.state.subscribe_subscription_active()
    }

    pub fn update_selected_city(&self, city: VpnCity) {
        self.state.set_selected_city(Some(city));
    }

    pub async fn login(&self, verification: VerifyResponse) -> Result<(), LoginError> {
        tracing::info!("Logging in");
        let credentials = Credentials::from_verification(&verification);
        let account = Account::new(credentials.clone(), verification.user.clone(), None);
        let is_subscription_active = account.is_subscription_active();

        // Installed right away so the device registration below sees the new account
        self.state.set_account(SessionAccount::LoggedIn(account));

        let add_device = async {
            if is_subscription_active {
                Some(self.add_current_device().await)
            } else {
                tracing::info!("Subscription inactive, skipping device registration");
                None
            }
        };
        let retrieve_servers = self.retrieve_vpn_servers(&verification.token);

        let (add_device_result, retrieve_servers_result) =
            tokio::join!(add_device, retrieve_servers);

        match (add_device_result, retrieve_servers_result) {
            (Some(Err(DeviceManagementError::MaxDevicesReached)), _) => {
                tracing::warn!("Logged in, but the maximum number of devices is reached");
                self.finish_login(&credentials, verification);
                Err(LoginError::MaxDevicesReached)
            }
            (Some(Err(err)), _) => {
                tracing::error!("Login failed, could not add device: {}", err);
                Err(LoginError::from(err))
            }
            (_, Err(err)) => {
                tracing::error!("Login failed, could not get servers: {}", err);
                self.remove_current_device_in_background();
                Err(LoginError::CouldNotGetServers)
            }
            (Some(Ok(())) | None, Ok(())) => {
                self.finish_login(&credentials, verification);
                tracing::info!("Logged in");
                Ok(())
            }
        }
    }

    fn finish_login(&self, credentials: &Credentials, verification: VerifyResponse) {
        // Prefer the user refreshed during device registration over the one we logged in with
        let user = self
            .state
            .account()
            .map(|account| account.user().clone())
            .unwrap_or(verification.user);

        let store = self.state.store();
        save_or_log("credentials", store.save_credentials(credentials));
        save_or_log("user", store.save_user(&user));

        self.select_stored_or_default_city();
        self.services.start_heartbeat();
    }

    fn select_stored_or_default_city(&self) {
        let city = load_or_log("selected city", self.state.store().load_selected_city())
            .or_else(|| random_us_city(&self.state.available_servers()));
        if city.is_none() {
            tracing::warn!("No stored city and no US city available");
        }
        self.state.set_selected_city(city);
    }

    // Undo a registration that is useless without a server list, the outcome is not awaited
    fn remove_current_device_in_background(&self) {
        let Some(device) = self
            .state
            .account()
            .and_then(|account| account.current_device().cloned())
        else {
            return;
        };

        let api = Arc::clone(&self.api);
        let state = self.state.clone();
        tokio::spawn(async move {
            if let Err(err) = remove_device::remove_device(api.as_ref(), &state, device).await {
                tracing::warn!("Failed to remove device after failed login: {}", err);
            }
        });
    }

    /// Restore the session from the account store without touching the network.
    pub fn login_with_stored_credentials(&self) -> bool {
        let store = self.state.store();
        let credentials = load_or_log("credentials", store.load_credentials());
        let user = load_or_log("user", store.load_user());
        let (Some(credentials), Some(user)) = (credentials, user) else {
            tracing::info!("No stored credentials to restore");
            return false;
        };

        let current_device = load_or_log("current device", store.load_current_device());
        self.state.set_account(SessionAccount::LoggedIn(Account::new(
            credentials,
            user,
            current_device,
        )));
        self.state.set_available_servers(
            load_or_log("server list", store.load_vpn_servers()).unwrap_or_default(),
        );
        self.select_stored_or_default_city();
        self.services.start_heartbeat();

        tracing::info!("Logged in with stored credentials");
        true
    }

    /// Log out. The local session is always torn down, a failure to remove this device from the
    /// account is still reported.
    pub async fn logout(&self) -> Result<(), DeviceManagementError> {
        let registered_device = self.state.account().and_then(|account| {
            if !account.is_subscription_active() {
                return None;
            }
            let device = account.current_device().cloned()?;
            Some((account.token().to_string(), device))
        });

        let Some((token, device)) = registered_device else {
            self.reset_account();
            return Ok(());
        };

        tracing::info!("Removing device {} before logging out", device);
        let result = self.api.remove_device(&token, &device.pubkey).await;
        self.reset_account();
        result.map_err(|err| {
            tracing::error!("Logout error: {}", err);
            DeviceManagementError::CouldNotRemoveDevice(device)
        })
    }

    fn reset_account(&self) {
        self.services.stop_vpn_service();
        self.state.reset();
        save_or_log("reset", self.state.store().remove_all());
        tracing::info!("Reset account");
    }

    pub async fn add_current_device(&self) -> Result<(), DeviceManagementError> {
        register_device::add_current_device(self.api.as_ref(), &self.state, &self.device_name)
            .await
    }

    pub async fn remove(&self, device: Device) -> Result<(), DeviceManagementError> {
        remove_device::remove_device(self.api.as_ref(), &self.state, device).await
    }

    pub async fn get_user(&self) -> Result<(), AccountError> {
        update_account::update_user(self.api.as_ref(), &self.state).await
    }

    pub async fn retrieve_vpn_servers(&self, token: &str) -> Result<(), AccountError> {
        update_servers::retrieve_vpn_servers(self.api.as_ref(), &self.state, token).await
    }

    pub fn is_iap_account(&self) -> bool {
        iap::is_iap_account(&self.state)
    }

    pub fn did_upload_receipt(&self) -> bool {
        iap::did_upload_receipt(&self.state)
    }

    pub fn save_iap_info(&self) {
        iap::save_iap_info(&self.state);
    }

    pub fn update_iap_info(&self) {
        iap::update_iap_info(&self.state);
    }

    /// Register this device once a purchase went through.
    pub async fn handle_after_purchased(&self) -> Result<(), LoginError> {
        self.add_current_device().await.map_err(LoginError::from)
    }

    pub async fn get_products(&self) -> Result<Vec<String>, AccountError> {
        let token = self.state.token().ok_or(AccountError::NoAccountFound)?;
        self.api
            .get_products(&token)
            .await
            .inspect_err(|err| tracing::error!("Get products error: {}", err))
            .map_err(AccountError::from)
    }

    pub async fn upload_receipt(&self, receipt: &str) -> Result<(), AccountError> {
        let token = self.state.token().ok_or(AccountError::NoAccountFound)?;
        self.api
            .upload_receipt(&token, receipt)
            .await
            .inspect_err(|err| tracing::error!("Upload receipt error: {}", err))
            .map_err(AccountError::from)
    }
}
