// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::{fmt, sync::Arc};

use fpn_vpn_api_client::{VpnCity, VpnCountry};
use fpn_vpn_store::AccountStore;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::{
    account::{Account, SessionAccount},
    util::save_or_log,
};

/// In-memory view of the session, observed by the UI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    account: SessionAccount,
    available_servers: Vec<VpnCountry>,
    selected_city: Option<VpnCity>,
}

impl SessionState {
    pub fn account(&self) -> &SessionAccount {
        &self.account
    }

    pub fn available_servers(&self) -> &[VpnCountry] {
        &self.available_servers
    }

    pub fn selected_city(&self) -> Option<&VpnCity> {
        self.selected_city.as_ref()
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SessionState {{ Logged in: {}, Subscription active: {}, Server countries: {}, Selected city: {} }}",
            self.account.is_logged_in(),
            self.account.is_subscription_active(),
            self.available_servers.len(),
            self.selected_city
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "None".to_string()),
        )
    }
}

/// Handle to the session state. Every mutation goes through the setters below, which keep the
/// subscription signal and the persisted selected city in sync with the state.
pub struct SharedSessionState<S> {
    inner: Arc<Mutex<SessionState>>,
    subscription_active: Arc<watch::Sender<bool>>,
    store: Arc<S>,
}

impl<S> Clone for SharedSessionState<S> {
    fn clone(&self) -> Self {
        SharedSessionState {
            inner: Arc::clone(&self.inner),
            subscription_active: Arc::clone(&self.subscription_active),
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: AccountStore> SharedSessionState<S> {
    pub(crate) fn new(store: Arc<S>) -> Self {
        let (subscription_active, _) = watch::channel(false);
        SharedSessionState {
            inner: Arc::new(Mutex::new(SessionState::default())),
            subscription_active: Arc::new(subscription_active),
            store,
        }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.lock().clone()
    }

    pub fn account(&self) -> Option<Account> {
        self.inner.lock().account.logged_in().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .lock()
            .account
            .logged_in()
            .map(|account| account.token().to_string())
    }

    pub fn available_servers(&self) -> Vec<VpnCountry> {
        self.inner.lock().available_servers.clone()
    }

    pub fn selected_city(&self) -> Option<VpnCity> {
        self.inner.lock().selected_city.clone()
    }

    pub fn is_subscription_active(&self) -> bool {
        *self.subscription_active.borrow()
    }

    /// Receivers start with the latest value and are notified on every account mutation.
    pub fn subscribe_subscription_active(&self) -> watch::Receiver<bool> {
        self.subscription_active.subscribe()
    }

    pub(crate) fn set_account(&self, account: SessionAccount) {
        let mut guard = self.inner.lock();
        tracing::info!("Setting account, logged in: {}", account.is_logged_in());
        guard.account = account;
        self.publish_subscription_active(&guard);
    }

    /// Mutate the logged in account, `None` if there is no account.
    pub(crate) fn update_account<R>(&self, f: impl FnOnce(&mut Account) -> R) -> Option<R> {
        let mut guard = self.inner.lock();
        let result = guard.account.logged_in_mut().map(f);
        if result.is_some() {
            self.publish_subscription_active(&guard);
        }
        result
    }

    pub(crate) fn set_available_servers(&self, servers: Vec<VpnCountry>) {
        let mut guard = self.inner.lock();
        tracing::debug!("Setting {} available server countries", servers.len());
        guard.available_servers = servers;
    }

    pub(crate) fn set_selected_city(&self, city: Option<VpnCity>) {
        let mut guard = self.inner.lock();
        if let Some(city) = &city {
            tracing::info!("Setting selected city to {}", city);
            save_or_log("selected city", self.store.save_selected_city(city));
        }
        guard.selected_city = city;
    }

    pub(crate) fn reset(&self) {
        let mut guard = self.inner.lock();
        *guard = SessionState::default();
        self.publish_subscription_active(&guard);
    }

    fn publish_subscription_active(&self, state: &SessionState) {
        let is_active = state.account.is_subscription_active();
        let was_active = self.subscription_active.send_replace(is_active);
        if was_active != is_active {
            tracing::info!("Subscription active changed to {}", is_active);
        }
    }
}
