// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use fpn_vpn_api_client::{Device, User};
use fpn_vpn_store::Credentials;

/// Authenticated identity: credentials, the user profile and, once registered, this device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    credentials: Credentials,
    user: User,
    current_device: Option<Device>,
}

impl Account {
    pub fn new(credentials: Credentials, user: User, current_device: Option<Device>) -> Self {
        Account {
            credentials,
            user,
            current_device,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn token(&self) -> &str {
        &self.credentials.verification_token
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn current_device(&self) -> Option<&Device> {
        self.current_device.as_ref()
    }

    pub fn is_subscription_active(&self) -> bool {
        self.user.is_subscription_active()
    }

    pub fn device_public_key(&self) -> Option<String> {
        self.credentials.device_keys.public_key()
    }

    pub(crate) fn user_mut(&mut self) -> &mut User {
        &mut self.user
    }

    pub(crate) fn set_user(&mut self, user: User) {
        self.user = user;
    }

    pub(crate) fn set_current_device(&mut self, device: Device) {
        self.current_device = Some(device);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionAccount {
    #[default]
    LoggedOut,
    LoggedIn(Account),
}

impl SessionAccount {
    pub fn logged_in(&self) -> Option<&Account> {
        match self {
            SessionAccount::LoggedIn(account) => Some(account),
            SessionAccount::LoggedOut => None,
        }
    }

    pub(crate) fn logged_in_mut(&mut self) -> Option<&mut Account> {
        match self {
            SessionAccount::LoggedIn(account) => Some(account),
            SessionAccount::LoggedOut => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionAccount::LoggedIn(_))
    }

    pub fn is_subscription_active(&self) -> bool {
        self.logged_in()
            .is_some_and(Account::is_subscription_active)
    }
}

impl From<Option<Account>> for SessionAccount {
    fn from(account: Option<Account>) -> Self {
        account.map_or(SessionAccount::LoggedOut, SessionAccount::LoggedIn)
    }
}
