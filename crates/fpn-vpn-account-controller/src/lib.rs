// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

// The account manager is responsible for
// 1. logging in with a verification payload, or restoring a stored session
// 2. registering this device with the coordination service
// 3. keeping the server list, selected city and subscription state up to date
// 4. stopping the tunnel when the subscription expires or the user logs out

pub mod config;
pub mod logging;
pub mod notifications;
pub mod services;
pub mod shared_state;

mod account;
mod commands;
mod controller;
mod error;
mod iap;
mod util;

#[cfg(test)]
mod testing;

pub use account::{Account, SessionAccount};
pub use config::AccountManagerConfig;
pub use controller::AccountManager;
pub use error::{AccountError, DeviceManagementError, Error, LoginError};
pub use notifications::{AppNotification, NotificationBus};
pub use services::{ServiceMonitor, TunnelManaging, VpnServices};
pub use shared_state::{SessionState, SharedSessionState};
