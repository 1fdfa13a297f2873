// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

mod client;
mod error;
mod helpers;

pub mod request;
pub mod response;

pub use client::GuardianApi;
pub use error::{GuardianApiError, Result};
pub use helpers::random_us_city;
pub use response::{
    Device, Subscriptions, User, VerifyResponse, VpnCity, VpnCountry, VpnServer, VpnSubscription,
};
