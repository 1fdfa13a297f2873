// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::{
    error::Result,
    request::AddDeviceRequestBody,
    response::{Device, User, VpnCountry},
};

/// Request/response contract of the remote coordination service.
///
/// Every call is authenticated with the verification token issued at login. Timeouts and
/// retries are a property of the implementation, callers never cancel an in-flight request.
#[async_trait::async_trait]
pub trait GuardianApi: Send + Sync + 'static {
    async fn add_device(&self, token: &str, body: &AddDeviceRequestBody) -> Result<Device>;

    async fn remove_device(&self, token: &str, device_key: &str) -> Result<()>;

    async fn account_info(&self, token: &str) -> Result<User>;

    async fn available_servers(&self, token: &str) -> Result<Vec<VpnCountry>>;

    async fn get_products(&self, token: &str) -> Result<Vec<String>>;

    async fn upload_receipt(&self, token: &str, receipt: &str) -> Result<()>;
}
