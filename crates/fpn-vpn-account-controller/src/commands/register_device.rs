// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use fpn_vpn_api_client::{request::AddDeviceRequestBody, GuardianApi};
use fpn_vpn_store::AccountStore;

use crate::{
    commands::update_account, error::DeviceManagementError, util::save_or_log,
    SharedSessionState,
};

pub(crate) async fn add_current_device<A, S>(
    api: &A,
    state: &SharedSessionState<S>,
    device_name: &str,
) -> Result<(), DeviceManagementError>
where
    A: GuardianApi,
    S: AccountStore,
{
    let Some(account) = state.account() else {
        tracing::warn!("Cannot add device without an account");
        return Err(DeviceManagementError::CouldNotAddDevice);
    };
    let Some(pubkey) = account.device_public_key() else {
        tracing::warn!("Cannot add device without a public key");
        return Err(DeviceManagementError::NoPublicKey);
    };

    let body = AddDeviceRequestBody {
        name: device_name.to_string(),
        pubkey,
    };
    tracing::info!("Registering device: {}", body.name);

    let device = api
        .add_device(account.token(), &body)
        .await
        .inspect_err(|err| tracing::error!("Add device error: {}", err))
        .map_err(|err| {
            if err.is_max_devices_reached() {
                DeviceManagementError::MaxDevicesReached
            } else {
                DeviceManagementError::CouldNotAddDevice
            }
        })?;
    tracing::info!("Device registered: {}", device);

    if state
        .update_account(|account| account.set_current_device(device.clone()))
        .is_none()
    {
        tracing::warn!("Account logged out while registering device {}", device);
        return Err(DeviceManagementError::CouldNotAddDevice);
    }
    save_or_log("current device", state.store().save_current_device(&device));

    // Pull the server side view of the account so the device list includes this device
    if let Err(err) = update_account::update_user(api, state).await {
        tracing::warn!("Failed to refresh account after registering device: {}", err);
    }
    Ok(())
}
