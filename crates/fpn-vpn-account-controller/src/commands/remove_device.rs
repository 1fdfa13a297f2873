// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use fpn_vpn_api_client::{Device, GuardianApi};
use fpn_vpn_store::AccountStore;

use crate::{error::DeviceManagementError, SharedSessionState};

/// Remove a device from the account. The device is flagged as being removed while the request
/// is in flight and the flag is cleared again if the request fails.
pub(crate) async fn remove_device<A, S>(
    api: &A,
    state: &SharedSessionState<S>,
    device: Device,
) -> Result<(), DeviceManagementError>
where
    A: GuardianApi,
    S: AccountStore,
{
    let Some(token) = state.token() else {
        tracing::warn!("Cannot remove device {} without an account", device);
        return Err(DeviceManagementError::CouldNotRemoveDevice(device));
    };

    tracing::info!("Removing device: {}", device);
    state.update_account(|account| account.user_mut().mark_is_being_removed(&device));

    match api.remove_device(&token, &device.pubkey).await {
        Ok(()) => {
            tracing::info!("Device removed: {}", device);
            state.update_account(|account| account.user_mut().remove(&device));
            Ok(())
        }
        Err(err) => {
            tracing::error!("Remove device error: {}", err);
            state.update_account(|account| account.user_mut().failed_removal(&device));
            Err(DeviceManagementError::CouldNotRemoveDevice(device))
        }
    }
}
