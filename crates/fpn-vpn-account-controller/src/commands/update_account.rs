// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use fpn_vpn_api_client::GuardianApi;
use fpn_vpn_store::AccountStore;

use crate::{error::AccountError, iap, util::save_or_log, SharedSessionState};

pub(crate) async fn update_user<A, S>(
    api: &A,
    state: &SharedSessionState<S>,
) -> Result<(), AccountError>
where
    A: GuardianApi,
    S: AccountStore,
{
    let Some(token) = state.token() else {
        return Err(AccountError::NoAccountFound);
    };

    tracing::info!("Updating account info");
    let user = api
        .account_info(&token)
        .await
        .inspect_err(|err| tracing::error!("Account error: {}", err))?;

    if state
        .update_account(|account| account.set_user(user.clone()))
        .is_none()
    {
        tracing::info!("Account logged out while updating account info");
        return Err(AccountError::NoAccountFound);
    }
    save_or_log("user", state.store().save_user(&user));

    // An expired in-app purchase that was already reconciled must not look entitled anymore
    if !user.is_subscription_active()
        && iap::is_iap_account(state)
        && iap::did_upload_receipt(state)
    {
        tracing::info!("Subscription inactive for in-app purchase account, removing IAP info");
        save_or_log("IAP info", state.store().remove_iap_info());
    }
    Ok(())
}
