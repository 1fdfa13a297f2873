// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use fpn_vpn_store::{AccountStore, IapInfo};

use crate::{
    util::{load_or_log, save_or_log},
    SharedSessionState,
};

fn load_iap_info<S: AccountStore>(state: &SharedSessionState<S>) -> Option<IapInfo> {
    load_or_log("IAP info", state.store().load_iap_info())
}

/// The logged in account is the one that made the stored in-app purchase.
pub(crate) fn is_iap_account<S: AccountStore>(state: &SharedSessionState<S>) -> bool {
    let Some(iap_info) = load_iap_info(state) else {
        return false;
    };
    state
        .account()
        .is_some_and(|account| account.user().email == iap_info.purchaser)
}

pub(crate) fn did_upload_receipt<S: AccountStore>(state: &SharedSessionState<S>) -> bool {
    load_iap_info(state).is_some_and(|iap_info| iap_info.did_upload_receipt)
}

pub(crate) fn save_iap_info<S: AccountStore>(state: &SharedSessionState<S>) {
    let Some(account) = state.account() else {
        return;
    };
    if load_iap_info(state).is_some() {
        return;
    }
    tracing::info!("Saving IAP info");
    save_or_log(
        "IAP info",
        state
            .store()
            .save_iap_info(&IapInfo::new(account.user().email.clone())),
    );
}

pub(crate) fn update_iap_info<S: AccountStore>(state: &SharedSessionState<S>) {
    let Some(mut iap_info) = load_iap_info(state) else {
        return;
    };
    if !is_iap_account(state) {
        return;
    }
    tracing::info!("Marking IAP receipt as uploaded");
    iap_info.did_upload_receipt = true;
    save_or_log("IAP info", state.store().save_iap_info(&iap_info));
}
