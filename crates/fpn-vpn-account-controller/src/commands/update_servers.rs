// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use fpn_vpn_api_client::GuardianApi;
use fpn_vpn_store::AccountStore;

use crate::{error::AccountError, util::save_or_log, SharedSessionState};

/// Fetch the server list and replace the available servers wholesale.
pub(crate) async fn retrieve_vpn_servers<A, S>(
    api: &A,
    state: &SharedSessionState<S>,
    token: &str,
) -> Result<(), AccountError>
where
    A: GuardianApi,
    S: AccountStore,
{
    tracing::info!("Retrieving server list");
    let servers = api
        .available_servers(token)
        .await
        .inspect_err(|err| tracing::error!("Server list retrieval error: {}", err))?;

    tracing::info!("Retrieved {} server countries", servers.len());
    save_or_log("server list", state.store().save_vpn_servers(&servers));
    state.set_available_servers(servers);
    Ok(())
}
