// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

// Store failures are never surfaced to callers, they are logged and treated as "nothing stored".

pub(crate) fn load_or_log<T, E>(what: &str, result: Result<Option<T>, E>) -> Option<T>
where
    E: std::error::Error,
{
    result
        .inspect_err(|err| tracing::error!("Failed to load {} from account store: {}", what, err))
        .ok()
        .flatten()
}

pub(crate) fn save_or_log<E>(what: &str, result: Result<(), E>)
where
    E: std::error::Error,
{
    if let Err(err) = result {
        tracing::error!("Failed to save {} to account store: {}", what, err);
    }
}
