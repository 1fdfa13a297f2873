// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

pub(crate) mod register_device;
pub(crate) mod remove_device;
pub(crate) mod update_account;
pub(crate) mod update_servers;
