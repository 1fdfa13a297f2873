// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    pub subscriptions: Subscriptions,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub max_devices: u32,
}

impl User {
    pub fn is_subscription_active(&self) -> bool {
        self.subscriptions.vpn.active
    }

    pub fn device(&self, pubkey: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.pubkey == pubkey)
    }

    pub fn mark_is_being_removed(&mut self, device: &Device) {
        self.set_being_removed(device, true);
    }

    pub fn failed_removal(&mut self, device: &Device) {
        self.set_being_removed(device, false);
    }

    pub fn remove(&mut self, device: &Device) {
        self.devices.retain(|d| d.pubkey != device.pubkey);
    }

    fn set_being_removed(&mut self, device: &Device, is_being_removed: bool) {
        if let Some(d) = self.devices.iter_mut().find(|d| d.pubkey == device.pubkey) {
            d.is_being_removed = is_being_removed;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriptions {
    pub vpn: VpnSubscription,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpnSubscription {
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub renews_on: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    pub pubkey: String,
    #[serde(default)]
    pub created_at: Option<String>,

    // Only tracked locally while a removal request is in flight
    #[serde(skip)]
    pub is_being_removed: bool,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.pubkey)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpnCountry {
    pub name: String,
    pub code: String,
    pub cities: Vec<VpnCity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpnCity {
    pub name: String,
    pub code: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub servers: Vec<VpnServer>,
}

impl fmt::Display for VpnCity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpnServer {
    pub hostname: String,
    pub ipv4_addr_in: String,
    #[serde(default)]
    pub ipv6_addr_in: Option<String>,
    pub public_key: String,
    pub weight: u32,
    #[serde(default)]
    pub include_in_country: bool,
    pub ipv4_gateway: String,
    #[serde(default)]
    pub ipv6_gateway: Option<String>,
    #[serde(default)]
    pub port_ranges: Vec<(u16, u16)>,
}
