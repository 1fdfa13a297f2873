// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

/// The WireGuard tunnel engine, as far as the account manager is concerned.
pub trait TunnelManaging: Send + Sync {
    fn stop_and_remove(&self);
}

/// A background monitor, such as the heartbeat or the connection health monitor.
pub trait ServiceMonitor: Send + Sync {
    fn start(&self);

    fn stop(&self);
}

#[derive(Clone)]
pub struct VpnServices {
    pub tunnel: Arc<dyn TunnelManaging>,
    pub heartbeat_monitor: Arc<dyn ServiceMonitor>,
    pub connection_health_monitor: Arc<dyn ServiceMonitor>,
}

impl VpnServices {
    pub fn new(
        tunnel: Arc<dyn TunnelManaging>,
        heartbeat_monitor: Arc<dyn ServiceMonitor>,
        connection_health_monitor: Arc<dyn ServiceMonitor>,
    ) -> Self {
        VpnServices {
            tunnel,
            heartbeat_monitor,
            connection_health_monitor,
        }
    }

    pub(crate) fn start_heartbeat(&self) {
        tracing::debug!("Starting heartbeat monitor");
        self.heartbeat_monitor.start();
    }

    pub(crate) fn stop_vpn_service(&self) {
        tracing::info!("Stopping VPN service");
        self.tunnel.stop_and_remove();
        self.heartbeat_monitor.stop();
        self.connection_health_monitor.stop();
    }
}
