// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

// Fixtures and fakes shared by the unit tests of this crate.

use std::{
    convert::Infallible,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use fpn_vpn_api_client::{
    request::AddDeviceRequestBody, Device, GuardianApi, GuardianApiError, Subscriptions, User,
    VpnCity, VpnCountry, VpnSubscription,
};
use fpn_vpn_store::{AccountStore, Credentials, IapInfo, InMemAccountStore};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::services::{ServiceMonitor, TunnelManaging, VpnServices};

pub(crate) fn test_user(active: bool) -> User {
    User {
        email: "user@example.com".to_string(),
        display_name: None,
        avatar: None,
        subscriptions: Subscriptions {
            vpn: VpnSubscription {
                active,
                ..Default::default()
            },
        },
        devices: vec![],
        max_devices: 5,
    }
}

pub(crate) fn test_device(pubkey: &str) -> Device {
    Device {
        name: format!("device-{pubkey}"),
        pubkey: pubkey.to_string(),
        created_at: None,
        is_being_removed: false,
    }
}

fn city(name: &str) -> VpnCity {
    VpnCity {
        name: name.to_string(),
        code: name.to_lowercase(),
        latitude: 0.0,
        longitude: 0.0,
        servers: vec![],
    }
}

pub(crate) fn seattle() -> VpnCity {
    VpnCity {
        latitude: 47.6,
        longitude: -122.3,
        ..city("Seattle")
    }
}

pub(crate) fn test_country(code: &str, cities: &[&str]) -> VpnCountry {
    VpnCountry {
        name: code.to_uppercase(),
        code: code.to_string(),
        cities: cities.iter().map(|name| city(name)).collect(),
    }
}

/// A server list with exactly one US city, Seattle.
pub(crate) fn us_servers() -> Vec<VpnCountry> {
    vec![
        VpnCountry {
            name: "United States".to_string(),
            code: "us".to_string(),
            cities: vec![seattle()],
        },
        test_country("de", &["Berlin", "Frankfurt"]),
    ]
}

/// In-memory store that counts the writes the tests care about.
#[derive(Default)]
pub(crate) struct RecordingStore {
    inner: InMemAccountStore,
    credentials_saves: AtomicUsize,
    selected_city_saves: AtomicUsize,
}

impl RecordingStore {
    pub(crate) fn credentials_saves(&self) -> usize {
        self.credentials_saves.load(Ordering::SeqCst)
    }

    pub(crate) fn selected_city_saves(&self) -> usize {
        self.selected_city_saves.load(Ordering::SeqCst)
    }
}

impl AccountStore for RecordingStore {
    type StorageError = Infallible;

    fn load_credentials(&self) -> Result<Option<Credentials>, Infallible> {
        self.inner.load_credentials()
    }

    fn save_credentials(&self, credentials: &Credentials) -> Result<(), Infallible> {
        self.credentials_saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save_credentials(credentials)
    }

    fn load_user(&self) -> Result<Option<User>, Infallible> {
        self.inner.load_user()
    }

    fn save_user(&self, user: &User) -> Result<(), Infallible> {
        self.inner.save_user(user)
    }

    fn load_selected_city(&self) -> Result<Option<VpnCity>, Infallible> {
        self.inner.load_selected_city()
    }

    fn save_selected_city(&self, city: &VpnCity) -> Result<(), Infallible> {
        self.selected_city_saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save_selected_city(city)
    }

    fn load_current_device(&self) -> Result<Option<Device>, Infallible> {
        self.inner.load_current_device()
    }

    fn save_current_device(&self, device: &Device) -> Result<(), Infallible> {
        self.inner.save_current_device(device)
    }

    fn load_vpn_servers(&self) -> Result<Option<Vec<VpnCountry>>, Infallible> {
        self.inner.load_vpn_servers()
    }

    fn save_vpn_servers(&self, servers: &[VpnCountry]) -> Result<(), Infallible> {
        self.inner.save_vpn_servers(servers)
    }

    fn load_iap_info(&self) -> Result<Option<IapInfo>, Infallible> {
        self.inner.load_iap_info()
    }

    fn save_iap_info(&self, iap_info: &IapInfo) -> Result<(), Infallible> {
        self.inner.save_iap_info(iap_info)
    }

    fn remove_iap_info(&self) -> Result<(), Infallible> {
        self.inner.remove_iap_info()
    }

    fn remove_all(&self) -> Result<(), Infallible> {
        self.inner.remove_all()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApiCall {
    AddDevice {
        token: String,
        name: String,
        pubkey: String,
    },
    RemoveDevice {
        token: String,
        device_key: String,
    },
    AccountInfo {
        token: String,
    },
    AvailableServers {
        token: String,
    },
    GetProducts {
        token: String,
    },
    UploadReceipt {
        token: String,
        receipt: String,
    },
}

type Hook = Box<dyn Fn() + Send + Sync>;

struct FakeResponses {
    add_device_error: Option<GuardianApiError>,
    remove_device_error: Option<GuardianApiError>,
    account_info: Result<User, GuardianApiError>,
    servers: Result<Vec<VpnCountry>, GuardianApiError>,
    products: Vec<String>,
}

impl Default for FakeResponses {
    fn default() -> Self {
        FakeResponses {
            add_device_error: None,
            remove_device_error: None,
            account_info: Ok(test_user(true)),
            servers: Ok(us_servers()),
            products: vec!["vpn.monthly".to_string(), "vpn.yearly".to_string()],
        }
    }
}

/// Scriptable coordination service that records every call it receives.
#[derive(Default)]
pub(crate) struct FakeGuardianApi {
    calls: Mutex<Vec<ApiCall>>,
    responses: Mutex<FakeResponses>,
    on_add_device: Mutex<Option<Hook>>,
    on_remove_device: Mutex<Option<Hook>>,
    device_removed: Notify,
}

impl FakeGuardianApi {
    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    pub(crate) fn add_device_calls(&self) -> usize {
        self.count(|call| matches!(call, ApiCall::AddDevice { .. }))
    }

    pub(crate) fn remove_device_calls(&self) -> usize {
        self.count(|call| matches!(call, ApiCall::RemoveDevice { .. }))
    }

    pub(crate) fn fail_add_device(&self, err: GuardianApiError) {
        self.responses.lock().add_device_error = Some(err);
    }

    pub(crate) fn fail_remove_device(&self, err: GuardianApiError) {
        self.responses.lock().remove_device_error = Some(err);
    }

    pub(crate) fn set_account_info(&self, user: User) {
        self.responses.lock().account_info = Ok(user);
    }

    pub(crate) fn fail_account_info(&self, err: GuardianApiError) {
        self.responses.lock().account_info = Err(err);
    }

    pub(crate) fn set_servers(&self, servers: Vec<VpnCountry>) {
        self.responses.lock().servers = Ok(servers);
    }

    pub(crate) fn fail_servers(&self, err: GuardianApiError) {
        self.responses.lock().servers = Err(err);
    }

    /// Runs while the registration request is "in flight".
    pub(crate) fn on_add_device(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_add_device.lock() = Some(Box::new(hook));
    }

    /// Runs while the removal request is "in flight".
    pub(crate) fn on_remove_device(&self, hook: impl Fn() + Send + Sync + 'static) {
        *self.on_remove_device.lock() = Some(Box::new(hook));
    }

    /// Resolves once a remove device request has been answered.
    pub(crate) async fn device_removed(&self) {
        self.device_removed.notified().await;
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().push(call);
    }

    fn count(&self, predicate: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|&call| predicate(call)).count()
    }
}

#[async_trait::async_trait]
impl GuardianApi for FakeGuardianApi {
    async fn add_device(
        &self,
        token: &str,
        body: &AddDeviceRequestBody,
    ) -> fpn_vpn_api_client::Result<Device> {
        self.record(ApiCall::AddDevice {
            token: token.to_string(),
            name: body.name.clone(),
            pubkey: body.pubkey.clone(),
        });
        if let Some(hook) = self.on_add_device.lock().as_ref() {
            hook();
        }
        if let Some(err) = self.responses.lock().add_device_error.clone() {
            return Err(err);
        }
        Ok(Device {
            name: body.name.clone(),
            pubkey: body.pubkey.clone(),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            is_being_removed: false,
        })
    }

    async fn remove_device(&self, token: &str, device_key: &str) -> fpn_vpn_api_client::Result<()> {
        self.record(ApiCall::RemoveDevice {
            token: token.to_string(),
            device_key: device_key.to_string(),
        });
        if let Some(hook) = self.on_remove_device.lock().as_ref() {
            hook();
        }
        let result = match self.responses.lock().remove_device_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        };
        self.device_removed.notify_one();
        result
    }

    async fn account_info(&self, token: &str) -> fpn_vpn_api_client::Result<User> {
        self.record(ApiCall::AccountInfo {
            token: token.to_string(),
        });
        self.responses.lock().account_info.clone()
    }

    async fn available_servers(&self, token: &str) -> fpn_vpn_api_client::Result<Vec<VpnCountry>> {
        self.record(ApiCall::AvailableServers {
            token: token.to_string(),
        });
        self.responses.lock().servers.clone()
    }

    async fn get_products(&self, token: &str) -> fpn_vpn_api_client::Result<Vec<String>> {
        self.record(ApiCall::GetProducts {
            token: token.to_string(),
        });
        Ok(self.responses.lock().products.clone())
    }

    async fn upload_receipt(&self, token: &str, receipt: &str) -> fpn_vpn_api_client::Result<()> {
        self.record(ApiCall::UploadReceipt {
            token: token.to_string(),
            receipt: receipt.to_string(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingTunnel {
    stops: AtomicUsize,
}

impl RecordingTunnel {
    pub(crate) fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl TunnelManaging for RecordingTunnel {
    fn stop_and_remove(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub(crate) struct RecordingMonitor {
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl RecordingMonitor {
    pub(crate) fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub(crate) fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl ServiceMonitor for RecordingMonitor {
    fn start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Recording collaborators wired into a `VpnServices`.
#[derive(Default)]
pub(crate) struct TestServices {
    pub(crate) tunnel: Arc<RecordingTunnel>,
    pub(crate) heartbeat: Arc<RecordingMonitor>,
    pub(crate) connection_health: Arc<RecordingMonitor>,
}

impl TestServices {
    pub(crate) fn vpn_services(&self) -> VpnServices {
        VpnServices::new(
            self.tunnel.clone(),
            self.heartbeat.clone(),
            self.connection_health.clone(),
        )
    }

    /// Every collaborator has been stopped exactly `n` times.
    pub(crate) fn assert_stopped(&self, n: usize) {
        assert_eq!(self.tunnel.stops(), n);
        assert_eq!(self.heartbeat.stops(), n);
        assert_eq!(self.connection_health.stops(), n);
    }
}
