//! Core types for ONVIF device-service responses.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decoded response node.
///
/// Null, boolean, number, string, ordered list, or a mapping with unique
/// string keys. Built once per reply by the decoder and only read afterwards.
pub type DynamicValue = Value;

/// XML namespaces declared on every device-service request.
pub const DEVICE_NAMESPACES: &[&str] = &[
    r#"xmlns:tds="http://www.onvif.org/ver10/device/wsdl""#,
    r#"xmlns:tt="http://www.onvif.org/ver10/schema""#,
];

/// Root of every device-service reply body.
pub const BODY_PATH: &str = "Envelope.Body";

/// Returns the node kind name for error messages.
pub fn value_type_name(value: &DynamicValue) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// Normalized capability model of a device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    #[serde(rename = "Network")]
    pub network: NetworkCapabilities,
    /// Event service flags, keyed without the `WS` prefix.
    #[serde(rename = "Events")]
    pub events: BTreeMap<String, bool>,
    /// Streaming flags, keyed with underscores turned into spaces.
    #[serde(rename = "Streaming")]
    pub streaming: BTreeMap<String, bool>,
    /// Whether the device reports a PTZ service at all.
    #[serde(rename = "PTZ")]
    pub ptz: bool,
}

/// Network section of [`DeviceCapabilities`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkCapabilities {
    #[serde(rename = "DynDNS")]
    pub dyn_dns: bool,
    #[serde(rename = "IPFilter")]
    pub ip_filter: bool,
    #[serde(rename = "IPVersion6")]
    pub ip_version6: bool,
    /// Reported on the wire as `ZeroConfiguration`.
    #[serde(rename = "ZeroConfig")]
    pub zero_config: bool,
    /// Vendor extension flags. Empty when the device reports none.
    #[serde(rename = "Extension")]
    pub extension: BTreeMap<String, bool>,
}

/// Identity of a device, as returned by `GetDeviceInformation`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DeviceInformation {
    pub manufacturer: String,
    pub model: String,
    pub firmware_version: String,
    pub serial_number: String,
    pub hardware_id: String,
}

/// Hostname settings, as returned by `GetHostname`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostnameInformation {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "FromDHCP")]
    pub from_dhcp: bool,
    #[serde(rename = "Extension")]
    pub extension: String,
}

/// Default timeout for device requests (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Options for talking to a device.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Total time allowed for one request, including reading the reply.
    pub timeout: Duration,
}

impl ClientOptions {
    /// Create options with the default timeout.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new()
    }
}
