//! Device-service endpoints.
//!
//! Each endpoint sends one request through a [`Transport`] and pulls its
//! answer out of the decoded reply with the path helpers.

use tracing::{debug, trace};

use crate::capabilities::normalize;
use crate::coerce::{as_bool, as_string};
use crate::error::DeviceError;
use crate::path::{list_at, string_at, value_as, value_at};
use crate::transport::Transport;
use crate::types::{
    DeviceCapabilities, DeviceInformation, DynamicValue, HostnameInformation, BODY_PATH,
    DEVICE_NAMESPACES,
};

#[cfg(feature = "remote")]
use crate::transport::HttpTransport;
#[cfg(feature = "remote")]
use crate::types::ClientOptions;

const GET_DEVICE_INFORMATION: &str = "<tds:GetDeviceInformation/>";
const GET_SYSTEM_DATE_AND_TIME: &str = "<tds:GetSystemDateAndTime/>";
const GET_CAPABILITIES: &str =
    "<tds:GetCapabilities><tds:Category>All</tds:Category></tds:GetCapabilities>";
const GET_DISCOVERY_MODE: &str = "<tds:GetDiscoveryMode/>";
const GET_SCOPES: &str = "<tds:GetScopes/>";
const GET_HOSTNAME: &str = "<tds:GetHostname/>";
const GET_DNS: &str = "<tds:GetDNS/>";
const GET_NETWORK_INTERFACES: &str = "<tds:GetNetworkInterfaces/>";

/// An ONVIF device reached through a transport.
#[derive(Debug, Clone)]
pub struct Device<T> {
    transport: T,
}

#[cfg(feature = "remote")]
impl Device<HttpTransport> {
    /// Connect to the device service at `xaddr` over HTTP.
    pub fn connect(xaddr: impl Into<String>, options: &ClientOptions) -> Result<Self, DeviceError> {
        Ok(Self::new(HttpTransport::new(xaddr, options)?))
    }
}

impl<T: Transport> Device<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn call(&self, operation: &str, body: &str) -> Result<DynamicValue, DeviceError> {
        debug!(operation, "calling device service");
        let reply = self.transport.send_request(body, DEVICE_NAMESPACES)?;
        trace!(operation, reply = %reply, "decoded reply");
        Ok(reply)
    }

    /// Manufacturer, model, firmware and serial number.
    pub fn get_device_information(&self) -> Result<DeviceInformation, DeviceError> {
        let reply = self.call("GetDeviceInformation", GET_DEVICE_INFORMATION)?;
        value_as(&reply, &format!("{BODY_PATH}.GetDeviceInformationResponse"))
    }

    /// System date and time. Empty if the device reports it as a structure.
    pub fn get_system_date_and_time(&self) -> Result<String, DeviceError> {
        let reply = self.call("GetSystemDateAndTime", GET_SYSTEM_DATE_AND_TIME)?;
        Ok(string_at(
            &reply,
            &format!("{BODY_PATH}.GetSystemDateAndTimeResponse.SystemDateAndTime"),
        )
        .unwrap_or_default())
    }

    /// Normalized capabilities. See [`normalize`].
    pub fn get_capabilities(&self) -> Result<DeviceCapabilities, DeviceError> {
        let reply = self.call("GetCapabilities", GET_CAPABILITIES)?;
        normalize(&reply)
    }

    pub fn get_discovery_mode(&self) -> Result<String, DeviceError> {
        let reply = self.call("GetDiscoveryMode", GET_DISCOVERY_MODE)?;
        Ok(string_at(
            &reply,
            &format!("{BODY_PATH}.GetDiscoveryModeResponse.DiscoveryMode"),
        )
        .unwrap_or_default())
    }

    /// Scope URIs. Entries without a `ScopeItem` come back as empty strings.
    pub fn get_scopes(&self) -> Result<Vec<String>, DeviceError> {
        let reply = self.call("GetScopes", GET_SCOPES)?;
        let scopes = list_at(&reply, &format!("{BODY_PATH}.GetScopesResponse.Scopes"))?;

        Ok(scopes
            .iter()
            .filter_map(|scope| scope.as_object())
            .map(|scope| scope.get("ScopeItem").map(as_string).unwrap_or_default())
            .collect())
    }

    pub fn get_hostname(&self) -> Result<HostnameInformation, DeviceError> {
        let reply = self.call("GetHostname", GET_HOSTNAME)?;
        let info = value_at(
            &reply,
            &format!("{BODY_PATH}.GetHostnameResponse.HostnameInformation"),
        )?;

        let mut hostname = HostnameInformation::default();
        if let Some(map) = info.as_object() {
            hostname.name = map.get("Name").map(as_string).unwrap_or_default();
            hostname.from_dhcp = map.get("FromDHCP").map(as_bool).unwrap_or(false);
            hostname.extension = map.get("Extension").map(as_string).unwrap_or_default();
        }
        Ok(hostname)
    }

    pub fn get_dns(&self) -> Result<String, DeviceError> {
        let reply = self.call("GetDNS", GET_DNS)?;
        if let Ok(dns) = value_at(&reply, &format!("{BODY_PATH}.GetDNSResponse")) {
            debug!(dns = %dns, "DNS information");
        }
        Ok(string_at(&reply, &format!("{BODY_PATH}.GetDNSResponse.DNSInformation"))
            .unwrap_or_default())
    }

    /// Raw network interface entries, one per interface.
    pub fn get_network_interfaces(&self) -> Result<Vec<DynamicValue>, DeviceError> {
        let reply = self.call("GetNetworkInterfaces", GET_NETWORK_INTERFACES)?;
        list_at(
            &reply,
            &format!("{BODY_PATH}.GetNetworkInterfacesResponse.NetworkInterfaces"),
        )
    }
}
