//! Capability normalization - turns a decoded `GetCapabilitiesResponse`
//! into [`DeviceCapabilities`].
//!
//! The Network, Events and Media streaming branches are mandatory: if any is
//! missing the whole call fails. PTZ support is signaled only by the branch
//! being present.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::coerce::as_bool;
use crate::error::DeviceError;
use crate::path::value_at;
use crate::types::{DeviceCapabilities, DynamicValue, NetworkCapabilities};

/// Path to the capabilities block of a `GetCapabilities` reply.
pub const CAPABILITIES_PATH: &str = "Envelope.Body.GetCapabilitiesResponse.Capabilities";

/// Build [`DeviceCapabilities`] from a decoded `GetCapabilities` reply.
///
/// # Errors
///
/// Returns `DeviceError::NotFound` for the first missing mandatory branch
/// (`Device.Network`, `Events`, `Media.StreamingCapabilities`). No partial
/// result is returned.
pub fn normalize(response: &DynamicValue) -> Result<DeviceCapabilities, DeviceError> {
    let network = value_at(response, &format!("{CAPABILITIES_PATH}.Device.Network"))?;
    let network = network_capabilities(network);

    let events = value_at(response, &format!("{CAPABILITIES_PATH}.Events"))?;
    let events = event_capabilities(events);

    let streaming = value_at(
        response,
        &format!("{CAPABILITIES_PATH}.Media.StreamingCapabilities"),
    )?;
    let streaming = streaming_capabilities(streaming);

    let ptz = value_at(response, &format!("{CAPABILITIES_PATH}.PTZ")).is_ok();

    Ok(DeviceCapabilities {
        network,
        events,
        streaming,
        ptz,
    })
}

fn network_capabilities(node: &DynamicValue) -> NetworkCapabilities {
    let mut caps = NetworkCapabilities::default();
    let Value::Object(map) = node else {
        return caps;
    };

    let flag = |key: &str| map.get(key).map(as_bool).unwrap_or(false);
    caps.dyn_dns = flag("DynDNS");
    caps.ip_filter = flag("IPFilter");
    caps.ip_version6 = flag("IPVersion6");
    caps.zero_config = flag("ZeroConfiguration");

    if let Some(Value::Object(extension)) = map.get("Extension") {
        caps.extension = extension
            .iter()
            .map(|(key, value)| (key.clone(), as_bool(value)))
            .collect();
    }

    caps
}

/// Event flags with the first `WS` dropped from each key. `XAddr` is the
/// service address, not a flag, and is skipped.
fn event_capabilities(node: &DynamicValue) -> BTreeMap<String, bool> {
    let mut events = BTreeMap::new();
    if let Value::Object(map) = node {
        for (key, value) in map {
            if key.to_lowercase() == "xaddr" {
                continue;
            }
            // On a rename collision the later key in document order wins.
            events.insert(key.replacen("WS", "", 1), as_bool(value));
        }
    }
    events
}

fn streaming_capabilities(node: &DynamicValue) -> BTreeMap<String, bool> {
    match node {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| (key.replace('_', " "), as_bool(value)))
            .collect(),
        _ => BTreeMap::new(),
    }
}
