//! ONVIF Device Service Decoder
//!
//! Decodes ONVIF device-service replies into an untyped tree, navigates it
//! with dot paths, and normalizes the `GetCapabilities` reply into a typed
//! capability model.
//!
//! # Example
//!
//! ```
//! use onvif_device::{normalize, value_at};
//! use serde_json::json;
//!
//! let reply = json!({
//!     "Envelope": { "Body": { "GetCapabilitiesResponse": { "Capabilities": {
//!         "Device": { "Network": { "IPFilter": "true", "ZeroConfiguration": "TRUE" } },
//!         "Events": { "XAddr": "http://cam/onvif/events", "WSPullPointSupport": "true" },
//!         "Media": { "StreamingCapabilities": { "RTP_TCP": "true" } }
//!     } } } }
//! });
//!
//! let caps = normalize(&reply).unwrap();
//! assert!(caps.network.ip_filter);
//! assert!(caps.network.zero_config);
//! assert_eq!(caps.events.get("PullPointSupport"), Some(&true));
//! assert_eq!(caps.streaming.get("RTP TCP"), Some(&true));
//! assert!(!caps.ptz);
//!
//! assert!(value_at(&reply, "Envelope.Body.Fault").is_err());
//! ```
//!
//! # Normalization Rules
//!
//! | Reply branch | Model field | Rule |
//! |--------------|-------------|------|
//! | `Device.Network` | `network` | required; `ZeroConfiguration` becomes `zero_config` |
//! | `Events` | `events` | required; first `WS` dropped from keys, `XAddr` skipped |
//! | `Media.StreamingCapabilities` | `streaming` | required; `_` in keys becomes a space |
//! | `PTZ` | `ptz` | optional; true iff present |
//!
//! Flags are true only for the text `"true"` in any case.

mod capabilities;
mod coerce;
mod decode;
mod device;
mod error;
mod path;
mod transport;
mod types;

pub use capabilities::{normalize, CAPABILITIES_PATH};
pub use coerce::{as_bool, as_string};
pub use decode::{decode_xml, load_response, load_response_str, soap_fault};
pub use device::Device;
pub use error::DeviceError;
pub use path::{list_at, string_at, value_as, value_at};
pub use transport::{soap_envelope, Transport, SOAP_CONTENT_TYPE, SOAP_ENV_NAMESPACE};
pub use types::{
    value_type_name, ClientOptions, DeviceCapabilities, DeviceInformation, DynamicValue,
    HostnameInformation, NetworkCapabilities, BODY_PATH, DEFAULT_TIMEOUT, DEVICE_NAMESPACES,
};

#[cfg(feature = "remote")]
pub use transport::HttpTransport;
