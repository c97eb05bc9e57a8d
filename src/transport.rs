//! Request delivery to a device.
//!
//! [`Transport`] is the seam between the endpoints and the network. The
//! HTTP implementation requires the `remote` feature (enabled by default);
//! any `Fn(&str, &[&str]) -> Result<DynamicValue, DeviceError>` closure also
//! works, which is how tests and offline callers stub the device.

use crate::error::DeviceError;
use crate::types::DynamicValue;

#[cfg(feature = "remote")]
use tracing::{debug, trace};

#[cfg(feature = "remote")]
use crate::decode::{decode_xml, soap_fault};
#[cfg(feature = "remote")]
use crate::types::ClientOptions;

/// SOAP 1.2 envelope namespace.
pub const SOAP_ENV_NAMESPACE: &str = "http://www.w3.org/2003/05/soap-envelope";

/// Content type for SOAP 1.2 requests.
pub const SOAP_CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";

/// Sends a request body to a device and returns the decoded reply.
pub trait Transport {
    /// Send `body` with the given namespace declarations.
    ///
    /// `namespaces` are complete attributes, e.g.
    /// `xmlns:tds="http://www.onvif.org/ver10/device/wsdl"`.
    fn send_request(&self, body: &str, namespaces: &[&str]) -> Result<DynamicValue, DeviceError>;
}

impl<F> Transport for F
where
    F: Fn(&str, &[&str]) -> Result<DynamicValue, DeviceError>,
{
    fn send_request(&self, body: &str, namespaces: &[&str]) -> Result<DynamicValue, DeviceError> {
        self(body, namespaces)
    }
}

/// Wrap `body` in a SOAP 1.2 envelope declaring `namespaces`.
pub fn soap_envelope(body: &str, namespaces: &[&str]) -> String {
    let mut declarations = String::new();
    for ns in namespaces {
        declarations.push(' ');
        declarations.push_str(ns);
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><s:Envelope xmlns:s="{SOAP_ENV_NAMESPACE}"{declarations}><s:Body>{body}</s:Body></s:Envelope>"#
    )
}

/// Blocking SOAP-over-HTTP transport for one device service address.
#[cfg(feature = "remote")]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    xaddr: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "remote")]
impl HttpTransport {
    /// Create a transport posting to `xaddr`
    /// (e.g. `http://192.168.1.10/onvif/device_service`).
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::Network` if the HTTP client can't be built.
    pub fn new(xaddr: impl Into<String>, options: &ClientOptions) -> Result<Self, DeviceError> {
        let xaddr = xaddr.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|source| DeviceError::Network {
                url: xaddr.clone(),
                source,
            })?;

        Ok(Self { xaddr, client })
    }

    /// The device service address requests are sent to.
    pub fn xaddr(&self) -> &str {
        &self.xaddr
    }

    fn network_error(&self, source: reqwest::Error) -> DeviceError {
        DeviceError::Network {
            url: self.xaddr.clone(),
            source,
        }
    }
}

#[cfg(feature = "remote")]
impl Transport for HttpTransport {
    fn send_request(&self, body: &str, namespaces: &[&str]) -> Result<DynamicValue, DeviceError> {
        let envelope = soap_envelope(body, namespaces);
        debug!(xaddr = %self.xaddr, body, "sending SOAP request");

        let response = self
            .client
            .post(&self.xaddr)
            .header(reqwest::header::CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .body(envelope)
            .send()
            .map_err(|source| self.network_error(source))?;

        // Faults come back as HTTP 500, so read the body before judging the status
        let status = response.status();
        let status_error = response.error_for_status_ref().err();
        let text = response
            .text()
            .map_err(|source| self.network_error(source))?;
        trace!(%status, bytes = text.len(), "received SOAP reply");

        let tree = match decode_xml(&text) {
            Ok(tree) => tree,
            Err(err) => {
                return Err(match status_error {
                    Some(source) => self.network_error(source),
                    None => err,
                })
            }
        };

        if let Some(fault) = soap_fault(&tree) {
            debug!(xaddr = %self.xaddr, error = %fault, "device returned fault");
            return Err(fault);
        }
        if let Some(source) = status_error {
            return Err(self.network_error(source));
        }

        Ok(tree)
    }
}
