//! Response decoding from XML replies and saved tree dumps.
//!
//! XML is mapped onto a [`DynamicValue`] the way SOAP toolkits usually do it:
//!
//! | XML | Tree |
//! |-----|------|
//! | `<a>text</a>` | `"a": "text"` |
//! | `<a/>` | `"a": ""` |
//! | `<a x="1"><b>2</b></a>` | `"a": { "-x": "1", "b": "2" }` |
//! | `<a x="1">text</a>` | `"a": { "-x": "1", "#text": "text" }` |
//! | `<b>1</b><b>2</b>` | `"b": ["1", "2"]` |
//!
//! Namespace prefixes are dropped (`tds:GetHostname` becomes `GetHostname`)
//! and `xmlns` declarations are not kept.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::coerce::as_string;
use crate::error::DeviceError;
use crate::path::value_at;
use crate::types::{DynamicValue, BODY_PATH};

const ATTR_PREFIX: &str = "-";
const TEXT_KEY: &str = "#text";

/// An element whose end tag hasn't been read yet.
struct OpenElement {
    name: String,
    content: Map<String, Value>,
    text: String,
}

impl OpenElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, DeviceError> {
        let mut content = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(invalid_xml)?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let name = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(invalid_xml)?;
            content.insert(
                format!("{ATTR_PREFIX}{name}"),
                Value::String(value.into_owned()),
            );
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            content,
            text: String::new(),
        })
    }

    fn into_value(self) -> (String, Value) {
        let text = self.text.trim();
        if self.content.is_empty() {
            return (self.name, Value::String(text.to_string()));
        }

        let mut content = self.content;
        if !text.is_empty() {
            content.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
        }
        (self.name, Value::Object(content))
    }
}

fn invalid_xml(err: impl std::fmt::Display) -> DeviceError {
    DeviceError::InvalidXml {
        message: err.to_string(),
    }
}

/// Insert a child element, turning repeated names into a list.
fn insert_child(content: &mut Map<String, Value>, name: String, value: Value) {
    match content.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            content.insert(name, value);
        }
    }
}

/// Decode an XML document into a tree rooted at its document element.
///
/// # Errors
///
/// Returns `DeviceError::InvalidXml` if the document is malformed, empty,
/// or has more than one root element.
pub fn decode_xml(xml: &str) -> Result<DynamicValue, DeviceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let closed = match reader.read_event().map_err(invalid_xml)? {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(invalid_xml("multiple root elements"));
                }
                stack.push(OpenElement::from_start(&start)?);
                None
            }
            Event::Empty(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(invalid_xml("multiple root elements"));
                }
                Some(OpenElement::from_start(&start)?)
            }
            Event::End(_) => stack.pop(),
            Event::Text(text) => {
                let text = text.unescape().map_err(invalid_xml)?;
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&text);
                }
                None
            }
            Event::CData(cdata) => {
                if let Some(open) = stack.last_mut() {
                    open.text
                        .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
                None
            }
            Event::Eof => break,
            _ => None,
        };

        if let Some(element) = closed {
            let (name, value) = element.into_value();
            match stack.last_mut() {
                Some(parent) => insert_child(&mut parent.content, name, value),
                None => root = Some((name, value)),
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(invalid_xml(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }

    let (name, value) = root.ok_or_else(|| invalid_xml("document has no root element"))?;
    let mut tree = Map::new();
    tree.insert(name, value);
    Ok(Value::Object(tree))
}

/// Text of a node that may carry attributes (`{"-lang": "en", "#text": ..}`)
/// or repeat (first entry wins).
fn node_text(node: &DynamicValue) -> String {
    match node {
        Value::Object(map) => map.get(TEXT_KEY).map(as_string).unwrap_or_default(),
        Value::Array(items) => items.first().map(node_text).unwrap_or_default(),
        _ => as_string(node),
    }
}

/// Extract a SOAP fault from a decoded reply, if the device sent one.
///
/// Handles both SOAP 1.2 (`Code.Value` / `Reason.Text`) and SOAP 1.1
/// (`faultcode` / `faultstring`) layouts.
pub fn soap_fault(response: &DynamicValue) -> Option<DeviceError> {
    let fault = value_at(response, &format!("{BODY_PATH}.Fault")).ok()?;

    let code = value_at(fault, "Code.Value")
        .or_else(|_| value_at(fault, "faultcode"))
        .map(node_text)
        .unwrap_or_default();
    let reason = value_at(fault, "Reason.Text")
        .or_else(|_| value_at(fault, "faultstring"))
        .map(node_text)
        .unwrap_or_default();

    Some(DeviceError::Fault { code, reason })
}

/// Load a saved response from a file.
///
/// Files ending in `.json` hold a tree that was already decoded; anything
/// else is read as an XML reply.
///
/// # Errors
///
/// Returns `DeviceError::FileNotFound` if the file doesn't exist, or a parse
/// error if its contents can't be decoded.
pub fn load_response(path: &Path) -> Result<DynamicValue, DeviceError> {
    if !path.exists() {
        return Err(DeviceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| DeviceError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content).map_err(|source| DeviceError::InvalidJson { source })
    } else {
        decode_xml(&content)
    }
}

/// Load a response from a string, sniffing JSON by a leading `{`.
pub fn load_response_str(content: &str) -> Result<DynamicValue, DeviceError> {
    if content.trim_start().starts_with('{') {
        serde_json::from_str(content).map_err(|source| DeviceError::InvalidJson { source })
    } else {
        decode_xml(content)
    }
}
