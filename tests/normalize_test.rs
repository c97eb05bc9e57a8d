//! Integration tests for capability normalization.

use std::collections::BTreeMap;
use std::path::Path;

use onvif_device::{
    load_response, normalize, DeviceCapabilities, DeviceError, NetworkCapabilities,
};
use serde_json::{json, Value};

fn reply(capabilities: Value) -> Value {
    json!({
        "Envelope": {
            "Body": {
                "GetCapabilitiesResponse": { "Capabilities": capabilities }
            }
        }
    })
}

fn flags(entries: &[(&str, bool)]) -> BTreeMap<String, bool> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

// === Flag Coercion Tests ===

mod flag_coercion {
    use super::*;

    fn dyn_dns(value: &str) -> bool {
        let tree = reply(json!({
            "Device": { "Network": { "DynDNS": value } },
            "Events": {},
            "Media": { "StreamingCapabilities": {} }
        }));
        normalize(&tree).unwrap().network.dyn_dns
    }

    #[test]
    fn lowercase_true() {
        assert!(dyn_dns("true"));
    }

    #[test]
    fn any_case_true() {
        assert!(dyn_dns("TRUE"));
        assert!(dyn_dns("tRuE"));
    }

    #[test]
    fn numeric_one_is_false() {
        assert!(!dyn_dns("1"));
    }

    #[test]
    fn native_boolean_is_false() {
        let tree = reply(json!({
            "Device": { "Network": { "DynDNS": true } },
            "Events": {},
            "Media": { "StreamingCapabilities": {} }
        }));
        assert!(!normalize(&tree).unwrap().network.dyn_dns);
    }
}

// === Key Renaming Tests ===

mod key_renaming {
    use super::*;

    fn base() -> Value {
        json!({
            "Device": { "Network": {} },
            "Events": {},
            "Media": { "StreamingCapabilities": {} }
        })
    }

    #[test]
    fn events_ws_prefix_removed() {
        let mut caps = base();
        caps["Events"] = json!({ "WSNotificationSubscription": "true" });
        let result = normalize(&reply(caps)).unwrap();
        assert_eq!(result.events.get("NotificationSubscription"), Some(&true));
        assert!(!result.events.contains_key("WSNotificationSubscription"));
    }

    #[test]
    fn events_xaddr_dropped_any_case() {
        for key in ["XAddr", "xaddr", "XADDR"] {
            let mut caps = base();
            caps["Events"] = json!({ key: "http://x", "WSPullPoint": "true" });
            let result = normalize(&reply(caps)).unwrap();
            assert!(!result.events.contains_key(key));
            assert_eq!(result.events.len(), 1);
        }
    }

    #[test]
    fn streaming_underscores_to_spaces() {
        let mut caps = base();
        caps["Media"]["StreamingCapabilities"] = json!({ "RTP_Multicast": "true" });
        let result = normalize(&reply(caps)).unwrap();
        assert_eq!(result.streaming.get("RTP Multicast"), Some(&true));
        assert!(!result.streaming.contains_key("RTP_Multicast"));
    }

    #[test]
    fn network_zero_configuration_renamed() {
        let mut caps = base();
        caps["Device"]["Network"] = json!({ "ZeroConfiguration": "true" });
        let result = normalize(&reply(caps)).unwrap();
        assert!(result.network.zero_config);
    }
}

// === Presence and Failure Tests ===

mod presence_and_failure {
    use super::*;

    #[test]
    fn ptz_null_counts_as_present() {
        let tree = reply(json!({
            "Device": { "Network": {} },
            "Events": {},
            "Media": { "StreamingCapabilities": {} },
            "PTZ": null
        }));
        assert!(normalize(&tree).unwrap().ptz);
    }

    #[test]
    fn ptz_absent_is_false_without_error() {
        let tree = reply(json!({
            "Device": { "Network": {} },
            "Events": {},
            "Media": { "StreamingCapabilities": {} }
        }));
        let result = normalize(&tree);
        assert!(result.is_ok());
        assert!(!result.unwrap().ptz);
    }

    #[test]
    fn missing_network_fails_even_with_other_branches() {
        let tree = reply(json!({
            "Device": { "System": {} },
            "Events": { "WSPullPoint": "true" },
            "Media": { "StreamingCapabilities": { "RTP_TCP": "true" } },
            "PTZ": {}
        }));
        match normalize(&tree) {
            Err(DeviceError::NotFound { segment, .. }) => assert_eq!(segment, "Network"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn missing_events_fails() {
        let tree = reply(json!({
            "Device": { "Network": {} },
            "Media": { "StreamingCapabilities": {} }
        }));
        assert!(matches!(normalize(&tree), Err(DeviceError::NotFound { .. })));
    }

    #[test]
    fn missing_streaming_fails() {
        let tree = reply(json!({
            "Device": { "Network": {} },
            "Events": {},
            "Media": { "XAddr": "http://x/media" }
        }));
        match normalize(&tree) {
            Err(DeviceError::NotFound { segment, .. }) => {
                assert_eq!(segment, "StreamingCapabilities")
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn normalizing_twice_is_equal() {
        let tree = reply(json!({
            "Device": { "Network": { "IPFilter": "true", "Extension": { "A": "true" } } },
            "Events": { "WSPullPoint": "true" },
            "Media": { "StreamingCapabilities": { "RTP_TCP": "false" } },
            "PTZ": {}
        }));
        let snapshot = tree.clone();
        let first = normalize(&tree).unwrap();
        let second = normalize(&tree).unwrap();
        assert_eq!(first, second);
        assert_eq!(tree, snapshot);
    }
}

// === End-to-End Tests ===

mod end_to_end {
    use super::*;

    #[test]
    fn reference_scenario() {
        let tree = reply(json!({
            "Device": { "Network": {
                "DynDNS": "false",
                "IPFilter": "true",
                "IPVersion6": "false",
                "ZeroConfiguration": "true",
                "Extension": { "Foo": "true" }
            } },
            "Events": { "WSPullPoint": "true", "XAddr": "http://x" },
            "Media": { "StreamingCapabilities": { "RTP_TCP": "true" } }
        }));

        let expected = DeviceCapabilities {
            network: NetworkCapabilities {
                dyn_dns: false,
                ip_filter: true,
                ip_version6: false,
                zero_config: true,
                extension: flags(&[("Foo", true)]),
            },
            events: flags(&[("PullPoint", true)]),
            streaming: flags(&[("RTP TCP", true)]),
            ptz: false,
        };

        assert_eq!(normalize(&tree).unwrap(), expected);
    }

    #[test]
    fn soap_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/get_capabilities.xml");
        let tree = load_response(&path).unwrap();
        let caps = normalize(&tree).unwrap();

        assert_eq!(
            caps.network,
            NetworkCapabilities {
                dyn_dns: false,
                ip_filter: true,
                ip_version6: true,
                zero_config: true,
                extension: flags(&[("Dot11Configuration", false), ("Extension", false)]),
            }
        );
        assert_eq!(
            caps.events,
            flags(&[
                ("SubscriptionPolicySupport", true),
                ("PullPointSupport", true),
                ("PausableSubscriptionManagerInterfaceSupport", false),
            ])
        );
        assert_eq!(
            caps.streaming,
            flags(&[
                ("RTPMulticast", true),
                ("RTP TCP", true),
                ("RTP RTSP TCP", true),
            ])
        );
        assert!(caps.ptz);
    }
}
