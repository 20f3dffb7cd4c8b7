//! Layered merging of kubelet command-line flags.
//!
//! Flag mappings arrive in precedence layers: built-in defaults, then the
//! cluster-level configuration, then the pool-level override. Merging is
//! key-wise; absence of a key in a higher layer means "inherit", never
//! "delete". Two exceptions, both deliberate signals from the caller: a
//! present-but-empty layer clears everything merged so far (full override),
//! and a key explicitly set to the empty string removes that key.
//!
//! The `--feature-gates` value is a composite `key=value` list and gets
//! structured treatment: parsed into a map at the boundary, merged key-wise
//! under the same precedence rules, and re-serialized in sorted key order so
//! renders stay byte-identical no matter how the input was spelled
//! (`"a=b, c=d"` and `"a=b,c=d"` normalize to the same form).

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use thiserror::Error;

/// The flag key whose value is a composite feature-gate list.
pub const FEATURE_GATES_KEY: &str = "--feature-gates";

/// Merge failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    /// A feature-gate entry could not be split into `key=value`.
    #[error("malformed feature-gates entry '{}'", entry)]
    MalformedFeatureGate {
        /// The offending entry text.
        entry: String,
    },
}

lazy_static! {
    pub(crate) static ref DEFAULT_KUBELET_FLAGS: BTreeMap<String, String> = {
        let mut flags = BTreeMap::new();
        for (key, value) in [
            ("--address", "0.0.0.0"),
            ("--anonymous-auth", "false"),
            ("--authentication-token-webhook", "true"),
            ("--authorization-mode", "Webhook"),
            ("--cgroups-per-qos", "true"),
            ("--client-ca-file", "/etc/kubernetes/certs/ca.crt"),
            ("--cloud-config", "/etc/kubernetes/azure.json"),
            ("--cloud-provider", "azure"),
            ("--cluster-dns", "10.0.0.10"),
            ("--cluster-domain", "cluster.local"),
            ("--enforce-node-allocatable", "pods"),
            ("--event-qps", "0"),
            ("--eviction-hard", "memory.available<100Mi,nodefs.available<10%,nodefs.inodesFree<5%"),
            ("--image-gc-high-threshold", "85"),
            ("--image-gc-low-threshold", "80"),
            ("--max-pods", "110"),
            ("--network-plugin", "cni"),
            ("--node-status-update-frequency", "10s"),
            ("--pod-manifest-path", "/etc/kubernetes/manifests"),
            ("--rotate-certificates", "true"),
            ("--streaming-connection-idle-timeout", "4h0m0s"),
            ("--tls-cert-file", "/etc/kubernetes/certs/kubeletserver.crt"),
            ("--tls-private-key-file", "/etc/kubernetes/certs/kubeletserver.key"),
        ] {
            flags.insert(key.to_owned(), value.to_owned());
        }
        flags
    };
}

/// Parses a composite feature-gates value into a map.
///
/// Entries are comma-separated `key=value` pairs; whitespace around entries
/// and separators is normalized away. Empty segments (a trailing comma) are
/// tolerated, but an entry without `=` or with an empty key is malformed.
pub fn parse_feature_gates(value: &str) -> Result<BTreeMap<String, String>, MergeError> {
    let mut gates = BTreeMap::new();
    for entry in value.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                gates.insert(key.trim().to_owned(), value.trim().to_owned());
            }
            _ => {
                return Err(MergeError::MalformedFeatureGate {
                    entry: entry.to_owned(),
                })
            }
        }
    }
    Ok(gates)
}

/// Serializes a feature-gate map back to its composite string form, in
/// sorted key order.
pub fn serialize_feature_gates(gates: &BTreeMap<String, String>) -> String {
    gates
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(",")
}

/// Merges flag mapping layers, ordered lowest to highest precedence.
///
/// `None` layers are skipped (inherit). See the module docs for the
/// empty-layer and empty-value semantics.
pub fn merge_kubelet_flags(
    layers: &[Option<&BTreeMap<String, String>>],
) -> Result<BTreeMap<String, String>, MergeError> {
    let mut merged: BTreeMap<String, String> = BTreeMap::new();
    let mut feature_gates: BTreeMap<String, String> = BTreeMap::new();

    for layer in layers.iter().filter_map(|layer| *layer) {
        if layer.is_empty() {
            merged.clear();
            feature_gates.clear();
            continue;
        }
        for (key, value) in layer {
            if value.is_empty() {
                if key == FEATURE_GATES_KEY {
                    feature_gates.clear();
                } else {
                    merged.remove(key);
                }
                continue;
            }
            if key == FEATURE_GATES_KEY {
                feature_gates.append(&mut parse_feature_gates(value)?);
            } else {
                merged.insert(key.clone(), value.clone());
            }
        }
    }

    if !feature_gates.is_empty() {
        merged.insert(FEATURE_GATES_KEY.to_owned(), serialize_feature_gates(&feature_gates));
    }
    Ok(merged)
}

/// Renders a merged flag mapping as the kubelet command-line string:
/// `--key=value` pairs in sorted key order, space-joined.
pub fn kubelet_flags_string(flags: &BTreeMap<String, String>) -> String {
    flags
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod test {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn pool_layer_wins_key_wise() {
        let cluster = map(&[("--max-pods", "110"), ("--read-only-port", "10255")]);
        let pool = map(&[("--max-pods", "30")]);
        let merged = merge_kubelet_flags(&[Some(&cluster), Some(&pool)]).unwrap();
        assert_eq!(merged.get("--max-pods").unwrap(), "30");
        // Absent in the override layer means inherit, not delete.
        assert_eq!(merged.get("--read-only-port").unwrap(), "10255");
    }

    #[test]
    fn absent_layer_inherits() {
        let cluster = map(&[("--max-pods", "110")]);
        let merged = merge_kubelet_flags(&[Some(&cluster), None]).unwrap();
        assert_eq!(merged.get("--max-pods").unwrap(), "110");
    }

    #[test]
    fn empty_layer_is_a_full_override() {
        let cluster = map(&[("--max-pods", "110")]);
        let empty = BTreeMap::new();
        let merged = merge_kubelet_flags(&[Some(&cluster), Some(&empty)]).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn empty_value_deletes_the_key() {
        let cluster = map(&[("--max-pods", "110"), ("--read-only-port", "10255")]);
        let pool = map(&[("--read-only-port", "")]);
        let merged = merge_kubelet_flags(&[Some(&cluster), Some(&pool)]).unwrap();
        assert_eq!(merged.get("--max-pods").unwrap(), "110");
        assert!(!merged.contains_key("--read-only-port"));
    }

    #[test]
    fn feature_gates_merge_key_wise_not_wholesale() {
        let cluster = map(&[(FEATURE_GATES_KEY, "a=b, x=y")]);
        let pool = map(&[(FEATURE_GATES_KEY, "a=c")]);
        let merged = merge_kubelet_flags(&[Some(&cluster), Some(&pool)]).unwrap();
        assert_eq!(merged.get(FEATURE_GATES_KEY).unwrap(), "a=c,x=y");
    }

    #[test]
    fn feature_gates_whitespace_normalizes() {
        let spaced = map(&[(FEATURE_GATES_KEY, "RotateKubeletServerCertificate=true,a=b, PodPriority=true, x=y")]);
        let dense = map(&[(FEATURE_GATES_KEY, "RotateKubeletServerCertificate=true,a=b,PodPriority=true,x=y")]);
        let from_spaced = merge_kubelet_flags(&[Some(&spaced)]).unwrap();
        let from_dense = merge_kubelet_flags(&[Some(&dense)]).unwrap();
        assert_eq!(from_spaced, from_dense);
        assert_eq!(
            from_spaced.get(FEATURE_GATES_KEY).unwrap(),
            "PodPriority=true,RotateKubeletServerCertificate=true,a=b,x=y"
        );
    }

    #[test]
    fn malformed_feature_gate_is_fatal() {
        let layer = map(&[(FEATURE_GATES_KEY, "a=b,oops")]);
        assert_eq!(
            merge_kubelet_flags(&[Some(&layer)]).unwrap_err(),
            MergeError::MalformedFeatureGate {
                entry: "oops".to_owned()
            }
        );
        let layer = map(&[(FEATURE_GATES_KEY, "=true")]);
        assert!(merge_kubelet_flags(&[Some(&layer)]).is_err());
    }

    #[test]
    fn flag_string_is_sorted_and_space_joined() {
        let flags = map(&[("--cloud-provider", "azure"), ("--address", "0.0.0.0")]);
        assert_eq!(
            kubelet_flags_string(&flags),
            "--address=0.0.0.0 --cloud-provider=azure"
        );
        assert_eq!(kubelet_flags_string(&BTreeMap::new()), "");
    }

    #[test]
    fn merge_is_deterministic() {
        let cluster = map(&[(FEATURE_GATES_KEY, "b=2,a=1"), ("--max-pods", "110")]);
        let pool = map(&[(FEATURE_GATES_KEY, "c=3")]);
        let first = merge_kubelet_flags(&[Some(&cluster), Some(&pool)]).unwrap();
        let second = merge_kubelet_flags(&[Some(&cluster), Some(&pool)]).unwrap();
        assert_eq!(kubelet_flags_string(&first), kubelet_flags_string(&second));
    }
}
