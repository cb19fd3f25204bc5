//! The process-wide labeler reads the dual-stack flag from the global
//! options on every call. Kept in its own test binary so no other test
//! observes the flag flipping.

use cidr_labels_core::option::config;
use cidr_labels_core::{cidr_labels, purge_cache, Prefix};

#[test]
fn global_labeler_tracks_option_changes() {
    let v4: Prefix = "192.168.1.0/24".parse().expect("valid prefix");
    let v6: Prefix = "fd00::/8".parse().expect("valid prefix");

    config().set_enable_ipv4(true);
    config().set_enable_ipv6(false);
    assert!(cidr_labels(v4).contains_key("world"));
    assert!(cidr_labels(v6).contains_key("world"));

    config().set_enable_ipv6(true);
    assert!(cidr_labels(v4).contains_key("world-ipv4"));
    assert!(cidr_labels(v6).contains_key("world-ipv6"));

    let labels = cidr_labels(v4);
    assert_eq!(labels.len(), 26);
    assert!(!labels.contains_key("world"));

    purge_cache();
    assert_eq!(cidr_labels(v4), labels);
}
