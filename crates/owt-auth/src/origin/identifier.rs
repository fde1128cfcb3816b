//! Client label derivation from reverse-DNS host names

/// Number of labels a host name must have to yield a client label
pub const EXPECTED_HOST_LABELS: usize = 4;

/// Reduce a resolved host name to its client label
///
/// Exactly four dot-separated labels (`node.client.corp.com`) yield the last
/// three (`client.corp.com`). Any other shape yields an empty label, which
/// never matches the allow-list. A single trailing root dot is ignored.
pub fn derive_client_label(host_name: &str) -> String {
    let host_name = host_name.trim();
    let host_name = host_name.strip_suffix('.').unwrap_or(host_name);

    let labels: Vec<&str> = host_name.split('.').collect();
    if labels.len() != EXPECTED_HOST_LABELS || labels.iter().any(|label| label.is_empty()) {
        return String::new();
    }

    labels[1..].join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_four_labels() {
        assert_eq!(derive_client_label("a.b.c.d"), "b.c.d");
        assert_eq!(
            derive_client_label("web01.client-one.corp.example"),
            "client-one.corp.example"
        );
    }

    #[test]
    fn test_trailing_root_dot() {
        assert_eq!(derive_client_label("a.b.c.d."), "b.c.d");
    }

    #[test]
    fn test_other_counts_are_empty() {
        assert_eq!(derive_client_label(""), "");
        assert_eq!(derive_client_label("localhost"), "");
        assert_eq!(derive_client_label("a.b.c"), "");
        assert_eq!(derive_client_label("a.b.c.d.e"), "");
    }

    #[test]
    fn test_empty_labels_rejected() {
        assert_eq!(derive_client_label("a..c.d"), "");
        assert_eq!(derive_client_label(".b.c.d"), "");
    }

    proptest! {
        #[test]
        fn prop_four_labels_keep_last_three(labels in proptest::collection::vec("[a-z0-9-]{1,10}", 4)) {
            let host = labels.join(".");
            prop_assert_eq!(derive_client_label(&host), labels[1..].join("."));
        }

        #[test]
        fn prop_other_counts_yield_empty(labels in proptest::collection::vec("[a-z0-9-]{1,10}", 1..9usize)) {
            prop_assume!(labels.len() != EXPECTED_HOST_LABELS);
            prop_assert_eq!(derive_client_label(&labels.join(".")), "");
        }
    }
}
