//! Property tests for host selection

use std::collections::HashSet;

use proptest::prelude::*;
use sentinel_core::models::ALL_HOSTS;
use sentinel_core::{HostSpec, RunRequest, SelectionRequest};

fn registry_strategy() -> impl Strategy<Value = Vec<HostSpec>> {
    prop::collection::hash_set("[a-z][a-z0-9-]{0,8}", 0..12).prop_map(|names| {
        names
            .into_iter()
            .map(|n| HostSpec::new(n, "10.0.0.1", 22, "root"))
            .collect()
    })
}

fn names(hosts: &[&HostSpec]) -> Vec<String> {
    hosts.iter().map(|h| h.name.clone()).collect()
}

proptest! {
    /// Property: resolution preserves registry order and never duplicates
    #[test]
    fn resolve_preserves_order_without_duplicates(
        registry in registry_strategy(),
        picks in prop::collection::vec(0usize..16, 0..20),
        extra in prop::collection::vec("[A-Z]{3}", 0..3),
    ) {
        let mut requested: Vec<String> = picks
            .iter()
            .filter_map(|i| registry.get(*i).map(|h| h.name.clone()))
            .collect();
        requested.extend(extra);
        prop_assume!(!requested.is_empty());
        prop_assume!(requested != [ALL_HOSTS]);

        let resolved = names(&SelectionRequest::from_names(requested.clone()).resolve(&registry));

        let unique: HashSet<&String> = resolved.iter().collect();
        prop_assert_eq!(unique.len(), resolved.len());

        let order: Vec<String> = registry
            .iter()
            .filter(|h| requested.contains(&h.name))
            .map(|h| h.name.clone())
            .collect();
        prop_assert_eq!(resolved, order);
    }

    /// Property: empty and explicit "all" both resolve to the full registry
    #[test]
    fn empty_and_all_resolve_to_registry(registry in registry_strategy()) {
        let everything = names(&registry.iter().collect::<Vec<_>>());
        let empty = names(&SelectionRequest::from_names(Vec::<String>::new()).resolve(&registry));
        let all = names(&SelectionRequest::from_names([ALL_HOSTS]).resolve(&registry));

        prop_assert_eq!(&empty, &everything);
        prop_assert_eq!(&all, &everything);
    }

    /// Property: names absent from the registry resolve to nothing
    #[test]
    fn unknown_names_are_ignored(
        registry in registry_strategy(),
        unknown in prop::collection::vec("[A-Z]{4,6}", 1..5),
    ) {
        let resolved = SelectionRequest::from_names(unknown).resolve(&registry);
        prop_assert!(resolved.is_empty());
    }

    /// Property: run requests with any host list decode into the same selection
    #[test]
    fn run_request_matches_direct_selection(
        servers in prop::collection::vec("[a-z]{1,6}", 0..6),
    ) {
        let message = serde_json::json!({ "action": "run", "servers": servers }).to_string();
        let selection = RunRequest::from_json(&message).unwrap().into_selection().unwrap();
        prop_assert_eq!(selection, SelectionRequest::from_names(servers));
    }
}
