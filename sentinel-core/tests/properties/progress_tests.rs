//! Property tests for progress line rendering

use proptest::prelude::*;
use sentinel_core::{ProgressEvent, ProgressStatus};

fn status_strategy() -> impl Strategy<Value = ProgressStatus> {
    prop_oneof![
        Just(ProgressStatus::Info),
        Just(ProgressStatus::Ok),
        Just(ProgressStatus::Warn),
        Just(ProgressStatus::Fail),
    ]
}

proptest! {
    /// Property: host lines are prefixed with the bracketed host name
    #[test]
    fn host_lines_are_prefixed(
        host in "[a-z][a-z0-9-]{0,12}",
        status in status_strategy(),
        message in "[A-Za-z .]{1,40}",
    ) {
        let line = ProgressEvent::for_host(host.clone(), status, message.clone()).to_string();
        let prefix = format!("[{host}] ");
        prop_assert!(line.starts_with(&prefix));
        prop_assert!(line.ends_with(&message));
        match status.icon() {
            Some(icon) => {
                prop_assert!(line.contains(icon));
            }
            None => {
                prop_assert_eq!(line, format!("{prefix}{message}"));
            }
        }
    }

    /// Property: run-level lines carry no host prefix
    #[test]
    fn run_lines_have_no_prefix(status in status_strategy(), message in "[A-Za-z .]{1,40}") {
        let event = ProgressEvent::run(status, message.clone());
        prop_assert!(event.host.is_none());
        prop_assert!(!event.to_string().starts_with('['));
        prop_assert!(!event.is_complete());
    }
}
