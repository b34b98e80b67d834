//! End-to-end batch runs through the orchestrator and coordinator

use std::sync::Arc;
use std::sync::atomic::Ordering;

use sentinel_core::models::UNREACHABLE_ERROR;
use sentinel_core::monitoring::{CPU_IDLE_COMMAND, DEFAULT_MAINTENANCE_COMMAND};
use sentinel_core::{
    ExecError, HostRegistry, HostSpec, JsonReportWriter, Orchestrator, ProbeSettings,
    ProgressStatus, SelectionRequest, TriggerCoordinator,
};

use super::support::{RecordingSink, ScriptedExecutor, closed_port, open_port};

fn settings() -> ProbeSettings {
    ProbeSettings {
        reachability_timeout_secs: 1,
        ..ProbeSettings::default()
    }
}

#[tokio::test]
async fn unreachable_and_reachable_hosts_keep_order() {
    let (_listener, open) = open_port().await;
    let registry = vec![
        HostSpec::new("web1", "127.0.0.1", closed_port(), "root").with_password("pw"),
        HostSpec::new("db1", "127.0.0.1", open, "root").with_password("pw"),
    ];
    let orchestrator = Orchestrator::new(Arc::new(ScriptedExecutor::healthy()), settings());
    let sink = Arc::new(RecordingSink::default());

    let batch = orchestrator
        .run_batch(&registry, &SelectionRequest::from_names(["all"]), sink.clone())
        .await
        .unwrap();

    let reports = batch.reports();
    assert_eq!(reports.len(), 2);

    assert_eq!(reports[0].server_name, "web1");
    assert!(!reports[0].is_online);
    assert_eq!(reports[0].error.as_deref(), Some(UNREACHABLE_ERROR));
    assert!(!reports[0].cache_cleared);
    assert!(reports[0].has_default_metrics());

    assert_eq!(reports[1].server_name, "db1");
    assert!(reports[1].is_online);
    assert!(reports[1].error.is_none());
    assert!(reports[1].cache_cleared);
    assert!((reports[1].cpu_usage_percent - 12.5).abs() < f64::EPSILON);
    assert_eq!(reports[1].mem_total_mb, 1000);
    assert_eq!(reports[1].swap_used_mb, 12);
    assert!(reports[1].top_processes.starts_with("COMMAND"));

    let lines = sink.lines();
    assert_eq!(lines[0], "Starting health check process...");
    assert!(lines.contains(&"[web1] ❌ Server is unreachable.".to_string()));
    assert!(lines.contains(&"[db1] ✅ Server is online.".to_string()));
    assert!(lines.contains(&"[db1] ✅ Metrics collected.".to_string()));
}

#[tokio::test]
async fn garbage_cpu_output_keeps_other_metrics() {
    let (_listener, port) = open_port().await;
    let registry = vec![HostSpec::new("db1", "127.0.0.1", port, "root").with_password("pw")];
    let executor = ScriptedExecutor::healthy().reply(CPU_IDLE_COMMAND, Ok("top: not found".into()));
    let orchestrator = Orchestrator::new(Arc::new(executor), settings());

    let batch = orchestrator
        .run_batch(&registry, &SelectionRequest::All, Arc::new(RecordingSink::default()))
        .await
        .unwrap();

    let report = &batch.reports()[0];
    assert!(report.is_online);
    assert!(report.cpu_usage_percent.abs() < f64::EPSILON);
    assert_eq!(report.mem_total_mb, 1000);
    assert_eq!(report.mem_used_mb, 400);
    assert_eq!(report.mem_free_mb, 600);
    assert_eq!(report.swap_total_mb, 512);
    assert!(!report.top_processes.is_empty());
}

#[tokio::test]
async fn auth_failure_is_isolated_to_its_host() {
    let (_a, port_a) = open_port().await;
    let (_b, port_b) = open_port().await;
    let registry = vec![
        HostSpec::new("app1", "127.0.0.1", port_a, "root").with_password("wrong"),
        HostSpec::new("app2", "127.0.0.1", port_b, "root").with_password("pw"),
    ];
    let executor = ScriptedExecutor::healthy().reply_for(
        "app1",
        DEFAULT_MAINTENANCE_COMMAND,
        Err(ExecError::Auth {
            user: "root".into(),
            host: "127.0.0.1".into(),
            reason: "Permission denied (password).".into(),
        }),
    );
    let orchestrator = Orchestrator::new(Arc::new(executor), settings());
    let sink = Arc::new(RecordingSink::default());

    let batch = orchestrator
        .run_batch(&registry, &SelectionRequest::All, sink.clone())
        .await
        .unwrap();

    let failed = &batch.reports()[0];
    assert!(failed.is_online);
    assert!(!failed.is_healthy());
    assert!(failed.has_default_metrics());
    assert!(failed.error.as_deref().unwrap().contains("Permission denied"));

    let healthy = &batch.reports()[1];
    assert!(healthy.is_healthy());
    assert_eq!(healthy.mem_total_mb, 1000);

    let events = sink.events.lock().unwrap();
    assert!(
        events
            .iter()
            .any(|e| e.host.as_deref() == Some("app1") && e.status == ProgressStatus::Fail)
    );
}

#[tokio::test]
async fn unreachable_host_never_runs_commands() {
    let registry =
        vec![HostSpec::new("web1", "127.0.0.1", closed_port(), "root").with_password("pw")];
    let executor = Arc::new(ScriptedExecutor::healthy());
    let orchestrator = Orchestrator::new(executor.clone(), settings());

    orchestrator
        .run_batch(
            &registry,
            &SelectionRequest::All,
            Arc::new(RecordingSink::default()),
        )
        .await
        .unwrap();

    assert_eq!(executor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn concurrent_triggers_publish_complete_batches() {
    let mut listeners = Vec::new();
    let mut hosts = Vec::new();
    for i in 0..5 {
        let (listener, port) = open_port().await;
        listeners.push(listener);
        hosts.push(
            HostSpec::new(format!("node{i}"), "127.0.0.1", port, "root").with_password("pw"),
        );
    }
    let registry = Arc::new(HostRegistry::new(hosts).unwrap());
    let temp = tempfile::tempdir().unwrap();
    let coordinator = Arc::new(TriggerCoordinator::new(
        registry,
        Orchestrator::new(Arc::new(ScriptedExecutor::healthy()), settings()),
        Arc::new(JsonReportWriter::new(temp.path())),
    ));

    let first = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move {
            coordinator
                .trigger_run(SelectionRequest::All, Arc::new(RecordingSink::default()))
                .await
        })
    };
    let second = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move {
            coordinator
                .trigger_run(
                    SelectionRequest::from_names(["node1", "node3"]),
                    Arc::new(RecordingSink::default()),
                )
                .await
        })
    };

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();
    assert_eq!(first.batch.len(), 5);
    assert_eq!(second.batch.len(), 2);

    let latest = coordinator.cache().latest().unwrap();
    assert!(latest.run_id() == first.batch.run_id() || latest.run_id() == second.batch.run_id());
    assert!(latest.len() == 5 || latest.len() == 2);
    assert!(latest.reports().iter().all(|r| r.is_healthy()));
}

#[tokio::test]
async fn coordinator_stream_ends_with_complete_marker() {
    let (_listener, port) = open_port().await;
    let registry = Arc::new(
        HostRegistry::new(vec![
            HostSpec::new("db1", "127.0.0.1", port, "root").with_password("pw"),
        ])
        .unwrap(),
    );
    let temp = tempfile::tempdir().unwrap();
    let coordinator = TriggerCoordinator::new(
        registry,
        Orchestrator::new(Arc::new(ScriptedExecutor::healthy()), settings()),
        Arc::new(JsonReportWriter::new(temp.path().join("out"))),
    );
    let sink = Arc::new(RecordingSink::default());

    let outcome = coordinator
        .trigger_run(SelectionRequest::All, sink.clone())
        .await
        .unwrap();

    assert!(outcome.published);
    assert!(outcome.notified);
    let artifact = outcome.artifact.unwrap();
    assert!(artifact.path().exists());

    let lines = sink.lines();
    assert_eq!(lines.last().unwrap(), "🏁 Process complete.");
    assert!(lines.iter().any(|l| l.starts_with("✅ Report created: ")));
    assert_eq!(coordinator.cache().latest_reports().len(), 1);
}
