//! Report rendering and the latest-batch query surface

use std::sync::Arc;

use chrono::Utc;
use sentinel_core::reporting::REPORT_COLUMNS;
use sentinel_core::{
    Batch, HealthReport, HostSpec, JsonReportWriter, LatestBatchCache, ReportWriter,
};
use uuid::Uuid;

fn batch() -> Batch {
    let web = HostSpec::new("web1", "10.0.0.1", 22, "root");
    let db = HostSpec::new("db1", "10.0.0.2", 22, "root");
    let mut online = HealthReport::new(&db);
    online.is_online = true;
    online.cache_cleared = true;
    online.cpu_usage_percent = 42.0;
    online.mem_total_mb = 2048;
    online.mem_used_mb = 1024;
    online.mem_free_mb = 1024;
    Batch::new(
        Uuid::new_v4(),
        Utc::now(),
        vec![HealthReport::unreachable(&web), online],
    )
}

#[tokio::test]
async fn json_report_rows_follow_column_order() {
    let temp = tempfile::tempdir().unwrap();
    let writer = JsonReportWriter::new(temp.path().join("reports"));

    let artifact = writer.write_report(&batch()).await.unwrap();
    let text = std::fs::read_to_string(artifact.path()).unwrap();

    let first_row = &text[..text.find('}').unwrap()];
    let positions: Vec<usize> = REPORT_COLUMNS
        .iter()
        .map(|c| first_row.find(&format!("\"{c}\"")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let rows: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(rows[0]["Status"], "Offline");
    assert_eq!(rows[0]["Error"], "Server is unreachable");
    assert_eq!(rows[1]["Status"], "Online");
    assert_eq!(rows[1]["Mem Total (MB)"], 2048);
    assert_eq!(rows[1]["Error"], "");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn overlapping_writes_keep_both_reports() {
    for _ in 0..10 {
        let temp = tempfile::tempdir().unwrap();
        let writer = JsonReportWriter::new(temp.path());
        let first = batch();
        let second = batch();

        let (a, b) = tokio::join!(writer.write_report(&first), writer.write_report(&second));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_ne!(a.path(), b.path());
        let files = std::fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(files, 2);

        let rows: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(b.path()).unwrap()).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 2);
    }
}

#[test]
fn latest_json_uses_wire_field_names() {
    let cache = LatestBatchCache::new();
    assert_eq!(cache.latest_json().unwrap(), "[]");

    cache.publish(Arc::new(batch()));
    let value: serde_json::Value = serde_json::from_str(&cache.latest_json().unwrap()).unwrap();
    let reports = value.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["serverName"], "web1");
    assert_eq!(reports[0]["isOnline"], false);
    assert_eq!(reports[1]["cpuUsage"], 42.0);
    assert_eq!(reports[1]["memTotalMB"], 2048);
    assert!(reports[1].get("timestamp").is_some());
}
