//! Tests for the `diagnostics` application service.

#![allow(clippy::expect_used)]

use streamrig::application::services::diagnostics::{collect_diagnostics, stack_status};
use streamrig::domain::config::StackConfig;
use streamrig::domain::health;

use crate::mocks::{EventLog, FakeProcesses, FakeRunner, MemFs, PortStub};

fn listing_with_9092() -> String {
    "\
Proto Recv-Q Send-Q Local Address           Foreign Address         State
tcp        0      0 0.0.0.0:22              0.0.0.0:*               LISTEN
tcp6       0      0 :::9092                 :::*                    LISTEN
"
    .to_string()
}

#[tokio::test]
async fn test_collect_diagnostics_tails_log_and_checks_port() {
    let cfg = StackConfig::default();
    let fs = MemFs::default();
    fs.add_file(
        &cfg.broker.server_log_path(),
        &(1..=60).map(|i| format!("line {i}\n")).collect::<String>(),
    );
    let processes = FakeProcesses::default();
    processes.set_running("kafka.Kafka", &[412]);
    let mut runner = FakeRunner::with_log(EventLog::default());
    runner.netstat_stdout = listing_with_9092();

    let report = collect_diagnostics(&fs, &processes, &runner, &cfg).await;
    assert_eq!(report.log_tail.len(), 50);
    assert!(report.port_bound);
    assert_eq!(report.broker.pids, vec![412]);
    assert!(health::collect_issues(&report).is_empty());
}

#[tokio::test]
async fn test_collect_diagnostics_with_stack_down_reports_everything_missing() {
    let cfg = StackConfig::default();
    let fs = MemFs::default();
    let processes = FakeProcesses::default();
    let runner = FakeRunner::with_log(EventLog::default());

    let report = collect_diagnostics(&fs, &processes, &runner, &cfg).await;
    assert!(report.log_tail.is_empty());
    assert!(!report.port_bound);
    assert!(!report.broker.found);
    assert_eq!(health::collect_issues(&report).len(), 3);
}

#[tokio::test]
async fn test_stack_status_reports_both_services() {
    let cfg = StackConfig::default();
    let processes = FakeProcesses::default();
    processes.set_running("zookeeper", &[977]);
    processes.set_running("kafka.Kafka", &[412]);
    let network = PortStub { open: true };

    let status = stack_status(&processes, &network, &cfg)
        .await
        .expect("status");
    assert_eq!(status.coordination.pids, vec![977]);
    assert_eq!(status.broker.pids, vec![412]);
    assert!(status.port_reachable);
    assert_eq!(status.listener_port, 9092);
}

#[tokio::test]
async fn test_stack_status_with_nothing_running() {
    let cfg = StackConfig::default();
    let processes = FakeProcesses::default();
    let network = PortStub { open: false };

    let status = stack_status(&processes, &network, &cfg)
        .await
        .expect("status");
    assert!(!status.coordination.found);
    assert!(!status.broker.found);
    assert!(!status.port_reachable);
}
