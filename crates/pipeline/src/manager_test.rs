//! Tests for the batch manager and driver

use std::sync::Arc;
use std::time::Duration;

use bulk_protocol::{Command, VecSource};

use crate::test_utils::{FailingSink, RecordingSink, commands, strings};
use crate::{BulkManager, PipelineError, PoolConfig, UnterminatedBlock, drive};

fn feed(manager: &mut BulkManager, lines: &[&str]) {
    for command in commands(lines) {
        manager.submit(command).unwrap();
    }
    manager.submit(Command::terminator()).unwrap();
}

#[test]
fn test_scenario_plain_commands() {
    let sink = Arc::new(RecordingSink::new("rec"));
    let mut manager = BulkManager::new(3).unwrap();
    manager
        .subscribe(sink.clone(), &PoolConfig::new("console", 1))
        .unwrap();

    feed(&mut manager, &["cmd1", "cmd2", "cmd3", "cmd4", "cmd5"]);
    let report = manager.shutdown();

    assert_eq!(
        sink.batches(),
        vec![strings(&["cmd1", "cmd2", "cmd3"]), strings(&["cmd4", "cmd5"])]
    );
    assert_eq!(report.metrics.lines, 5);
    assert_eq!(report.metrics.commands, 5);
    assert_eq!(report.metrics.blocks, 2);
}

#[test]
fn test_scenario_block_after_commands() {
    let sink = Arc::new(RecordingSink::new("rec"));
    let mut manager = BulkManager::new(3).unwrap();
    manager
        .subscribe(sink.clone(), &PoolConfig::new("console", 1))
        .unwrap();

    feed(
        &mut manager,
        &[
            "cmd1", "cmd2", "{", "cmd3", "cmd4", "cmd5", "cmd6", "cmd7", "}",
        ],
    );
    let report = manager.shutdown();

    assert_eq!(
        sink.batches(),
        vec![
            strings(&["cmd1", "cmd2"]),
            strings(&["cmd3", "cmd4", "cmd5", "cmd6", "cmd7"]),
        ]
    );
    assert_eq!(report.metrics.lines, 9);
    assert_eq!(report.metrics.commands, 7);
    assert_eq!(report.metrics.blocks, 2);
}

#[test]
fn test_scenario_nested_blocks() {
    let sink = Arc::new(RecordingSink::new("rec"));
    let mut manager = BulkManager::new(3).unwrap();
    manager
        .subscribe(sink.clone(), &PoolConfig::new("console", 2))
        .unwrap();

    feed(
        &mut manager,
        &[
            "{", "cmd1", "cmd2", "{", "cmd3", "cmd4", "}", "cmd5", "cmd6", "}",
        ],
    );
    let report = manager.shutdown();

    assert_eq!(
        sink.batches(),
        vec![strings(&["cmd1", "cmd2", "cmd3", "cmd4", "cmd5", "cmd6"])]
    );
    assert_eq!(report.metrics.blocks, 1);
    assert_eq!(report.metrics.commands, 6);
    assert_eq!(report.metrics.lines, 10);
}

#[test]
fn test_scenario_unterminated_block() {
    let lines = [
        "cmd1", "cmd2", "cmd3", "{", "cmd3", "cmd4", "cmd5", "cmd6", "cmd7",
    ];

    let flushed = Arc::new(RecordingSink::new("flush"));
    let mut manager = BulkManager::new(3).unwrap();
    manager
        .subscribe(flushed.clone(), &PoolConfig::new("console", 1))
        .unwrap();
    feed(&mut manager, &lines);
    let report = manager.shutdown();

    assert_eq!(flushed.batches().len(), 2);
    assert_eq!(report.metrics.blocks, 2);

    let discarded = Arc::new(RecordingSink::new("discard"));
    let mut manager = BulkManager::with_policy(3, UnterminatedBlock::Discard).unwrap();
    manager
        .subscribe(discarded.clone(), &PoolConfig::new("console", 1))
        .unwrap();
    feed(&mut manager, &lines);
    let report = manager.shutdown();

    assert_eq!(
        discarded.batches(),
        vec![strings(&["cmd1", "cmd2", "cmd3"])]
    );
    assert_eq!(report.metrics.blocks, 1);
    assert_eq!(report.metrics.commands, 8);
}

#[test]
fn test_fan_out_to_every_sink() {
    let console = Arc::new(RecordingSink::new("console"));
    let file = Arc::new(RecordingSink::new("file"));
    let mut manager = BulkManager::new(2).unwrap();
    manager
        .subscribe(console.clone(), &PoolConfig::new("console", 2))
        .unwrap();
    manager
        .subscribe(file.clone(), &PoolConfig::new("file", 2))
        .unwrap();
    assert_eq!(manager.lane_count(), 2);
    assert_eq!(manager.subscription_count(), 2);

    feed(&mut manager, &["a", "b", "c", "d", "e"]);
    let report = manager.shutdown();

    let expected = vec![strings(&["a", "b"]), strings(&["c", "d"]), strings(&["e"])];
    assert_eq!(console.batches(), expected);
    assert_eq!(file.batches(), expected);

    // Each lane processed every command once
    assert_eq!(report.pools.len(), 2);
    for pool in &report.pools {
        assert_eq!(pool.total_commands(), 5);
        assert_eq!(pool.total_blocks(), 3);
        assert_eq!(pool.submitted, 3);
    }
}

#[test]
fn test_lane_reused_by_name() {
    let first = Arc::new(RecordingSink::new("first"));
    let second = Arc::new(RecordingSink::new("second"));
    let mut manager = BulkManager::new(1).unwrap();
    manager
        .subscribe(first.clone(), &PoolConfig::new("shared", 1))
        .unwrap();
    let id = manager
        .subscribe(second.clone(), &PoolConfig::new("shared", 4))
        .unwrap();
    assert_eq!(id.index(), 1);
    assert_eq!(manager.lane_count(), 1);

    feed(&mut manager, &["x", "y"]);
    let report = manager.shutdown();

    assert_eq!(report.pools.len(), 1);
    assert_eq!(report.pools[0].worker_count(), 1);
    assert_eq!(report.pools[0].total_blocks(), 4);
    assert_eq!(first.batches().len(), 2);
    assert_eq!(second.batches().len(), 2);
}

#[test]
fn test_single_worker_lane_preserves_order() {
    let sink = Arc::new(RecordingSink::with_delay("slow", Duration::from_millis(1)));
    let mut manager = BulkManager::new(1).unwrap();
    manager
        .subscribe(sink.clone(), &PoolConfig::new("ordered", 1))
        .unwrap();

    let lines: Vec<String> = (0..20).map(|i| format!("cmd{i}")).collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    feed(&mut manager, &refs);
    manager.shutdown();

    assert_eq!(sink.arrival_order(), (0..20).collect::<Vec<u64>>());
}

#[test]
fn test_failing_sink_does_not_block_others() {
    let good = Arc::new(RecordingSink::new("good"));
    let erroring = Arc::new(FailingSink::erroring());
    let panicking = Arc::new(FailingSink::panicking());
    let mut manager = BulkManager::new(2).unwrap();
    manager
        .subscribe(erroring.clone(), &PoolConfig::new("bad", 1))
        .unwrap();
    manager
        .subscribe(panicking.clone(), &PoolConfig::new("bad", 1))
        .unwrap();
    manager
        .subscribe(good.clone(), &PoolConfig::new("good", 1))
        .unwrap();

    feed(&mut manager, &["a", "b", "c", "d"]);
    let report = manager.shutdown();

    assert_eq!(good.batches().len(), 2);
    assert_eq!(erroring.calls(), 2);
    assert_eq!(panicking.calls(), 2);

    let bad = report.pools.iter().find(|p| p.pool == "bad").unwrap();
    assert_eq!(bad.total_failures(), 4);
    assert_eq!(bad.total_blocks(), 0);
}

#[test]
fn test_no_subscribers_still_counts() {
    let mut manager = BulkManager::new(2).unwrap();
    feed(&mut manager, &["a", "b", "c"]);

    let metrics = manager.report_metrics();
    assert_eq!(metrics.blocks, 2);
    assert!(manager.shutdown().pools.is_empty());
}

#[test]
fn test_submit_after_terminator() {
    let mut manager = BulkManager::new(3).unwrap();
    manager.submit(Command::terminator()).unwrap();
    assert!(manager.is_terminated());

    let err = manager.submit(Command::data("late")).unwrap_err();
    assert!(matches!(err, PipelineError::Terminated));
    assert_eq!(manager.report_metrics().lines, 0);
}

#[test]
fn test_stray_close_counts_as_line() {
    let mut manager = BulkManager::new(3).unwrap();
    feed(&mut manager, &["}", "a"]);

    let metrics = manager.report_metrics();
    assert_eq!(metrics.lines, 2);
    assert_eq!(metrics.commands, 1);
    assert_eq!(metrics.blocks, 1);
}

#[test]
fn test_invalid_lane_config() {
    let mut manager = BulkManager::new(3).unwrap();
    let err = manager
        .subscribe(Arc::new(RecordingSink::new("x")), &PoolConfig::new("none", 0))
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidWorkerCount { .. }));
    assert_eq!(manager.lane_count(), 0);
    assert_eq!(manager.subscription_count(), 0);
}

#[test]
fn test_drive_until_terminator() {
    let sink = Arc::new(RecordingSink::new("rec"));
    let mut manager = BulkManager::new(3).unwrap();
    manager
        .subscribe(sink.clone(), &PoolConfig::default())
        .unwrap();

    let mut source = VecSource::from_lines(["cmd1", "{", "cmd2", "cmd3", "}", "cmd4"]);
    let submitted = drive(&mut source, &mut manager).unwrap();
    assert_eq!(submitted, 6);
    assert!(manager.is_terminated());

    manager.shutdown();
    assert_eq!(
        sink.batches(),
        vec![
            strings(&["cmd1"]),
            strings(&["cmd2", "cmd3"]),
            strings(&["cmd4"]),
        ]
    );
}

#[test]
fn test_drop_drains_lanes() {
    let sink = Arc::new(RecordingSink::with_delay("slow", Duration::from_millis(2)));
    {
        let mut manager = BulkManager::new(1).unwrap();
        manager
            .subscribe(sink.clone(), &PoolConfig::new("drop", 2))
            .unwrap();
        feed(&mut manager, &["a", "b", "c", "d"]);
    }
    assert_eq!(sink.batches().len(), 4);
}
