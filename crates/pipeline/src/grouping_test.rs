//! Tests for the grouping state machine

use bulk_protocol::Command;

use crate::test_utils::{commands, strings};
use crate::{Grouper, PipelineError, UnterminatedBlock};

/// Run lines plus a terminator through a grouper, collecting sealed batches
fn run(grouper: &mut Grouper, lines: &[&str]) -> Vec<Vec<String>> {
    let mut batches = Vec::new();
    for command in commands(lines).into_iter().chain([Command::terminator()]) {
        if let Some(batch) = grouper.accept(command).expect("accept") {
            batches.push(batch.as_slice().to_vec());
        }
    }
    batches
}

#[test]
fn test_zero_capacity_rejected() {
    let err = Grouper::new(0).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidCapacity));
}

#[test]
fn test_size_cut_without_blocks() {
    let mut grouper = Grouper::new(3).unwrap();
    let batches = run(&mut grouper, &["cmd1", "cmd2", "cmd3", "cmd4", "cmd5"]);

    assert_eq!(
        batches,
        vec![strings(&["cmd1", "cmd2", "cmd3"]), strings(&["cmd4", "cmd5"])]
    );
}

#[test]
fn test_exact_multiple_has_no_trailing_batch() {
    let mut grouper = Grouper::new(2).unwrap();
    let batches = run(&mut grouper, &["a", "b", "c", "d"]);

    assert_eq!(batches, vec![strings(&["a", "b"]), strings(&["c", "d"])]);
}

#[test]
fn test_capacity_one() {
    let mut grouper = Grouper::new(1).unwrap();
    let batches = run(&mut grouper, &["a", "b", "c"]);

    assert_eq!(batches.len(), 3);
    assert!(batches.iter().all(|b| b.len() == 1));
}

#[test]
fn test_block_flushes_pending_and_groups() {
    let mut grouper = Grouper::new(3).unwrap();
    let batches = run(
        &mut grouper,
        &[
            "cmd1", "cmd2", "{", "cmd3", "cmd4", "cmd5", "cmd6", "cmd7", "}",
        ],
    );

    assert_eq!(
        batches,
        vec![
            strings(&["cmd1", "cmd2"]),
            strings(&["cmd3", "cmd4", "cmd5", "cmd6", "cmd7"]),
        ]
    );
}

#[test]
fn test_nested_blocks_collapse() {
    let mut grouper = Grouper::new(3).unwrap();
    let batches = run(
        &mut grouper,
        &[
            "{", "cmd1", "cmd2", "{", "cmd3", "cmd4", "}", "cmd5", "cmd6", "}",
        ],
    );

    assert_eq!(
        batches,
        vec![strings(&["cmd1", "cmd2", "cmd3", "cmd4", "cmd5", "cmd6"])]
    );
}

#[test]
fn test_depth_tracking() {
    let mut grouper = Grouper::new(3).unwrap();
    assert!(!grouper.is_grouping());

    grouper.accept(Command::block_open()).unwrap();
    grouper.accept(Command::block_open()).unwrap();
    assert_eq!(grouper.depth(), 2);

    grouper.accept(Command::data("x")).unwrap();
    assert!(grouper.accept(Command::block_close()).unwrap().is_none());
    assert_eq!(grouper.depth(), 1);

    let batch = grouper.accept(Command::block_close()).unwrap().unwrap();
    assert_eq!(batch.as_slice(), strings(&["x"]).as_slice());
    assert_eq!(grouper.depth(), 0);
}

#[test]
fn test_unterminated_block_flushed_at_terminator() {
    let mut grouper = Grouper::new(3).unwrap();
    let batches = run(
        &mut grouper,
        &[
            "cmd1", "cmd2", "cmd3", "{", "cmd3", "cmd4", "cmd5", "cmd6", "cmd7",
        ],
    );

    assert_eq!(
        batches,
        vec![
            strings(&["cmd1", "cmd2", "cmd3"]),
            strings(&["cmd3", "cmd4", "cmd5", "cmd6", "cmd7"]),
        ]
    );
    assert_eq!(grouper.depth(), 0);
}

#[test]
fn test_unterminated_block_discarded_at_terminator() {
    let mut grouper = Grouper::with_policy(3, UnterminatedBlock::Discard).unwrap();
    let batches = run(
        &mut grouper,
        &[
            "cmd1", "cmd2", "cmd3", "{", "cmd3", "cmd4", "cmd5", "cmd6", "cmd7",
        ],
    );

    assert_eq!(batches, vec![strings(&["cmd1", "cmd2", "cmd3"])]);
    assert_eq!(grouper.pending(), 0);
}

#[test]
fn test_block_contents_not_cut_at_capacity() {
    let mut grouper = Grouper::new(2).unwrap();
    grouper.accept(Command::block_open()).unwrap();
    for i in 0..10 {
        assert!(grouper.accept(Command::data(format!("c{i}"))).unwrap().is_none());
    }
    assert_eq!(grouper.pending(), 10);
}

#[test]
fn test_empty_block_seals_nothing() {
    let mut grouper = Grouper::new(3).unwrap();
    let batches = run(&mut grouper, &["{", "}", "{", "{", "}", "}"]);
    assert!(batches.is_empty());
}

#[test]
fn test_open_after_exact_capacity_seals_nothing_extra() {
    let mut grouper = Grouper::new(2).unwrap();
    let batches = run(&mut grouper, &["a", "b", "{", "c", "}"]);
    assert_eq!(batches, vec![strings(&["a", "b"]), strings(&["c"])]);
}

#[test]
fn test_stray_close_ignored() {
    let mut grouper = Grouper::new(3).unwrap();
    let batches = run(&mut grouper, &["a", "}", "b", "c", "d"]);

    assert_eq!(batches, vec![strings(&["a", "b", "c"]), strings(&["d"])]);
    assert_eq!(grouper.depth(), 0);
}

#[test]
fn test_braces_inside_text_are_data() {
    let mut grouper = Grouper::new(3).unwrap();
    let batches = run(&mut grouper, &["cmd{", "}cmd", " { "]);
    assert_eq!(batches, vec![strings(&["cmd{", "}cmd", " { "])]);
}

#[test]
fn test_empty_input() {
    let mut grouper = Grouper::new(3).unwrap();
    assert!(run(&mut grouper, &[]).is_empty());
    assert!(grouper.is_terminated());
}

#[test]
fn test_commands_after_terminator_rejected() {
    let mut grouper = Grouper::new(3).unwrap();
    grouper.accept(Command::terminator()).unwrap();

    let err = grouper.accept(Command::data("late")).unwrap_err();
    assert!(matches!(err, PipelineError::Terminated));
    let err = grouper.accept(Command::terminator()).unwrap_err();
    assert!(matches!(err, PipelineError::Terminated));
}

#[test]
fn test_batch_sequence_increases() {
    let mut grouper = Grouper::new(1).unwrap();
    let first = grouper.accept(Command::data("a")).unwrap().unwrap();
    let second = grouper.accept(Command::data("b")).unwrap().unwrap();
    assert_eq!(first.sequence() + 1, second.sequence());
}

#[test]
fn test_policy_display() {
    assert_eq!(UnterminatedBlock::default().to_string(), "flush");
    assert_eq!(UnterminatedBlock::Discard.to_string(), "discard");
}
