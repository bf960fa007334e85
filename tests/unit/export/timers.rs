use super::*;

#[test]
fn fires_in_deadline_order() {
    let mut q = TimerQueue::new();
    q.schedule(0, 6000, TimerKind::StopBuffering, 1);
    q.schedule(0, 800, TimerKind::StartBuffering, 1);

    assert_eq!(q.next_deadline(), Some(800));
    assert_eq!(q.pop_due(799), None);

    let first = q.pop_due(10_000).unwrap();
    assert_eq!(first.kind, TimerKind::StartBuffering);
    assert_eq!(first.deadline, 800);

    let second = q.pop_due(10_000).unwrap();
    assert_eq!(second.kind, TimerKind::StopBuffering);
    assert!(q.is_empty());
}

#[test]
fn equal_deadlines_keep_scheduling_order() {
    let mut q = TimerQueue::new();
    q.schedule(100, 0, TimerKind::StopBuffering, 7);
    q.schedule(100, 0, TimerKind::StartBuffering, 8);
    assert_eq!(q.len(), 2);
    assert_eq!(q.pop_due(100).unwrap().session, 7);
    assert_eq!(q.pop_due(100).unwrap().session, 8);
}

#[test]
fn saturates_instead_of_overflowing() {
    let mut q = TimerQueue::new();
    let d = q.schedule(u64::MAX - 1, 10, TimerKind::StopBuffering, 1);
    assert_eq!(d, u64::MAX);
}
