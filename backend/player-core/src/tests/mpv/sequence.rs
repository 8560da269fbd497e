use crate::REQUEST_ID_BASE;
use crate::mpv::sequence::RequestIdSequence;

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn given_default_sequence_when_drawn_then_starts_at_base_and_increments() {
    let sequence = RequestIdSequence::default();

    assert_eq!(sequence.next_id(), REQUEST_ID_BASE);
    assert_eq!(sequence.next_id(), REQUEST_ID_BASE + 1);
    assert_eq!(sequence.peek(), REQUEST_ID_BASE + 2);
}

#[test]
fn given_used_sequence_when_reset_then_restarts_from_seed() {
    let sequence = RequestIdSequence::starting_at(500);
    sequence.next_id();
    sequence.next_id();

    sequence.reset(10);

    assert_eq!(sequence.next_id(), 10);
}

/// **VALUE**: Clones share one counter; independent sequences do not.
///
/// **WHY THIS MATTERS**: Two clients only draw from the same id space when explicitly wired
/// together. Hidden sharing is exactly what an injectable sequence exists to avoid.
#[test]
fn given_clone_and_independent_sequence_when_drawn_then_only_clone_shares_state() {
    let original = RequestIdSequence::default();
    let shared = original.clone();
    let independent = RequestIdSequence::default();

    let a = original.next_id();
    let b = shared.next_id();
    let c = independent.next_id();

    assert_ne!(a, b, "clones must not hand out the same id");
    assert_eq!(c, REQUEST_ID_BASE, "independent sequence is untouched");
}

/// **VALUE**: Concurrent callers never observe the same identifier.
///
/// **BUG THIS CATCHES**: Would catch a load-then-store increment that lets two threads read
/// the same value before either writes back.
#[test]
fn given_many_threads_when_drawing_ids_then_all_unique() {
    let sequence = Arc::new(RequestIdSequence::default());
    let threads = 8;
    let per_thread = 500;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let sequence = Arc::clone(&sequence);
            thread::spawn(move || (0..per_thread).map(|_| sequence.next_id()).collect::<Vec<_>>())
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().expect("worker thread panicked") {
            assert!(seen.insert(id), "duplicate id {id}");
        }
    }

    assert_eq!(seen.len(), threads * per_thread);
}
