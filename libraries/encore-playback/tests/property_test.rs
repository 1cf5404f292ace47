//! Property-based tests for the queue and session cursor
//!
//! Uses proptest to verify boundary invariants across many random queues.

mod common;

use common::{session, track};
use encore_core::Track;
use encore_playback::{Queue, SkipOutcome};
use proptest::prelude::*;

// ===== Helpers =====

fn arbitrary_tracks() -> impl Strategy<Value = Vec<Track>> {
    prop::collection::vec("[a-z0-9]{1,10}", 1..30)
        .prop_map(|names| names.iter().map(|n| track(n)).collect())
}

fn queue_with_start() -> impl Strategy<Value = (Vec<Track>, usize)> {
    arbitrary_tracks().prop_flat_map(|tracks| {
        let len = tracks.len();
        (Just(tracks), 0..len)
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// ===== Property Tests =====

proptest! {
    /// Property: replace(tracks, i) always leaves the cursor at i
    #[test]
    fn replace_sets_requested_cursor((tracks, start) in queue_with_start()) {
        let mut queue = Queue::new();
        queue.replace(tracks.clone(), start).unwrap();
        prop_assert_eq!(queue.current_index(), Some(start));
        prop_assert_eq!(queue.current(), tracks.get(start));
    }

    /// Property: advancing at the last index changes nothing
    #[test]
    fn advance_at_end_is_noop(tracks in arbitrary_tracks()) {
        let last = tracks.len() - 1;
        let mut queue = Queue::new();
        queue.replace(tracks, last).unwrap();

        prop_assert!(queue.advance().is_none());
        prop_assert_eq!(queue.current_index(), Some(last));
    }

    /// Property: retreating at index 0 changes nothing
    #[test]
    fn retreat_at_start_is_noop(tracks in arbitrary_tracks()) {
        let mut queue = Queue::new();
        queue.replace(tracks, 0).unwrap();

        prop_assert!(queue.retreat().is_none());
        prop_assert_eq!(queue.current_index(), Some(0));
    }

    /// Property: any walk of skips keeps the cursor in range
    #[test]
    fn cursor_stays_in_range(
        (tracks, start) in queue_with_start(),
        moves in prop::collection::vec(any::<bool>(), 0..60)
    ) {
        let len = tracks.len();
        let mut queue = Queue::new();
        queue.replace(tracks, start).unwrap();

        let mut expected = start;
        for forward in moves {
            if forward {
                let moved = queue.advance().is_some();
                prop_assert_eq!(moved, expected + 1 < len);
                if moved { expected += 1; }
            } else {
                let moved = queue.retreat().is_some();
                prop_assert_eq!(moved, expected > 0);
                if moved { expected -= 1; }
            }
            prop_assert_eq!(queue.current_index(), Some(expected));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: through the session, set_queue then snapshot reports the start
    /// index, and skipping past the end leaves the last track current
    #[test]
    fn session_skip_to_end_never_wraps((tracks, start) in queue_with_start()) {
        let rt = runtime();
        rt.block_on(async {
            let session = session();
            let last = tracks.len() - 1;
            session.set_queue(tracks.clone(), start).await.unwrap();
            assert_eq!(session.snapshot().current_index, Some(start));

            for _ in start..last {
                assert!(matches!(session.skip_next().await.unwrap(), SkipOutcome::Moved(_)));
            }
            assert_eq!(session.skip_next().await.unwrap(), SkipOutcome::AtBoundary);

            let snap = session.snapshot();
            assert_eq!(snap.current_index, Some(last));
            if start < last {
                assert_eq!(snap.current_track.as_ref(), tracks.last());
            }
            assert!(session.backend().live_handles() <= 1);
        });
    }
}
