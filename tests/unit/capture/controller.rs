use super::*;
use crate::capture::recorder::InMemoryBackend;

const CANVAS: Canvas = Canvas {
    width: 16,
    height: 9,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn frame(canvas: Canvas) -> FrameRGBA {
    FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: vec![255; canvas.rgba_len()],
        premultiplied: true,
    }
}

/// Feed and tick every 16 ms from `from` up to and including `to`.
fn run(c: &mut CaptureController, from: u64, to: u64) {
    let f = frame(CANVAS);
    let mut t = from;
    while t <= to {
        c.feed_frame(ms(t), &f);
        c.tick(ms(t));
        t += 16;
    }
}

#[test]
fn full_session_reaches_done_with_result() {
    let mut c = CaptureController::new(Box::new(InMemoryBackend::new()));
    assert_eq!(c.status(), CaptureStatus::Idle);
    c.start(ms(0), CANVAS).unwrap();
    assert_eq!(c.status(), CaptureStatus::Recording);

    run(&mut c, 0, 9_984);
    assert_eq!(c.status(), CaptureStatus::Recording);
    assert!(c.progress() < 1.0);

    c.tick(ms(10_000));
    assert_eq!(c.status(), CaptureStatus::Done);
    assert_eq!(c.progress(), 1.0);
    let blob = c.result().unwrap();
    assert_eq!(blob.mime_type(), "video/webm;codecs=vp9");
    // Magic plus 600 sampled frames.
    assert_eq!(blob.len(), 4 + 600 * 8);
    assert!(c.displayed_error().is_none());
}

#[test]
fn progress_is_monotonic_and_clamped() {
    let mut c = CaptureController::new(Box::new(InMemoryBackend::new()));
    c.start(ms(1_000), CANVAS).unwrap();
    c.tick(ms(3_500));
    assert!((c.progress() - 0.25).abs() < 1e-9);
    assert_eq!(c.elapsed_ms(), 2_500);
    // A clock that steps backwards never lowers progress.
    c.tick(ms(2_000));
    assert!((c.progress() - 0.25).abs() < 1e-9);
}

#[test]
fn explicit_stop_finishes_early_and_is_idempotent() {
    let mut c = CaptureController::new(Box::new(InMemoryBackend::new()));
    c.start(ms(0), CANVAS).unwrap();
    run(&mut c, 0, 2_000);
    assert!(c.stop());
    assert!(!c.stop());
    assert!(c.is_stop_requested());
    assert_eq!(c.status(), CaptureStatus::Recording);
    assert!(c.progress() < 1.0);

    c.tick(ms(2_016));
    assert_eq!(c.status(), CaptureStatus::Done);
    assert_eq!(c.progress(), 1.0);
    assert!(!c.stop());
}

#[test]
fn unsupported_start_is_a_no_op_with_persistent_message() {
    let mut c = CaptureController::new(Box::new(InMemoryBackend::unavailable()));
    assert!(!c.is_supported());
    assert!(!c.is_start_enabled());
    assert_eq!(c.displayed_error(), Some(UNSUPPORTED_MESSAGE));
    assert_eq!(
        c.start(ms(0), CANVAS),
        Err(CaptureError::CapabilityUnsupported)
    );
    assert_eq!(c.status(), CaptureStatus::Idle);
    assert!(c.session_id().is_none());
}

#[test]
fn start_failure_sets_error_status() {
    let mut c =
        CaptureController::new(Box::new(InMemoryBackend::new().with_open_failure("busy")));
    let err = c.start(ms(0), CANVAS).unwrap_err();
    assert!(matches!(err, CaptureError::StartFailure(_)));
    assert_eq!(c.status(), CaptureStatus::Error);
    assert_eq!(
        c.displayed_error(),
        Some(crate::capture::error::START_FAILURE_MESSAGE)
    );
    assert!(c.is_start_enabled());
}

#[test]
fn fault_discards_chunks_and_retry_succeeds() {
    let mut c = CaptureController::new(Box::new(InMemoryBackend::new()));
    let first = c.start(ms(0), CANVAS).unwrap();
    run(&mut c, 0, 3_000);
    c.handle_event(RecorderEvent::fault(first, "encoder crashed"));
    assert_eq!(c.status(), CaptureStatus::Error);
    assert!(c.result_url().is_none());
    assert_eq!(c.live_blob_count(), 0);
    assert!(c.displayed_error().is_some());

    c.start(ms(5_000), CANVAS).unwrap();
    assert!(c.displayed_error().is_none());
    assert_eq!(c.progress(), 0.0);
    run(&mut c, 5_000, 15_000);
    assert_eq!(c.status(), CaptureStatus::Done);
    assert!(c.result_url().is_some());
}

#[test]
fn restart_keeps_one_session_and_releases_prior_result() {
    let backend = InMemoryBackend::new();
    let stats = backend.stats();
    let mut c = CaptureController::new(Box::new(backend));

    c.start(ms(0), CANVAS).unwrap();
    run(&mut c, 0, 10_000);
    let old_url = c.result_url().cloned().unwrap();

    let second = c.start(ms(20_000), CANVAS).unwrap();
    assert!(c.resolve(&old_url).is_none());
    assert_eq!(c.live_blob_count(), 0);
    run(&mut c, 20_000, 21_000);

    let third = c.start(ms(21_500), CANVAS).unwrap();
    assert_ne!(second, third);
    assert_eq!(c.session_id(), Some(third));
    assert_eq!(stats.lock().unwrap().cancelled, 1);

    // Late events of the replaced session are ignored.
    c.handle_event(RecorderEvent::stopped(second));
    assert_eq!(c.status(), CaptureStatus::Recording);
    c.handle_event(RecorderEvent::fault(second, "late"));
    assert_eq!(c.status(), CaptureStatus::Recording);

    run(&mut c, 21_500, 31_500);
    assert_eq!(c.status(), CaptureStatus::Done);
    assert_eq!(c.live_blob_count(), 1);
    // Only frames of the last session made it into the result.
    assert_eq!(c.result().unwrap().len(), 4 + 600 * 8);
}

#[test]
fn mismatched_frames_are_dropped() {
    let backend = InMemoryBackend::new();
    let stats = backend.stats();
    let mut c = CaptureController::new(Box::new(backend));
    c.start(ms(0), CANVAS).unwrap();
    let other = frame(Canvas {
        width: 32,
        height: 18,
    });
    c.feed_frame(ms(0), &other);
    c.feed_frame(ms(17), &frame(CANVAS));
    assert_eq!(stats.lock().unwrap().frames, 1);
    assert_eq!(c.status(), CaptureStatus::Recording);
}

#[test]
fn subscribers_see_each_transition() {
    let mut c = CaptureController::new(Box::new(InMemoryBackend::new()));
    let rx = c.subscribe();
    c.start(ms(0), CANVAS).unwrap();
    run(&mut c, 0, 10_000);

    let mut statuses: Vec<CaptureStatus> = rx.try_iter().map(|s| s.status).collect();
    statuses.dedup();
    assert_eq!(
        statuses,
        [
            CaptureStatus::Idle,
            CaptureStatus::Recording,
            CaptureStatus::Processing,
            CaptureStatus::Done
        ]
    );
}

#[test]
fn teardown_releases_result_exactly_once() {
    let mut c = CaptureController::new(Box::new(InMemoryBackend::new()));
    c.start(ms(0), CANVAS).unwrap();
    run(&mut c, 0, 10_000);
    assert_eq!(c.live_blob_count(), 1);
    c.teardown();
    assert_eq!(c.live_blob_count(), 0);
    assert!(c.result_url().is_none());
    c.teardown();
    assert_eq!(c.live_blob_count(), 0);
}

#[test]
fn teardown_cancels_recording() {
    let backend = InMemoryBackend::new();
    let stats = backend.stats();
    let mut c = CaptureController::new(Box::new(backend));
    c.start(ms(0), CANVAS).unwrap();
    run(&mut c, 0, 500);
    c.teardown();
    assert_eq!(c.status(), CaptureStatus::Idle);
    assert!(c.session_id().is_none());
    assert_eq!(stats.lock().unwrap().cancelled, 1);
}

#[test]
fn stalled_loop_still_records_full_clip() {
    let backend = InMemoryBackend::new();
    let stats = backend.stats();
    let mut c = CaptureController::new(Box::new(backend));
    c.start(ms(0), CANVAS).unwrap();

    let f = frame(CANVAS);
    for t in (0..=10_000).step_by(250) {
        c.feed_frame(ms(t), &f);
        c.tick(ms(t));
    }
    assert_eq!(c.status(), CaptureStatus::Done);
    assert_eq!(stats.lock().unwrap().frames, 600);
    assert_eq!(c.result().unwrap().len(), 4 + 600 * 8);
}

#[test]
fn push_error_after_reported_fault_keeps_recorder_cause() {
    let mut c =
        CaptureController::new(Box::new(InMemoryBackend::new().with_fault_after_frames(2)));
    c.start(ms(0), CANVAS).unwrap();
    // Four samples are due: two encode, the third faults, the fourth is refused.
    c.feed_frame(ms(55), &frame(CANVAS));
    assert_eq!(c.status(), CaptureStatus::Error);
    assert_eq!(
        c.error(),
        Some(&CaptureError::RuntimeFault("injected encoder fault".to_string()))
    );
    assert!(c.session_id().is_none());
}
