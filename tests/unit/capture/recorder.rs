use super::*;
use std::sync::mpsc;

fn request(session: u64) -> RecorderRequest {
    RecorderRequest {
        session: SessionId(session),
        mime_type: Some("video/webm;codecs=vp9".to_string()),
        canvas: Canvas {
            width: 4,
            height: 2,
        },
        fps: Fps::new(60, 1).unwrap(),
        timeslice: Duration::from_millis(200),
    }
}

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 4,
        height: 2,
        data: vec![0; 32],
        premultiplied: true,
    }
}

#[test]
fn negotiation_prefers_vp9_then_vp8_then_default() {
    let both = InMemoryBackend::new();
    assert_eq!(negotiate_mime_type(&both), Some("video/webm;codecs=vp9"));

    let vp8 = InMemoryBackend::new().with_supported_types(["video/webm;codecs=vp8"]);
    assert_eq!(negotiate_mime_type(&vp8), Some("video/webm;codecs=vp8"));

    let none = InMemoryBackend::new().with_supported_types(Vec::<String>::new());
    assert_eq!(negotiate_mime_type(&none), None);
}

#[test]
fn data_arrives_once_per_timeslice() {
    let mut backend = InMemoryBackend::new();
    let (tx, rx) = mpsc::channel();
    let mut rec = backend.open(request(1), tx).unwrap();
    assert_eq!(rec.mime_type(), "video/webm;codecs=vp9");

    for _ in 0..11 {
        rec.push_frame(&frame()).unwrap();
    }
    assert!(rx.try_recv().is_err());
    rec.push_frame(&frame()).unwrap();
    let ev = rx.try_recv().unwrap();
    assert_eq!(ev.session, SessionId(1));
    let RecorderEventKind::Data(bytes) = ev.kind else {
        panic!("expected data, got {ev:?}");
    };
    assert_eq!(bytes.len(), 4 + 12 * 8);
    assert_eq!(&bytes[..4], &EBML_MAGIC);
}

#[test]
fn stop_flushes_then_finalizes() {
    let mut backend = InMemoryBackend::new();
    let stats = backend.stats();
    let (tx, rx) = mpsc::channel();
    let mut rec = backend.open(request(2), tx).unwrap();
    rec.push_frame(&frame()).unwrap();
    rec.stop();
    rec.stop();

    let kinds: Vec<_> = rx.try_iter().map(|e| e.kind).collect();
    assert_eq!(kinds.len(), 2);
    assert!(matches!(kinds[0], RecorderEventKind::Data(_)));
    assert_eq!(kinds[1], RecorderEventKind::Stopped);
    assert!(rec.push_frame(&frame()).is_err());

    let s = stats.lock().unwrap();
    assert_eq!((s.opened, s.stopped, s.frames), (1, 1, 1));
}

#[test]
fn cancel_is_silent() {
    let mut backend = InMemoryBackend::new();
    let stats = backend.stats();
    let (tx, rx) = mpsc::channel();
    let mut rec = backend.open(request(3), tx).unwrap();
    rec.push_frame(&frame()).unwrap();
    rec.cancel();
    rec.stop();
    assert!(rx.try_recv().is_err());
    assert_eq!(stats.lock().unwrap().cancelled, 1);
}

#[test]
fn injected_fault_is_reported() {
    let mut backend = InMemoryBackend::new().with_fault_after_frames(2);
    let (tx, rx) = mpsc::channel();
    let mut rec = backend.open(request(4), tx).unwrap();
    for _ in 0..3 {
        rec.push_frame(&frame()).unwrap();
    }
    let ev = rx.try_recv().unwrap();
    assert!(matches!(ev.kind, RecorderEventKind::Fault(_)));
}

#[test]
fn open_failures_map_to_capture_errors() {
    let (tx, _rx) = mpsc::channel();
    let mut broken = InMemoryBackend::new().with_open_failure("denied");
    assert!(matches!(
        broken.open(request(5), tx.clone()),
        Err(CaptureError::StartFailure(_))
    ));
    let mut missing = InMemoryBackend::unavailable();
    assert!(!missing.is_available());
    assert!(matches!(
        missing.open(request(6), tx),
        Err(CaptureError::CapabilityUnsupported)
    ));
}

#[test]
fn first_session_fault_spares_later_sessions() {
    let mut backend = InMemoryBackend::new().with_first_session_fault_after_frames(1);
    let (tx, rx) = mpsc::channel();
    let mut first = backend.open(request(7), tx.clone()).unwrap();
    first.push_frame(&frame()).unwrap();
    first.push_frame(&frame()).unwrap();
    assert!(matches!(
        rx.try_recv().unwrap().kind,
        RecorderEventKind::Fault(_)
    ));

    let mut second = backend.open(request(8), tx).unwrap();
    for _ in 0..12 {
        second.push_frame(&frame()).unwrap();
    }
    let ev = rx.try_recv().unwrap();
    assert_eq!(ev.session, SessionId(8));
    assert!(matches!(ev.kind, RecorderEventKind::Data(_)));
}
