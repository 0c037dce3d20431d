use super::*;
use shared::domain::SubjectId;
use uuid::Uuid;

fn subject(id: &str) -> Subject {
    Subject {
        id: SubjectId::new(id),
        display_name: id.to_uppercase(),
        role: "Flight Engineer".to_string(),
        last_access: None,
        formulary: Vec::new(),
    }
}

fn context() -> UnlockContext {
    UnlockContext {
        session_id: Uuid::new_v4(),
        subject_id: SubjectId::new("astronaut_1"),
        duration_seconds: 30,
    }
}

#[tokio::test]
async fn camera_release_is_idempotent() {
    let camera = SimulatedCamera::new();
    let handle = camera.acquire().await.expect("acquire");
    assert!(camera.is_active());

    camera.release(handle);
    camera.release(handle);

    assert!(!camera.is_active());
    assert_eq!(camera.effective_releases(), 1);
}

#[tokio::test]
async fn camera_reports_unavailable_when_permission_denied() {
    let camera = SimulatedCamera::new();
    camera.set_unavailable(true);

    let err = camera.acquire().await.expect_err("denied");
    assert!(matches!(err, HardwareError::Unavailable(_)));
    assert!(!camera.is_active());
}

#[tokio::test]
async fn frame_requires_live_handle() {
    let camera = SimulatedCamera::new();
    let handle = camera.acquire().await.expect("acquire");
    camera.capture_frame(handle).await.expect("frame");

    camera.release(handle);
    assert!(camera.capture_frame(handle).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn matcher_picks_from_enrolled_set() {
    let enrolled = vec![subject("astronaut_1"), subject("astronaut_2")];
    let matcher = RandomMatcher::new(enrolled.clone(), Duration::from_millis(1500));
    let camera = SimulatedCamera::new();
    let handle = camera.acquire().await.expect("acquire");
    let frame = camera.capture_frame(handle).await.expect("frame");

    let picked = matcher.match_frame(&frame).await.expect("match");
    assert!(enrolled.iter().any(|s| s.id == picked.id));
}

#[tokio::test]
async fn matcher_without_enrollment_reports_no_match() {
    let matcher = RandomMatcher::new(Vec::new(), Duration::ZERO);
    let frame = Frame {
        handle: CaptureHandle(1),
        captured_at: Utc::now(),
        data: Vec::new(),
    };

    assert_eq!(
        matcher.match_frame(&frame).await.expect_err("empty"),
        HardwareError::NoMatch
    );
}

#[tokio::test]
async fn lock_tracks_status_and_injected_failures() {
    let lock = SimulatedLock::new();
    lock.open(&context()).await.expect("open");
    assert_eq!(lock.current_status().await.expect("status"), LockStatus::Unlocked);

    lock.set_fail_close(true);
    assert!(lock.close().await.is_err());
    assert_eq!(lock.current_status().await.expect("status"), LockStatus::Unlocked);

    lock.set_fail_close(false);
    lock.close().await.expect("close");
    assert_eq!(lock.current_status().await.expect("status"), LockStatus::Locked);
    assert_eq!(lock.open_calls(), 1);
    assert_eq!(lock.close_calls(), 2);

    lock.set_fail_status(true);
    assert!(lock.current_status().await.is_err());
}
