//! In-process stand-ins used by the service binary, the operator CLI and
//! tests. None of them touch real devices.

use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use shared::domain::{LockStatus, Subject};
use tracing::{debug, info, warn};

use crate::{
    CaptureDevice, CaptureHandle, Frame, HardwareError, IdentificationService, LockActuator,
    UnlockContext,
};

#[derive(Default)]
pub struct SimulatedCamera {
    unavailable: AtomicBool,
    next_handle: AtomicU64,
    live: Mutex<HashSet<CaptureHandle>>,
    releases: AtomicUsize,
}

impl SimulatedCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.live.lock().map(|live| !live.is_empty()).unwrap_or(true)
    }

    /// Number of releases that actually freed a live handle.
    pub fn effective_releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureDevice for SimulatedCamera {
    async fn acquire(&self) -> Result<CaptureHandle, HardwareError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(HardwareError::Unavailable(
                "camera permission denied".to_string(),
            ));
        }
        let mut live = self
            .live
            .lock()
            .map_err(|_| HardwareError::Unavailable("camera state poisoned".to_string()))?;
        if !live.is_empty() {
            return Err(HardwareError::Unavailable("camera already in use".to_string()));
        }
        let handle = CaptureHandle(self.next_handle.fetch_add(1, Ordering::SeqCst) + 1);
        live.insert(handle);
        debug!(handle = handle.0, "camera: acquired");
        Ok(handle)
    }

    async fn capture_frame(&self, handle: CaptureHandle) -> Result<Frame, HardwareError> {
        let is_live = self
            .live
            .lock()
            .map(|live| live.contains(&handle))
            .unwrap_or(false);
        if !is_live {
            return Err(HardwareError::Unavailable(format!(
                "capture handle {} is not active",
                handle.0
            )));
        }
        Ok(Frame {
            handle,
            captured_at: Utc::now(),
            data: Vec::new(),
        })
    }

    fn release(&self, handle: CaptureHandle) {
        let Ok(mut live) = self.live.lock() else {
            return;
        };
        if live.remove(&handle) {
            self.releases.fetch_add(1, Ordering::SeqCst);
            debug!(handle = handle.0, "camera: released");
        }
    }
}

/// Picks an arbitrary enrolled subject after a fixed delay.
pub struct RandomMatcher {
    enrolled: Vec<Subject>,
    latency: Duration,
}

impl RandomMatcher {
    pub fn new(enrolled: Vec<Subject>, latency: Duration) -> Self {
        Self { enrolled, latency }
    }
}

#[async_trait]
impl IdentificationService for RandomMatcher {
    async fn match_frame(&self, frame: &Frame) -> Result<Subject, HardwareError> {
        tokio::time::sleep(self.latency).await;
        if self.enrolled.is_empty() {
            return Err(HardwareError::NoMatch);
        }
        let index = rand::thread_rng().gen_range(0..self.enrolled.len());
        let subject = self.enrolled[index].clone();
        debug!(handle = frame.handle.0, subject = %subject.id, "matcher: picked subject");
        Ok(subject)
    }
}

pub struct SimulatedLock {
    status: Mutex<LockStatus>,
    open_latency: Duration,
    fail_open: AtomicBool,
    fail_close: AtomicBool,
    fail_status: AtomicBool,
    open_calls: AtomicUsize,
    close_calls: AtomicUsize,
}

impl Default for SimulatedLock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedLock {
    pub fn new() -> Self {
        Self::with_open_latency(Duration::ZERO)
    }

    pub fn with_open_latency(open_latency: Duration) -> Self {
        Self {
            status: Mutex::new(LockStatus::Locked),
            open_latency,
            fail_open: AtomicBool::new(false),
            fail_close: AtomicBool::new(false),
            fail_status: AtomicBool::new(false),
            open_calls: AtomicUsize::new(0),
            close_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_close(&self, fail: bool) {
        self.fail_close.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_status(&self, fail: bool) {
        self.fail_status.store(fail, Ordering::SeqCst);
    }

    /// Simulates a technician forcing the bolt shut.
    pub fn force_locked(&self) {
        if let Ok(mut status) = self.status.lock() {
            *status = LockStatus::Locked;
        }
    }

    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    fn set_status(&self, next: LockStatus) -> Result<(), HardwareError> {
        let mut status = self
            .status
            .lock()
            .map_err(|_| HardwareError::Actuator("lock state poisoned".to_string()))?;
        *status = next;
        Ok(())
    }
}

#[async_trait]
impl LockActuator for SimulatedLock {
    async fn open(&self, context: &UnlockContext) -> Result<(), HardwareError> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        if !self.open_latency.is_zero() {
            tokio::time::sleep(self.open_latency).await;
        }
        if self.fail_open.load(Ordering::SeqCst) {
            warn!(session_id = %context.session_id, "lock: open rejected");
            return Err(HardwareError::Actuator("solenoid did not retract".to_string()));
        }
        self.set_status(LockStatus::Unlocked)?;
        info!(
            session_id = %context.session_id,
            subject = %context.subject_id,
            seconds = context.duration_seconds,
            "lock: opened"
        );
        Ok(())
    }

    async fn close(&self) -> Result<(), HardwareError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_close.load(Ordering::SeqCst) {
            warn!("lock: close not confirmed");
            return Err(HardwareError::Actuator("bolt position unconfirmed".to_string()));
        }
        self.set_status(LockStatus::Locked)?;
        info!("lock: closed");
        Ok(())
    }

    async fn current_status(&self) -> Result<LockStatus, HardwareError> {
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(HardwareError::Actuator("status line unreadable".to_string()));
        }
        self.status
            .lock()
            .map(|status| *status)
            .map_err(|_| HardwareError::Actuator("lock state poisoned".to_string()))
    }
}

#[cfg(test)]
#[path = "tests/simulated_tests.rs"]
mod tests;
