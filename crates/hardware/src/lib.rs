//! Seams for the cabinet's physical collaborators: the camera, the face
//! matcher and the lock actuator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::domain::{LockStatus, Subject, SubjectId};
use thiserror::Error;
use uuid::Uuid;

pub mod simulated;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HardwareError {
    #[error("device unavailable: {0}")]
    Unavailable(String),
    #[error("no enrolled subject matched")]
    NoMatch,
    #[error("actuator failure: {0}")]
    Actuator(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureHandle(pub u64);

#[derive(Debug, Clone)]
pub struct Frame {
    pub handle: CaptureHandle,
    pub captured_at: DateTime<Utc>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockContext {
    pub session_id: Uuid,
    pub subject_id: SubjectId,
    pub duration_seconds: u32,
}

#[async_trait]
pub trait CaptureDevice: Send + Sync {
    async fn acquire(&self) -> Result<CaptureHandle, HardwareError>;
    async fn capture_frame(&self, handle: CaptureHandle) -> Result<Frame, HardwareError>;
    /// Must tolerate being called more than once for the same handle.
    fn release(&self, handle: CaptureHandle);
}

/// Matches a captured frame against the enrolled set. Implementations own
/// the matching strategy; callers only see a subject or `NoMatch`.
#[async_trait]
pub trait IdentificationService: Send + Sync {
    async fn match_frame(&self, frame: &Frame) -> Result<Subject, HardwareError>;
}

#[async_trait]
pub trait LockActuator: Send + Sync {
    /// Opening an already open lock succeeds without side effects.
    async fn open(&self, context: &UnlockContext) -> Result<(), HardwareError>;
    async fn close(&self) -> Result<(), HardwareError>;
    async fn current_status(&self) -> Result<LockStatus, HardwareError>;
}
