//! Access and dispensing controller for the medication cabinet.
//!
//! One [`CabinetController`] owns the only live session. Every event
//! (capture, adjustment, confirm, timer tick) runs against its state under a
//! single mutex that is never held across a hardware call, so hardware
//! latency cannot stall other events and re-entrant confirms are detected
//! rather than queued.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use hardware::{
    CaptureDevice, CaptureHandle, HardwareError, IdentificationService, LockActuator,
    UnlockContext,
};
use shared::{
    domain::{
        DispenseRecord, DispensedItem, LockStatus, MedicationId, Phase, StockRecord, SubjectId,
    },
    error::{ApiError, CabinetError},
    protocol::{
        CabinetEvent, ReviewLine, ReviewSummary, SelectionLine, SessionSnapshot, SubjectSummary,
    },
};
use storage::{
    AuditLog, AuditReceipt, DebitReceipt, InventoryLedger, LedgerError, NewDispense, UsageLedger,
    UsageReceipt, DEFAULT_AUDIT_RING_SIZE,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

mod formulary;
mod selection;
mod timer;

pub use formulary::{resolve, FormularySnapshot};
pub use selection::Selection;

use timer::LockSessionTimer;

pub const DEFAULT_UNLOCK_DURATION_SECONDS: u32 = 30;
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);
pub const DEFAULT_IDENTIFY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub unlock_duration_seconds: u32,
    pub tick: Duration,
    pub audit_ring_size: usize,
    pub identify_timeout: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            unlock_duration_seconds: DEFAULT_UNLOCK_DURATION_SECONDS,
            tick: DEFAULT_TICK,
            audit_ring_size: DEFAULT_AUDIT_RING_SIZE,
            identify_timeout: DEFAULT_IDENTIFY_TIMEOUT,
        }
    }
}

pub struct CabinetDevices {
    pub camera: Arc<dyn CaptureDevice>,
    pub matcher: Arc<dyn IdentificationService>,
    pub lock: Arc<dyn LockActuator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing is unlocked, or the tick belonged to an earlier unlock.
    Inactive,
    Running { remaining_seconds: u32 },
    Expired { lock_status: LockStatus },
}

struct ActiveSession {
    id: Uuid,
    formulary: FormularySnapshot,
    selection: Selection,
}

/// Bookkeeping written by a confirm before the actuator answers; undone as a
/// unit if the lock does not open.
struct PendingDispense {
    debit: DebitReceipt,
    audit: AuditReceipt,
    usage: UsageReceipt,
}

struct ControllerState {
    phase: Phase,
    generation: u64,
    capture: Option<CaptureHandle>,
    session: Option<ActiveSession>,
    lock_status: LockStatus,
    countdown_seconds: u32,
    unlock_epoch: u64,
    timer: Option<LockSessionTimer>,
    confirm_in_flight: bool,
    relock_in_flight: bool,
    inventory: InventoryLedger,
    audit: AuditLog,
    usage: UsageLedger,
}

pub struct CabinetController {
    settings: ControllerSettings,
    camera: Arc<dyn CaptureDevice>,
    matcher: Arc<dyn IdentificationService>,
    lock: Arc<dyn LockActuator>,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<CabinetEvent>,
}

impl CabinetController {
    pub fn new(
        settings: ControllerSettings,
        devices: CabinetDevices,
        stock: impl IntoIterator<Item = StockRecord>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        let audit = AuditLog::new(settings.audit_ring_size);
        Arc::new(Self {
            settings,
            camera: devices.camera,
            matcher: devices.matcher,
            lock: devices.lock,
            inner: Mutex::new(ControllerState {
                phase: Phase::Idle,
                generation: 0,
                capture: None,
                session: None,
                lock_status: LockStatus::Locked,
                countdown_seconds: 0,
                unlock_epoch: 0,
                timer: None,
                confirm_in_flight: false,
                relock_in_flight: false,
                inventory: InventoryLedger::new(stock),
                audit,
                usage: UsageLedger::new(),
            }),
            events,
        })
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CabinetEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: CabinetEvent) {
        let _ = self.events.send(event);
    }

    fn set_phase(&self, state: &mut ControllerState, phase: Phase) {
        if state.phase != phase {
            info!(from = ?state.phase, to = ?phase, "cabinet: phase changed");
            state.phase = phase;
            self.emit(CabinetEvent::PhaseChanged { phase });
        }
    }

    fn set_lock_status(&self, state: &mut ControllerState, status: LockStatus) {
        if state.lock_status != status {
            state.lock_status = status;
            self.emit(CabinetEvent::LockStatusChanged { status });
        }
    }

    fn fail(&self, err: CabinetError) -> CabinetError {
        self.emit(CabinetEvent::Error(ApiError::from(&err)));
        err
    }

    /// Drops the session and anything held for it, returning to `Idle`.
    fn discard_session(&self, state: &mut ControllerState) {
        if let Some(handle) = state.capture.take() {
            self.camera.release(handle);
        }
        state.session = None;
        state.generation += 1;
        self.set_phase(state, Phase::Idle);
    }

    // ---------------------------------------------------------------------
    // Identity gate
    // ---------------------------------------------------------------------

    pub async fn begin_capture(&self) -> Result<(), CabinetError> {
        let generation = {
            let mut state = self.inner.lock().await;
            if state.phase != Phase::Idle {
                return Err(invalid_phase("begin_capture", state.phase));
            }
            state.generation += 1;
            self.set_phase(&mut state, Phase::Capturing);
            state.generation
        };

        let acquired = self.camera.acquire().await;

        let mut state = self.inner.lock().await;
        let still_current = state.generation == generation && state.phase == Phase::Capturing;
        match acquired {
            Ok(handle) if still_current => {
                debug!(handle = handle.0, "cabinet: capture device acquired");
                state.capture = Some(handle);
                Ok(())
            }
            Ok(handle) => {
                self.camera.release(handle);
                Err(invalid_phase("begin_capture", state.phase))
            }
            Err(err) => {
                warn!(%err, "cabinet: capture device unavailable");
                if still_current {
                    self.set_phase(&mut state, Phase::Idle);
                }
                Err(self.fail(CabinetError::DeviceUnavailable(err.to_string())))
            }
        }
    }

    /// Runs one identification attempt against the active capture. The
    /// capture device is released whatever the outcome; after a failure the
    /// cabinet is back at `Idle` and a new capture may be started.
    pub async fn identify(&self) -> Result<SubjectSummary, CabinetError> {
        let (handle, generation) = {
            let mut state = self.inner.lock().await;
            let handle = match (state.phase, state.capture) {
                (Phase::Capturing, Some(handle)) => handle,
                (phase, _) => return Err(invalid_phase("identify", phase)),
            };
            self.set_phase(&mut state, Phase::Identifying);
            (handle, state.generation)
        };

        let attempt = tokio::time::timeout(self.settings.identify_timeout, async {
            let frame = self.camera.capture_frame(handle).await?;
            self.matcher.match_frame(&frame).await
        })
        .await;
        self.camera.release(handle);

        let mut state = self.inner.lock().await;
        if state.capture == Some(handle) {
            state.capture = None;
        }
        if state.generation != generation || state.phase != Phase::Identifying {
            info!("cabinet: identification result arrived after cancel; discarded");
            return Err(invalid_phase("identify", state.phase));
        }

        let subject = match attempt {
            Ok(Ok(subject)) => subject,
            Ok(Err(HardwareError::NoMatch)) => {
                info!("cabinet: no enrolled subject matched");
                self.discard_session(&mut state);
                return Err(self.fail(CabinetError::NoMatch));
            }
            Ok(Err(err)) => {
                warn!(%err, "cabinet: identification failed");
                self.discard_session(&mut state);
                return Err(self.fail(CabinetError::DeviceUnavailable(err.to_string())));
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.settings.identify_timeout.as_millis() as u64,
                    "cabinet: identification timed out"
                );
                self.discard_session(&mut state);
                return Err(self.fail(CabinetError::NoMatch));
            }
        };

        let formulary = resolve(&subject, &state.usage, Utc::now().date_naive());
        let selection = Selection::for_formulary(&formulary);
        let summary = formulary.subject().clone();
        let session_id = Uuid::new_v4();
        info!(%session_id, subject = %summary.subject_id, "cabinet: subject bound to session");

        state.session = Some(ActiveSession {
            id: session_id,
            formulary,
            selection,
        });
        self.emit(CabinetEvent::SubjectBound {
            session_id,
            subject: summary.clone(),
        });
        self.set_phase(&mut state, Phase::Selecting);
        Ok(summary)
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Changes the pending quantity of one medication. Unknown medications
    /// leave the selection unchanged.
    pub async fn adjust(
        &self,
        medication_id: &MedicationId,
        delta: i32,
    ) -> Result<SessionSnapshot, CabinetError> {
        let mut state = self.inner.lock().await;
        if state.phase != Phase::Selecting {
            return Err(invalid_phase("adjust", state.phase));
        }

        let state = &mut *state;
        let Some(session) = state.session.as_mut() else {
            return Err(invalid_phase("adjust", state.phase));
        };
        match session
            .selection
            .adjust(&session.formulary, medication_id, delta)
        {
            Some(quantity) => {
                debug!(medication = %medication_id, delta, quantity, "cabinet: selection adjusted");
                if let Some(line) = selection_lines(session, &state.inventory)
                    .into_iter()
                    .find(|line| &line.medication_id == medication_id)
                {
                    self.emit(CabinetEvent::SelectionChanged { line });
                }
            }
            None => debug!(medication = %medication_id, "cabinet: adjust ignored, not in formulary"),
        }
        Ok(snapshot_of(state))
    }

    pub async fn review(&self) -> Result<ReviewSummary, CabinetError> {
        let mut state = self.inner.lock().await;
        if state.phase != Phase::Selecting {
            return Err(invalid_phase("review", state.phase));
        }
        let summary = {
            let Some(session) = state.session.as_ref() else {
                return Err(invalid_phase("review", state.phase));
            };
            if session.selection.is_empty() {
                return Err(self.fail(CabinetError::EmptySelection));
            }
            review_of(session)
        };
        self.set_phase(&mut state, Phase::ReviewPending);
        Ok(summary)
    }

    pub async fn back(&self) -> Result<SessionSnapshot, CabinetError> {
        let mut state = self.inner.lock().await;
        if state.confirm_in_flight {
            return Err(CabinetError::AlreadyProcessing);
        }
        if state.phase != Phase::ReviewPending {
            return Err(invalid_phase("back", state.phase));
        }
        self.set_phase(&mut state, Phase::Selecting);
        Ok(snapshot_of(&state))
    }

    /// Abandons the session from any pre-unlock phase. Once unlocked the
    /// session only ends through the countdown or [`Self::close`], so a
    /// cancel there is a no-op.
    pub async fn cancel(&self) -> Result<Phase, CabinetError> {
        let mut state = self.inner.lock().await;
        if state.confirm_in_flight {
            return Err(CabinetError::AlreadyProcessing);
        }
        if !state.phase.is_cancellable() {
            debug!(phase = ?state.phase, "cabinet: cancel ignored");
            return Ok(state.phase);
        }
        info!(phase = ?state.phase, "cabinet: session cancelled");
        self.discard_session(&mut state);
        Ok(state.phase)
    }

    // ---------------------------------------------------------------------
    // Dispense authorizer
    // ---------------------------------------------------------------------

    /// Commits the reviewed selection: debits stock, records the dispense,
    /// and opens the lock. If the lock does not open, the debit, the audit
    /// entry and the daily usage are all reverted and the cabinet returns to
    /// `Idle`.
    pub async fn confirm(self: &Arc<Self>) -> Result<DispenseRecord, CabinetError> {
        let (context, pending) = {
            let mut state = self.inner.lock().await;
            if state.confirm_in_flight || state.relock_in_flight {
                return Err(CabinetError::AlreadyProcessing);
            }
            if state.phase != Phase::ReviewPending {
                return Err(invalid_phase("confirm", state.phase));
            }
            if state.lock_status == LockStatus::Error {
                return Err(self.fail(CabinetError::LockFault));
            }

            let state = &mut *state;
            let Some(session) = state.session.as_ref() else {
                return Err(invalid_phase("confirm", state.phase));
            };
            let requested = session.selection.requested(&session.formulary);
            if requested.is_empty() {
                return Err(self.fail(CabinetError::EmptySelection));
            }

            for (medication_id, quantity) in &requested {
                let remaining = session
                    .formulary
                    .entitlement(medication_id)
                    .map(|entry| entry.remaining())
                    .unwrap_or(0);
                if *quantity > remaining {
                    warn!(medication = %medication_id, quantity, remaining, "cabinet: allowance exceeded at confirm");
                    return Err(self.fail(CabinetError::EntitlementExceeded(medication_id.clone())));
                }
            }

            let debit = state.inventory.debit(&requested).map_err(|err| {
                warn!(%err, "cabinet: confirm rejected");
                match err {
                    LedgerError::InsufficientStock { medication_id, .. }
                    | LedgerError::UnknownMedication(medication_id) => {
                        self.fail(CabinetError::InsufficientStock(medication_id))
                    }
                }
            })?;

            let subject = session.formulary.subject();
            let items = requested
                .iter()
                .filter_map(|(medication_id, quantity)| {
                    session
                        .formulary
                        .entitlement(medication_id)
                        .map(|entry| DispensedItem {
                            medication_id: medication_id.clone(),
                            display_name: entry.display_name.clone(),
                            dosage_label: entry.dosage_label.clone(),
                            quantity: *quantity,
                        })
                })
                .collect();
            let audit = state.audit.append(NewDispense {
                subject_id: subject.subject_id.clone(),
                subject_name: subject.display_name.clone(),
                items,
                timestamp: Utc::now(),
            });
            let usage =
                state
                    .usage
                    .credit(&subject.subject_id, &requested, Utc::now().date_naive());

            state.confirm_in_flight = true;
            let context = UnlockContext {
                session_id: session.id,
                subject_id: subject.subject_id.clone(),
                duration_seconds: self.settings.unlock_duration_seconds,
            };
            (context, PendingDispense { debit, audit, usage })
        };

        let opened = self.lock.open(&context).await;

        let mut state = self.inner.lock().await;
        state.confirm_in_flight = false;
        match opened {
            Err(err) => {
                error!(session_id = %context.session_id, %err, "cabinet: lock did not open; rolling back dispense");
                state.inventory.restore(pending.debit);
                if state.audit.retract(pending.audit).is_none() {
                    error!(session_id = %context.session_id, "cabinet: audit entry was not the newest at rollback");
                }
                state.usage.revert(pending.usage);
                self.emit(CabinetEvent::DispenseRolledBack {
                    reason: err.to_string(),
                });
                self.discard_session(&mut state);
                Err(self.fail(CabinetError::ActuatorError(err.to_string())))
            }
            Ok(()) => {
                let record = pending.audit.record().clone();

                state.unlock_epoch += 1;
                state.countdown_seconds = self.settings.unlock_duration_seconds;
                state.timer = Some(LockSessionTimer::start(
                    Arc::downgrade(self),
                    state.unlock_epoch,
                    self.settings.tick,
                ));
                if state.lock_status == LockStatus::Error {
                    warn!(session_id = %context.session_id, "cabinet: lock opened but lock fault is still set");
                } else {
                    self.set_lock_status(&mut state, LockStatus::Unlocked);
                }
                self.set_phase(&mut state, Phase::Unlocked);
                info!(
                    session_id = %context.session_id,
                    dispense_id = record.id.0,
                    units = record.total_units(),
                    seconds = state.countdown_seconds,
                    "cabinet: dispense confirmed, lock open"
                );
                self.emit(CabinetEvent::Dispensed {
                    record: record.clone(),
                });
                Ok(record)
            }
        }
    }

    // ---------------------------------------------------------------------
    // Lock session timer
    // ---------------------------------------------------------------------

    /// Processes one countdown tick for the current unlock.
    pub async fn tick(&self) -> TickOutcome {
        self.advance_countdown(None).await
    }

    pub(crate) async fn advance_countdown(&self, epoch: Option<u64>) -> TickOutcome {
        {
            let mut state = self.inner.lock().await;
            if state.phase != Phase::Unlocked {
                return TickOutcome::Inactive;
            }
            if epoch.is_some_and(|epoch| epoch != state.unlock_epoch) {
                return TickOutcome::Inactive;
            }

            state.countdown_seconds = state.countdown_seconds.saturating_sub(1);
            let remaining_seconds = state.countdown_seconds;
            self.emit(CabinetEvent::CountdownTick { remaining_seconds });
            if remaining_seconds > 0 {
                return TickOutcome::Running { remaining_seconds };
            }

            info!("cabinet: unlock window expired");
            // The timer task is the caller when an epoch is given; it ends
            // on its own after this returns.
            if let Some(timer) = state.timer.take() {
                if epoch.is_none() {
                    timer.cancel();
                }
            }
            self.finish_unlock(&mut state);
        }

        let lock_status = self.relock().await;
        TickOutcome::Expired { lock_status }
    }

    /// Ends the unlock window early and re-locks the cabinet.
    pub async fn close(&self) -> Result<LockStatus, CabinetError> {
        {
            let mut state = self.inner.lock().await;
            if state.phase != Phase::Unlocked {
                return Err(invalid_phase("close", state.phase));
            }
            if let Some(timer) = state.timer.take() {
                debug!(epoch = timer.epoch(), "cabinet: countdown cancelled by close");
                timer.cancel();
            }
            info!(
                remaining_seconds = state.countdown_seconds,
                "cabinet: closed before countdown expired"
            );
            self.finish_unlock(&mut state);
        }

        Ok(self.relock().await)
    }

    /// Leaves `Unlocked`. Only one caller can observe `Unlocked` under the
    /// lock, so the re-lock that follows is issued once per unlock.
    fn finish_unlock(&self, state: &mut ControllerState) {
        state.countdown_seconds = 0;
        state.relock_in_flight = true;
        state.session = None;
        state.generation += 1;
        self.set_phase(state, Phase::Idle);
    }

    async fn relock(&self) -> LockStatus {
        let closed = self.lock.close().await;

        let mut state = self.inner.lock().await;
        state.relock_in_flight = false;
        match closed {
            Ok(()) if state.lock_status != LockStatus::Error => {
                self.set_lock_status(&mut state, LockStatus::Locked);
            }
            Ok(()) => {
                warn!("cabinet: re-lock acknowledged but lock fault is still set");
            }
            Err(err) => {
                error!(%err, "cabinet: re-lock not confirmed; lock status set to error");
                self.set_lock_status(&mut state, LockStatus::Error);
            }
        }
        state.lock_status
    }

    /// Reconciles the recorded lock status with the actuator. A failed query
    /// or a status that contradicts the current phase sets the sticky error.
    /// While an open or close command is outstanding the bolt may be in
    /// either position, so only a failed query counts then.
    pub async fn refresh_lock_status(&self) -> LockStatus {
        let reported = self.lock.current_status().await;

        let mut state = self.inner.lock().await;
        if state.lock_status == LockStatus::Error {
            return LockStatus::Error;
        }
        let in_transition = state.confirm_in_flight || state.relock_in_flight;
        let expected = expected_lock_status(state.phase);
        match reported {
            Ok(status) if status == expected => {}
            Ok(status) if in_transition => {
                debug!(?status, phase = ?state.phase, "cabinet: lock moving, status not compared");
            }
            Ok(status) => {
                warn!(?status, ?expected, "cabinet: actuator status disagrees with phase");
                self.set_lock_status(&mut state, LockStatus::Error);
            }
            Err(err) => {
                error!(%err, "cabinet: lock status query failed");
                self.set_lock_status(&mut state, LockStatus::Error);
            }
        }
        state.lock_status
    }

    /// Operator intervention after a lock fault. The fault is cleared only
    /// when the actuator confirms the state the cabinet expects.
    pub async fn clear_lock_fault(&self) -> Result<LockStatus, CabinetError> {
        let reported = self
            .lock
            .current_status()
            .await
            .map_err(|err| CabinetError::ActuatorError(err.to_string()))?;

        let mut state = self.inner.lock().await;
        let expected = expected_lock_status(state.phase);
        if reported != expected {
            return Err(CabinetError::ActuatorError(format!(
                "actuator reports {reported:?} while {expected:?} is expected"
            )));
        }
        if state.lock_status == LockStatus::Error {
            info!(status = ?reported, "cabinet: lock fault cleared");
        }
        self.set_lock_status(&mut state, reported);
        Ok(reported)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.lock().await;
        snapshot_of(&state)
    }

    pub async fn phase(&self) -> Phase {
        self.inner.lock().await.phase
    }

    pub async fn lock_status(&self) -> LockStatus {
        self.inner.lock().await.lock_status
    }

    pub async fn inventory(&self) -> Vec<StockRecord> {
        self.inner.lock().await.inventory.snapshot()
    }

    /// Most recent dispense records, newest first.
    pub async fn recent_dispenses(&self, limit: usize) -> Vec<DispenseRecord> {
        let state = self.inner.lock().await;
        let limit = limit.min(state.audit.capacity());
        state.audit.recent(limit)
    }

    pub async fn dispensed_today(&self, subject_id: &SubjectId, medication_id: &MedicationId) -> u32 {
        let state = self.inner.lock().await;
        state
            .usage
            .units_on(subject_id, medication_id, Utc::now().date_naive())
    }

    pub async fn restock(
        &self,
        medication_id: &MedicationId,
        units: u32,
    ) -> Result<u32, LedgerError> {
        self.inner.lock().await.inventory.restock(medication_id, units)
    }
}

fn invalid_phase(operation: &'static str, phase: Phase) -> CabinetError {
    CabinetError::InvalidPhase { operation, phase }
}

fn expected_lock_status(phase: Phase) -> LockStatus {
    if phase == Phase::Unlocked {
        LockStatus::Unlocked
    } else {
        LockStatus::Locked
    }
}

fn selection_lines(session: &ActiveSession, inventory: &InventoryLedger) -> Vec<SelectionLine> {
    session
        .formulary
        .entries()
        .iter()
        .map(|entry| {
            let quantity = session.selection.quantity(&entry.medication_id);
            let stock_available = inventory.units(&entry.medication_id);
            SelectionLine {
                medication_id: entry.medication_id.clone(),
                display_name: entry.display_name.clone(),
                dosage_label: entry.dosage_label.clone(),
                quantity,
                remaining_allowance: entry.remaining(),
                stock_available,
                stock_shortfall: quantity > stock_available,
            }
        })
        .collect()
}

fn review_of(session: &ActiveSession) -> ReviewSummary {
    let lines: Vec<ReviewLine> = session
        .formulary
        .entries()
        .iter()
        .filter_map(|entry| {
            let quantity = session.selection.quantity(&entry.medication_id);
            (quantity > 0).then(|| ReviewLine {
                medication_id: entry.medication_id.clone(),
                display_name: entry.display_name.clone(),
                dosage_label: entry.dosage_label.clone(),
                instructions: entry.instructions.clone(),
                quantity,
            })
        })
        .collect();
    ReviewSummary {
        subject: session.formulary.subject().clone(),
        total_units: lines.iter().map(|line| line.quantity).sum(),
        lines,
    }
}

fn snapshot_of(state: &ControllerState) -> SessionSnapshot {
    let (session_id, subject, selection) = match &state.session {
        Some(session) => (
            Some(session.id),
            Some(session.formulary.subject().clone()),
            selection_lines(session, &state.inventory),
        ),
        None => (None, None, Vec::new()),
    };
    SessionSnapshot {
        session_id,
        phase: state.phase,
        subject,
        selection,
        lock_status: state.lock_status,
        countdown_seconds: state.countdown_seconds,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
