//! Emergency request records.

use ems_core::{EmergencyId, LocationId, SimRng, Tick};

use crate::{AgentError, AgentResult};

/// Lifecycle of an emergency.
///
/// ```text
/// Pending ──→ Assigned ──→ Resolved
///    └──────────────────→ Unanswered   (timeout with no unit committed)
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmergencyStatus {
    /// Waiting in the dispatch queue.
    Pending,
    /// An ambulance has committed to this call.
    Assigned,
    /// Patient delivered to a hospital.
    Resolved,
    /// No unit became available before the deadline.
    Unanswered,
}

/// One emergency call.  Created by the spawner; retained for metrics after
/// it reaches `Resolved` or `Unanswered` and never mutated again.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Emergency {
    pub id: EmergencyId,
    /// Must be an `EmergencyZone` location — the spawner enforces this.
    pub location: LocationId,
    /// Ground-truth severity, 1 (minor) to 5 (critical).
    pub severity: u8,
    /// What the caller reported.  Subject to reporting noise; dispatch
    /// ordering uses this, not `severity`.
    pub reported_priority: u8,
    /// Fuzzy-adjusted priority score (0–100), when a priority model is
    /// plugged in.  `None` under raw-priority dispatch.
    pub score: Option<f64>,
    pub spawn_tick: Tick,
    pub status: EmergencyStatus,
    /// When an ambulance committed.
    pub dispatch_tick: Option<Tick>,
    /// When the ambulance reached the scene.
    pub arrival_tick: Option<Tick>,
    /// When the patient reached a hospital (or the call timed out).
    pub closed_tick: Option<Tick>,
}

impl Emergency {
    /// Create a pending emergency, applying reporting noise: with
    /// probability `noise`, the reported priority is the severity ±1,
    /// clamped to 1..=5.
    pub fn spawn(
        id: EmergencyId,
        location: LocationId,
        severity: u8,
        spawn_tick: Tick,
        noise: f64,
        rng: &mut SimRng,
    ) -> Self {
        let reported_priority = if rng.gen_bool(noise) {
            let delta: i8 = if rng.gen_bool(0.5) { -1 } else { 1 };
            (severity as i8 + delta).clamp(1, 5) as u8
        } else {
            severity
        };
        Self {
            id,
            location,
            severity,
            reported_priority,
            score: None,
            spawn_tick,
            status: EmergencyStatus::Pending,
            dispatch_tick: None,
            arrival_tick: None,
            closed_tick: None,
        }
    }

    /// Ticks spent waiting for a dispatch commit as of `now`.
    pub fn waiting_ticks(&self, now: Tick) -> u64 {
        match self.dispatch_tick {
            Some(t) => t.since(self.spawn_tick),
            None => now.since(self.spawn_tick),
        }
    }

    /// Scene-arrival latency, available once the unit arrived.
    pub fn response_ticks(&self) -> Option<u64> {
        self.arrival_tick.map(|t| t.since(self.spawn_tick))
    }

    fn illegal(&self, to: EmergencyStatus) -> AgentError {
        AgentError::IllegalEmergencyTransition { emergency: self.id, from: self.status, to }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// `Pending → Assigned`: an ambulance committed at `now`.
    pub fn assign(&mut self, now: Tick) -> AgentResult<()> {
        if self.status != EmergencyStatus::Pending {
            return Err(self.illegal(EmergencyStatus::Assigned));
        }
        self.status = EmergencyStatus::Assigned;
        self.dispatch_tick = Some(now);
        Ok(())
    }

    /// Record scene arrival.  Only legal while `Assigned`.
    pub fn record_arrival(&mut self, now: Tick) -> AgentResult<()> {
        if self.status != EmergencyStatus::Assigned {
            return Err(self.illegal(self.status));
        }
        self.arrival_tick = Some(now);
        Ok(())
    }

    /// `Assigned → Resolved`: patient dropped at a hospital at `now`.
    pub fn resolve(&mut self, now: Tick) -> AgentResult<()> {
        if self.status != EmergencyStatus::Assigned {
            return Err(self.illegal(EmergencyStatus::Resolved));
        }
        self.status = EmergencyStatus::Resolved;
        self.closed_tick = Some(now);
        Ok(())
    }

    /// `Pending → Unanswered`: deadline passed with no commit.
    pub fn expire(&mut self, now: Tick) -> AgentResult<()> {
        if self.status != EmergencyStatus::Pending {
            return Err(self.illegal(EmergencyStatus::Unanswered));
        }
        self.status = EmergencyStatus::Unanswered;
        self.closed_tick = Some(now);
        Ok(())
    }
}
