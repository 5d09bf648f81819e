//! Respawn sequence
//!
//! The sequence is a phase-and-timer state machine advanced once per frame.
//! It never touches the world itself; each [`advance`](RespawnSequencer::advance)
//! returns the commands the session must carry out, in order.
//!
//! | Phase      | On entry                               | While running      | On exit        |
//! |------------|----------------------------------------|--------------------|----------------|
//! | LockFreeze | lock input, zero motion, pause threats | hold               |                |
//! | FadeOut    |                                        | opacity 0 -> 1     | reset broadcast, pause threats |
//! | Blackout   |                                        | hold at full black |                |
//! | Teleport   | zero motion, teleport, zero motion     | (instant)          |                |
//! | FadeIn     |                                        | opacity 1 -> 0     | unlock input, resume threats |
//!
//! The reset returns threat agents to idle at their spawn points; they are
//! paused again straight away and only resume together with the player.

use crate::config::RespawnTimings;
use frost_math::{inverse_lerp, Transform};

/// Respawn phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RespawnPhase {
    /// Idle, ready to trigger
    Armed,
    LockFreeze,
    FadeOut,
    Blackout,
    Teleport,
    FadeIn,
}

impl RespawnPhase {
    fn next(self) -> Self {
        match self {
            Self::Armed => Self::Armed,
            Self::LockFreeze => Self::FadeOut,
            Self::FadeOut => Self::Blackout,
            Self::Blackout => Self::Teleport,
            Self::Teleport => Self::FadeIn,
            Self::FadeIn => Self::Armed,
        }
    }
}

/// Work the session performs on behalf of the sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RespawnCommand {
    LockInput,
    /// Zero the player's linear and angular velocity
    ZeroMotion,
    /// Pause every threat agent
    PauseThreats,
    /// Resume every paused threat agent
    ResumeThreats,
    SetOverlayOpacity(f32),
    /// Reset every resettable entity in the level
    BroadcastReset,
    Teleport(Transform),
    UnlockInput,
}

/// Single-flight respawn sequence
#[derive(Debug, Clone)]
pub struct RespawnSequencer {
    timings: RespawnTimings,
    spawn: Transform,
    phase: RespawnPhase,
    elapsed: f32,
    entered: bool,
    completed: u32,
}

impl RespawnSequencer {
    /// Create an armed sequencer that returns the player to `spawn`
    pub fn new(timings: RespawnTimings, spawn: Transform) -> Self {
        Self {
            timings,
            spawn,
            phase: RespawnPhase::Armed,
            elapsed: 0.0,
            entered: false,
            completed: 0,
        }
    }

    pub fn phase(&self) -> RespawnPhase {
        self.phase
    }

    /// Whether a sequence is running
    pub fn is_active(&self) -> bool {
        self.phase != RespawnPhase::Armed
    }

    /// Number of sequences run to completion
    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn timings(&self) -> &RespawnTimings {
        &self.timings
    }

    pub fn spawn(&self) -> &Transform {
        &self.spawn
    }

    /// Move the spawn point (takes effect on the next teleport)
    pub fn set_spawn(&mut self, spawn: Transform) {
        self.spawn = spawn;
    }

    /// Start a sequence. Returns `false` if one is already running.
    pub fn trigger(&mut self) -> bool {
        if self.is_active() {
            log::debug!("Respawn already in progress; trigger ignored");
            return false;
        }
        self.phase = RespawnPhase::LockFreeze;
        self.elapsed = 0.0;
        self.entered = false;
        log::info!("Respawn triggered");
        true
    }

    fn duration(&self, phase: RespawnPhase) -> f32 {
        match phase {
            RespawnPhase::Armed | RespawnPhase::Teleport => 0.0,
            RespawnPhase::LockFreeze => self.timings.hold,
            RespawnPhase::FadeOut => self.timings.fade_out,
            RespawnPhase::Blackout => self.timings.blackout,
            RespawnPhase::FadeIn => self.timings.fade_in,
        }
    }

    /// Overlay opacity implied by the current phase
    pub fn opacity(&self) -> f32 {
        let t = inverse_lerp(0.0, self.duration(self.phase), self.elapsed);
        match self.phase {
            RespawnPhase::Armed | RespawnPhase::LockFreeze => 0.0,
            RespawnPhase::FadeOut => t,
            RespawnPhase::Blackout | RespawnPhase::Teleport => 1.0,
            RespawnPhase::FadeIn => 1.0 - t,
        }
    }

    fn on_enter(&self, out: &mut Vec<RespawnCommand>) {
        match self.phase {
            RespawnPhase::LockFreeze => {
                out.push(RespawnCommand::LockInput);
                out.push(RespawnCommand::ZeroMotion);
                out.push(RespawnCommand::PauseThreats);
            }
            RespawnPhase::Teleport => {
                out.push(RespawnCommand::ZeroMotion);
                out.push(RespawnCommand::Teleport(self.spawn));
                out.push(RespawnCommand::ZeroMotion);
            }
            _ => {}
        }
    }

    fn on_progress(&self, out: &mut Vec<RespawnCommand>) {
        if matches!(self.phase, RespawnPhase::FadeOut | RespawnPhase::FadeIn) {
            out.push(RespawnCommand::SetOverlayOpacity(self.opacity()));
        }
    }

    fn on_exit(&mut self, out: &mut Vec<RespawnCommand>) {
        match self.phase {
            RespawnPhase::FadeOut => {
                out.push(RespawnCommand::BroadcastReset);
                out.push(RespawnCommand::PauseThreats);
            }
            RespawnPhase::FadeIn => {
                out.push(RespawnCommand::UnlockInput);
                out.push(RespawnCommand::ResumeThreats);
                self.completed += 1;
            }
            _ => {}
        }
    }

    /// Advance by `dt` seconds. Time left over at the end of a phase carries
    /// into the next one.
    pub fn advance(&mut self, dt: f32) -> Vec<RespawnCommand> {
        let mut out = Vec::new();
        let mut remaining = dt.max(0.0);

        while self.is_active() {
            if !self.entered {
                self.entered = true;
                self.on_enter(&mut out);
            }

            let left = (self.duration(self.phase) - self.elapsed).max(0.0);
            if remaining < left {
                self.elapsed += remaining;
                self.on_progress(&mut out);
                break;
            }

            remaining -= left;
            self.elapsed = self.duration(self.phase);
            self.on_progress(&mut out);
            self.on_exit(&mut out);

            let next = self.phase.next();
            log::info!("Respawn phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
            self.elapsed = 0.0;
            self.entered = false;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use frost_math::Vec3;

    fn sequencer() -> RespawnSequencer {
        RespawnSequencer::new(RespawnTimings::default(), Transform::from_position(Vec3::new(1.0, 0.0, 2.0)))
    }

    fn run(seq: &mut RespawnSequencer, seconds: f32, dt: f32) -> Vec<RespawnCommand> {
        let mut all = Vec::new();
        let steps = (seconds / dt).round() as usize;
        for _ in 0..steps {
            all.extend(seq.advance(dt));
        }
        all
    }

    #[test]
    fn test_armed_does_nothing() {
        let mut seq = sequencer();
        assert!(seq.advance(1.0).is_empty());
        assert_eq!(seq.phase(), RespawnPhase::Armed);
    }

    #[test]
    fn test_entry_commands_on_zero_advance() {
        let mut seq = sequencer();
        assert!(seq.trigger());
        let out = seq.advance(0.0);
        assert_eq!(
            out,
            vec![
                RespawnCommand::LockInput,
                RespawnCommand::ZeroMotion,
                RespawnCommand::PauseThreats
            ]
        );
        assert_eq!(seq.phase(), RespawnPhase::LockFreeze);
    }

    #[test]
    fn test_retrigger_ignored() {
        let mut seq = sequencer();
        assert!(seq.trigger());
        seq.advance(1.0);
        assert!(!seq.trigger());
        seq.advance(1.5);
        assert!(!seq.trigger());
        assert_eq!(seq.phase(), RespawnPhase::FadeOut);
    }

    #[test]
    fn test_full_sequence_order() {
        let mut seq = sequencer();
        seq.trigger();
        let out = run(&mut seq, 6.0, 0.05);

        let count = |cmd: &RespawnCommand| out.iter().filter(|c| *c == cmd).count();
        assert_eq!(count(&RespawnCommand::LockInput), 1);
        assert_eq!(count(&RespawnCommand::BroadcastReset), 1);
        assert_eq!(count(&RespawnCommand::UnlockInput), 1);
        assert_eq!(count(&RespawnCommand::ZeroMotion), 3);
        assert_eq!(count(&RespawnCommand::PauseThreats), 2);
        assert_eq!(count(&RespawnCommand::ResumeThreats), 1);

        let pos = |cmd: &RespawnCommand| out.iter().position(|c| c == cmd).unwrap();
        let reset = pos(&RespawnCommand::BroadcastReset);
        assert_eq!(out[reset - 1], RespawnCommand::SetOverlayOpacity(1.0));
        let teleport = out
            .iter()
            .position(|c| matches!(c, RespawnCommand::Teleport(_)))
            .unwrap();
        assert!(reset < teleport);
        assert_eq!(out[teleport - 1], RespawnCommand::ZeroMotion);
        assert_eq!(out[teleport + 1], RespawnCommand::ZeroMotion);
        assert_eq!(
            out[out.len() - 2..],
            [RespawnCommand::UnlockInput, RespawnCommand::ResumeThreats]
        );

        assert_eq!(seq.phase(), RespawnPhase::Armed);
        assert_eq!(seq.completed(), 1);
        assert!(seq.trigger());
    }

    #[test]
    fn test_phase_boundaries() {
        let mut seq = sequencer();
        seq.trigger();
        seq.advance(1.99);
        assert_eq!(seq.phase(), RespawnPhase::LockFreeze);
        seq.advance(0.02);
        assert_eq!(seq.phase(), RespawnPhase::FadeOut);
        seq.advance(0.49);
        assert_relative_eq!(seq.opacity(), 0.5, epsilon = 1e-3);
        seq.advance(0.5);
        assert_eq!(seq.phase(), RespawnPhase::Blackout);
        assert_eq!(seq.opacity(), 1.0);
        seq.advance(2.0);
        assert_eq!(seq.phase(), RespawnPhase::FadeIn);
        seq.advance(0.25);
        assert_relative_eq!(seq.opacity(), 0.5, epsilon = 1e-3);
        seq.advance(0.25);
        assert!(!seq.is_active());
    }

    #[test]
    fn test_one_large_step_runs_everything_once() {
        let mut seq = sequencer();
        seq.trigger();
        let out = seq.advance(100.0);
        assert_eq!(out.iter().filter(|c| **c == RespawnCommand::BroadcastReset).count(), 1);
        assert_eq!(*out.last().unwrap(), RespawnCommand::ResumeThreats);
        assert!(!seq.is_active());
    }

    #[test]
    fn test_zero_durations() {
        let mut seq = RespawnSequencer::new(RespawnTimings::default().scaled(0.0), Transform::IDENTITY);
        seq.trigger();
        let out = seq.advance(0.0);
        assert!(out.contains(&RespawnCommand::BroadcastReset));
        assert!(out.contains(&RespawnCommand::UnlockInput));
        assert!(!seq.is_active());
    }
}
