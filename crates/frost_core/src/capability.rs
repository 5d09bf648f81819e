//! Capability contracts exposed by simulated entities
//!
//! These are the only calls that cross entity boundaries. Implementations
//! must not panic; failures are reported through [`CoreError`] and handled
//! locally by whoever issued the call.

use crate::error::Result;
use crate::id::EntityId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Restores an entity to its level-start condition.
///
/// Invoked only by the level's reset broadcast. Every stateful entity in a
/// level implements this.
pub trait Resettable {
    /// Entity this state belongs to (used for diagnostics)
    fn entity(&self) -> EntityId;

    /// Restore level-start state
    fn on_reset(&mut self) -> Result<()>;
}

/// Behaviour that can be halted and resumed by a level-wide pause.
pub trait Pausable {
    /// Halt behaviour. Returns `false` if already halted.
    fn stop_behaviour(&mut self) -> bool;

    /// Resume behaviour. Returns `false` if it was not halted.
    fn start_behaviour(&mut self) -> bool;
}

/// Fire-and-forget animation parameters.
///
/// Nothing returned by the animation side is ever consulted.
pub trait AnimationSink {
    /// Fire a named trigger
    fn set_trigger(&mut self, name: &str);

    /// Set a named boolean parameter
    fn set_bool(&mut self, name: &str, value: bool);

    /// Set a named blend parameter
    fn set_float(&mut self, name: &str, value: f32);
}

/// A full-screen surface whose opacity can be driven (fade to black).
pub trait ScreenOverlay {
    /// Set opacity in `[0, 1]`
    fn set_opacity(&mut self, opacity: f32);

    /// Current opacity
    fn opacity(&self) -> f32;
}

/// Shared sinks, so a caller can keep a handle to the animator it hands out
impl<T: AnimationSink + ?Sized> AnimationSink for Rc<RefCell<T>> {
    fn set_trigger(&mut self, name: &str) {
        self.borrow_mut().set_trigger(name);
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.borrow_mut().set_bool(name, value);
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.borrow_mut().set_float(name, value);
    }
}

impl<T: ScreenOverlay + ?Sized> ScreenOverlay for Rc<RefCell<T>> {
    fn set_opacity(&mut self, opacity: f32) {
        self.borrow_mut().set_opacity(opacity);
    }

    fn opacity(&self) -> f32 {
        self.borrow().opacity()
    }
}

/// Animation sink that keeps the latest value of each parameter.
///
/// Used by the headless runtime, where there is no animator to drive.
/// Storage grows with the number of distinct names, not with calls.
#[derive(Debug, Clone, Default)]
pub struct AnimationParams {
    triggers: HashMap<String, u32>,
    bools: HashMap<String, bool>,
    floats: HashMap<String, f32>,
}

impl AnimationParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times a trigger was fired
    pub fn trigger_count(&self, name: &str) -> u32 {
        self.triggers.get(name).copied().unwrap_or(0)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.bools.get(name).copied()
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    /// Distinct parameter names seen so far
    pub fn len(&self) -> usize {
        self.triggers.len() + self.bools.len() + self.floats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnimationSink for AnimationParams {
    fn set_trigger(&mut self, name: &str) {
        match self.triggers.get_mut(name) {
            Some(count) => *count = count.saturating_add(1),
            None => {
                self.triggers.insert(name.to_string(), 1);
            }
        }
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        match self.bools.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.bools.insert(name.to_string(), value);
            }
        }
    }

    fn set_float(&mut self, name: &str, value: f32) {
        match self.floats.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.floats.insert(name.to_string(), value);
            }
        }
    }
}

/// Animation sink that records every call, in order.
///
/// Grows with every call; meant for tests that check call history.
#[derive(Debug, Clone, Default)]
pub struct AnimationRecorder {
    triggers: Vec<String>,
    bools: Vec<(String, bool)>,
    floats: Vec<(String, f32)>,
}

impl AnimationRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Triggers fired so far, in order
    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    /// Number of times a trigger was fired
    pub fn trigger_count(&self, name: &str) -> usize {
        self.triggers.iter().filter(|t| t.as_str() == name).count()
    }

    /// Last value written to a boolean parameter
    pub fn last_bool(&self, name: &str) -> Option<bool> {
        self.bools
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    /// Last value written to a blend parameter
    pub fn last_float(&self, name: &str) -> Option<f32> {
        self.floats
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

impl AnimationSink for AnimationRecorder {
    fn set_trigger(&mut self, name: &str) {
        self.triggers.push(name.to_string());
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.bools.push((name.to_string(), value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.floats.push((name.to_string(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_counts_triggers() {
        let mut anim = AnimationRecorder::new();
        anim.set_trigger("Alert");
        anim.set_trigger("Die");
        anim.set_trigger("Alert");

        assert_eq!(anim.trigger_count("Alert"), 2);
        assert_eq!(anim.trigger_count("Die"), 1);
        assert_eq!(anim.triggers().len(), 3);
    }

    #[test]
    fn test_recorder_last_values() {
        let mut anim = AnimationRecorder::new();
        anim.set_bool("Walking", true);
        anim.set_bool("Walking", false);
        anim.set_float("Speed", 1.5);

        assert_eq!(anim.last_bool("Walking"), Some(false));
        assert_eq!(anim.last_float("Speed"), Some(1.5));
        assert_eq!(anim.last_float("Missing"), None);
    }

    #[test]
    fn test_params_keep_latest_only() {
        let mut anim = AnimationParams::new();
        for i in 0..10_000 {
            anim.set_bool("Walking", i % 2 == 0);
            anim.set_float("Speed", i as f32);
        }
        anim.set_trigger("Die");
        anim.set_trigger("Die");

        assert_eq!(anim.len(), 3);
        assert_eq!(anim.get_bool("Walking"), Some(false));
        assert_eq!(anim.get_float("Speed"), Some(9999.0));
        assert_eq!(anim.trigger_count("Die"), 2);
        assert_eq!(anim.trigger_count("Alert"), 0);
    }

    #[test]
    fn test_shared_sink_forwards() {
        let shared = Rc::new(RefCell::new(AnimationRecorder::new()));
        let mut handle: Box<dyn AnimationSink> = Box::new(shared.clone());
        handle.set_trigger("Die");
        assert_eq!(shared.borrow().trigger_count("Die"), 1);
    }
}
