//! Per-frame input polling.
//!
//! The main loop asks for pending [`Intention`]s once per frame instead of
//! reacting to callbacks. Intentions come from the scene's scripted events
//! and, with `--watch`, from the file watcher.

use std::collections::VecDeque;
use std::sync::mpsc::Receiver;

use scene::{EventAction, EventDef};

#[derive(Debug, Clone, PartialEq)]
pub enum Intention {
    Apply(EventAction),
    ReloadScene,
}

pub struct Input {
    scripted: VecDeque<EventDef>,
    reloads: Option<Receiver<()>>,
}

impl Input {
    pub fn new(events: &[EventDef], reloads: Option<Receiver<()>>) -> Self {
        let mut input = Self { scripted: VecDeque::new(), reloads };
        input.reset_script(events);
        input
    }

    /// Replaces the pending scripted events, e.g. after a reload.
    pub fn reset_script(&mut self, events: &[EventDef]) {
        let mut events = events.to_vec();
        // Stable, so events sharing a frame keep their file order.
        events.sort_by_key(|event| event.frame);
        self.scripted = events.into();
    }

    /// Everything due at or before `frame`. A pending reload is returned on
    /// its own since it replaces the script.
    pub fn poll(&mut self, frame: u64) -> Vec<Intention> {
        if let Some(reloads) = &self.reloads {
            // Editors often emit several events per save.
            if reloads.try_iter().count() > 0 {
                return vec![Intention::ReloadScene];
            }
        }

        let mut intentions = Vec::new();
        while let Some(event) = self.scripted.front() {
            if event.frame > frame {
                break;
            }
            if let Some(event) = self.scripted.pop_front() {
                intentions.push(Intention::Apply(event.action));
            }
        }
        intentions
    }

    pub fn pending(&self) -> usize {
        self.scripted.len()
    }
}
