use std::collections::HashSet;

use forestwalk_common::MoveIntent;

use crate::action::{Action, KeyMap};

/// Radians of yaw per pixel of horizontal pointer motion.
const DEFAULT_LOOK_SENSITIVITY: f32 = 0.002;

/// Input collected between frames.
///
/// Key and pointer events mutate this state as they arrive; the frame loop
/// calls [`take_intent`](InputState::take_intent) once at the top of each
/// frame. Until the pointer is locked every movement event is dropped.
#[derive(Debug, Clone)]
pub struct InputState {
    keymap: KeyMap,
    held_keys: HashSet<String>,
    pointer_locked: bool,
    jump_queued: bool,
    look_yaw: f32,
    look_sensitivity: f32,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(KeyMap::default())
    }
}

impl InputState {
    pub fn new(keymap: KeyMap) -> Self {
        Self {
            keymap,
            held_keys: HashSet::new(),
            pointer_locked: false,
            jump_queued: false,
            look_yaw: 0.0,
            look_sensitivity: DEFAULT_LOOK_SENSITIVITY,
        }
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Pointer lock acquired or lost. Losing it releases everything held.
    pub fn set_pointer_lock(&mut self, locked: bool) {
        if locked == self.pointer_locked {
            return;
        }
        tracing::debug!(locked, "pointer lock changed");
        self.pointer_locked = locked;
        if !locked {
            self.held_keys.clear();
            self.jump_queued = false;
            self.look_yaw = 0.0;
        }
    }

    /// Handle a key press. Returns the mapped action if the press was accepted.
    pub fn key_down(&mut self, code: &str) -> Option<Action> {
        if !self.pointer_locked {
            return None;
        }
        let action = self.keymap.action_for(code)?;
        let fresh = self.held_keys.insert(code.to_string());
        // Auto-repeat does not queue another jump.
        if action == Action::Jump && fresh {
            self.jump_queued = true;
        }
        Some(action)
    }

    pub fn key_up(&mut self, code: &str) -> Option<Action> {
        let action = self.keymap.action_for(code)?;
        self.held_keys.remove(code);
        Some(action)
    }

    /// Horizontal pointer motion in pixels. Moving right turns right.
    pub fn mouse_moved(&mut self, dx: f32) {
        if self.pointer_locked {
            self.look_yaw -= dx * self.look_sensitivity;
        }
    }

    /// True if any key bound to `action` is held.
    pub fn is_held(&self, action: Action) -> bool {
        self.held_keys
            .iter()
            .any(|code| self.keymap.action_for(code) == Some(action))
    }

    /// Press the primary key of every action in `actions` and release keys
    /// for everything else.
    pub fn hold_exactly(&mut self, actions: &[Action]) {
        let released: Vec<String> = self
            .held_keys
            .iter()
            .filter(|code| {
                self.keymap
                    .action_for(code)
                    .is_none_or(|a| !actions.contains(&a))
            })
            .cloned()
            .collect();
        for code in released {
            self.key_up(&code);
        }
        for &action in actions {
            if !self.is_held(action)
                && let Some(code) = self.keymap.primary_key(action)
            {
                self.key_down(code);
            }
        }
    }

    /// Latch this frame's intent. Consumes the queued jump and look delta.
    pub fn take_intent(&mut self) -> MoveIntent {
        if !self.pointer_locked {
            return MoveIntent::default();
        }
        let intent = MoveIntent {
            forward: self.is_held(Action::MoveForward),
            backward: self.is_held(Action::MoveBackward),
            left: self.is_held(Action::MoveLeft),
            right: self.is_held(Action::MoveRight),
            jump: self.jump_queued,
            look_yaw: self.look_yaw,
        };
        self.jump_queued = false;
        self.look_yaw = 0.0;
        intent
    }
}
