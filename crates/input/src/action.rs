use std::collections::BTreeMap;
use std::str::FromStr;

/// A high-level movement action.
///
/// Host key codes are translated to actions by a [`KeyMap`]; the simulation
/// never sees raw key events. `MoveLeft`/`MoveRight` strafe or turn depending
/// on the control scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Jump,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
    ];

    /// Short name used in input scripts.
    pub fn name(self) -> &'static str {
        match self {
            Action::MoveForward => "forward",
            Action::MoveBackward => "backward",
            Action::MoveLeft => "left",
            Action::MoveRight => "right",
            Action::Jump => "jump",
        }
    }
}

/// Errors from parsing actions and input scripts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown action `{0}` (expected forward, backward, left, right or jump)")]
    UnknownAction(String),
    #[error("bad frame count in segment `{0}`")]
    BadFrameCount(String),
    #[error("input script is empty")]
    EmptyScript,
}

impl FromStr for Action {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| InputError::UnknownAction(s.to_string()))
    }
}

/// Key-code to action bindings.
///
/// Codes follow the DOM `KeyboardEvent.code` naming (`KeyW`, `ArrowUp`,
/// `Space`), which is layout-independent.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: BTreeMap<&'static str, Action>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let bindings = [
            ("KeyW", Action::MoveForward),
            ("ArrowUp", Action::MoveForward),
            ("KeyS", Action::MoveBackward),
            ("ArrowDown", Action::MoveBackward),
            ("KeyA", Action::MoveLeft),
            ("ArrowLeft", Action::MoveLeft),
            ("KeyD", Action::MoveRight),
            ("ArrowRight", Action::MoveRight),
            ("Space", Action::Jump),
        ]
        .into_iter()
        .collect();
        Self { bindings }
    }
}

impl KeyMap {
    pub fn action_for(&self, code: &str) -> Option<Action> {
        self.bindings.get(code).copied()
    }

    /// First bound key for `action`, in code order.
    pub fn primary_key(&self, action: Action) -> Option<&'static str> {
        self.bindings
            .iter()
            .find(|(_, a)| **a == action)
            .map(|(code, _)| *code)
    }
}
