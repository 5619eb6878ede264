//! Input layer: host key codes and pointer events mapped to movement intents.
//!
//! # Invariants
//! - The simulation only ever sees a [`MoveIntent`](forestwalk_common::MoveIntent),
//!   latched once per frame.
//! - Movement input is ignored until the pointer is locked; losing the lock
//!   releases every held key.

pub mod action;
pub mod script;
pub mod state;

pub use action::{Action, InputError, KeyMap};
pub use script::{InputScript, ScriptStep};
pub use state::InputState;

pub fn crate_info() -> &'static str {
    "forestwalk-input v0.1.0"
}
