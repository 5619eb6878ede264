//! Developer Tooling: simulation inspector and frame timing.
//!
//! # Invariants
//! - Tools only read simulation state.

mod inspector;
mod timer;

pub use inspector::{SimInspector, SimSummary, TreeInfo};
pub use timer::FrameTimer;

pub fn crate_info() -> &'static str {
    "forestwalk-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
