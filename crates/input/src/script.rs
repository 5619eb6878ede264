//! Scripted input for headless runs.
//!
//! A script is a whitespace-separated list of segments. Each segment names the
//! actions held (joined by `+`, or `idle` for none) and optionally how many
//! frames to hold them:
//!
//! ```text
//! forward=120 forward+left=30 jump idle=60
//! ```

use std::str::FromStr;

use crate::action::{Action, InputError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub actions: Vec<Action>,
    pub frames: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputScript {
    steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    pub fn total_frames(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.frames)).sum()
    }

    /// Actions held on `frame`, looping the script when it runs out.
    pub fn actions_at(&self, frame: u64) -> &[Action] {
        let total = self.total_frames();
        if total == 0 {
            return &[];
        }
        let mut f = frame % total;
        for step in &self.steps {
            let n = u64::from(step.frames);
            if f < n {
                return &step.actions;
            }
            f -= n;
        }
        &[]
    }
}

impl FromStr for InputScript {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let steps = s
            .split_whitespace()
            .map(parse_segment)
            .collect::<Result<Vec<_>, _>>()?;
        if steps.is_empty() {
            return Err(InputError::EmptyScript);
        }
        Ok(Self { steps })
    }
}

fn parse_segment(segment: &str) -> Result<ScriptStep, InputError> {
    let (names, frames) = match segment.split_once('=') {
        Some((names, count)) => {
            let frames = count
                .parse::<u32>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| InputError::BadFrameCount(segment.to_string()))?;
            (names, frames)
        }
        None => (segment, 1),
    };
    let actions = if names == "idle" {
        Vec::new()
    } else {
        names
            .split('+')
            .map(str::parse)
            .collect::<Result<Vec<Action>, _>>()?
    };
    Ok(ScriptStep { actions, frames })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_segments() {
        let script: InputScript = "forward=120 forward+left=30 jump idle=60".parse().unwrap();
        assert_eq!(script.steps().len(), 4);
        assert_eq!(script.total_frames(), 211);
        assert_eq!(
            script.steps()[1].actions,
            vec![Action::MoveForward, Action::MoveLeft]
        );
        assert_eq!(script.steps()[2].frames, 1);
        assert!(script.steps()[3].actions.is_empty());
    }

    #[test]
    fn actions_at_walks_and_loops() {
        let script: InputScript = "forward=2 jump".parse().unwrap();
        assert_eq!(script.actions_at(0), &[Action::MoveForward]);
        assert_eq!(script.actions_at(1), &[Action::MoveForward]);
        assert_eq!(script.actions_at(2), &[Action::Jump]);
        assert_eq!(script.actions_at(3), &[Action::MoveForward]);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("".parse::<InputScript>(), Err(InputError::EmptyScript));
        assert_eq!(
            "forward=0".parse::<InputScript>(),
            Err(InputError::BadFrameCount("forward=0".into()))
        );
        assert_eq!(
            "forward=x".parse::<InputScript>(),
            Err(InputError::BadFrameCount("forward=x".into()))
        );
        assert_eq!(
            "fly=3".parse::<InputScript>(),
            Err(InputError::UnknownAction("fly".into()))
        );
    }
}
