//! Intent scripts: who sits where and what they submit, in order.

use std::path::Path;

use anyhow::{Context, Result};
use game_core::{Intent, PlayerId, Seat};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScriptSeat {
    pub player: u32,
    pub character: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ScriptStep {
    pub player: PlayerId,
    pub intent: Intent,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Script {
    pub seats: Vec<ScriptSeat>,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
    /// Abort the replay on the first rejected intent.
    #[serde(default)]
    pub stop_on_rejection: bool,
}

impl Script {
    /// Reads a `.json` script, or RON for any other extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let script = if is_json {
            serde_json::from_str(&content).context("failed to parse JSON script")
        } else {
            ron::from_str(&content).context("failed to parse RON script")
        };
        script.with_context(|| format!("in {}", path.display()))
    }

    pub fn seats(&self) -> Vec<Seat> {
        self.seats
            .iter()
            .map(|seat| Seat::new(PlayerId(seat.player), seat.character.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::Direction;

    const SEATS: &str = r#"[
        (player: 1, character: "ox-bellows"),
        (player: 2, character: "zoe-ingstrom"),
        (player: 3, character: "vivian-lopez"),
    ]"#;

    #[test]
    fn ron_script_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opening.ron");
        std::fs::write(
            &path,
            format!(
                "(seats: {SEATS}, steps: [
                    (player: (1), intent: move(direction: north)),
                    (player: (1), intent: end_turn),
                ])"
            ),
        )
        .unwrap();

        let script = Script::load(&path).unwrap();
        assert_eq!(script.seats().len(), 3);
        assert_eq!(
            script.steps[0].intent,
            Intent::Move {
                direction: Direction::North
            }
        );
        assert!(!script.stop_on_rejection);
    }

    #[test]
    fn json_script_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opening.json");
        std::fs::write(
            &path,
            r#"{
                "seats": [{"player": 1, "character": "ox-bellows"}],
                "steps": [{"player": 1, "intent": "use_stairs"}],
                "stop_on_rejection": true
            }"#,
        )
        .unwrap();

        let script = Script::load(&path).unwrap();
        assert_eq!(script.steps[0].player, PlayerId(1));
        assert_eq!(script.steps[0].intent, Intent::UseStairs);
        assert!(script.stop_on_rejection);
    }

    #[test]
    fn broken_script_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "(seats: [").unwrap();
        let error = Script::load(&path).unwrap_err();
        assert!(format!("{error:#}").contains("broken.ron"));
    }
}
