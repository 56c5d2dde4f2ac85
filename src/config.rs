//! Engine settings loaded from TOML.
//!
//! ```toml
//! [white]
//! player = "search"
//! selector = { kind = "eps_greedy", epsilon = 0.9 }
//! search = { depth = 3, capture_extension = 1 }
//!
//! [black]
//! player = "positional"
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engines::engine_positional::PositionalPlayer;
use crate::engines::engine_random::RandomPlayer;
use crate::engines::engine_search::SearchEngine;
use crate::engines::engine_trait::Player;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Team;
use crate::search::alpha_beta::SearchConfig;
use crate::search::selectors::SelectorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    #[default]
    Search,
    Random,
    Positional,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub player: PlayerKind,
    /// Seeds the player's RNG for reproducible games.
    pub seed: Option<u64>,
    pub selector: SelectorKind,
    pub search: SearchConfig,
}

impl PlayerSettings {
    pub fn validate(&self) -> ChessResult<()> {
        if let SelectorKind::EpsGreedy { epsilon } = self.selector {
            if !(0.0..=1.0).contains(&epsilon) {
                return Err(ChessError::Config(format!(
                    "epsilon must be within [0, 1], got {epsilon}"
                )));
            }
        }
        self.search.validate()
    }

    pub fn build(&self, team: Team) -> ChessResult<Box<dyn Player>> {
        self.validate()?;
        let player: Box<dyn Player> = match self.player {
            PlayerKind::Search => {
                let engine = SearchEngine::new(team, self.search, self.selector)?;
                Box::new(match self.seed {
                    Some(seed) => engine.seeded(seed),
                    None => engine,
                })
            }
            PlayerKind::Random => Box::new(match self.seed {
                Some(seed) => RandomPlayer::seeded(team, seed),
                None => RandomPlayer::new(team),
            }),
            PlayerKind::Positional => Box::new(PositionalPlayer::new(team)),
        };
        Ok(player)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub white: PlayerSettings,
    pub black: PlayerSettings,
}

impl EngineSettings {
    pub fn from_toml_str(text: &str) -> ChessResult<Self> {
        let settings: Self =
            toml::from_str(text).map_err(|e| ChessError::Config(format!("invalid settings: {e}")))?;
        settings.white.validate()?;
        settings.black.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> ChessResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ChessError::Config(format!("cannot read {}: {e}", path.display())))?;
        let settings = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "loaded engine settings");
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> ChessResult<String> {
        toml::to_string(self).map_err(|e| ChessError::Config(format!("cannot serialize settings: {e}")))
    }

    pub fn side(&self, team: Team) -> &PlayerSettings {
        match team {
            Team::White => &self.white,
            Team::Black => &self.black,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = EngineSettings::from_toml_str("").expect("empty is valid");
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.white.player, PlayerKind::Search);
        assert_eq!(settings.black.search.depth, 4);
    }

    #[test]
    fn partial_tables_fill_in_defaults() {
        let text = r#"
            [white]
            player = "search"
            selector = { kind = "eps_greedy", epsilon = 0.9 }
            search = { depth = 3, capture_extension = 1, threads = 2 }

            [black]
            player = "random"
            seed = 42
        "#;
        let settings = EngineSettings::from_toml_str(text).expect("valid settings");
        assert_eq!(settings.white.selector, SelectorKind::EpsGreedy { epsilon: 0.9 });
        assert_eq!(settings.white.search.depth, 3);
        assert_eq!(settings.white.search.keep_moves, 3);
        assert!(settings.white.search.pruning);
        assert_eq!(settings.side(Team::Black).player, PlayerKind::Random);
        assert_eq!(settings.black.seed, Some(42));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for text in [
            "[white]\nplayer = \"wizard\"\n",
            "[white]\nsearch = { depth = 0 }\n",
            "[black]\nselector = { kind = \"eps_greedy\", epsilon = 1.5 }\n",
        ] {
            assert!(
                matches!(EngineSettings::from_toml_str(text), Err(ChessError::Config(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn settings_survive_serialization() {
        let mut settings = EngineSettings::default();
        settings.black.player = PlayerKind::Positional;
        settings.white.search.time_budget_ms = Some(250);
        let text = settings.to_toml_string().expect("serializable");
        assert_eq!(EngineSettings::from_toml_str(&text).expect("parses back"), settings);
    }

    #[test]
    fn builds_players_for_each_side() {
        let mut settings = EngineSettings::default();
        settings.white.player = PlayerKind::Random;
        settings.black.player = PlayerKind::Positional;
        let white = settings.white.build(Team::White).expect("buildable");
        let black = settings.black.build(Team::Black).expect("buildable");
        assert_eq!(white.name(), "RandomPlayer");
        assert_eq!(black.team(), Team::Black);
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            EngineSettings::load("/definitely/not/here.toml"),
            Err(ChessError::Config(_))
        ));
    }
}
