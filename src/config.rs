//! Game configuration loaded from YAML.
//!
//! Every field has a default, so a file only needs the sections it changes.
//! Unknown sections are silently ignored.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::engine::Controller;
use crate::game_state::{PlayerId, DEFAULT_BOARD_SIZE, DEFAULT_WALLS_PER_PLAYER};
use crate::minimax::SearchConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub quoridor: QuoridorConfig,
    pub search: SearchConfig,
    pub players: PlayersConfig,
}

/// Board parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuoridorConfig {
    pub board_size: usize,
    pub walls_per_player: u8,
}

impl Default for QuoridorConfig {
    fn default() -> Self {
        QuoridorConfig {
            board_size: DEFAULT_BOARD_SIZE,
            walls_per_player: DEFAULT_WALLS_PER_PLAYER,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Human,
    Computer,
    Random,
}

/// Who controls each side. Defaults to a human against the computer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlayersConfig {
    pub player1: PlayerKind,
    pub player2: PlayerKind,
}

impl Default for PlayersConfig {
    fn default() -> Self {
        PlayersConfig {
            player1: PlayerKind::Human,
            player2: PlayerKind::Computer,
        }
    }
}

impl GameConfig {
    pub fn player_kind(&self, id: PlayerId) -> PlayerKind {
        match id {
            PlayerId::One => self.players.player1,
            PlayerId::Two => self.players.player2,
        }
    }

    /// Controller for `id`; computer players share the `search` section.
    pub fn controller(&self, id: PlayerId) -> Controller {
        match self.player_kind(id) {
            PlayerKind::Human => Controller::Human,
            PlayerKind::Computer => Controller::Computer(self.search),
            PlayerKind::Random => Controller::Random,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let size = self.quoridor.board_size;
        ensure!(
            size >= 3 && size % 2 == 1,
            "board_size must be odd and at least 3, got {}",
            size
        );
        ensure!(
            self.search.wall_bonus_weight.is_finite(),
            "search.wall_bonus_weight must be finite"
        );
        Ok(())
    }
}

/// Parse and validate a `GameConfig` from YAML text. Empty text yields the
/// defaults.
pub fn parse_config(yaml: &str) -> Result<GameConfig> {
    let config: GameConfig = if yaml.trim().is_empty() {
        GameConfig::default()
    } else {
        serde_yaml::from_str(yaml).context("Failed to parse game config")?
    };
    config.validate()?;
    Ok(config)
}

/// Load a `GameConfig` from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GameConfig> {
    let contents = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
    parse_config(&contents)
        .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))
}
