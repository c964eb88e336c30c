use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Cards dealt to each player at round start.
    #[serde(default = "default_hand_size")]
    pub hand_size: usize,
    /// Minimum seated players before a round may start.
    #[serde(default = "default_min_players")]
    pub min_players: usize,
    /// Cumulative penalty total that ends the match.
    #[serde(default = "default_match_target")]
    pub match_target: u32,
    /// When set, `join` rejects players beyond the room's `maxPlayers`.
    /// Off by default: the original backend stored the capacity without
    /// enforcing it.
    #[serde(default)]
    pub enforce_max_players: bool,
}

fn default_hand_size() -> usize {
    7
}

fn default_min_players() -> usize {
    2
}

fn default_match_target() -> u32 {
    500
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hand_size: default_hand_size(),
            min_players: default_min_players(),
            match_target: default_match_target(),
            enforce_max_players: false,
        }
    }
}
