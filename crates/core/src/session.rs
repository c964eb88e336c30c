use crate::{
    is_legal_play, match_over, merge_scores, overall_winner, round_scores, Card, Deck, Event,
    EventBus, GameConfig, RngState,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("player name is already taken")]
    NameTaken,
    #[error("game has already started")]
    AlreadyStarted,
    #[error("game has not started yet")]
    NotStarted,
    #[error("minimum {0} players required to start the game")]
    NotEnoughPlayers(usize),
    #[error("it is not your turn")]
    NotYourTurn,
    #[error("card cannot be played on the current discard")]
    IllegalCard,
    #[error("card not found in player's hand")]
    CardNotHeld,
    #[error("draw pile is empty")]
    EmptyDrawPile,
    #[error("not enough cards to deal: wanted {wanted}, {left} left")]
    InsufficientCards { wanted: usize, left: usize },
    #[error("room is full")]
    RoomFull,
    #[error("match is over")]
    MatchOver,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub hand: Vec<Card>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hand: Vec::new(),
        }
    }
}

/// One room's authoritative state. A plain value: every transition takes
/// `&self` and returns a fresh `Session`, leaving the input untouched on
/// failure. Serializes to the persisted document format, card faces as
/// plain strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub code: String,
    pub max_players: usize,
    pub players: Vec<Player>,
    pub started: bool,
    #[serde(default)]
    pub deck: Vec<Card>,
    #[serde(default)]
    pub discard_pile: Vec<Card>,
    #[serde(default)]
    pub current_player: Option<String>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub scores: BTreeMap<String, u32>,
    #[serde(default)]
    pub overall_winner: Option<String>,
}

impl Session {
    /// A fresh lobby with the host seated.
    pub fn new(
        code: impl Into<String>,
        max_players: usize,
        host: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            max_players,
            players: vec![Player::new(host)],
            started: false,
            deck: Vec::new(),
            discard_pile: Vec::new(),
            current_player: None,
            winner: None,
            scores: BTreeMap::new(),
            overall_winner: None,
        }
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.name == name)
    }

    /// The active card the next play is checked against.
    pub fn discard_top(&self) -> Option<&Card> {
        self.discard_pile.last()
    }

    fn player_index(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|player| player.name == name)
    }

    fn next_player_name(&self, index: usize) -> String {
        self.players[(index + 1) % self.players.len()].name.clone()
    }

    /// Seats a new player. Lobby phase only; names are unique for the
    /// lifetime of the session.
    pub fn join(
        &self,
        name: &str,
        config: &GameConfig,
        events: &mut EventBus,
    ) -> Result<Session, GameError> {
        if self.overall_winner.is_some() {
            return Err(GameError::MatchOver);
        }
        if self.started {
            return Err(GameError::AlreadyStarted);
        }
        if self.player(name).is_some() {
            return Err(GameError::NameTaken);
        }
        if config.enforce_max_players && self.players.len() >= self.max_players {
            return Err(GameError::RoomFull);
        }
        let mut next = self.clone();
        next.players.push(Player::new(name));
        events.push(Event::PlayerJoined {
            name: name.to_string(),
            seats: next.players.len(),
        });
        Ok(next)
    }

    /// Deals a fresh round: new shuffled deck, `config.hand_size` cards to
    /// each player in join order, one opened discard, a uniformly random
    /// starting player.
    pub fn start(
        &self,
        config: &GameConfig,
        rng: &mut RngState,
        events: &mut EventBus,
    ) -> Result<Session, GameError> {
        if self.overall_winner.is_some() {
            return Err(GameError::MatchOver);
        }
        if self.started {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.len() < config.min_players {
            return Err(GameError::NotEnoughPlayers(config.min_players));
        }

        let mut deck = Deck::standard108();
        deck.shuffle(rng);

        let mut next = self.clone();
        for player in &mut next.players {
            player.hand = deck.deal(config.hand_size)?;
        }
        let top = deck.draw().ok_or(GameError::InsufficientCards {
            wanted: 1,
            left: 0,
        })?;
        // Previous round's pile goes away: all 108 cards must sit in
        // exactly one of hand, deck or discard while the round is live.
        next.discard_pile = vec![top];
        next.winner = None;
        let starter = next.players[rng.pick_index(next.players.len())].name.clone();
        next.current_player = Some(starter.clone());
        next.deck = deck.cards;
        next.started = true;
        events.push(Event::RoundStarted {
            starter,
            discard_top: top,
            deck_remaining: next.deck.len(),
        });
        Ok(next)
    }

    /// Plays one card from the current player's hand onto the discard
    /// pile and passes the turn forward. Emptying the hand ends the round
    /// and may end the match.
    pub fn play(
        &self,
        name: &str,
        card: &Card,
        config: &GameConfig,
        events: &mut EventBus,
    ) -> Result<Session, GameError> {
        if !self.started {
            return Err(GameError::NotStarted);
        }
        if self.current_player.as_deref() != Some(name) {
            return Err(GameError::NotYourTurn);
        }
        let top = self.discard_top().ok_or(GameError::NotStarted)?;
        if !is_legal_play(card, top) {
            return Err(GameError::IllegalCard);
        }
        let index = self.player_index(name).ok_or(GameError::NotYourTurn)?;
        let held = self.players[index]
            .hand
            .iter()
            .position(|held| held == card)
            .ok_or(GameError::CardNotHeld)?;

        let mut next = self.clone();
        next.players[index].hand.remove(held);
        next.discard_pile.push(*card);
        next.current_player = Some(next.next_player_name(index));
        events.push(Event::CardPlayed {
            player: name.to_string(),
            card: *card,
            cards_left: next.players[index].hand.len(),
        });

        if next.players[index].hand.is_empty() {
            next.finish_round(name, config, events);
        }
        Ok(next)
    }

    /// Draws one card from the pile. A card legal against the discard top
    /// joins the drawer's hand and the turn stays; an illegal one is
    /// discarded and the turn passes.
    pub fn draw(&self, name: &str, events: &mut EventBus) -> Result<Session, GameError> {
        if !self.started {
            return Err(GameError::NotStarted);
        }
        if self.current_player.as_deref() != Some(name) {
            return Err(GameError::NotYourTurn);
        }
        let index = self.player_index(name).ok_or(GameError::NotYourTurn)?;

        let mut next = self.clone();
        let card = next.deck.pop().ok_or(GameError::EmptyDrawPile)?;
        let top = next.discard_top().ok_or(GameError::NotStarted)?;
        let kept = is_legal_play(&card, top);
        if kept {
            next.players[index].hand.push(card);
        } else {
            next.discard_pile.push(card);
            next.current_player = Some(next.next_player_name(index));
        }
        events.push(Event::CardDrawn {
            player: name.to_string(),
            card,
            kept,
        });
        Ok(next)
    }

    fn finish_round(&mut self, winner: &str, config: &GameConfig, events: &mut EventBus) {
        self.started = false;
        self.current_player = None;
        self.winner = Some(winner.to_string());
        let round = round_scores(&self.players);
        merge_scores(&mut self.scores, &round);
        events.push(Event::RoundEnded {
            winner: winner.to_string(),
            scores: round,
        });
        if match_over(&self.scores, config.match_target) {
            if let Some(champion) = overall_winner(&self.players, &self.scores) {
                self.overall_winner = Some(champion.clone());
                events.push(Event::MatchEnded { champion });
            }
        }
    }
}
