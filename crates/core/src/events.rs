use crate::Card;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    PlayerJoined {
        name: String,
        seats: usize,
    },
    RoundStarted {
        starter: String,
        discard_top: Card,
        deck_remaining: usize,
    },
    CardPlayed {
        player: String,
        card: Card,
        cards_left: usize,
    },
    CardDrawn {
        player: String,
        card: Card,
        kept: bool,
    },
    RoundEnded {
        winner: String,
        scores: BTreeMap<String, u32>,
    },
    MatchEnded { champion: String },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
