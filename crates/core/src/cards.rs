use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Blue => "Blue",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Rank {
    Number(u8),
    Reverse,
    Skip,
    DrawTwo,
    Wild,
    WildDrawFour,
}

#[derive(Debug, Error)]
pub enum ParseCardError {
    #[error("unknown color `{0}`")]
    UnknownColor(String),
    #[error("unknown rank `{0}`")]
    UnknownRank(String),
    #[error("empty card face")]
    Empty,
}

/// A single card, identified entirely by its face. Wild ranks carry no
/// color; the same face may occur several times in a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Card {
    pub color: Option<Color>,
    pub rank: Rank,
}

impl Card {
    pub fn numbered(color: Color, value: u8) -> Self {
        debug_assert!(value <= 9);
        Self {
            color: Some(color),
            rank: Rank::Number(value),
        }
    }

    pub fn action(color: Color, rank: Rank) -> Self {
        debug_assert!(matches!(rank, Rank::Reverse | Rank::Skip | Rank::DrawTwo));
        Self {
            color: Some(color),
            rank,
        }
    }

    pub fn wild() -> Self {
        Self {
            color: None,
            rank: Rank::Wild,
        }
    }

    pub fn wild_draw_four() -> Self {
        Self {
            color: None,
            rank: Rank::WildDrawFour,
        }
    }

    pub fn is_wild(&self) -> bool {
        self.color.is_none()
    }

    /// The face string used in persisted documents, e.g. `"Red 7"`,
    /// `"Green Draw Two"`, `"Wild Draw Four"`.
    pub fn face(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(color) = self.color {
            write!(f, "{} ", color.name())?;
        }
        match self.rank {
            Rank::Number(value) => write!(f, "{value}"),
            Rank::Reverse => write!(f, "Reverse"),
            Rank::Skip => write!(f, "Skip"),
            Rank::DrawTwo => write!(f, "Draw Two"),
            Rank::Wild => write!(f, "Wild"),
            Rank::WildDrawFour => write!(f, "Wild Draw Four"),
        }
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(face: &str) -> Result<Self, Self::Err> {
        let face = face.trim();
        if face.is_empty() {
            return Err(ParseCardError::Empty);
        }
        match face {
            "Wild" => return Ok(Card::wild()),
            "Wild Draw Four" => return Ok(Card::wild_draw_four()),
            _ => {}
        }
        let (color_token, rank_token) = face
            .split_once(' ')
            .ok_or_else(|| ParseCardError::UnknownRank(face.to_string()))?;
        let color = match color_token {
            "Red" => Color::Red,
            "Blue" => Color::Blue,
            "Green" => Color::Green,
            "Yellow" => Color::Yellow,
            other => return Err(ParseCardError::UnknownColor(other.to_string())),
        };
        let rank = match rank_token {
            "Reverse" => Rank::Reverse,
            "Skip" => Rank::Skip,
            "Draw Two" => Rank::DrawTwo,
            digit => match digit.parse::<u8>() {
                Ok(value) if value <= 9 => Rank::Number(value),
                _ => return Err(ParseCardError::UnknownRank(rank_token.to_string())),
            },
        };
        Ok(Card {
            color: Some(color),
            rank,
        })
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}

impl TryFrom<String> for Card {
    type Error = ParseCardError;

    fn try_from(face: String) -> Result<Self, Self::Error> {
        face.parse()
    }
}
