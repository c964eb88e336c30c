use crate::{Card, Player, Rank};
use std::collections::BTreeMap;

/// Penalty value of a single card left in a hand at round end.
pub fn card_penalty(card: &Card) -> u32 {
    match card.rank {
        Rank::Number(value) => u32::from(value),
        Rank::Reverse | Rank::Skip | Rank::DrawTwo => 20,
        Rank::Wild | Rank::WildDrawFour => 50,
    }
}

pub fn hand_penalty(hand: &[Card]) -> u32 {
    hand.iter().map(card_penalty).sum()
}

/// Penalty for every player's remaining hand, keyed by name. The round
/// winner holds no cards and scores 0.
pub fn round_scores(players: &[Player]) -> BTreeMap<String, u32> {
    players
        .iter()
        .map(|player| (player.name.clone(), hand_penalty(&player.hand)))
        .collect()
}

/// Adds a round's scores into the running totals. A player absent from
/// earlier rounds starts from 0; totals only ever grow.
pub fn merge_scores(cumulative: &mut BTreeMap<String, u32>, round: &BTreeMap<String, u32>) {
    for (name, score) in round {
        *cumulative.entry(name.clone()).or_insert(0) += score;
    }
}

/// The match ends once any cumulative total reaches `target`.
pub fn match_over(cumulative: &BTreeMap<String, u32>, target: u32) -> bool {
    cumulative.values().any(|&score| score >= target)
}

/// Lowest cumulative total wins the match. Players are visited in join
/// order, so ties break to the earliest joiner.
pub fn overall_winner(players: &[Player], cumulative: &BTreeMap<String, u32>) -> Option<String> {
    let mut winner: Option<(&str, u32)> = None;
    for player in players {
        let score = cumulative.get(&player.name).copied().unwrap_or(0);
        if winner.map_or(true, |(_, best)| score < best) {
            winner = Some((&player.name, score));
        }
    }
    winner.map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn penalties_use_the_fixed_lookup() {
        assert_eq!(card_penalty(&Card::numbered(Color::Red, 0)), 0);
        assert_eq!(card_penalty(&Card::numbered(Color::Blue, 9)), 9);
        assert_eq!(card_penalty(&Card::action(Color::Green, Rank::DrawTwo)), 20);
        assert_eq!(card_penalty(&Card::action(Color::Red, Rank::Reverse)), 20);
        assert_eq!(card_penalty(&Card::wild()), 50);
        assert_eq!(card_penalty(&Card::wild_draw_four()), 50);
    }

    #[test]
    fn merge_accumulates_across_rounds() {
        let mut cumulative = BTreeMap::new();
        merge_scores(&mut cumulative, &BTreeMap::from([("a".into(), 30)]));
        merge_scores(
            &mut cumulative,
            &BTreeMap::from([("a".into(), 20), ("b".into(), 5)]),
        );
        assert_eq!(cumulative["a"], 50);
        assert_eq!(cumulative["b"], 5);
    }

    #[test]
    fn ties_break_to_the_earliest_joiner() {
        let players = vec![
            Player::new("first"),
            Player::new("second"),
            Player::new("third"),
        ];
        let cumulative = BTreeMap::from([
            ("first".into(), 40),
            ("second".into(), 40),
            ("third".into(), 90),
        ]);
        assert_eq!(overall_winner(&players, &cumulative).as_deref(), Some("first"));
    }
}
