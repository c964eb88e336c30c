use crate::Card;

/// Whether `card` may be played on `top`, the active discard card.
///
/// Legal iff the colors match, the ranks match, or the card is a wild
/// variant. Wilds are always legal and impose no color choice; action
/// cards carry no gameplay effect beyond legality and scoring weight.
pub fn is_legal_play(card: &Card, top: &Card) -> bool {
    if card.is_wild() {
        return true;
    }
    card.color == top.color || card.rank == top.rank
}
