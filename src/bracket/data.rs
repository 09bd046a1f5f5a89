//! Hand-written bracket tables.
//!
//! Team 1 is the home side. In every double-elimination table the first
//! championship game has the winners' bracket champion as team 1 and the
//! losers' bracket champion as team 2.

use crate::models::{loser_of, seed, winner_of, BracketMatchup, BracketType};

const WINNERS: BracketType = BracketType::Winners;
const LOSERS: BracketType = BracketType::Losers;
const CHAMPIONSHIP: BracketType = BracketType::Championship;
const CONSOLATION: BracketType = BracketType::Consolation;

pub const SINGLE_ELIM_4: [BracketMatchup; 3] = [
    BracketMatchup::new(1, 1, WINNERS, seed(1), seed(4)),
    BracketMatchup::new(1, 2, WINNERS, seed(2), seed(3)),
    BracketMatchup::new(2, 3, CHAMPIONSHIP, winner_of(1), winner_of(2)),
];

/// Seeds 1 and 2 have a first-round bye.
pub const SINGLE_ELIM_6: [BracketMatchup; 5] = [
    BracketMatchup::new(1, 1, WINNERS, seed(4), seed(5)),
    BracketMatchup::new(1, 2, WINNERS, seed(3), seed(6)),
    BracketMatchup::new(2, 3, WINNERS, seed(1), winner_of(1)),
    BracketMatchup::new(2, 4, WINNERS, seed(2), winner_of(2)),
    BracketMatchup::new(3, 5, CHAMPIONSHIP, winner_of(3), winner_of(4)),
];

pub const SINGLE_ELIM_8: [BracketMatchup; 7] = [
    BracketMatchup::new(1, 1, WINNERS, seed(1), seed(8)),
    BracketMatchup::new(1, 2, WINNERS, seed(4), seed(5)),
    BracketMatchup::new(1, 3, WINNERS, seed(2), seed(7)),
    BracketMatchup::new(1, 4, WINNERS, seed(3), seed(6)),
    BracketMatchup::new(2, 5, WINNERS, winner_of(1), winner_of(2)),
    BracketMatchup::new(2, 6, WINNERS, winner_of(3), winner_of(4)),
    BracketMatchup::new(3, 7, CHAMPIONSHIP, winner_of(5), winner_of(6)),
];

pub const CHAMPIONSHIP_CONSOLATION_4: [BracketMatchup; 4] = [
    BracketMatchup::new(1, 1, WINNERS, seed(1), seed(4)),
    BracketMatchup::new(1, 2, WINNERS, seed(2), seed(3)),
    BracketMatchup::new(2, 3, CHAMPIONSHIP, winner_of(1), winner_of(2)),
    BracketMatchup::new(2, 4, CONSOLATION, loser_of(1), loser_of(2)),
];

pub const DOUBLE_ELIM_4: [BracketMatchup; 7] = [
    BracketMatchup::new(1, 1, WINNERS, seed(1), seed(4)),
    BracketMatchup::new(1, 2, WINNERS, seed(2), seed(3)),
    BracketMatchup::new(2, 3, WINNERS, winner_of(1), winner_of(2)),
    BracketMatchup::new(2, 4, LOSERS, loser_of(1), loser_of(2)),
    BracketMatchup::new(3, 5, LOSERS, loser_of(3), winner_of(4)),
    BracketMatchup::new(4, 6, CHAMPIONSHIP, winner_of(3), winner_of(5)),
    BracketMatchup::new(5, 7, CHAMPIONSHIP, winner_of(6), loser_of(6)).if_necessary(),
];

pub const DOUBLE_ELIM_8: [BracketMatchup; 15] = [
    BracketMatchup::new(1, 1, WINNERS, seed(1), seed(8)),
    BracketMatchup::new(1, 2, WINNERS, seed(4), seed(5)),
    BracketMatchup::new(1, 3, WINNERS, seed(2), seed(7)),
    BracketMatchup::new(1, 4, WINNERS, seed(3), seed(6)),
    BracketMatchup::new(2, 5, WINNERS, winner_of(1), winner_of(2)),
    BracketMatchup::new(2, 6, WINNERS, winner_of(3), winner_of(4)),
    BracketMatchup::new(2, 7, LOSERS, loser_of(1), loser_of(2)),
    BracketMatchup::new(2, 8, LOSERS, loser_of(3), loser_of(4)),
    BracketMatchup::new(3, 9, WINNERS, winner_of(5), winner_of(6)),
    // Crossed so round-two losers avoid an immediate rematch.
    BracketMatchup::new(3, 10, LOSERS, winner_of(7), loser_of(6)),
    BracketMatchup::new(3, 11, LOSERS, winner_of(8), loser_of(5)),
    BracketMatchup::new(4, 12, LOSERS, winner_of(10), winner_of(11)),
    BracketMatchup::new(5, 13, LOSERS, winner_of(12), loser_of(9)),
    BracketMatchup::new(6, 14, CHAMPIONSHIP, winner_of(9), winner_of(13)),
    BracketMatchup::new(7, 15, CHAMPIONSHIP, winner_of(14), loser_of(14)).if_necessary(),
];

/// Seeds 1-4 have a first-round bye. The winners' bracket final loser is
/// out, which keeps the bracket at 22 games.
pub const DOUBLE_ELIM_12: [BracketMatchup; 22] = [
    BracketMatchup::new(1, 1, WINNERS, seed(5), seed(12)),
    BracketMatchup::new(1, 2, WINNERS, seed(8), seed(9)),
    BracketMatchup::new(1, 3, WINNERS, seed(6), seed(11)),
    BracketMatchup::new(1, 4, WINNERS, seed(7), seed(10)),
    BracketMatchup::new(2, 5, WINNERS, seed(1), winner_of(2)),
    BracketMatchup::new(2, 6, WINNERS, seed(4), winner_of(1)),
    BracketMatchup::new(2, 7, WINNERS, seed(2), winner_of(4)),
    BracketMatchup::new(2, 8, WINNERS, seed(3), winner_of(3)),
    BracketMatchup::new(2, 9, LOSERS, loser_of(1), loser_of(2)),
    BracketMatchup::new(2, 10, LOSERS, loser_of(3), loser_of(4)),
    BracketMatchup::new(3, 11, WINNERS, winner_of(5), winner_of(6)),
    BracketMatchup::new(3, 12, WINNERS, winner_of(7), winner_of(8)),
    BracketMatchup::new(3, 13, LOSERS, loser_of(5), winner_of(10)),
    BracketMatchup::new(3, 14, LOSERS, loser_of(6), winner_of(9)),
    BracketMatchup::new(3, 15, LOSERS, loser_of(7), loser_of(8)),
    BracketMatchup::new(4, 16, WINNERS, winner_of(11), winner_of(12)),
    BracketMatchup::new(4, 17, LOSERS, winner_of(13), loser_of(12)),
    BracketMatchup::new(4, 18, LOSERS, winner_of(14), loser_of(11)),
    BracketMatchup::new(5, 19, LOSERS, winner_of(15), winner_of(17)),
    BracketMatchup::new(6, 20, LOSERS, winner_of(19), winner_of(18)),
    BracketMatchup::new(7, 21, CHAMPIONSHIP, winner_of(16), winner_of(20)),
    BracketMatchup::new(8, 22, CHAMPIONSHIP, winner_of(21), loser_of(21)).if_necessary(),
];
