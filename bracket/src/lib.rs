pub mod advance;
pub mod builder;
pub mod champion;
pub mod error;
pub mod ledger;
pub mod rounds;
pub mod standings;

pub use builder::{build, matches_in_round};
pub use champion::{champion, runner_up};
pub use error::{BracketError, BracketResult, ErrorKind};
pub use ledger::MatchLedger;
pub use rounds::{RoundName, round_name, total_rounds_for};
pub use standings::{TeamRecord, standings};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name of an undecided slot.
pub const PLACEHOLDER_NAME: &str = "TBD";
/// Display name of a slot that will never receive a team.
pub const BYE_NAME: &str = "BYE";

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// A bracket entrant. Identity is `id`; `name` is only for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub u32);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Which slot of a match a team occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Slot of the downstream match fed by the match at `position`:
    /// odd positions feed A, even positions feed B.
    pub fn fed_by(position: u32) -> Self {
        if position % 2 == 1 { Side::A } else { Side::B }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// None = placeholder (TBD).
    pub team: Option<Team>,
    pub score: Option<u32>,
    /// No feeder exists for this slot, so it stays empty for the bracket's life.
    pub bye: bool,
}

impl Slot {
    pub fn is_placeholder(&self) -> bool {
        self.team.is_none()
    }

    pub fn display_name(&self) -> &str {
        match &self.team {
            Some(team) => &team.name,
            None if self.bye => BYE_NAME,
            None => PLACEHOLDER_NAME,
        }
    }

    fn holds(&self, team: &Team) -> bool {
        self.team.as_ref().is_some_and(|t| t.id == team.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// 1-indexed, increasing toward the final.
    pub round: u32,
    /// 1-indexed slot within the round.
    pub position: u32,
    pub slot_a: Slot,
    pub slot_b: Slot,
    pub winner: Option<Team>,
}

impl Match {
    pub(crate) fn empty(id: MatchId, round: u32, position: u32) -> Self {
        Self {
            id,
            round,
            position,
            slot_a: Slot::default(),
            slot_b: Slot::default(),
            winner: None,
        }
    }

    pub fn slot(&self, side: Side) -> &Slot {
        match side {
            Side::A => &self.slot_a,
            Side::B => &self.slot_b,
        }
    }

    pub(crate) fn slot_mut(&mut self, side: Side) -> &mut Slot {
        match side {
            Side::A => &mut self.slot_a,
            Side::B => &mut self.slot_b,
        }
    }

    /// Both slots hold real teams, so a result can be recorded.
    pub fn is_ready(&self) -> bool {
        !self.slot_a.is_placeholder() && !self.slot_b.is_placeholder()
    }

    /// One side can never be filled; the other team advances without playing.
    pub fn is_bye(&self) -> bool {
        self.slot_a.bye || self.slot_b.bye
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    pub fn has_scores(&self) -> bool {
        self.slot_a.score.is_some() && self.slot_b.score.is_some()
    }

    pub fn winner_side(&self) -> Option<Side> {
        let winner = self.winner.as_ref()?;
        if self.slot_a.holds(winner) {
            Some(Side::A)
        } else if self.slot_b.holds(winner) {
            Some(Side::B)
        } else {
            None
        }
    }

    /// The eliminated team of a played match. Byes have no loser.
    pub fn loser(&self) -> Option<&Team> {
        match self.winner_side()? {
            Side::A => self.slot_b.team.as_ref(),
            Side::B => self.slot_a.team.as_ref(),
        }
    }

    /// `(round, position)` of the match this one feeds, None for the final.
    pub fn downstream(&self, total_rounds: u32) -> Option<(u32, u32)> {
        (self.round < total_rounds).then(|| (self.round + 1, self.position.div_ceil(2)))
    }

    /// The slot this match's winner occupies downstream.
    pub fn feeds_slot(&self) -> Side {
        Side::fed_by(self.position)
    }

    pub(crate) fn clear_result(&mut self) {
        self.slot_a.score = None;
        self.slot_b.score = None;
        self.winner = None;
    }
}

// ---------------------------------------------------------------------------
// Bracket aggregate
// ---------------------------------------------------------------------------

/// One tournament's single-elimination bracket.
///
/// Matches are only handed out as shared references; the sole mutator is
/// [`Bracket::record_result`].
#[derive(Debug, Clone, PartialEq)]
pub struct Bracket {
    teams: Vec<Team>,
    total_rounds: u32,
    ledger: MatchLedger,
}

/// Everything a view needs to draw one round column.
#[derive(Debug, Clone)]
pub struct RoundView<'a> {
    pub round: u32,
    pub name: RoundName,
    pub matches: Vec<&'a Match>,
}

impl Bracket {
    /// Build a bracket from teams in seeding order. See [`build`].
    pub fn new(teams: Vec<Team>) -> BracketResult<Self> {
        build(teams)
    }

    pub(crate) fn from_parts(teams: Vec<Team>, total_rounds: u32, ledger: MatchLedger) -> Self {
        Self {
            teams,
            total_rounds,
            ledger,
        }
    }

    pub(crate) fn replace_ledger(&mut self, ledger: MatchLedger) {
        self.ledger = ledger;
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Teams in seeding order.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn ledger(&self) -> &MatchLedger {
        &self.ledger
    }

    /// Every match, round by round, positions ascending.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.ledger.iter()
    }

    pub fn round(&self, round: u32) -> Vec<&Match> {
        self.ledger.round(round)
    }

    pub fn match_by_id(&self, id: MatchId) -> BracketResult<&Match> {
        self.ledger.get(id)
    }

    pub fn find(&self, round: u32, position: u32) -> BracketResult<&Match> {
        self.ledger.find(round, position)
    }

    pub fn final_match(&self) -> Option<&Match> {
        self.ledger.round(self.total_rounds).into_iter().next()
    }

    pub fn champion(&self) -> Option<&Team> {
        champion(self)
    }

    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }

    pub fn round_name(&self, round: u32) -> BracketResult<RoundName> {
        round_name(round, self.total_rounds)
    }

    /// All rounds with their labels, first round first.
    pub fn rounds(&self) -> Vec<RoundView<'_>> {
        (1..=self.total_rounds)
            .filter_map(|round| {
                let name = self.round_name(round).ok()?;
                Some(RoundView {
                    round,
                    name,
                    matches: self.ledger.round(round),
                })
            })
            .collect()
    }

    pub fn standings(&self) -> Vec<TeamRecord> {
        standings(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played(winner_a: bool) -> Match {
        let mut m = Match::empty(MatchId(1), 1, 3);
        m.slot_a.team = Some(Team::new("a", "Alpha"));
        m.slot_b.team = Some(Team::new("b", "Beta"));
        m.slot_a.score = Some(if winner_a { 2 } else { 0 });
        m.slot_b.score = Some(1);
        m.winner = if winner_a {
            m.slot_a.team.clone()
        } else {
            m.slot_b.team.clone()
        };
        m
    }

    #[test]
    fn side_follows_position_parity() {
        assert_eq!(Side::fed_by(1), Side::A);
        assert_eq!(Side::fed_by(2), Side::B);
        assert_eq!(Side::fed_by(7), Side::A);
    }

    #[test]
    fn downstream_is_pure_arithmetic() {
        let m = Match::empty(MatchId(3), 1, 3);
        assert_eq!(m.downstream(3), Some((2, 2)));
        assert_eq!(m.feeds_slot(), Side::A);

        let last = Match::empty(MatchId(7), 3, 1);
        assert_eq!(last.downstream(3), None);
    }

    #[test]
    fn winner_and_loser_sides() {
        let m = played(true);
        assert_eq!(m.winner_side(), Some(Side::A));
        assert_eq!(m.loser().map(|t| t.id.as_str()), Some("b"));

        let m = played(false);
        assert_eq!(m.winner_side(), Some(Side::B));
        assert_eq!(m.loser().map(|t| t.id.as_str()), Some("a"));
    }

    #[test]
    fn placeholder_names() {
        let tbd = Slot::default();
        assert_eq!(tbd.display_name(), PLACEHOLDER_NAME);

        let bye = Slot {
            bye: true,
            ..Slot::default()
        };
        assert_eq!(bye.display_name(), BYE_NAME);
        assert!(bye.is_placeholder());
    }

    #[test]
    fn match_id_display() {
        assert_eq!(MatchId(12).to_string(), "M12");
    }
}
