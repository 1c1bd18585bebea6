use crate::{BracketError, BracketResult, Match, MatchId};
use log::error;
use std::collections::{BTreeMap, HashMap};

/// In-memory match store with an id index and a `(round, position)` index.
///
/// Matches live in insertion order (the builder inserts round by round), so
/// `iter()` walks the bracket from the first round to the final.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchLedger {
    matches: Vec<Match>,
    by_id: HashMap<MatchId, usize>,
    by_slot: BTreeMap<(u32, u32), usize>,
}

impl MatchLedger {
    pub(crate) fn insert(&mut self, m: Match) -> BracketResult<()> {
        if self.by_id.contains_key(&m.id) {
            return Err(BracketError::IllegalState(format!("{} inserted twice", m.id)));
        }
        if self.by_slot.contains_key(&(m.round, m.position)) {
            return Err(BracketError::IllegalState(format!(
                "round {} position {} inserted twice",
                m.round, m.position
            )));
        }
        let idx = self.matches.len();
        self.by_id.insert(m.id, idx);
        self.by_slot.insert((m.round, m.position), idx);
        self.matches.push(m);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter()
    }

    /// Highest round present, 0 when empty.
    pub fn last_round(&self) -> u32 {
        self.by_slot.keys().next_back().map(|(round, _)| *round).unwrap_or(0)
    }

    pub fn get(&self, id: MatchId) -> BracketResult<&Match> {
        self.by_id
            .get(&id)
            .map(|&idx| &self.matches[idx])
            .ok_or_else(|| BracketError::NotFound(format!("no match with id {id}")))
    }

    pub(crate) fn get_mut(&mut self, id: MatchId) -> BracketResult<&mut Match> {
        match self.by_id.get(&id) {
            Some(&idx) => Ok(&mut self.matches[idx]),
            None => Err(BracketError::NotFound(format!("no match with id {id}"))),
        }
    }

    /// Matches of one round, ordered by position. Empty for an unknown round.
    pub fn round(&self, round: u32) -> Vec<&Match> {
        self.by_slot
            .range((round, 0)..=(round, u32::MAX))
            .map(|(_, &idx)| &self.matches[idx])
            .collect()
    }

    /// Lookup by bracket coordinates. A miss means the feed arithmetic and
    /// the stored layout disagree.
    pub fn find(&self, round: u32, position: u32) -> BracketResult<&Match> {
        let idx = self.slot_index(round, position)?;
        Ok(&self.matches[idx])
    }

    pub(crate) fn find_mut(&mut self, round: u32, position: u32) -> BracketResult<&mut Match> {
        let idx = self.slot_index(round, position)?;
        Ok(&mut self.matches[idx])
    }

    fn slot_index(&self, round: u32, position: u32) -> BracketResult<usize> {
        self.by_slot.get(&(round, position)).copied().ok_or_else(|| {
            error!("ledger miss at round {round} position {position}: bracket layout is inconsistent");
            BracketError::NotFound(format!("no match at round {round} position {position}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_of(coords: &[(u32, u32)]) -> MatchLedger {
        let mut ledger = MatchLedger::default();
        for (i, &(round, position)) in coords.iter().enumerate() {
            ledger
                .insert(Match::empty(MatchId(i as u32 + 1), round, position))
                .unwrap();
        }
        ledger
    }

    #[test]
    fn round_is_sorted_by_position() {
        let ledger = ledger_of(&[(1, 2), (2, 1), (1, 1), (1, 3)]);
        let positions: Vec<u32> = ledger.round(1).iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(ledger.round(2).len(), 1);
        assert!(ledger.round(5).is_empty());
        assert_eq!(ledger.last_round(), 2);
    }

    #[test]
    fn find_and_get_hit() {
        let ledger = ledger_of(&[(1, 1), (1, 2), (2, 1)]);
        assert_eq!(ledger.find(1, 2).unwrap().id, MatchId(2));
        assert_eq!(ledger.get(MatchId(3)).unwrap().round, 2);
    }

    #[test]
    fn misses_are_not_found() {
        let ledger = ledger_of(&[(1, 1)]);
        assert!(matches!(ledger.find(3, 1), Err(BracketError::NotFound(_))));
        assert!(matches!(ledger.get(MatchId(99)), Err(BracketError::NotFound(_))));
    }

    #[test]
    fn duplicate_coordinates_rejected() {
        let mut ledger = ledger_of(&[(1, 1)]);
        let dup = Match::empty(MatchId(2), 1, 1);
        assert!(matches!(ledger.insert(dup), Err(BracketError::IllegalState(_))));
        assert_eq!(ledger.len(), 1);
    }
}
