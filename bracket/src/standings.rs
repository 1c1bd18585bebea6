use crate::{Bracket, Team};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One team's results so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team: Team,
    /// 1-based position in the seeding order.
    pub seed: u32,
    pub wins: u32,
    pub losses: u32,
    /// Round of the team's loss.
    pub eliminated_in: Option<u32>,
    pub champion: bool,
}

impl TeamRecord {
    pub fn played(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn is_alive(&self) -> bool {
        self.eliminated_in.is_none()
    }
}

/// Win/loss table over every scored match. Byes count for nothing.
///
/// Ordered by wins (most first), then losses (fewest first), then seed.
pub fn standings(bracket: &Bracket) -> Vec<TeamRecord> {
    let champion = bracket.champion().map(|t| t.id.as_str());
    let mut records: Vec<TeamRecord> = bracket
        .teams()
        .iter()
        .zip(1u32..)
        .map(|(team, seed)| TeamRecord {
            team: team.clone(),
            seed,
            wins: 0,
            losses: 0,
            eliminated_in: None,
            champion: champion == Some(team.id.as_str()),
        })
        .collect();
    let index: HashMap<&str, usize> = bracket
        .teams()
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.as_str(), i))
        .collect();

    for m in bracket.matches().filter(|m| m.has_scores()) {
        let (Some(winner), Some(loser)) = (m.winner.as_ref(), m.loser()) else {
            continue;
        };
        if let Some(&i) = index.get(winner.id.as_str()) {
            records[i].wins += 1;
        }
        if let Some(&i) = index.get(loser.id.as_str()) {
            records[i].losses += 1;
            records[i].eliminated_in = Some(m.round);
        }
    }

    records.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(a.losses.cmp(&b.losses))
            .then(a.seed.cmp(&b.seed))
    });
    records
}
