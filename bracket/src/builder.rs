use crate::advance::advance_winner;
use crate::{Bracket, BracketError, BracketResult, Match, MatchId, MatchLedger, Team, total_rounds_for};
use log::{debug, info};
use std::collections::HashSet;

/// Number of matches in `round` of a bracket for `team_count` teams:
/// `ceil(team_count / 2^round)`.
pub fn matches_in_round(team_count: u32, round: u32) -> u32 {
    if round >= u64::BITS {
        return 0;
    }
    let count = u64::from(team_count).div_ceil(1u64 << round);
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Lay out a single-elimination bracket from teams in seeding order.
///
/// Round 1 pairs teams `2p-1` and `2p` at position `p`. A slot with no team
/// (odd team count) or no feeder match (a short round above) is a bye; byes
/// resolve immediately and their winners are carried forward.
pub fn build(teams: Vec<Team>) -> BracketResult<Bracket> {
    if teams.len() < 2 {
        return Err(BracketError::InvalidInput(format!(
            "a bracket needs at least 2 teams, got {}",
            teams.len()
        )));
    }
    {
        let mut seen = HashSet::new();
        if let Some(dup) = teams.iter().find(|t| !seen.insert(t.id.as_str())) {
            return Err(BracketError::InvalidInput(format!(
                "team id '{}' appears more than once",
                dup.id
            )));
        }
    }
    let team_count = u32::try_from(teams.len())
        .map_err(|_| BracketError::InvalidInput(format!("{} teams is too many", teams.len())))?;

    let total_rounds = total_rounds_for(team_count);
    let mut ledger = MatchLedger::default();
    let mut next_id = 1;

    for round in 1..=total_rounds {
        let feeders = if round == 1 {
            0
        } else {
            matches_in_round(team_count, round - 1)
        };
        for position in 1..=matches_in_round(team_count, round) {
            let mut m = Match::empty(MatchId(next_id), round, position);
            next_id += 1;

            if round == 1 {
                let first = (2 * position - 2) as usize;
                m.slot_a.team = teams.get(first).cloned();
                m.slot_b.team = teams.get(first + 1).cloned();
                m.slot_b.bye = m.slot_b.team.is_none();
            } else {
                m.slot_b.bye = 2 * position > feeders;
            }
            ledger.insert(m)?;
        }
    }

    let byes: Vec<(MatchId, u32, Team)> = ledger
        .round(1)
        .into_iter()
        .filter(|m| m.is_bye())
        .filter_map(|m| m.slot_a.team.clone().map(|t| (m.id, m.position, t)))
        .collect();
    for (id, position, team) in byes {
        debug!("{id} is a bye for {}", team.name);
        ledger.get_mut(id)?.winner = Some(team.clone());
        advance_winner(&mut ledger, total_rounds, 1, position, team)?;
    }

    info!(
        "built bracket: {team_count} teams, {total_rounds} rounds, {} matches",
        ledger.len()
    );
    Ok(Bracket::from_parts(teams, total_rounds, ledger))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(n: usize) -> Vec<Team> {
        (1..=n)
            .map(|i| Team::new(format!("t{i}"), format!("Team {i}")))
            .collect()
    }

    #[test]
    fn test_matches_in_round() {
        assert_eq!(matches_in_round(8, 1), 4);
        assert_eq!(matches_in_round(8, 3), 1);
        assert_eq!(matches_in_round(5, 1), 3);
        assert_eq!(matches_in_round(5, 2), 2);
        assert_eq!(matches_in_round(5, 3), 1);
        assert_eq!(matches_in_round(3, 2), 1);
        assert_eq!(matches_in_round(3, 64), 0);
    }

    #[test]
    fn too_few_teams() {
        assert!(matches!(build(vec![]), Err(BracketError::InvalidInput(_))));
        assert!(matches!(build(seeded(1)), Err(BracketError::InvalidInput(_))));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let teams = vec![Team::new("x", "One"), Team::new("y", "Two"), Team::new("x", "Three")];
        let err = build(teams).unwrap_err();
        assert!(err.reason().contains("'x'"));
    }

    #[test]
    fn match_ids_are_round_major() {
        let bracket = build(seeded(8)).unwrap();
        let coords: Vec<(u32, u32, u32)> = bracket
            .matches()
            .map(|m| (m.id.0, m.round, m.position))
            .collect();
        assert_eq!(
            coords,
            vec![
                (1, 1, 1),
                (2, 1, 2),
                (3, 1, 3),
                (4, 1, 4),
                (5, 2, 1),
                (6, 2, 2),
                (7, 3, 1)
            ]
        );
    }

    #[test]
    fn seeding_is_input_order() {
        let bracket = build(seeded(4)).unwrap();
        let m2 = bracket.find(1, 2).unwrap();
        assert_eq!(m2.slot_a.display_name(), "Team 3");
        assert_eq!(m2.slot_b.display_name(), "Team 4");
        assert!(bracket.matches().all(|m| !m.is_bye() && m.winner.is_none()));
    }

    #[test]
    fn six_teams_bye_in_second_round() {
        let bracket = build(seeded(6)).unwrap();
        assert_eq!(bracket.round(1).len(), 3);
        assert_eq!(bracket.round(2).len(), 2);

        let short = bracket.find(2, 2).unwrap();
        assert!(short.slot_b.bye);
        assert!(short.slot_a.is_placeholder());
        assert!(short.winner.is_none());
        assert!(bracket.round(1).iter().all(|m| !m.is_bye()));
    }

    #[test]
    fn bye_winner_has_no_scores() {
        let bracket = build(seeded(7)).unwrap();
        let bye = bracket.find(1, 4).unwrap();
        assert!(bye.is_bye());
        assert_eq!(bye.winner.as_ref().map(|t| t.id.as_str()), Some("t7"));
        assert!(bye.slot_a.score.is_none() && bye.slot_b.score.is_none());

        let next = bracket.find(2, 2).unwrap();
        assert_eq!(next.slot_b.display_name(), "Team 7");
        assert!(next.slot_a.is_placeholder());
    }
}
