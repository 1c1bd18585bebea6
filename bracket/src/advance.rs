use crate::{Bracket, BracketError, BracketResult, MatchId, MatchLedger, Side, Team};
use log::{debug, info};

impl Bracket {
    /// Record the final score of a match and move its winner forward.
    ///
    /// The change is staged on a copy of the ledger and committed only when
    /// every step succeeds, so on `Err` the bracket is untouched.
    pub fn record_result(
        &mut self,
        match_id: MatchId,
        score_a: i32,
        score_b: i32,
    ) -> BracketResult<&Bracket> {
        let (score_a, score_b) = validate_scores(score_a, score_b)?;

        let target = self.ledger().get(match_id)?;
        if !target.is_ready() {
            return Err(BracketError::IllegalState(format!(
                "{} cannot be decided yet: {} vs {}",
                match_id,
                target.slot_a.display_name(),
                target.slot_b.display_name()
            )));
        }

        let mut staged = self.ledger().clone();
        let winner = apply_result(&mut staged, self.total_rounds(), match_id, score_a, score_b)?;
        self.replace_ledger(staged);

        info!("{match_id} recorded {score_a}-{score_b}, {} advances", winner.name);
        Ok(&*self)
    }
}

fn validate_scores(score_a: i32, score_b: i32) -> BracketResult<(u32, u32)> {
    let non_negative = |score: i32| {
        u32::try_from(score)
            .map_err(|_| BracketError::InvalidInput(format!("score {score} is negative")))
    };
    let (a, b) = (non_negative(score_a)?, non_negative(score_b)?);
    if a == b {
        return Err(BracketError::InvalidInput(format!(
            "tied score {a}-{b}: a match needs a winner"
        )));
    }
    Ok((a, b))
}

/// Write scores and winner into `match_id`, then fix up everything downstream.
fn apply_result(
    ledger: &mut MatchLedger,
    total_rounds: u32,
    match_id: MatchId,
    score_a: u32,
    score_b: u32,
) -> BracketResult<Team> {
    let m = ledger.get_mut(match_id)?;
    let previous = m.winner.take();
    m.slot_a.score = Some(score_a);
    m.slot_b.score = Some(score_b);
    let side = if score_a > score_b { Side::A } else { Side::B };
    let winner = m.slot(side).team.clone().ok_or_else(|| {
        BracketError::IllegalState(format!("{match_id} lost its team while being decided"))
    })?;
    m.winner = Some(winner.clone());
    let (round, position) = (m.round, m.position);

    if previous.is_some_and(|prev| prev.id != winner.id) {
        invalidate_downstream(ledger, total_rounds, round, position)?;
    }
    advance_winner(ledger, total_rounds, round, position, winner.clone())?;
    Ok(winner)
}

/// Clear every match on the path from `(round, position)` to the final.
///
/// Each path match loses its scores and winner, and the slot fed by the
/// previous path match goes back to the placeholder.
fn invalidate_downstream(
    ledger: &mut MatchLedger,
    total_rounds: u32,
    round: u32,
    position: u32,
) -> BracketResult<()> {
    let (mut round, mut position) = (round, position);
    while round < total_rounds {
        let fed = Side::fed_by(position);
        round += 1;
        position = position.div_ceil(2);

        let m = ledger.find_mut(round, position)?;
        if m.is_decided() || m.has_scores() {
            debug!("clearing {} (round {round}, position {position})", m.id);
        }
        m.slot_mut(fed).team = None;
        m.clear_result();
    }
    Ok(())
}

/// Place `team`, the winner of `(round, position)`, into its downstream slot.
///
/// A downstream bye match has no opponent to wait for, so it resolves on the
/// spot and the team keeps moving.
pub(crate) fn advance_winner(
    ledger: &mut MatchLedger,
    total_rounds: u32,
    round: u32,
    position: u32,
    team: Team,
) -> BracketResult<()> {
    let (mut round, mut position) = (round, position);
    while round < total_rounds {
        let fed = Side::fed_by(position);
        round += 1;
        position = position.div_ceil(2);

        let next = ledger.find_mut(round, position)?;
        next.slot_mut(fed).team = Some(team.clone());
        if !next.is_bye() {
            break;
        }
        next.winner = Some(team.clone());
        debug!("{} advances {} on a bye", next.id, team.name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn teams(ids: &[&str]) -> Vec<Team> {
        ids.iter().map(|id| Team::new(*id, id.to_uppercase())).collect()
    }

    #[test]
    fn scores_must_differ_and_be_non_negative() {
        assert_eq!(validate_scores(3, 1), Ok((3, 1)));
        assert_eq!(validate_scores(2, 2).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(validate_scores(-1, 4).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(validate_scores(4, -1).unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn winner_fills_downstream_slot_by_parity() {
        let mut bracket = Bracket::new(teams(&["a", "b", "c", "d"])).unwrap();
        bracket.record_result(MatchId(2), 0, 3).unwrap();

        let last = bracket.final_match().unwrap();
        assert!(last.slot_a.is_placeholder());
        assert_eq!(last.slot_b.team.as_ref().map(|t| t.id.as_str()), Some("d"));
    }

    #[test]
    fn undecided_match_is_illegal_state() {
        let mut bracket = Bracket::new(teams(&["a", "b", "c", "d"])).unwrap();
        let before = bracket.clone();
        let err = bracket.record_result(MatchId(3), 1, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalState);
        assert_eq!(bracket, before);
    }

    #[test]
    fn unknown_match_is_not_found() {
        let mut bracket = Bracket::new(teams(&["a", "b"])).unwrap();
        let err = bracket.record_result(MatchId(42), 1, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn bye_match_cannot_be_scored() {
        let mut bracket = Bracket::new(teams(&["a", "b", "c"])).unwrap();
        let bye = bracket.find(1, 2).unwrap().id;
        let err = bracket.record_result(bye, 1, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalState);
    }

    #[test]
    fn same_winner_rescore_keeps_downstream() {
        let mut bracket = Bracket::new(teams(&["a", "b", "c", "d"])).unwrap();
        bracket.record_result(MatchId(1), 2, 1).unwrap();
        bracket.record_result(MatchId(2), 0, 3).unwrap();
        bracket.record_result(MatchId(3), 1, 4).unwrap();

        bracket.record_result(MatchId(1), 5, 0).unwrap();
        let last = bracket.final_match().unwrap();
        assert_eq!(last.slot_a.score, Some(1));
        assert_eq!(bracket.champion().map(|t| t.id.as_str()), Some("d"));
    }

    #[test]
    fn flipped_winner_rebuilds_bye_chain() {
        // 5 teams: e reaches the final on byes, the other side is played out.
        let mut bracket = Bracket::new(teams(&["a", "b", "c", "d", "e"])).unwrap();
        assert_eq!(bracket.total_rounds(), 3);
        let last = bracket.final_match().unwrap();
        assert_eq!(last.slot_b.team.as_ref().map(|t| t.id.as_str()), Some("e"));

        let m1 = bracket.find(1, 1).unwrap().id;
        let m2 = bracket.find(1, 2).unwrap().id;
        let semi = bracket.find(2, 1).unwrap().id;
        let fin = bracket.final_match().unwrap().id;
        bracket.record_result(m1, 1, 0).unwrap();
        bracket.record_result(m2, 1, 0).unwrap();
        bracket.record_result(semi, 1, 0).unwrap();
        bracket.record_result(fin, 2, 1).unwrap();
        assert_eq!(bracket.champion().map(|t| t.id.as_str()), Some("a"));

        bracket.record_result(m1, 0, 1).unwrap();
        let semi = bracket.find(2, 1).unwrap();
        assert_eq!(semi.slot_a.team.as_ref().map(|t| t.id.as_str()), Some("b"));
        assert!(semi.winner.is_none() && semi.slot_b.score.is_none());
        let last = bracket.final_match().unwrap();
        assert!(last.slot_a.is_placeholder());
        assert_eq!(last.slot_b.team.as_ref().map(|t| t.id.as_str()), Some("e"));
        assert!(bracket.champion().is_none());
    }
}
