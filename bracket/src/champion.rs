use crate::{Bracket, Team};

/// Winner of the final, once it has been decided.
pub fn champion(bracket: &Bracket) -> Option<&Team> {
    bracket.final_match()?.winner.as_ref()
}

/// Loser of a decided final.
pub fn runner_up(bracket: &Bracket) -> Option<&Team> {
    bracket.final_match()?.loser()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatchId;

    #[test]
    fn undecided_final_has_no_champion() {
        let bracket = Bracket::new(vec![Team::new("a", "A"), Team::new("b", "B")]).unwrap();
        assert!(champion(&bracket).is_none());
        assert!(runner_up(&bracket).is_none());
        assert!(!bracket.is_complete());
    }

    #[test]
    fn two_team_final() {
        let mut bracket = Bracket::new(vec![Team::new("a", "A"), Team::new("b", "B")]).unwrap();
        bracket.record_result(MatchId(1), 0, 2).unwrap();
        assert_eq!(champion(&bracket).map(|t| t.id.as_str()), Some("b"));
        assert_eq!(runner_up(&bracket).map(|t| t.id.as_str()), Some("a"));
        assert!(bracket.is_complete());
    }
}
