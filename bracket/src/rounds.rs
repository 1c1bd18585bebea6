use crate::{BracketError, BracketResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of a round, counted back from the final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundName {
    /// Early rounds keep their number.
    Round(u32),
    QuarterFinal,
    SemiFinal,
    Final,
}

impl RoundName {
    pub fn label(&self) -> String {
        match self {
            RoundName::Round(n) => format!("Round {n}"),
            RoundName::QuarterFinal => "Quarter-Final".to_string(),
            RoundName::SemiFinal => "Semi-Final".to_string(),
            RoundName::Final => "Final".to_string(),
        }
    }

    /// Upper-case form used for column headers.
    pub fn banner(&self) -> String {
        self.label().to_uppercase()
    }

    pub fn is_final(&self) -> bool {
        matches!(self, RoundName::Final)
    }
}

impl fmt::Display for RoundName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Name `round` of a bracket with `total_rounds` rounds.
pub fn round_name(round: u32, total_rounds: u32) -> BracketResult<RoundName> {
    if round == 0 || round > total_rounds {
        return Err(BracketError::InvalidInput(format!(
            "round {round} is outside 1..={total_rounds}"
        )));
    }
    let name = match total_rounds - round {
        0 => RoundName::Final,
        1 => RoundName::SemiFinal,
        2 => RoundName::QuarterFinal,
        _ => RoundName::Round(round),
    };
    Ok(name)
}

/// `ceil(log2(team_count))`; zero for fewer than two teams.
pub fn total_rounds_for(team_count: u32) -> u32 {
    if team_count < 2 {
        return 0;
    }
    team_count.next_power_of_two().trailing_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_count_back_from_final() {
        assert_eq!(round_name(5, 5).unwrap(), RoundName::Final);
        assert_eq!(round_name(4, 5).unwrap(), RoundName::SemiFinal);
        assert_eq!(round_name(3, 5).unwrap(), RoundName::QuarterFinal);
        assert_eq!(round_name(2, 5).unwrap(), RoundName::Round(2));
        assert_eq!(round_name(1, 5).unwrap(), RoundName::Round(1));
    }

    #[test]
    fn short_brackets() {
        assert_eq!(round_name(1, 1).unwrap(), RoundName::Final);
        assert_eq!(round_name(1, 2).unwrap(), RoundName::SemiFinal);
        assert_eq!(round_name(1, 3).unwrap(), RoundName::QuarterFinal);
    }

    #[test]
    fn out_of_range_rounds_rejected() {
        assert!(matches!(round_name(0, 3), Err(BracketError::InvalidInput(_))));
        assert!(matches!(round_name(4, 3), Err(BracketError::InvalidInput(_))));
    }

    #[test]
    fn labels() {
        assert_eq!(RoundName::Round(2).label(), "Round 2");
        assert_eq!(RoundName::SemiFinal.to_string(), "Semi-Final");
        assert_eq!(RoundName::QuarterFinal.banner(), "QUARTER-FINAL");
        assert_eq!(RoundName::Round(1).banner(), "ROUND 1");
    }

    #[test]
    fn total_rounds_is_ceil_log2() {
        assert_eq!(total_rounds_for(1), 0);
        assert_eq!(total_rounds_for(2), 1);
        assert_eq!(total_rounds_for(3), 2);
        assert_eq!(total_rounds_for(4), 2);
        assert_eq!(total_rounds_for(5), 3);
        assert_eq!(total_rounds_for(8), 3);
        assert_eq!(total_rounds_for(9), 4);
        assert_eq!(total_rounds_for(64), 6);
    }
}
