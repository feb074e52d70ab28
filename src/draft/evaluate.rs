//! Exact tournament win probability for a finished draft.

use crate::draft::error::DraftError;
use crate::draft::state::GameState;
use crate::draft::tournament::TournamentInfo;

/// Probability that P1 wins a strict majority of rounds.
///
/// Every round of `state` must have both picks. All `2^N` win/loss outcomes
/// are enumerated exactly with an explicit stack; a tied outcome (even `N`)
/// counts as a P1 loss.
pub fn win_rate(info: &TournamentInfo, state: &GameState) -> Result<f64, DraftError> {
    let per_round = round_odds(info, state)?;
    let n = per_round.len();

    let mut total = 0.0;
    // (next round, P1 wins so far, probability mass)
    let mut stack: Vec<(usize, usize, f64)> = Vec::with_capacity(n + 1);
    stack.push((0, 0, 1.0));

    while let Some((round, wins, mass)) = stack.pop() {
        if round == n {
            if wins * 2 > n {
                total += mass;
            }
            continue;
        }
        let p = per_round[round];
        stack.push((round + 1, wins, mass * (1.0 - p)));
        stack.push((round + 1, wins + 1, mass * p));
    }

    Ok(total)
}

/// Single-round P1 win probabilities, early rounds first.
fn round_odds(info: &TournamentInfo, state: &GameState) -> Result<Vec<f64>, DraftError> {
    if state.early_rounds.len() != info.early_round_count() {
        return Err(DraftError::RoundCountMismatch {
            expected: info.round_count(),
            actual: state.early_rounds.len() + 1,
        });
    }

    let pairings = state
        .early_rounds
        .iter()
        .map(|round| round.pairing)
        .chain(std::iter::once(state.decisive.pairing));

    pairings
        .enumerate()
        .map(|(i, pairing)| {
            let matchup = pairing
                .matchup()
                .ok_or(DraftError::IncompleteRound { round: i + 1 })?;
            info.matchup_value(matchup)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::faction::{Faction, Matchup};
    use crate::draft::odds::MatchupOdds;
    use crate::draft::round::{DecisiveRound, EarlyRound};
    use Faction::*;

    fn complete(early: &[(Faction, Faction)], decisive: (Faction, Faction)) -> GameState {
        let mut state =
            GameState::from_rounds(early.iter().map(|&(a, b)| EarlyRound::resolved(a, b)).collect());
        state.decisive = DecisiveRound::resolved(decisive.0, decisive.1);
        state
    }

    fn table(entries: &[(Faction, Faction, f64)]) -> MatchupOdds {
        MatchupOdds::from_entries(entries.iter().map(|&(a, b, p)| (Matchup::new(a, b), p))).unwrap()
    }

    #[test]
    fn test_even_odds_give_coin_flip() {
        let info = TournamentInfo::new(3, MatchupOdds::uniform(&Faction::ALL)).unwrap();
        let state = complete(&[(GC, KH), (KI, NG)], (OK, SL));
        assert_eq!(win_rate(&info, &state).unwrap(), 0.5);

        let info = TournamentInfo::new(5, MatchupOdds::uniform(&Faction::ALL)).unwrap();
        let state = complete(&[(GC, KH), (KI, NG), (OK, SL), (TZ, GC)], (KH, KH));
        assert_eq!(win_rate(&info, &state).unwrap(), 0.5);
    }

    #[test]
    fn test_tie_counts_against_p1() {
        let info = TournamentInfo::new(2, MatchupOdds::uniform(&Faction::ALL)).unwrap();
        let state = complete(&[(GC, KH)], (KI, NG));
        assert_eq!(win_rate(&info, &state).unwrap(), 0.25);
    }

    #[test]
    fn test_extreme_odds() {
        let odds = table(&[(GC, KH, 1.0), (KI, NG, 1.0), (OK, SL, 1.0)]);
        let info = TournamentInfo::new(3, odds).unwrap();
        assert_eq!(win_rate(&info, &complete(&[(GC, KH), (KI, NG)], (OK, SL))).unwrap(), 1.0);
        assert_eq!(win_rate(&info, &complete(&[(KH, GC), (NG, KI)], (SL, OK))).unwrap(), 0.0);
    }

    #[test]
    fn test_mixed_table() {
        let odds = table(&[(KH, SL, 0.6), (SL, KH, 0.4), (OK, SL, 0.5)]);
        let info = TournamentInfo::new(3, odds).unwrap();
        let state = complete(&[(KH, SL), (SL, KH)], (OK, SL));
        let value = win_rate(&info, &state).unwrap();
        assert!((value - 0.5).abs() < 1e-12, "got {}", value);
    }

    #[test]
    fn test_polarized_table() {
        let odds = table(&[(TZ, GC, 0.0), (KH, KH, 0.5), (SL, NG, 0.0)]);
        let info = TournamentInfo::new(3, odds).unwrap();
        let state = complete(&[(TZ, GC), (KH, KH)], (SL, NG));
        assert_eq!(win_rate(&info, &state).unwrap(), 0.0);
    }

    #[test]
    fn test_reference_table_value() {
        let info = TournamentInfo::new(3, MatchupOdds::v1_2()).unwrap();
        // NG-SL 0.7, KH-TZ 0.35, KI-OK 0.6
        let state = complete(&[(NG, SL), (KH, TZ)], (KI, OK));
        let (a, b, c) = (0.7, 0.35, 0.6);
        let expected = a * b * c + a * b * (1.0 - c) + a * (1.0 - b) * c + (1.0 - a) * b * c;
        assert!((win_rate(&info, &state).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_round_count_mismatch() {
        let info = TournamentInfo::new(4, MatchupOdds::v1_2()).unwrap();
        let state = complete(&[(GC, KH)], (KI, NG));
        assert_eq!(
            win_rate(&info, &state),
            Err(DraftError::RoundCountMismatch {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn test_incomplete_round() {
        let info = TournamentInfo::new(3, MatchupOdds::v1_2()).unwrap();
        let mut state = complete(&[(GC, KH), (KI, NG)], (OK, SL));
        state.early_rounds[1].pairing.p2 = None;
        assert_eq!(win_rate(&info, &state), Err(DraftError::IncompleteRound { round: 2 }));

        let state = GameState::from_rounds(vec![EarlyRound::resolved(GC, KH), EarlyRound::resolved(KI, NG)]);
        assert_eq!(win_rate(&info, &state), Err(DraftError::IncompleteRound { round: 3 }));
    }

    #[test]
    fn test_missing_odds() {
        let info = TournamentInfo::new(2, table(&[(GC, KH, 0.4)])).unwrap();
        let state = complete(&[(GC, KH)], (TZ, TZ));
        assert_eq!(
            win_rate(&info, &state),
            Err(DraftError::MissingOdds {
                matchup: Matchup::new(TZ, TZ)
            })
        );
    }
}
