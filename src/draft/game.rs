//! The Turin draft as a searchable game, plus the crate's entry points.

use crate::draft::error::DraftError;
use crate::draft::evaluate::win_rate;
use crate::draft::rules::successors;
use crate::draft::state::GameState;
use crate::draft::tournament::TournamentInfo;
use crate::search::{AlphaBeta, Expansion, Game, Player, RankedChoice, SearchConfig, SearchResult};

/// Turin draft rules bound to one tournament.
#[derive(Debug, Clone, Copy)]
pub struct TurinDraft<'a> {
    info: &'a TournamentInfo,
}

impl<'a> TurinDraft<'a> {
    pub fn new(info: &'a TournamentInfo) -> Self {
        Self { info }
    }

    pub fn info(&self) -> &'a TournamentInfo {
        self.info
    }
}

impl Game for TurinDraft<'_> {
    type State = GameState;
    type Error = DraftError;

    fn is_terminal(&self, state: &GameState) -> bool {
        state.is_complete(self.info)
    }

    fn to_move(&self, state: &GameState) -> Result<Player, DraftError> {
        state
            .to_move(self.info)
            .ok_or_else(|| DraftError::invalid_state("the draft is already complete"))
    }

    fn expand(&self, state: &GameState) -> Result<Expansion<GameState>, DraftError> {
        successors(self.info, state)
    }

    fn evaluate(&self, state: &GameState) -> Result<f64, DraftError> {
        win_rate(self.info, state)
    }
}

/// Optimal value of `state` for P1 and the terminal state of one optimal line.
///
/// The state is validated first. The side to move at the root follows from
/// the state itself.
pub fn search(info: &TournamentInfo, state: &GameState) -> Result<SearchResult<GameState>, DraftError> {
    search_with(info, state, SearchConfig::default())
}

/// [`search`] with explicit searcher settings.
pub fn search_with(
    info: &TournamentInfo,
    state: &GameState,
    config: SearchConfig,
) -> Result<SearchResult<GameState>, DraftError> {
    state.validate(info)?;
    AlphaBeta::new(TurinDraft::new(info), config).search(state)
}

/// Probability that P1 wins an already complete draft.
pub fn evaluate(info: &TournamentInfo, state: &GameState) -> Result<f64, DraftError> {
    win_rate(info, state)
}

/// The `top_n` best decisions for the side to move, best first.
pub fn analyze(
    info: &TournamentInfo,
    state: &GameState,
    top_n: usize,
    config: SearchConfig,
) -> Result<Vec<RankedChoice<GameState>>, DraftError> {
    state.validate(info)?;
    AlphaBeta::new(TurinDraft::new(info), config).analyze(state, top_n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::faction::{Faction, Pairing};
    use crate::draft::odds::MatchupOdds;
    use crate::draft::round::{DecisiveRound, EarlyPhase, EarlyRound};
    use crate::draft::state::Phase;
    use crate::search::{next_mover, Transition};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use Faction::*;

    fn reference(round_count: usize) -> TournamentInfo {
        TournamentInfo::new(round_count, MatchupOdds::v1_2()).unwrap()
    }

    /// Four rounds, P1 about to close round 3 and then open the decisive
    /// round as well.
    fn p1_double_turn() -> GameState {
        let mut third = EarlyRound::offered([OK, SL]);
        third.pairing = Pairing::new(None, Some(TZ));
        GameState::from_rounds(vec![
            EarlyRound::resolved(GC, KH),
            EarlyRound::resolved(KI, NG),
            third,
        ])
    }

    /// Three rounds, P2 about to close round 2, which P2 is recorded as
    /// winning, and then open the decisive round.
    fn p2_double_turn() -> GameState {
        let mut second = EarlyRound::offered([SL, TZ]).with_winner(Player::P2);
        second.pairing = Pairing::new(Some(OK), None);
        GameState::from_rounds(vec![EarlyRound::resolved(GC, KH), second])
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
    }

    #[test]
    fn test_pruned_matches_exhaustive_across_p1_double_turn() {
        let info = reference(4);
        let state = p1_double_turn();
        assert_eq!(state.to_move(&info), Some(Player::P1));

        let pruned = search(&info, &state).unwrap();
        let full = search_with(&info, &state, SearchConfig::exhaustive()).unwrap();

        assert_close(pruned.value, full.value);
        assert_eq!(full.stats.leaves_evaluated, 2 * 16 * 9 * 2);
        assert_eq!(full.stats.double_turns, 1);
        assert_eq!(pruned.stats.double_turns, 1);
        assert!(pruned.stats.leaves_evaluated <= full.stats.leaves_evaluated);
    }

    #[test]
    fn test_pruned_matches_exhaustive_across_p2_double_turn() {
        let info = reference(3);
        let state = p2_double_turn();
        assert_eq!(state.to_move(&info), Some(Player::P2));

        let pruned = search(&info, &state).unwrap();
        let full = search_with(&info, &state, SearchConfig::exhaustive()).unwrap();

        assert_close(pruned.value, full.value);
        assert_eq!(full.stats.leaves_evaluated, 2 * 50 * 12 * 2);
        assert_eq!(pruned.stats.double_turns, 1);
        // P2 opens the decisive round it earned.
        let line = &pruned.line;
        let [a, b, c] = line.decisive.prospects.unwrap();
        let p2_pool = line.remaining(&info, Player::P2);
        assert!([a, b, c].iter().all(|f| p2_pool.contains(f)));
    }

    #[test]
    fn test_search_value_matches_line() {
        let info = reference(3);
        let state = p2_double_turn();
        let result = search(&info, &state).unwrap();
        assert!(result.line.is_complete(&info));
        assert_eq!(result.line.validate(&info), Ok(()));
        assert_close(result.value, evaluate(&info, &result.line).unwrap());
        assert!((0.0..=1.0).contains(&result.value));
        assert_eq!(result.line.early_rounds[0], state.early_rounds[0]);

        let info = reference(4);
        let result = search(&info, &p1_double_turn()).unwrap();
        assert_close(result.value, evaluate(&info, &result.line).unwrap());
    }

    #[test]
    fn test_search_is_idempotent() {
        let info = reference(4);
        let state = p1_double_turn();
        let first = search(&info, &state).unwrap();
        let second = search(&info, &state).unwrap();
        assert_eq!(first.value, second.value);
        assert_eq!(first.line, second.line);
        assert_eq!(first.stats.nodes_visited(), second.stats.nodes_visited());
    }

    #[test]
    fn test_uniform_odds_search_is_even() {
        let info = TournamentInfo::new(3, MatchupOdds::uniform(&Faction::ALL)).unwrap();
        let state = GameState::from_rounds(vec![EarlyRound::resolved(GC, KH), EarlyRound::resolved(KI, NG)]);
        let result = search(&info, &state).unwrap();
        assert_eq!(result.value, 0.5);
    }

    #[test]
    fn test_recorded_winner_opens_decisive_round() {
        let info = reference(3);
        let state = GameState::from_rounds(vec![
            EarlyRound::resolved(GC, KH),
            EarlyRound::resolved(NG, SL).with_winner(Player::P2),
        ]);
        assert_eq!(state.to_move(&info), Some(Player::P2));

        let pruned = search(&info, &state).unwrap();
        let full = search_with(&info, &state, SearchConfig::exhaustive()).unwrap();
        assert_close(pruned.value, full.value);
        assert_eq!(full.stats.double_turns, 0);

        // P2 offered from its own pool and banned from P1's.
        let decisive = &pruned.line.decisive;
        let [a, b, c] = decisive.prospects.unwrap();
        assert!(![a, b, c].iter().any(|f| *f == KH || *f == SL));
        let ban = decisive.ban.unwrap();
        assert!(ban != GC && ban != NG);
        assert!(decisive.pairing.p2.is_some_and(|f| [a, b, c].contains(&f)));
    }

    #[test]
    fn test_complete_state_is_its_own_line() {
        let info = reference(2);
        let mut state = GameState::from_rounds(vec![EarlyRound::resolved(NG, SL)]);
        state.decisive = DecisiveRound::resolved(KH, TZ);
        let result = search(&info, &state).unwrap();
        assert_eq!(result.line, state);
        assert_close(result.value, evaluate(&info, &state).unwrap());
        assert_eq!(result.stats.leaves_evaluated, 1);
    }

    #[test]
    fn test_invalid_state_is_rejected_before_search() {
        let info = reference(3);
        let state = GameState::from_rounds(vec![EarlyRound::default()]);
        assert!(matches!(search(&info, &state), Err(DraftError::InvalidState { .. })));
    }

    #[test]
    fn test_search_never_replays_a_spent_faction() {
        // P1 offers GC in round 3 after already playing it in round 1.
        let info = reference(4);
        let mut third = EarlyRound::offered([GC, SL]);
        third.pairing = Pairing::new(None, Some(TZ));
        let state = GameState::from_rounds(vec![
            EarlyRound::resolved(GC, KH),
            EarlyRound::resolved(KI, NG),
            third,
        ]);
        assert!(matches!(search(&info, &state), Err(DraftError::InvalidState { .. })));
        assert!(matches!(
            analyze(&info, &state, 1, SearchConfig::default()),
            Err(DraftError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_missing_odds_abort_search() {
        let info = TournamentInfo::new(2, MatchupOdds::uniform(&[GC, KH, KI])).unwrap();
        let state = GameState::from_rounds(vec![EarlyRound::resolved(GC, KH)]);
        assert!(matches!(search(&info, &state), Err(DraftError::MissingOdds { .. })));
    }

    #[test]
    fn test_analyze_ranks_decisions_for_mover() {
        let info = reference(3);
        let state = p2_double_turn();
        let best = search(&info, &state).unwrap();

        let ranked = analyze(&info, &state, 5, SearchConfig::default()).unwrap();
        assert_eq!(ranked.len(), 2);
        // P2 minimizes: ascending values.
        assert!(ranked[0].value <= ranked[1].value);
        assert_close(ranked[0].value, best.value);
        for choice in &ranked {
            assert_close(choice.value, evaluate(&info, &choice.line).unwrap());
        }

        let top = analyze(&info, &state, 1, SearchConfig::default()).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].choice, ranked[0].choice);
    }

    #[test]
    fn test_mover_function_agrees_with_state_along_random_walks() {
        let mut rng = StdRng::seed_from_u64(42);
        for round_count in 2..=5 {
            let info = reference(round_count);
            for _ in 0..25 {
                let mut state = GameState::new();
                while let Some(current) = state.to_move(&info) {
                    // Sometimes record a winner on the round about to close.
                    if let Phase::Early {
                        round,
                        phase: EarlyPhase::Countered,
                    } = state.phase(&info)
                    {
                        if rng.gen_bool(0.5) {
                            let winner = if rng.gen_bool(0.5) { Player::P1 } else { Player::P2 };
                            state.early_rounds[round].winner = Some(winner);
                        }
                    }

                    let expansion = successors(&info, &state).unwrap();
                    let expected = next_mover(current, expansion.transition, expansion.last_winner);
                    let pick = rng.gen_range(0..expansion.children.len());
                    let child = expansion.children[pick].clone();

                    if let Some(actual) = child.to_move(&info) {
                        assert_eq!(actual, expected, "after {:?} from {:?}", expansion.transition, state);
                    }
                    if expansion.transition == Transition::IntoDecisive {
                        assert_eq!(child.decisive_opener(), expected);
                    }
                    state = child;
                }
                assert!(state.is_complete(&info));
            }
        }
    }
}
