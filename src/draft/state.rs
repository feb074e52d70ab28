//! Draft state: the early rounds played so far plus the decisive round.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::draft::error::DraftError;
use crate::draft::faction::Faction;
use crate::draft::round::{DecisivePhase, DecisiveRound, EarlyPhase, EarlyRound};
use crate::draft::tournament::TournamentInfo;
use crate::search::Player;

/// Where the draft as a whole stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// An early round (0-based index) is being drafted.
    Early { round: usize, phase: EarlyPhase },
    /// The decisive round is being drafted, or the draft is over.
    Decisive(DecisivePhase),
}

/// A draft snapshot.
///
/// Early rounds are append-only: every round but the last must be resolved,
/// and a round only appears once its first mover has made an offer.
/// Successors are independent copies; nothing is shared with the parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub early_rounds: Vec<EarlyRound>,
    #[serde(default)]
    pub decisive: DecisiveRound,
}

impl GameState {
    /// An empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// A draft whose early rounds are already known.
    pub fn from_rounds(early_rounds: Vec<EarlyRound>) -> Self {
        Self {
            early_rounds,
            decisive: DecisiveRound::default(),
        }
    }

    /// Side that moves first in early round `round` (0-based).
    ///
    /// P1 opens the first round and the two sides alternate from there.
    pub fn first_mover(round: usize) -> Player {
        if round % 2 == 0 {
            Player::P1
        } else {
            Player::P2
        }
    }

    /// Side that opens the decisive round: the winner of the last early round,
    /// or P1 when no winner is recorded.
    pub fn decisive_opener(&self) -> Player {
        self.early_rounds
            .last()
            .and_then(|round| round.winner)
            .unwrap_or(Player::P1)
    }

    /// Number of early rounds with both final picks made.
    pub fn resolved_early_rounds(&self) -> usize {
        self.early_rounds.iter().filter(|r| r.is_complete()).count()
    }

    /// Derive what must happen next from the shape of the data.
    pub fn phase(&self, info: &TournamentInfo) -> Phase {
        let resolved = self.resolved_early_rounds();
        if resolved < info.early_round_count() {
            let phase = match self.early_rounds.get(resolved) {
                Some(round) => round.phase(Self::first_mover(resolved)),
                None => EarlyPhase::NotStarted,
            };
            Phase::Early {
                round: resolved,
                phase,
            }
        } else {
            Phase::Decisive(self.decisive.phase())
        }
    }

    /// The side that decides at this state, or `None` once the draft is over.
    pub fn to_move(&self, info: &TournamentInfo) -> Option<Player> {
        match self.phase(info) {
            Phase::Early { round, phase } => {
                let first = Self::first_mover(round);
                match phase {
                    EarlyPhase::NotStarted | EarlyPhase::Countered => Some(first),
                    EarlyPhase::Offered => Some(first.opponent()),
                    EarlyPhase::Complete => None,
                }
            }
            Phase::Decisive(phase) => {
                let opener = self.decisive_opener();
                match phase {
                    DecisivePhase::NotStarted | DecisivePhase::CounterBanned => Some(opener),
                    DecisivePhase::Banned => Some(opener.opponent()),
                    DecisivePhase::Complete => None,
                }
            }
        }
    }

    /// Whether every round of the tournament has both final picks.
    pub fn is_complete(&self, info: &TournamentInfo) -> bool {
        self.early_rounds.len() == info.early_round_count()
            && self.early_rounds.iter().all(|r| r.is_complete())
            && self.decisive.is_complete()
    }

    /// Factions `player` has not yet used as a final pick in an early round.
    ///
    /// Prospects that were offered but not picked stay in the pool.
    pub fn remaining(&self, info: &TournamentInfo, player: Player) -> Vec<Faction> {
        info.roster()
            .iter()
            .copied()
            .filter(|&f| !self.early_rounds.iter().any(|r| r.pairing.pick(player) == Some(f)))
            .collect()
    }

    /// Check the structural invariants a searchable state must satisfy.
    pub fn validate(&self, info: &TournamentInfo) -> Result<(), DraftError> {
        let early_count = info.early_round_count();
        if self.early_rounds.len() > early_count {
            return Err(DraftError::RoundCountMismatch {
                expected: info.round_count(),
                actual: self.early_rounds.len() + 1,
            });
        }

        let last = self.early_rounds.len().saturating_sub(1);
        for (i, round) in self.early_rounds.iter().enumerate() {
            if round.is_complete() {
                continue;
            }
            if i != last {
                return Err(DraftError::invalid_state(format!(
                    "round {} is unresolved but later rounds exist",
                    i + 1
                )));
            }
            let Some(prospects) = round.prospects else {
                return Err(DraftError::invalid_state(format!(
                    "round {} is in progress without prospective picks",
                    i + 1
                )));
            };
            if prospects[0] == prospects[1] {
                return Err(DraftError::invalid_state(format!(
                    "round {} offers {} twice",
                    i + 1,
                    prospects[0]
                )));
            }
            let first = Self::first_mover(i);
            if round.pairing.pick(first).is_some() {
                return Err(DraftError::invalid_state(format!(
                    "round {}: first mover picked before the counter-pick",
                    i + 1
                )));
            }
            let own = self.pool_before(info, first, i);
            if let Some(&spent) = prospects.iter().find(|f| !own.contains(f)) {
                return Err(DraftError::invalid_state(format!(
                    "round {}: {} offers {} which is not in its pool",
                    i + 1,
                    first,
                    spent
                )));
            }
            if let Some(counter) = round.pairing.pick(first.opponent()) {
                if !self.pool_before(info, first.opponent(), i).contains(&counter) {
                    return Err(DraftError::invalid_state(format!(
                        "round {}: {} counter-picks {} which is not in its pool",
                        i + 1,
                        first.opponent(),
                        counter
                    )));
                }
            }
        }

        for player in [Player::P1, Player::P2] {
            let mut used: Vec<Faction> = Vec::new();
            for round in &self.early_rounds {
                if let Some(pick) = round.pairing.pick(player) {
                    if !info.roster().contains(&pick) {
                        return Err(DraftError::invalid_state(format!(
                            "{} picked {} which is not on the roster",
                            player, pick
                        )));
                    }
                    if used.contains(&pick) {
                        return Err(DraftError::invalid_state(format!(
                            "{} picked {} twice",
                            player, pick
                        )));
                    }
                    used.push(pick);
                }
            }
        }

        let decisive_open = self.early_rounds.len() == early_count
            && self.early_rounds.iter().all(|r| r.is_complete());
        if !decisive_open {
            if !self.decisive.is_untouched() {
                return Err(DraftError::invalid_state(
                    "decisive round started before the early rounds were resolved",
                ));
            }
            return Ok(());
        }

        self.validate_decisive(info)
    }

    /// Factions `player` had left when early round `round` (0-based) began.
    fn pool_before(&self, info: &TournamentInfo, player: Player, round: usize) -> Vec<Faction> {
        let earlier = &self.early_rounds[..round.min(self.early_rounds.len())];
        info.roster()
            .iter()
            .copied()
            .filter(|&f| !earlier.iter().any(|r| r.pairing.pick(player) == Some(f)))
            .collect()
    }

    fn validate_decisive(&self, info: &TournamentInfo) -> Result<(), DraftError> {
        let round = &self.decisive;
        let opener = self.decisive_opener();
        let second = opener.opponent();
        let own = self.remaining(info, opener);
        let theirs = self.remaining(info, second);

        for (player, pool) in [(opener, &own), (second, &theirs)] {
            if let Some(pick) = round.pairing.pick(player) {
                if !pool.contains(&pick) {
                    return Err(DraftError::invalid_state(format!(
                        "decisive: {} picks {} which is not in its pool",
                        player, pick
                    )));
                }
            }
        }
        if round.ban.is_some() && round.ban == round.pairing.pick(second) {
            return Err(DraftError::invalid_state("counter-pick uses the banned faction"));
        }
        if round.is_complete() {
            if let (Some(_), Some(pick)) = (round.prospects, round.pairing.pick(opener)) {
                if !round.eligible_prospects().contains(&pick) {
                    return Err(DraftError::invalid_state(format!(
                        "decisive: opener picks {} which is not an eligible prospect",
                        pick
                    )));
                }
            }
            return Ok(());
        }
        if round.prospects.is_some() != round.ban.is_some() {
            return Err(DraftError::invalid_state(
                "decisive prospects and ban must be chosen together",
            ));
        }
        if round.counter_ban.is_some() != round.pairing.pick(second).is_some() {
            return Err(DraftError::invalid_state(
                "decisive counter-ban and counter-pick must be chosen together",
            ));
        }
        if round.pairing.pick(opener).is_some() {
            return Err(DraftError::invalid_state(
                "decisive opener picked before the counter-pick",
            ));
        }
        if let Some([a, b, c]) = round.prospects {
            if a == b || b == c || a == c {
                return Err(DraftError::invalid_state("decisive prospects must be distinct"));
            }
            if let Some(&spent) = [a, b, c].iter().find(|f| !own.contains(f)) {
                return Err(DraftError::invalid_state(format!(
                    "decisive: {} offers {} which is not in its pool",
                    opener, spent
                )));
            }
            if let Some(ban) = round.ban {
                if !theirs.contains(&ban) {
                    return Err(DraftError::invalid_state(format!(
                        "decisive: ban {} is not in {}'s pool",
                        ban, second
                    )));
                }
            }
            if let Some(counter_ban) = round.counter_ban {
                if ![a, b, c].contains(&counter_ban) {
                    return Err(DraftError::invalid_state(format!(
                        "counter-ban {} is not one of the prospects",
                        counter_ban
                    )));
                }
            }
        } else if round.counter_ban.is_some() {
            return Err(DraftError::invalid_state("counter-ban set without prospects"));
        }
        Ok(())
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, round) in self.early_rounds.iter().enumerate() {
            writeln!(
                f,
                "Round {} ({} first): {}",
                i + 1,
                Self::first_mover(i),
                round
            )?;
        }
        write!(
            f,
            "Decisive ({} first): {}",
            self.decisive_opener(),
            self.decisive
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::faction::Pairing;
    use crate::draft::odds::MatchupOdds;
    use Faction::*;

    fn info(round_count: usize) -> TournamentInfo {
        TournamentInfo::new(round_count, MatchupOdds::v1_2()).unwrap()
    }

    #[test]
    fn test_empty_state_starts_with_p1_offer() {
        let state = GameState::new();
        let info = info(3);
        assert_eq!(
            state.phase(&info),
            Phase::Early {
                round: 0,
                phase: EarlyPhase::NotStarted
            }
        );
        assert_eq!(state.to_move(&info), Some(Player::P1));
        assert!(!state.is_complete(&info));
        assert_eq!(state.validate(&info), Ok(()));
    }

    #[test]
    fn test_movers_through_an_even_round() {
        let info = info(3);
        let mut state = GameState::from_rounds(vec![EarlyRound::resolved(NG, KI)]);
        assert_eq!(state.to_move(&info), Some(Player::P2));

        state.early_rounds.push(EarlyRound::offered([OK, KI]));
        assert_eq!(state.to_move(&info), Some(Player::P1));

        state.early_rounds[1].pairing = Pairing::new(Some(KH), None);
        assert_eq!(
            state.phase(&info),
            Phase::Early {
                round: 1,
                phase: EarlyPhase::Countered
            }
        );
        assert_eq!(state.to_move(&info), Some(Player::P2));
    }

    #[test]
    fn test_decisive_opener_is_last_winner() {
        let info = info(3);
        let mut state = GameState::from_rounds(vec![
            EarlyRound::resolved(GC, GC).with_winner(Player::P1),
            EarlyRound::resolved(KH, KI).with_winner(Player::P2),
        ]);
        assert_eq!(state.phase(&info), Phase::Decisive(DecisivePhase::NotStarted));
        assert_eq!(state.to_move(&info), Some(Player::P2));

        state.early_rounds[1].winner = None;
        assert_eq!(state.to_move(&info), Some(Player::P1));
    }

    #[test]
    fn test_remaining_ignores_prospects() {
        let info = info(3);
        let state = GameState::from_rounds(vec![
            EarlyRound::resolved(KH, SL).with_prospects([KH, SL]),
            EarlyRound::resolved(OK, TZ).with_prospects([KH, TZ]),
        ]);
        assert_eq!(state.remaining(&info, Player::P1), vec![GC, KI, NG, SL, TZ]);
        assert_eq!(state.remaining(&info, Player::P2), vec![GC, KH, KI, NG, OK]);
    }

    #[test]
    fn test_complete_requires_every_round() {
        let info = info(3);
        let mut state = GameState::from_rounds(vec![
            EarlyRound::resolved(TZ, GC),
            EarlyRound::resolved(KH, KH),
        ]);
        state.decisive = DecisiveRound::resolved(SL, NG);
        assert!(state.is_complete(&info));
        assert_eq!(state.to_move(&info), None);

        // Same rounds, longer tournament.
        assert!(!state.is_complete(&self::info(4)));
    }

    #[test]
    fn test_validate_rejects_gap_in_history() {
        let info = info(4);
        let state = GameState::from_rounds(vec![
            EarlyRound::offered([GC, KH]),
            EarlyRound::resolved(KI, KI),
        ]);
        assert!(matches!(state.validate(&info), Err(DraftError::InvalidState { .. })));
    }

    #[test]
    fn test_validate_rejects_too_many_rounds() {
        let info = info(2);
        let state = GameState::from_rounds(vec![EarlyRound::resolved(GC, GC), EarlyRound::resolved(KH, KH)]);
        assert_eq!(
            state.validate(&info),
            Err(DraftError::RoundCountMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_validate_rejects_repeated_final_pick() {
        let info = info(4);
        let state = GameState::from_rounds(vec![EarlyRound::resolved(GC, KH), EarlyRound::resolved(GC, KI)]);
        assert!(matches!(state.validate(&info), Err(DraftError::InvalidState { .. })));
    }

    #[test]
    fn test_validate_rejects_early_decisive_moves() {
        let info = info(3);
        let mut state = GameState::from_rounds(vec![EarlyRound::resolved(GC, KH)]);
        state.decisive.ban = Some(NG);
        assert!(matches!(state.validate(&info), Err(DraftError::InvalidState { .. })));
    }

    #[test]
    fn test_validate_decisive_counter_ban_must_be_prospect() {
        let info = info(2);
        let mut state = GameState::from_rounds(vec![EarlyRound::resolved(GC, KH)]);
        state.decisive = DecisiveRound {
            prospects: Some([KI, NG, OK]),
            ban: Some(SL),
            counter_ban: Some(TZ),
            pairing: Pairing::new(None, Some(GC)),
        };
        assert!(matches!(state.validate(&info), Err(DraftError::InvalidState { .. })));

        state.decisive.counter_ban = Some(NG);
        assert_eq!(state.validate(&info), Ok(()));
    }

    fn two_rounds_played() -> GameState {
        GameState::from_rounds(vec![EarlyRound::resolved(GC, KH), EarlyRound::resolved(KI, NG)])
    }

    fn assert_invalid(state: &GameState, info: &TournamentInfo) {
        assert!(
            matches!(state.validate(info), Err(DraftError::InvalidState { .. })),
            "accepted {:?}",
            state
        );
    }

    #[test]
    fn test_validate_rejects_offer_of_spent_faction() {
        let info = info(4);
        let mut state = two_rounds_played();
        let mut third = EarlyRound::offered([GC, SL]);
        third.pairing = Pairing::new(None, Some(TZ));
        state.early_rounds.push(third);
        assert_invalid(&state, &info);

        state.early_rounds[2].prospects = Some([OK, SL]);
        assert_eq!(state.validate(&info), Ok(()));
    }

    #[test]
    fn test_validate_rejects_counter_pick_of_spent_faction() {
        let info = info(4);
        let mut state = two_rounds_played();
        let mut third = EarlyRound::offered([OK, SL]);
        third.pairing = Pairing::new(None, Some(KH));
        state.early_rounds.push(third);
        assert_invalid(&state, &info);
    }

    #[test]
    fn test_validate_decisive_moves_come_from_pools() {
        // P1 opens; P1 has spent GC and KI, P2 has spent KH and NG.
        let info = info(3);
        let mut state = two_rounds_played();
        state.decisive = DecisiveRound {
            prospects: Some([KH, OK, SL]),
            ban: Some(TZ),
            counter_ban: Some(OK),
            pairing: Pairing::new(None, Some(GC)),
        };
        assert_eq!(state.validate(&info), Ok(()));

        let mut spent_prospect = state.clone();
        spent_prospect.decisive.prospects = Some([GC, OK, SL]);
        spent_prospect.decisive.counter_ban = Some(OK);
        assert_invalid(&spent_prospect, &info);

        let mut spent_ban = state.clone();
        spent_ban.decisive.ban = Some(KH);
        assert_invalid(&spent_ban, &info);

        let mut spent_counter = state.clone();
        spent_counter.decisive.pairing = Pairing::new(None, Some(NG));
        assert_invalid(&spent_counter, &info);

        let mut banned_counter = state.clone();
        banned_counter.decisive.pairing = Pairing::new(None, Some(TZ));
        assert_invalid(&banned_counter, &info);
        banned_counter.decisive.pairing = Pairing::new(Some(KH), Some(TZ));
        assert_invalid(&banned_counter, &info);
    }

    #[test]
    fn test_validate_rejects_reused_decisive_pick() {
        let info = info(3);
        let mut state = two_rounds_played();
        state.decisive = DecisiveRound::resolved(GC, SL);
        assert_invalid(&state, &info);

        state.decisive = DecisiveRound::resolved(SL, GC);
        assert_eq!(state.validate(&info), Ok(()));
    }

    #[test]
    fn test_display_lists_rounds() {
        let mut state = GameState::from_rounds(vec![EarlyRound::resolved(TZ, GC).with_winner(Player::P2)]);
        state.decisive = DecisiveRound::resolved(SL, NG);
        assert_eq!(
            state.to_string(),
            "Round 1 (P1 first): TZ-GC (won by P2)\nDecisive (P2 first): -> SL-NG"
        );
    }

    #[test]
    fn test_state_json() {
        let json = r#"{
            "early_rounds": [
                {"prospects": ["NG", "TZ"], "pairing": {"p1": "NG", "p2": "KI"}, "winner": "P1"}
            ]
        }"#;
        let state: GameState = serde_json::from_str(json).unwrap();
        assert_eq!(state.early_rounds.len(), 1);
        assert_eq!(state.decisive_opener(), Player::P1);
        assert!(state.decisive.is_untouched());
    }
}
