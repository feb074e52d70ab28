//! Successor generation for the Turin draft.
//!
//! Each call produces one level of the game tree. Children are fresh copies of
//! the parent with exactly one decision filled in, generated in roster order
//! so that searches over the same input always visit moves in the same order.

use rand::Rng;

use crate::draft::error::DraftError;
use crate::draft::faction::Faction;
use crate::draft::round::{DecisivePhase, EarlyPhase, EarlyRound};
use crate::draft::state::{GameState, Phase};
use crate::draft::tournament::TournamentInfo;
use crate::search::{Expansion, Player, Transition};

/// Every legal next state of `state`.
///
/// Fails on a finished draft and when a pool has fewer factions than the
/// current decision needs; an empty expansion is never returned.
pub fn successors(
    info: &TournamentInfo,
    state: &GameState,
) -> Result<Expansion<GameState>, DraftError> {
    match state.phase(info) {
        Phase::Early { round, phase } => early_successors(info, state, round, phase),
        Phase::Decisive(phase) => decisive_successors(info, state, phase),
    }
}

fn early_successors(
    info: &TournamentInfo,
    state: &GameState,
    round: usize,
    phase: EarlyPhase,
) -> Result<Expansion<GameState>, DraftError> {
    let first = GameState::first_mover(round);
    let second = first.opponent();

    match phase {
        EarlyPhase::NotStarted => {
            let pool = pool_of(info, state, first, 2)?;
            let children = combinations::<2>(&pool)
                .into_iter()
                .map(|prospects| {
                    let mut next = state.clone();
                    next.early_rounds.truncate(round);
                    next.early_rounds.push(EarlyRound::offered(prospects));
                    next
                })
                .collect();
            Ok(within_round(children))
        }
        EarlyPhase::Offered => {
            let pool = pool_of(info, state, second, 1)?;
            let children = pool
                .into_iter()
                .map(|pick| {
                    let mut next = state.clone();
                    let current = &mut next.early_rounds[round];
                    current.pairing = current.pairing.with_pick(second, pick);
                    next
                })
                .collect();
            Ok(within_round(children))
        }
        EarlyPhase::Countered => {
            let current = &state.early_rounds[round];
            let mut picks: Vec<Faction> = current.prospects.iter().flatten().copied().collect();
            picks.dedup();
            if picks.is_empty() {
                return Err(DraftError::PoolExhausted {
                    player: first,
                    needed: 1,
                    available: 0,
                });
            }
            let children = picks
                .into_iter()
                .map(|pick| {
                    let mut next = state.clone();
                    let closing = &mut next.early_rounds[round];
                    closing.pairing = closing.pairing.with_pick(first, pick);
                    next
                })
                .collect();

            let (transition, last_winner) = if round + 1 == info.early_round_count() {
                (Transition::IntoDecisive, current.winner)
            } else {
                (Transition::NextRound, None)
            };
            Ok(Expansion {
                transition,
                last_winner,
                children,
            })
        }
        EarlyPhase::Complete => Err(DraftError::invalid_state(format!(
            "round {} is complete but was not counted as resolved",
            round + 1
        ))),
    }
}

fn decisive_successors(
    info: &TournamentInfo,
    state: &GameState,
    phase: DecisivePhase,
) -> Result<Expansion<GameState>, DraftError> {
    let opener = state.decisive_opener();
    let second = opener.opponent();

    let children = match phase {
        DecisivePhase::NotStarted => {
            let own = pool_of(info, state, opener, 3)?;
            let theirs = pool_of(info, state, second, 1)?;
            let mut children = Vec::new();
            for prospects in combinations::<3>(&own) {
                for &ban in &theirs {
                    let mut next = state.clone();
                    next.decisive.prospects = Some(prospects);
                    next.decisive.ban = Some(ban);
                    children.push(next);
                }
            }
            children
        }
        DecisivePhase::Banned => {
            let Some(prospects) = state.decisive.prospects else {
                return Err(DraftError::invalid_state("decisive ban set without prospects"));
            };
            let ban = state.decisive.ban;
            let eligible: Vec<Faction> = state
                .remaining(info, second)
                .into_iter()
                .filter(|&f| Some(f) != ban)
                .collect();
            if eligible.is_empty() {
                return Err(DraftError::PoolExhausted {
                    player: second,
                    needed: 1,
                    available: 0,
                });
            }
            let mut children = Vec::new();
            for counter_ban in prospects {
                for &pick in &eligible {
                    let mut next = state.clone();
                    next.decisive.counter_ban = Some(counter_ban);
                    next.decisive.pairing = next.decisive.pairing.with_pick(second, pick);
                    children.push(next);
                }
            }
            children
        }
        DecisivePhase::CounterBanned => {
            let picks = state.decisive.eligible_prospects();
            if picks.is_empty() {
                return Err(DraftError::PoolExhausted {
                    player: opener,
                    needed: 1,
                    available: 0,
                });
            }
            picks
                .into_iter()
                .map(|pick| {
                    let mut next = state.clone();
                    next.decisive.pairing = next.decisive.pairing.with_pick(opener, pick);
                    next
                })
                .collect()
        }
        DecisivePhase::Complete => {
            return Err(DraftError::invalid_state("the draft is already complete"));
        }
    };

    Ok(within_round(children))
}

fn within_round(children: Vec<GameState>) -> Expansion<GameState> {
    Expansion {
        transition: Transition::WithinRound,
        last_winner: None,
        children,
    }
}

/// Remaining pool of `player`, which must hold at least `needed` factions.
fn pool_of(
    info: &TournamentInfo,
    state: &GameState,
    player: Player,
    needed: usize,
) -> Result<Vec<Faction>, DraftError> {
    let pool = state.remaining(info, player);
    if pool.len() < needed {
        return Err(DraftError::PoolExhausted {
            player,
            needed,
            available: pool.len(),
        });
    }
    Ok(pool)
}

/// All `K`-element subsets of `pool` in lexicographic index order.
pub(crate) fn combinations<const K: usize>(pool: &[Faction]) -> Vec<[Faction; K]> {
    let n = pool.len();
    let mut out = Vec::new();
    if K == 0 || K > n {
        return out;
    }

    let mut idx = [0usize; K];
    for (i, slot) in idx.iter_mut().enumerate() {
        *slot = i;
    }
    loop {
        out.push(idx.map(|i| pool[i]));

        // Rightmost index that can still advance.
        let mut i = K;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if idx[i] < n - K + i {
                break;
            }
        }
        idx[i] += 1;
        for j in i + 1..K {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

/// Complete `state` by choosing uniformly among legal successors at every ply.
pub fn random_playout<R: Rng + ?Sized>(
    info: &TournamentInfo,
    state: &GameState,
    rng: &mut R,
) -> Result<GameState, DraftError> {
    let mut current = state.clone();
    while !current.is_complete(info) {
        let mut children = successors(info, &current)?.children;
        if children.is_empty() {
            return Err(DraftError::invalid_state("no legal successor"));
        }
        let pick = rng.gen_range(0..children.len());
        current = children.swap_remove(pick);
    }
    Ok(current)
}
