//! Player selection: merit slots by XP, fair tie-break at the cutoff, lottery for the rest.

use crate::models::{
    Candidate, CandidateId, DecisionStage, SelectedCandidate, SelectionError, SelectionResult,
    SlotConfig, TraceEntry,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Validate slot counts, then run [`select_with_config`].
///
/// Negative slot counts are the only error. An empty pool gives an empty result, and
/// asking for more slots than there are candidates selects everyone.
pub fn select<R: Rng + ?Sized>(
    candidates: &[Candidate],
    merit_slots: i64,
    random_slots: i64,
    rng: &mut R,
) -> Result<SelectionResult, SelectionError> {
    let slots = SlotConfig::new(merit_slots, random_slots)?;
    Ok(select_with_config(candidates, slots, rng))
}

/// Partition `candidates` into selected and reserve.
///
/// 1. Sort by XP descending (stable) and split into bands of identical XP.
/// 2. Whole bands go into merit while they fit.
/// 3. The band straddling the cutoff is shuffled on its own; the first members fill
///    the remaining merit seats and the rest join the random pool.
/// 4. If there are random slots, the pool is shuffled and the first `random_slots` win.
///
/// The only source of randomness is `rng`, so a seeded rng replays a selection exactly.
pub fn select_with_config<R: Rng + ?Sized>(
    candidates: &[Candidate],
    slots: SlotConfig,
    rng: &mut R,
) -> SelectionResult {
    let mut ranked: Vec<&Candidate> = candidates.iter().collect();
    ranked.sort_by(|a, b| b.xp.cmp(&a.xp));

    let mut stages: HashMap<CandidateId, DecisionStage> = HashMap::with_capacity(ranked.len());
    let mut merit: Vec<&Candidate> = Vec::new();
    let mut pool: Vec<&Candidate> = Vec::new();

    for band in xp_bands(&ranked) {
        // merit never exceeds merit_slots: a band either fits or is cut to `remaining`.
        let remaining = slots.merit_slots - merit.len();
        if band.len() <= remaining {
            for c in band {
                stages.insert(c.id, DecisionStage::MeritCutoffAbove);
            }
            merit.extend_from_slice(band);
        } else if remaining > 0 {
            let mut band = band.to_vec();
            band.shuffle(rng);
            let (won, lost) = band.split_at(remaining);
            for c in won {
                stages.insert(c.id, DecisionStage::MeritTieBreakWon);
            }
            for c in lost {
                stages.insert(c.id, DecisionStage::MeritTieBreakLost);
            }
            merit.extend_from_slice(won);
            pool.extend_from_slice(lost);
        } else {
            for c in band {
                stages.insert(c.id, DecisionStage::NoneRemaining);
            }
            pool.extend_from_slice(band);
        }
    }

    let mut random: Vec<&Candidate> = Vec::new();
    if slots.random_slots > 0 {
        pool.shuffle(rng);
        let draw = slots.random_slots.min(pool.len());
        random = pool.drain(..draw).collect();
        for c in &random {
            stages.insert(c.id, DecisionStage::RandomDrawWon);
        }
        for c in &pool {
            stages.insert(c.id, DecisionStage::RandomDrawLost);
        }
    }

    // Whatever is left in the pool is reserve, called up in XP order.
    let mut reserve = pool;
    reserve.sort_by(|a, b| b.xp.cmp(&a.xp));

    let trace: Vec<TraceEntry> = ranked
        .iter()
        .zip(xp_ranks(&ranked))
        .map(|(c, xp_rank)| TraceEntry {
            candidate_id: c.id,
            name: c.name.clone(),
            xp: c.xp,
            xp_rank,
            stage: stages
                .get(&c.id)
                .copied()
                .unwrap_or(DecisionStage::NoneRemaining),
        })
        .collect();

    log::debug!(
        "Selection over {} candidate(s): {} merit (cutoff xp {:?}), {} random, {} reserve",
        candidates.len(),
        merit.len(),
        merit.last().map(|c| c.xp),
        random.len(),
        reserve.len()
    );

    let selected = merit
        .iter()
        .map(|c| SelectedCandidate {
            candidate: (*c).clone(),
            chosen_by_lottery: false,
        })
        .chain(random.iter().map(|c| SelectedCandidate {
            candidate: (*c).clone(),
            chosen_by_lottery: true,
        }))
        .collect();

    SelectionResult {
        selected,
        reserve: reserve.into_iter().cloned().collect(),
        trace,
    }
}

/// Maximal runs of identical XP in an XP-sorted list.
fn xp_bands<'a, 'c>(ranked: &'a [&'c Candidate]) -> Vec<&'a [&'c Candidate]> {
    let mut bands = Vec::new();
    let mut start = 0;
    for i in 1..=ranked.len() {
        if i == ranked.len() || ranked[i].xp != ranked[start].xp {
            bands.push(&ranked[start..i]);
            start = i;
        }
    }
    bands
}

/// Competition ranks ("1224") for an XP-sorted list.
fn xp_ranks(ranked: &[&Candidate]) -> Vec<usize> {
    let mut ranks: Vec<usize> = Vec::with_capacity(ranked.len());
    for (i, c) in ranked.iter().enumerate() {
        let rank = match i.checked_sub(1) {
            Some(prev) if ranked[prev].xp == c.xp => ranks[prev],
            _ => i + 1,
        };
        ranks.push(rank);
    }
    ranks
}
