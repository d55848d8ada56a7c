//! Winner selection
//!
//! Random spins pick uniformly from the pre-filtered list of eligible
//! indices, so the distribution stays uniform however many entries are
//! excluded and an all-excluded wheel fails fast instead of looping.

use crate::common::traits::ExclusionRule;
use crate::errors::SpinError;
use rand::Rng;

/// Indices of entries the rule leaves eligible, in list order
pub fn eligible_indices<S, R>(entries: &[S], excluded: &R) -> Vec<usize>
where
    S: AsRef<str>,
    R: ExclusionRule + ?Sized,
{
    entries
        .iter()
        .enumerate()
        .filter(|(_, label)| !excluded.is_excluded(label.as_ref()))
        .map(|(index, _)| index)
        .collect()
}

/// Resolve the winning index for one spin.
///
/// An explicit target is range-checked and returned unchanged; eligibility
/// of a forced winner is the caller's concern. `entries` is never mutated.
pub fn resolve_winner<S, R, G>(
    entries: &[S],
    excluded: &R,
    target_index: Option<usize>,
    rng: &mut G,
) -> Result<usize, SpinError>
where
    S: AsRef<str>,
    R: ExclusionRule + ?Sized,
    G: Rng + ?Sized,
{
    if entries.is_empty() {
        return Err(SpinError::EmptyEntryList);
    }

    if let Some(index) = target_index {
        if index >= entries.len() {
            return Err(SpinError::InvalidTargetIndex {
                index,
                entry_count: entries.len(),
            });
        }
        return Ok(index);
    }

    let eligible = eligible_indices(entries, excluded);
    if eligible.is_empty() {
        return Err(SpinError::AllEntriesExcluded {
            entry_count: entries.len(),
        });
    }

    Ok(eligible[rng.gen_range(0..eligible.len())])
}
