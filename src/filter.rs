//! Participant-id filtering
//!
//! Applies the run's inclusive or exclusive filter over the participant ids
//! returned by the stats endpoint. Matching is case-insensitive substring
//! containment; results are always sorted ascending so downstream task
//! ordering is stable.

use crate::FilterMode;
use tracing::debug;

/// Participant filter errors
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// The filter removed every participant; nothing to download.
    #[error(
        "No participant IDs with data available to download were found after filtering. Please double check your filter and/or participants in your study on the Chronicle website."
    )]
    NoParticipantsAfterFilter,
}

/// Apply the participant filter and sort the result.
///
/// Ids and filter entries are trimmed first; empty or whitespace-only
/// entries are dropped before matching. Exclusive mode keeps ids containing
/// none of the entries as a substring; inclusive mode keeps ids containing
/// at least one. An empty result is a fatal condition for the run.
pub fn apply(
    ids: &[String],
    mode: FilterMode,
    filter_list: &[String],
) -> Result<Vec<String>, FilterError> {
    let cleaned_ids: Vec<&str> = ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()).collect();

    let matchers: Vec<String> = filter_list
        .iter()
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .collect();

    let mut filtered: Vec<String> = cleaned_ids
        .into_iter()
        .filter(|id| {
            let id_lower = id.to_lowercase();
            let matched = matchers.iter().any(|m| id_lower.contains(m));
            match mode {
                FilterMode::Inclusive => matched,
                FilterMode::Exclusive => !matched,
            }
        })
        .map(str::to_string)
        .collect();

    filtered.sort();

    debug!(
        mode = %mode,
        before = ids.len(),
        after = filtered.len(),
        "Filtered participant ID list"
    );

    if filtered.is_empty() {
        return Err(FilterError::NoParticipantsAfterFilter);
    }

    Ok(filtered)
}
