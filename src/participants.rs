use crate::types::{PairingRecord, ParticipantId};
use std::collections::HashSet;

/// Distinct participant ids in order of first appearance; seats without an id are skipped.
pub fn collect_participants<'a, I>(pairings: I) -> Vec<ParticipantId>
where
    I: IntoIterator<Item = &'a PairingRecord>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for id in pairings.into_iter().filter_map(|p| p.participant_id.as_ref()) {
        if seen.insert(id) {
            out.push(id.clone());
        }
    }
    out
}
