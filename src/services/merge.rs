use std::collections::HashMap;

use crate::models::MovieRecord;

/// Merges result lists into one list with unique ids
///
/// Sources are concatenated in the order given. Each id keeps the position of
/// its first occurrence and the record of its last occurrence. Records without
/// an integer id, or whose id is `exclude`, are dropped.
pub fn merge_unique<I>(sources: I, exclude: Option<i64>) -> Vec<MovieRecord>
where
    I: IntoIterator<Item = Vec<MovieRecord>>,
{
    let mut merged: Vec<MovieRecord> = Vec::new();
    let mut positions: HashMap<i64, usize> = HashMap::new();

    for record in sources.into_iter().flatten() {
        let Some(id) = record.id() else {
            tracing::debug!("Dropping upstream record without an id");
            continue;
        };
        if Some(id) == exclude {
            continue;
        }
        match positions.get(&id) {
            Some(&index) => merged[index] = record,
            None => {
                positions.insert(id, merged.len());
                merged.push(record);
            }
        }
    }

    merged
}
