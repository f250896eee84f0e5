//! Pure natural-key deduplication ahead of persistence.

use std::collections::HashSet;

use crate::types::{NaturalKey, Record};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub fresh: Vec<Record>,
    /// Rows already stored or repeated earlier in the same batch
    pub duplicates: usize,
}

/// Split `records` into rows not yet in `existing` and a duplicate count.
///
/// Within the batch the first occurrence of a key wins.
pub fn partition(existing: &HashSet<NaturalKey>, records: Vec<Record>) -> Partition {
    let mut seen = HashSet::new();
    let mut result = Partition::default();

    for record in records {
        let key = record.key();
        if existing.contains(&key) || !seen.insert(key) {
            result.duplicates += 1;
        } else {
            result.fresh.push(record);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repository::fixtures::{batting, date};

    #[test]
    fn test_existing_keys_removed() {
        let day = date(2023, 6, 16);
        let stored = Record::Batting(batting("JE Root", "Australia", "Birmingham", day, 118));
        let existing: HashSet<_> = [stored.key()].into_iter().collect();

        let records = vec![
            stored.clone(),
            Record::Batting(batting("Z Crawley", "Australia", "Birmingham", day, 61)),
        ];
        let partition = partition(&existing, records);

        assert_eq!(partition.duplicates, 1);
        assert_eq!(partition.fresh.len(), 1);
        assert_eq!(partition.fresh[0].key().subject, "Z Crawley");
    }

    #[test]
    fn test_first_occurrence_in_batch_wins() {
        let day = date(2023, 6, 16);
        let first = batting("JE Root", "Australia", "Birmingham", day, 118);
        let mut repeat = first.clone();
        repeat.runs = 5;

        let partition = partition(
            &HashSet::new(),
            vec![Record::Batting(first), Record::Batting(repeat)],
        );

        assert_eq!(partition.duplicates, 1);
        match &partition.fresh[..] {
            [Record::Batting(kept)] => assert_eq!(kept.runs, 118),
            other => panic!("unexpected partition: {:?}", other),
        }
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(partition(&HashSet::new(), Vec::new()), Partition::default());
    }
}
