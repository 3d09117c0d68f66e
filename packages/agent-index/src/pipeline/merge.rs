//! Fold freshly fetched records into the previous snapshot.

use indexmap::IndexMap;

use crate::types::AgentRecord;

/// Overlay `fetched` onto `previous`, keyed by name, and rank by karma.
///
/// Previous records that were not re-fetched are kept as they were. The
/// result holds at most one record per name.
pub fn merge_records(previous: Vec<AgentRecord>, fetched: Vec<AgentRecord>) -> Vec<AgentRecord> {
    let mut by_name: IndexMap<String, AgentRecord> =
        IndexMap::with_capacity(previous.len() + fetched.len());

    for record in previous.into_iter().chain(fetched) {
        by_name.insert(record.name.clone(), record);
    }

    let mut merged: Vec<AgentRecord> = by_name.into_values().collect();
    sort_by_karma(&mut merged);
    merged
}

/// Karma descending. Stable: equal karma keeps the incoming order.
pub fn sort_by_karma(records: &mut [AgentRecord]) {
    records.sort_by(|a, b| b.karma.cmp(&a.karma));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn names(records: &[AgentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_fetched_overwrites_previous() {
        let then = Utc::now() - Duration::hours(3);
        let now = Utc::now();
        let previous = vec![
            AgentRecord::new("a", then).with_karma(10),
            AgentRecord::new("b", then).with_karma(5),
        ];
        let fetched = vec![AgentRecord::new("b", now).with_karma(20)];

        let merged = merge_records(previous, fetched);

        assert_eq!(names(&merged), vec!["b", "a"]);
        assert_eq!(merged[0].karma, 20);
        assert_eq!(merged[0].fetched_at, now);
    }

    #[test]
    fn test_untouched_records_are_kept_verbatim() {
        let then = Utc::now() - Duration::hours(3);
        let stale = AgentRecord::new("stale", then)
            .with_karma(7)
            .with_description("unchanged");
        let previous = vec![stale.clone(), AgentRecord::new("other", then)];
        let fetched = vec![AgentRecord::new("other", Utc::now()).with_karma(1)];

        let merged = merge_records(previous, fetched);

        let kept = merged.iter().find(|r| r.name == "stale").unwrap();
        assert_eq!(kept, &stale);
        assert_eq!(
            serde_json::to_string(kept).unwrap(),
            serde_json::to_string(&stale).unwrap()
        );
    }

    #[test]
    fn test_new_names_are_added_and_unique() {
        let now = Utc::now();
        let previous = vec![AgentRecord::new("a", now).with_karma(1)];
        let fetched = vec![
            AgentRecord::new("b", now).with_karma(2),
            AgentRecord::new("a", now).with_karma(3),
            AgentRecord::new("b", now).with_karma(4),
        ];

        let merged = merge_records(previous, fetched);

        assert_eq!(merged.len(), 2);
        assert_eq!(names(&merged), vec!["b", "a"]);
        assert_eq!(merged[0].karma, 4);
    }

    #[test]
    fn test_sort_is_stable_for_equal_karma() {
        let now = Utc::now();
        let previous = vec![
            AgentRecord::new("first", now).with_karma(5),
            AgentRecord::new("high", now).with_karma(9),
            AgentRecord::new("second", now).with_karma(5),
            AgentRecord::new("third", now).with_karma(5),
        ];
        let fetched = vec![AgentRecord::new("fourth", now).with_karma(5)];

        let merged = merge_records(previous, fetched);

        assert_eq!(
            names(&merged),
            vec!["high", "first", "second", "third", "fourth"]
        );
    }

    #[test]
    fn test_refetched_record_keeps_its_slot_among_ties() {
        let now = Utc::now();
        let previous = vec![
            AgentRecord::new("a", now).with_karma(5),
            AgentRecord::new("b", now).with_karma(5),
            AgentRecord::new("c", now).with_karma(5),
        ];
        let fetched = vec![AgentRecord::new("a", now).with_karma(5)];

        let merged = merge_records(previous, fetched);

        assert_eq!(names(&merged), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge_records(Vec::new(), Vec::new()).is_empty());
    }
}
