use crate::{session::ledger::Snapshot, utils::time::format_elapsed};

pub const EMPTY_STATS: &str = "No tasks completed yet";

/// Lines of the stats panel, longest total first.
pub fn stats_lines(snapshot: Snapshot) -> Vec<String> {
    if snapshot.is_empty() {
        return vec![EMPTY_STATS.to_owned()];
    }
    snapshot
        .sorted_by_duration()
        .into_iter()
        .map(|entry| format!("{}: {}", entry.task, format_elapsed(entry.total)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use crate::session::ledger::TaskLedger;

    use super::{stats_lines, EMPTY_STATS};

    #[test]
    fn empty_ledger() {
        assert_eq!(stats_lines(TaskLedger::new().snapshot()), [EMPTY_STATS]);
    }

    #[test]
    fn longest_task_first() {
        let ledger = TaskLedger::new();
        ledger.commit("Review", Duration::from_secs(61), Utc::now());
        ledger.commit("Write code", Duration::from_secs(3661), Utc::now());
        assert_eq!(
            stats_lines(ledger.snapshot()),
            ["Write code: 01:01:01", "Review: 00:01:01"]
        );
    }
}
