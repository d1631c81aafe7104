use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::dom::message::MessageArea;

/// What happens to an older hide timer when a newer one is scheduled
/// for the same message area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPolicy {
    /// Every timer fires; the last one to fire decides the final state.
    #[default]
    Independent,
    /// Only the most recently scheduled timer per area hides it.
    Reschedule,
}

impl TimerPolicy {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "independent" => Some(TimerPolicy::Independent),
            "reschedule" => Some(TimerPolicy::Reschedule),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    HideMessage { area: MessageArea, generation: u64 },
}

/// A one-shot timer. Ordered by deadline, then by scheduling order.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    pub deadline_ms: u64,
    pub seq: u64,
    pub submission: u64,
    pub action: TimerAction,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.deadline_ms, self.seq).cmp(&(other.deadline_ms, other.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::dom_model::NodeId;
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    fn timer(deadline_ms: u64, seq: u64) -> Timer {
        Timer {
            deadline_ms,
            seq,
            submission: seq,
            action: TimerAction::HideMessage {
                area: MessageArea::new(NodeId(0)),
                generation: seq,
            },
        }
    }

    #[test]
    fn heap_pops_earliest_then_oldest() {
        let mut heap = BinaryHeap::new();
        heap.push(Reverse(timer(20, 0)));
        heap.push(Reverse(timer(10, 2)));
        heap.push(Reverse(timer(10, 1)));

        let order: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|Reverse(t)| t.seq)).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!(TimerPolicy::parse("Reschedule"), Some(TimerPolicy::Reschedule));
        assert_eq!(TimerPolicy::parse("independent"), Some(TimerPolicy::Independent));
        assert_eq!(TimerPolicy::parse("debounce"), None);
    }
}
