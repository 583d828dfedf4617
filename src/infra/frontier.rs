use std::collections::HashMap;

use crate::infra::NodeId;

#[derive(Debug, Clone, Copy)]
struct Entry<P> {
    node: NodeId,
    priority: P,
    seq: u64,
}

impl<P: Ord> Entry<P> {
    // Equal priorities come out in insertion order.
    fn before(&self, other: &Self) -> bool {
        (&self.priority, self.seq) < (&other.priority, other.seq)
    }
}

/// Indexed binary min-heap over graph nodes.
///
/// Unlike `BinaryHeap` with lazy deletion, every node appears at most once and
/// its priority can be lowered in place, so `contains` and `priority` are exact.
#[derive(Debug, Clone)]
pub struct PriorityFrontier<P> {
    heap: Vec<Entry<P>>,
    slots: HashMap<NodeId, usize>,
    next_seq: u64,
}

impl<P: Ord + Copy> PriorityFrontier<P> {
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            slots: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.slots.contains_key(&node)
    }

    pub fn priority(&self, node: NodeId) -> Option<P> {
        self.slots.get(&node).map(|&slot| self.heap[slot].priority)
    }

    pub fn peek(&self) -> Option<(NodeId, P)> {
        self.heap.first().map(|e| (e.node, e.priority))
    }

    /// Add a node that is not yet queued. Returns false and leaves the frontier
    /// untouched if the node is already present.
    pub fn insert(&mut self, node: NodeId, priority: P) -> bool {
        if self.slots.contains_key(&node) {
            return false;
        }
        let slot = self.heap.len();
        self.heap.push(Entry {
            node,
            priority,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        self.slots.insert(node, slot);
        self.sift_up(slot);
        true
    }

    /// Lower the priority of a queued node. Returns false if the node is absent.
    ///
    /// Raising a priority through this call breaks the heap contract; it is
    /// caught in debug builds only.
    pub fn decrease_key(&mut self, node: NodeId, priority: P) -> bool {
        let Some(&slot) = self.slots.get(&node) else {
            return false;
        };
        debug_assert!(
            priority <= self.heap[slot].priority,
            "decrease_key called with a higher priority for {node}"
        );
        self.heap[slot].priority = priority;
        self.sift_up(slot);
        true
    }

    pub fn extract_min(&mut self) -> Option<(NodeId, P)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let min = self.heap.pop()?;
        self.slots.remove(&min.node);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((min.node, min.priority))
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.heap[slot].before(&self.heap[parent]) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.heap[left].before(&self.heap[smallest]) {
                smallest = left;
            }
            if right < len && self.heap[right].before(&self.heap[smallest]) {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].node, a);
        self.slots.insert(self.heap[b].node, b);
    }
}

impl<P: Ord + Copy> Default for PriorityFrontier<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn drain(frontier: &mut PriorityFrontier<i64>) -> Vec<(NodeId, i64)> {
        let mut out = Vec::new();
        while let Some(entry) = frontier.extract_min() {
            out.push(entry);
        }
        out
    }

    #[test]
    fn test_extract_in_priority_order() {
        let mut frontier = PriorityFrontier::new();
        frontier.insert(NodeId(1), 5);
        frontier.insert(NodeId(2), 1);
        frontier.insert(NodeId(3), 3);

        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.peek(), Some((NodeId(2), 1)));
        let order: Vec<u64> = drain(&mut frontier).iter().map(|(n, _)| n.0).collect();
        assert_eq!(order, vec![2, 3, 1]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_ties_come_out_in_insertion_order() {
        let mut frontier = PriorityFrontier::new();
        for id in [7, 3, 9, 1] {
            frontier.insert(NodeId(id), 4);
        }
        let order: Vec<u64> = drain(&mut frontier).iter().map(|(n, _)| n.0).collect();
        assert_eq!(order, vec![7, 3, 9, 1]);
    }

    #[test]
    fn test_decrease_key_moves_node_forward() {
        let mut frontier = PriorityFrontier::new();
        frontier.insert(NodeId(1), 10);
        frontier.insert(NodeId(2), 20);
        frontier.insert(NodeId(3), 30);

        assert!(frontier.decrease_key(NodeId(3), 5));
        assert_eq!(frontier.priority(NodeId(3)), Some(5));
        assert_eq!(frontier.extract_min(), Some((NodeId(3), 5)));
        assert!(!frontier.contains(NodeId(3)));
    }

    #[test]
    fn test_duplicate_insert_and_missing_decrease_are_rejected() {
        let mut frontier = PriorityFrontier::new();
        assert!(frontier.insert(NodeId(1), 10));
        assert!(!frontier.insert(NodeId(1), 1));
        assert_eq!(frontier.priority(NodeId(1)), Some(10));
        assert!(!frontier.decrease_key(NodeId(2), 1));
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_random_operations_match_sorted_reference() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let mut frontier = PriorityFrontier::new();
            let mut reference: Vec<(i64, u64)> = Vec::new();
            for id in 0..40u64 {
                let priority = rng.random_range(0..100);
                frontier.insert(NodeId(id), priority);
                reference.push((priority, id));
            }
            for _ in 0..20 {
                let id = rng.random_range(0..40u64);
                let slot = reference.iter().position(|&(_, n)| n == id).unwrap();
                let lowered = reference[slot].0 - rng.random_range(0..50);
                frontier.decrease_key(NodeId(id), lowered);
                reference[slot].0 = lowered;
            }
            reference.sort_by_key(|&(p, _)| p);

            let drained = drain(&mut frontier);
            let priorities: Vec<i64> = drained.iter().map(|&(_, p)| p).collect();
            let expected: Vec<i64> = reference.iter().map(|&(p, _)| p).collect();
            assert_eq!(priorities, expected);
        }
    }
}
