//! FIFO 边界
//!
//! BFS 与双向搜索单侧使用的先进先出队列，平局按插入顺序（稳定）。

use super::Frontier;
use crate::graph::NodeId;
use std::collections::VecDeque;

/// 先进先出边界
#[derive(Debug, Default, Clone)]
pub struct FifoFrontier {
    queue: VecDeque<NodeId>,
}

impl FifoFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for FifoFrontier {
    fn push(&mut self, id: NodeId, _key: f64) {
        self.queue.push_back(id);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.queue.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn contains(&self, id: NodeId) -> bool {
        self.queue.contains(&id)
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn snapshot(&self) -> Vec<NodeId> {
        self.queue.iter().copied().collect()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }
}
