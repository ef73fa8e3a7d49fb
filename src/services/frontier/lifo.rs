//! LIFO 边界
//!
//! DFS 使用的后进先出栈。调用方负责以邻接表逆序压栈，使出栈顺序
//! 重现原始邻接顺序的左到右遍历。

use super::Frontier;
use crate::graph::NodeId;

/// 后进先出边界
#[derive(Debug, Default, Clone)]
pub struct LifoFrontier {
    stack: Vec<NodeId>,
}

impl LifoFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for LifoFrontier {
    fn push(&mut self, id: NodeId, _key: f64) {
        self.stack.push(id);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.stack.pop()
    }

    fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    fn contains(&self, id: NodeId) -> bool {
        self.stack.contains(&id)
    }

    fn len(&self) -> usize {
        self.stack.len()
    }

    fn snapshot(&self) -> Vec<NodeId> {
        // 展示顺序 = 出栈顺序（栈顶在前）
        self.stack.iter().rev().copied().collect()
    }

    fn clear(&mut self) {
        self.stack.clear();
    }
}
