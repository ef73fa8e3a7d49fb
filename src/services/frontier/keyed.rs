//! 最小优先边界
//!
//! Dijkstra / Best-First / A* 使用的按键值排序列表。插入采用稳定
//! 插入排序：新条目放在第一个键值严格更大的条目之前，平键保持
//! 插入顺序（等键 FIFO）。允许同一节点存在多个过期条目（惰性删除），
//! 调用方在出队时按当前最优键值判断是否作废。

use super::Frontier;
use crate::graph::NodeId;

/// 按键值稳定排序的最小优先边界
#[derive(Debug, Default, Clone)]
pub struct KeyedFrontier {
    entries: Vec<(f64, NodeId)>,
}

impl KeyedFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 出队并返回记录的键值，供过期条目检测使用
    pub fn pop_entry(&mut self) -> Option<(f64, NodeId)> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// 快照连同键值（渲染协作方展示优先队列内容）
    pub fn snapshot_keyed(&self) -> Vec<(f64, NodeId)> {
        self.entries.clone()
    }
}

impl Frontier for KeyedFrontier {
    fn push(&mut self, id: NodeId, key: f64) {
        let position = self
            .entries
            .iter()
            .position(|&(k, _)| k > key)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, (key, id));
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.pop_entry().map(|(_, id)| id)
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn contains(&self, id: NodeId) -> bool {
        self.entries.iter().any(|&(_, n)| n == id)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn snapshot(&self) -> Vec<NodeId> {
        self.entries.iter().map(|&(_, id)| id).collect()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
