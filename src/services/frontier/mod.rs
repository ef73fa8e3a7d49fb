//! 边界（frontier）数据结构模块
//!
//! 包含可插拔的边界策略：FIFO 队列（BFS / 双向搜索的单侧）、LIFO 栈
//! （DFS）、按键值稳定排序的最小优先列表（Dijkstra / Best-First / A*）。
//! 随机游走不持久化边界，在每一步即时随机选边。

use crate::graph::NodeId;

pub mod fifo;
pub mod keyed;
pub mod lifo;

pub use fifo::FifoFrontier;
pub use keyed::KeyedFrontier;
pub use lifo::LifoFrontier;

/// 边界策略统一接口
///
/// `key` 仅对优先级边界有意义，FIFO/LIFO 实现忽略它。
/// 平键顺序：稳定（先插入者先出），由各实现保证。
pub trait Frontier {
    fn push(&mut self, id: NodeId, key: f64);

    fn pop(&mut self) -> Option<NodeId>;

    fn is_empty(&self) -> bool;

    fn contains(&self, id: NodeId) -> bool;

    fn len(&self) -> usize;

    /// 出队顺序的只读快照，供渲染协作方展示
    fn snapshot(&self) -> Vec<NodeId>;

    fn clear(&mut self);
}
