//! 路径重建模块
//!
//! 从找到的目标节点沿 parent 反向指针回溯到无父节点的起点，
//! 产出起点到目标顺序的节点序列。双向搜索在相遇节点处拼接
//! 正向与反向两段部分路径。

use crate::graph::{Graph, NodeId};
use std::collections::HashMap;

/// 沿图节点上的 parent 指针重建路径（起点 → 目标顺序）
///
/// 仅应在引擎进入 Found 状态后调用；目标没有父链时返回只含
/// 目标自身的序列，这表明目标从未被真正到达。
pub fn reconstruct(graph: &Graph, target: NodeId) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut current = target;

    while let Some(parent) = graph.node(current).parent {
        path.push(parent);
        current = parent;
    }

    path.reverse();
    path
}

/// 沿外部父指针表重建路径（双向搜索的单侧使用）
pub fn reconstruct_with(parents: &HashMap<NodeId, NodeId>, end: NodeId) -> Vec<NodeId> {
    let mut path = vec![end];
    let mut current = end;

    while let Some(&parent) = parents.get(&current) {
        path.push(parent);
        current = parent;
    }

    path.reverse();
    path
}

/// 拼接双向搜索的两段路径：正向段（起点 → 相遇节点）接上相遇节点
/// 的反向父链（→ 目标），相遇节点恰好出现一次
pub fn stitch(
    forward_parents: &HashMap<NodeId, NodeId>,
    backward_parents: &HashMap<NodeId, NodeId>,
    meeting: NodeId,
) -> Vec<NodeId> {
    let mut path = reconstruct_with(forward_parents, meeting);

    let mut current = meeting;
    while let Some(&parent) = backward_parents.get(&current) {
        path.push(parent);
        current = parent;
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn test_reconstruct_follows_parents() {
        let mut g = Graph::new();
        let a = g.add_node(0);
        let b = g.add_node(1);
        let c = g.add_node(2);
        g.connect(a, b, 10);
        g.connect(b, c, 10);

        g.node_mut(b).parent = Some(a);
        g.node_mut(c).parent = Some(b);

        assert_eq!(reconstruct(&g, c), vec![a, b, c]);
    }

    #[test]
    fn test_reconstruct_without_chain_yields_target_only() {
        let mut g = Graph::new();
        let a = g.add_node(0);
        assert_eq!(reconstruct(&g, a), vec![a]);
    }

    #[test]
    fn test_stitch_includes_meeting_once() {
        // 1 - 2 - 3 - 4 - 5，正向到 3，反向到 3
        let mut forward = HashMap::new();
        forward.insert(2, 1);
        forward.insert(3, 2);

        let mut backward = HashMap::new();
        backward.insert(4, 5);
        backward.insert(3, 4);

        let path = stitch(&forward, &backward, 3);
        assert_eq!(path, vec![1, 2, 3, 4, 5]);
        assert_eq!(path.iter().filter(|&&n| n == 3).count(), 1);
    }
}
