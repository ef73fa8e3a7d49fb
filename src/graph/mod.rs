//! 图模型模块
//!
//! 包含节点、无向带权边与树状图的表示。拓扑在生成完成后不可变，
//! 搜索过程只修改节点上的瞬态字段（visited、parent、代价等）。

use serde::Serialize;

pub mod generate;

pub use generate::{generate, BranchingConfig};

/// 节点标识，由生成器按发现顺序从 1 起连续分配，整个运行期间稳定
pub type NodeId = u32;

/// 图节点
///
/// 瞬态字段（`visited` 起）属于算法状态，`reset` 恢复初始哨兵值，
/// 不影响拓扑。坐标是生成时固定的抽象平面位置，供启发式函数使用。
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub level: u8,
    pub x: f64,
    pub y: f64,
    /// 邻接表，保持连接时的插入顺序
    pub connections: Vec<NodeId>,
    pub visited: bool,
    pub in_frontier: bool,
    pub parent: Option<NodeId>,
    /// 累计代价（Dijkstra 的距离 / A* 的 g 值）
    pub g: f64,
    /// 启发式估计
    pub h: f64,
    /// 组合评分 g + h
    pub f: f64,
    /// 随机游走的访问计数
    pub visit_count: u32,
}

impl Node {
    pub fn new(id: NodeId, level: u8) -> Self {
        Self {
            id,
            level,
            x: 0.0,
            y: 0.0,
            connections: Vec::new(),
            visited: false,
            in_frontier: false,
            parent: None,
            g: f64::INFINITY,
            h: f64::INFINITY,
            f: f64::INFINITY,
            visit_count: 0,
        }
    }

    /// 清除所有算法瞬态字段，拓扑与坐标保持不变
    pub fn reset(&mut self) {
        self.visited = false;
        self.in_frontier = false;
        self.parent = None;
        self.g = f64::INFINITY;
        self.h = f64::INFINITY;
        self.f = f64::INFINITY;
        self.visit_count = 0;
    }
}

/// 无向带权边
///
/// 权重在创建时均匀取自 [10,100] 且不可变；无权算法（BFS/DFS/随机游走）
/// 按单位权重处理，直接忽略该字段。
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Edge {
    pub node1: NodeId,
    pub node2: NodeId,
    pub weight: u32,
}

/// 树状无向图
///
/// 不变量：邻接关系对称；生成不产生自环；除根外每个节点恰有一条
/// 生成期父边（树结构）。
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新建节点并返回其标识
    pub fn add_node(&mut self, level: u8) -> NodeId {
        let id = self.nodes.len() as NodeId + 1;
        self.nodes.push(Node::new(id, level));
        id
    }

    /// 连接两个节点（双向登记邻接），重复连接与自环会被忽略
    pub fn connect(&mut self, a: NodeId, b: NodeId, weight: u32) {
        if a == b || !self.contains(a) || !self.contains(b) {
            return;
        }
        if self.node(a).connections.contains(&b) {
            return;
        }
        self.node_mut(a).connections.push(b);
        self.node_mut(b).connections.push(a);
        self.edges.push(Edge {
            node1: a,
            node2: b,
            weight,
        });
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id >= 1 && (id as usize) <= self.nodes.len()
    }

    /// 按标识取节点。标识由生成器分配且连续，越界属于逻辑错误。
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[(id - 1) as usize]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[(id - 1) as usize]
    }

    /// 节点的邻接表，保持插入顺序
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).connections
    }

    /// 两节点之间的边权
    pub fn weight_between(&self, a: NodeId, b: NodeId) -> Option<u32> {
        self.edges
            .iter()
            .find(|e| (e.node1 == a && e.node2 == b) || (e.node1 == b && e.node2 == a))
            .map(|e| e.weight)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 节点标识按表序迭代
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    pub fn nodes_at_level(&self, level: u8) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.id)
            .collect()
    }

    /// 根节点标识（生成器创建的第一个节点）
    pub fn root(&self) -> Option<NodeId> {
        self.nodes.first().map(|n| n.id)
    }

    /// 两节点坐标的欧氏距离
    pub fn euclidean(&self, a: NodeId, b: NodeId) -> f64 {
        let na = self.node(a);
        let nb = self.node(b);
        let dx = na.x - nb.x;
        let dy = na.y - nb.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// 清除所有节点的算法瞬态字段，拓扑不变
    pub fn reset_transient(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }

    /// 路径总权重（相邻节点必须有边）
    pub fn path_weight(&self, path: &[NodeId]) -> Option<u64> {
        let mut total = 0u64;
        for pair in path.windows(2) {
            total += self.weight_between(pair[0], pair[1])? as u64;
        }
        Some(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph() -> Graph {
        // A(1) - B(2) - C(3)
        let mut g = Graph::new();
        let a = g.add_node(0);
        let b = g.add_node(1);
        let c = g.add_node(2);
        g.connect(a, b, 10);
        g.connect(b, c, 20);
        g
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let g = path_graph();
        assert!(g.neighbors(1).contains(&2));
        assert!(g.neighbors(2).contains(&1));
        assert!(g.neighbors(2).contains(&3));
        assert!(g.neighbors(3).contains(&2));
    }

    #[test]
    fn test_connect_ignores_self_loop_and_duplicates() {
        let mut g = path_graph();
        g.connect(1, 1, 5);
        g.connect(1, 2, 99);
        assert_eq!(g.edges.len(), 2);
        assert_eq!(g.neighbors(1).len(), 1);
    }

    #[test]
    fn test_weight_lookup_is_direction_free() {
        let g = path_graph();
        assert_eq!(g.weight_between(1, 2), Some(10));
        assert_eq!(g.weight_between(2, 1), Some(10));
        assert_eq!(g.weight_between(1, 3), None);
    }

    #[test]
    fn test_reset_clears_transient_fields_only() {
        let mut g = path_graph();
        {
            let n = g.node_mut(2);
            n.visited = true;
            n.in_frontier = true;
            n.parent = Some(1);
            n.g = 10.0;
            n.visit_count = 3;
        }
        g.reset_transient();
        let n = g.node(2);
        assert!(!n.visited);
        assert!(!n.in_frontier);
        assert_eq!(n.parent, None);
        assert!(n.g.is_infinite());
        assert_eq!(n.visit_count, 0);
        // 拓扑不变
        assert_eq!(g.neighbors(2), &[1, 3]);
    }

    #[test]
    fn test_path_weight() {
        let g = path_graph();
        assert_eq!(g.path_weight(&[1, 2, 3]), Some(30));
        assert_eq!(g.path_weight(&[1, 3]), None);
    }
}
