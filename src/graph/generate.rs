//! 随机树状图生成
//!
//! 生成一棵有根的分层树：根为 0 层，每层每个父节点的子节点数在
//! 配置区间内均匀取值。边权均匀取自 [10,100]。生成同时为每个节点
//! 分配抽象平面坐标（固定虚拟画布），供欧氏启发式使用。

use super::{Graph, NodeId};
use rand::Rng;

/// 虚拟画布尺寸，仅用于启发式坐标
const CANVAS_WIDTH: f64 = 800.0;
const CANVAS_HEIGHT: f64 = 600.0;

/// 每层分支区间配置
///
/// `levels[d]` 给出第 d 层每个父节点的子节点数区间（含端点）。
#[derive(Debug, Clone)]
pub struct BranchingConfig {
    pub levels: Vec<(u32, u32)>,
}

impl BranchingConfig {
    /// 三层树：根 + 3~4 个一层节点，每个一层节点 2~3 个子节点
    pub fn three_level() -> Self {
        Self {
            levels: vec![(3, 4), (2, 3)],
        }
    }

    /// 四层树（双向搜索使用）：2~3 / 2~3 / 1~2
    pub fn four_level() -> Self {
        Self {
            levels: vec![(2, 3), (2, 3), (1, 2)],
        }
    }

    /// 最深层的层号
    pub fn depth(&self) -> u8 {
        self.levels.len() as u8
    }
}

impl Default for BranchingConfig {
    fn default() -> Self {
        Self::three_level()
    }
}

/// 生成一棵新的随机树，对既有图无副作用（调用方丢弃旧引用）
pub fn generate(config: &BranchingConfig, rng: &mut impl Rng) -> Graph {
    let mut graph = Graph::new();
    let root = graph.add_node(0);

    let mut parents: Vec<NodeId> = vec![root];
    for (depth, &(min, max)) in config.levels.iter().enumerate() {
        let level = depth as u8 + 1;
        let mut next_parents = Vec::new();
        for parent in parents {
            let child_count = rng.gen_range(min..=max);
            for _ in 0..child_count {
                let child = graph.add_node(level);
                let weight = rng.gen_range(10..=100);
                graph.connect(parent, child, weight);
                next_parents.push(child);
            }
        }
        parents = next_parents;
    }

    assign_positions(&mut graph, config.depth());
    graph
}

/// 使用线程随机源生成默认三层树
pub fn generate_default() -> Graph {
    generate(&BranchingConfig::default(), &mut rand::thread_rng())
}

/// 为各层节点分配平面坐标：根在顶部中央，各层纵向均匀分布，
/// 子节点横向分布在父节点下方
fn assign_positions(graph: &mut Graph, depth: u8) {
    if graph.node_count() == 0 {
        return;
    }

    let top = 50.0;
    let bottom = CANVAS_HEIGHT - 80.0;
    let y_of = |level: u8| {
        if depth == 0 {
            top
        } else {
            top + (bottom - top) * level as f64 / depth as f64
        }
    };

    let root = graph.nodes[0].id;
    graph.node_mut(root).x = CANVAS_WIDTH / 2.0;
    graph.node_mut(root).y = top;

    // 第一层横跨画布 80% 宽度均匀分布
    let level1 = graph.nodes_at_level(1);
    let l1_step = CANVAS_WIDTH * 0.8 / (level1.len() as f64 + 1.0);
    for (i, id) in level1.iter().enumerate() {
        let node = graph.node_mut(*id);
        node.x = CANVAS_WIDTH * 0.1 + (i as f64 + 1.0) * l1_step;
        node.y = y_of(1);
    }

    // 更深层的节点排布在各自父节点下方
    for level in 2..=depth {
        let parents = graph.nodes_at_level(level - 1);
        if parents.is_empty() {
            continue;
        }
        let parent_width = CANVAS_WIDTH / parents.len() as f64;
        for parent in parents {
            let children: Vec<NodeId> = graph
                .neighbors(parent)
                .iter()
                .copied()
                .filter(|&c| graph.node(c).level == level)
                .collect();
            let step = parent_width / (children.len() as f64 + 1.0);
            let parent_x = graph.node(parent).x;
            for (i, child) in children.iter().enumerate() {
                let offset = (i as f64 + 1.0) * step - parent_width / 2.0;
                let node = graph.node_mut(*child);
                node.x = parent_x + offset;
                node.y = y_of(level);
            }
        }
    }
}
