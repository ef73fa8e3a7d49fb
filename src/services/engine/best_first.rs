//! 贪婪最佳优先逐步引擎
//!
//! 只按启发值 h 排序的贪婪搜索，不累计路径代价，不保证最优。
//! h = 到目标的欧氏距离 × 随机抖动 (0.7..1.3) × 层级因子
//! （根 0.9，第一层 1.0，更深 1.1），在选定目标时对全图节点
//! 一次性重算并缓存。单目标。

use super::{EngineCore, EngineSnapshot, SearchState, SteppedEngine, StepOutcome};
use crate::core::SimResult;
use crate::graph::{BranchingConfig, Graph, NodeId};
use crate::services::frontier::{Frontier, KeyedFrontier};
use rand::rngs::StdRng;
use rand::Rng;

/// 贪婪最佳优先引擎
pub struct BestFirstEngine {
    core: EngineCore,
    frontier: KeyedFrontier,
}

fn level_factor(level: u8) -> f64 {
    match level {
        0 => 0.9,
        1 => 1.0,
        _ => 1.1,
    }
}

impl BestFirstEngine {
    pub fn new(graph: Graph) -> Self {
        Self {
            core: EngineCore::new(graph, BranchingConfig::three_level(), 1),
            frontier: KeyedFrontier::new(),
        }
    }

    pub fn with_rng(graph: Graph, rng: StdRng) -> Self {
        Self {
            core: EngineCore::with_rng(graph, BranchingConfig::three_level(), 1, rng),
            frontier: KeyedFrontier::new(),
        }
    }

    /// 对全图节点重算带抖动的启发值并缓存在节点上
    fn recompute_heuristics(&mut self) {
        let Some(&target) = self.core.targets.first() else {
            return;
        };
        let ids: Vec<NodeId> = self.core.graph.node_ids().collect();
        for id in ids {
            let jitter = 0.7 + 0.6 * self.core.rng.gen::<f64>();
            let distance = self.core.graph.euclidean(id, target);
            let node = self.core.graph.node_mut(id);
            node.h = distance * jitter * level_factor(node.level);
        }
    }

    fn start(&mut self) -> StepOutcome {
        self.recompute_heuristics();
        let origin = self.core.origin;
        let node = self.core.graph.node_mut(origin);
        node.in_frontier = true;
        let h = node.h;
        self.frontier.push(origin, h);
        self.core.state = SearchState::Running;
        self.core.message = "Search started".to_string();
        StepOutcome::Started
    }

    fn expand_neighbors(&mut self, from: NodeId) {
        let neighbors: Vec<NodeId> = self.core.graph.neighbors(from).to_vec();
        for neighbor in neighbors {
            let node = self.core.graph.node_mut(neighbor);
            if node.visited || node.in_frontier {
                continue;
            }
            node.parent = Some(from);
            node.in_frontier = true;
            let h = node.h;
            self.frontier.push(neighbor, h);
        }
    }
}

impl SteppedEngine for BestFirstEngine {
    fn name(&self) -> &'static str {
        "best_first"
    }

    fn state(&self) -> SearchState {
        self.core.state
    }

    fn step(&mut self) -> SimResult<StepOutcome> {
        match self.core.state {
            SearchState::Found | SearchState::Exhausted => return Ok(StepOutcome::Finished),
            SearchState::Idle | SearchState::Armed => {
                self.core.require_target()?;
                return Ok(self.start());
            }
            SearchState::Running => {}
        }

        let Some(current) = self.frontier.pop() else {
            return Ok(self.core.exhaust());
        };
        self.core.graph.node_mut(current).in_frontier = false;
        self.core.current = Some(current);

        if self.core.targets.contains(&current) {
            self.core.mark_visited(current);
            log::debug!("Best-First 到达目标节点 {}", current);
            return Ok(self.core.finish_target(current));
        }

        self.core.mark_visited(current);
        self.expand_neighbors(current);
        Ok(StepOutcome::Expanded(current))
    }

    /// 切换目标后启发值立即失效，重新抖动计算
    fn select_target(&mut self, id: NodeId) {
        self.core.toggle_target(id);
        let selectable = matches!(self.core.state, SearchState::Idle | SearchState::Armed);
        if selectable && !self.core.targets.is_empty() {
            self.recompute_heuristics();
        }
    }

    fn reset(&mut self, full_reset: bool) {
        self.frontier.clear();
        self.core.reset(full_reset);
    }

    fn regenerate(&mut self) {
        self.frontier.clear();
        self.core.regenerate();
    }

    fn graph(&self) -> &Graph {
        &self.core.graph
    }

    fn snapshot(&self) -> EngineSnapshot {
        self.core.snapshot(self.name(), self.frontier.snapshot())
    }
}
