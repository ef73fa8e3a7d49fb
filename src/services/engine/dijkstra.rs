//! Dijkstra 逐步引擎
//!
//! 带权最短路径。边界为按 g 值排序的最小优先列表，松弛时允许同一
//! 节点重复入界（惰性删除）：出队时若节点已访问且记录键值大于当前
//! g 值，该条目视为过期，作一次无操作步。到达目标时不再松弛其邻居。
//! 支持最多两个同时目标。

use super::{EngineCore, EngineSnapshot, SearchState, SteppedEngine, StepOutcome};
use crate::core::SimResult;
use crate::graph::{BranchingConfig, Graph, NodeId};
use crate::services::frontier::{Frontier, KeyedFrontier};
use rand::rngs::StdRng;

/// Dijkstra 引擎
pub struct DijkstraEngine {
    core: EngineCore,
    frontier: KeyedFrontier,
}

impl DijkstraEngine {
    pub fn new(graph: Graph) -> Self {
        Self {
            core: EngineCore::new(graph, BranchingConfig::three_level(), 2),
            frontier: KeyedFrontier::new(),
        }
    }

    pub fn with_rng(graph: Graph, rng: StdRng) -> Self {
        Self {
            core: EngineCore::with_rng(graph, BranchingConfig::three_level(), 2, rng),
            frontier: KeyedFrontier::new(),
        }
    }

    fn start(&mut self) -> StepOutcome {
        let origin = self.core.origin;
        self.core.graph.node_mut(origin).g = 0.0;
        self.core.current = Some(origin);
        self.core.mark_visited(origin);
        self.frontier.push(origin, 0.0);
        self.core.state = SearchState::Running;
        self.core.message = "Search started".to_string();
        StepOutcome::Started
    }

    /// 松弛 `from` 的全部邻边；改进则重新入界，不摘除旧条目
    fn relax_neighbors(&mut self, from: NodeId) {
        let neighbors: Vec<NodeId> = self.core.graph.neighbors(from).to_vec();
        let from_g = self.core.graph.node(from).g;
        for neighbor in neighbors {
            let Some(weight) = self.core.graph.weight_between(from, neighbor) else {
                continue;
            };
            let candidate = from_g + f64::from(weight);
            let node = self.core.graph.node_mut(neighbor);
            if candidate < node.g {
                node.g = candidate;
                node.parent = Some(from);
                node.in_frontier = true;
                self.frontier.push(neighbor, candidate);
            }
        }
    }
}

impl SteppedEngine for DijkstraEngine {
    fn name(&self) -> &'static str {
        "dijkstra"
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

        let Some((key, current)) = self.frontier.pop_entry() else {
            return Ok(self.core.exhaust());
        };

        // 过期条目：该节点已沿更优路径结算
        if self.core.graph.node(current).visited && key > self.core.graph.node(current).g {
            return Ok(StepOutcome::StalePop(current));
        }

        self.core.graph.node_mut(current).in_frontier = self.frontier.contains(current);
        self.core.current = Some(current);

        if self.core.targets.contains(&current) {
            self.core.mark_visited(current);
            log::debug!("Dijkstra 到达目标节点 {}，g = {}", current, key);
            return Ok(self.core.finish_target(current));
        }

        self.core.mark_visited(current);
        self.relax_neighbors(current);
        Ok(StepOutcome::Expanded(current))
    }

    fn select_target(&mut self, id: NodeId) {
        self.core.toggle_target(id);
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
