//! DFS 逐步引擎
//!
//! 深度优先搜索：LIFO 栈边界。节点在出栈时标记访问；同一子节点
//! 可能被多个父节点压栈，出栈时发现已访问则作为无操作步跳过——
//! 这是有意的重入行为而非缺陷。邻居按邻接逆序压栈，使遍历重现
//! 邻接表的左到右顺序。支持最多两个同时目标。

use super::{EngineCore, EngineSnapshot, SearchState, SteppedEngine, StepOutcome};
use crate::core::SimResult;
use crate::graph::{BranchingConfig, Graph, NodeId};
use crate::services::frontier::{Frontier, LifoFrontier};
use rand::rngs::StdRng;

/// DFS 引擎
pub struct DfsEngine {
    core: EngineCore,
    frontier: LifoFrontier,
}

impl DfsEngine {
    pub fn new(graph: Graph) -> Self {
        Self {
            core: EngineCore::new(graph, BranchingConfig::three_level(), 2),
            frontier: LifoFrontier::new(),
        }
    }

    pub fn with_rng(graph: Graph, rng: StdRng) -> Self {
        Self {
            core: EngineCore::with_rng(graph, BranchingConfig::three_level(), 2, rng),
            frontier: LifoFrontier::new(),
        }
    }

    fn start(&mut self) -> StepOutcome {
        let origin = self.core.origin;
        self.core.graph.node_mut(origin).in_frontier = true;
        self.frontier.push(origin, 0.0);
        self.core.state = SearchState::Running;
        self.core.message = "Search started".to_string();
        StepOutcome::Started
    }

    /// 未访问邻居按逆序压栈，parent 在压栈时记录
    fn push_neighbors(&mut self, from: NodeId) {
        let mut unvisited: Vec<NodeId> = Vec::new();
        for &neighbor in self.core.graph.neighbors(from) {
            if !self.core.graph.node(neighbor).visited {
                unvisited.push(neighbor);
            }
        }
        for &neighbor in unvisited.iter() {
            self.core.graph.node_mut(neighbor).parent = Some(from);
        }
        for &neighbor in unvisited.iter().rev() {
            self.core.graph.node_mut(neighbor).in_frontier = true;
            self.frontier.push(neighbor, 0.0);
        }
    }
}

impl SteppedEngine for DfsEngine {
    fn name(&self) -> &'static str {
        "dfs"
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

        // 多个父节点可能压入了同一节点，重复出栈是无操作步
        if self.core.graph.node(current).visited {
            return Ok(StepOutcome::StalePop(current));
        }

        self.core.mark_visited(current);

        if self.core.targets.contains(&current) {
            log::debug!("DFS 到达目标节点 {}", current);
            return Ok(self.core.finish_target(current));
        }

        self.push_neighbors(current);
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
