//! BFS 逐步引擎
//!
//! 广度优先搜索：FIFO 边界，无权图上首先出队的目标即最短
//! （边数最少）路径。访问标记的不对称性需精确保持：起点在
//! 入界时标记，其余节点在出队时标记——邻居只有既未访问又不在
//! 边界中才会入界，避免重复条目。支持最多两个同时目标。

use super::{EngineCore, EngineSnapshot, SearchState, SteppedEngine, StepOutcome};
use crate::core::SimResult;
use crate::graph::{BranchingConfig, Graph, NodeId};
use crate::services::frontier::{FifoFrontier, Frontier};
use rand::rngs::StdRng;

/// BFS 引擎
pub struct BfsEngine {
    core: EngineCore,
    frontier: FifoFrontier,
}

impl BfsEngine {
    pub fn new(graph: Graph) -> Self {
        Self {
            core: EngineCore::new(graph, BranchingConfig::three_level(), 2),
            frontier: FifoFrontier::new(),
        }
    }

    pub fn with_rng(graph: Graph, rng: StdRng) -> Self {
        Self {
            core: EngineCore::with_rng(graph, BranchingConfig::three_level(), 2, rng),
            frontier: FifoFrontier::new(),
        }
    }

    fn start(&mut self) -> StepOutcome {
        let origin = self.core.origin;
        self.core.current = Some(origin);
        // 起点在入界时刻标记访问
        self.core.mark_visited(origin);
        self.enqueue_neighbors(origin);
        self.core.state = SearchState::Running;
        self.core.message = "Search started".to_string();
        StepOutcome::Started
    }

    fn enqueue_neighbors(&mut self, from: NodeId) {
        let neighbors: Vec<NodeId> = self.core.graph.neighbors(from).to_vec();
        for neighbor in neighbors {
            let node = self.core.graph.node(neighbor);
            if !node.visited && !node.in_frontier {
                let node = self.core.graph.node_mut(neighbor);
                node.in_frontier = true;
                node.parent = Some(from);
                self.frontier.push(neighbor, 0.0);
            }
        }
    }
}

impl SteppedEngine for BfsEngine {
    fn name(&self) -> &'static str {
        "bfs"
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
            log::debug!("BFS 到达目标节点 {}", current);
            return Ok(self.core.finish_target(current));
        }

        self.core.mark_visited(current);
        self.enqueue_neighbors(current);
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
