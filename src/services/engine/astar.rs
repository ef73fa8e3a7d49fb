//! A* 逐步引擎
//!
//! f = g + h 的带权启发式搜索。h 为节点到各目标的欧氏平面距离
//! 除以 15 后取最小值，与 10..=100 的边权同一量级且不高估，保证
//! 可采纳。松弛规则与 Dijkstra 相同：g 改进即更新父指针并以新 f
//! 重新入界（惰性删除），出队时键值大于当前 f 的条目作废。起点在
//! 启动步只入界、不标记访问。

use super::{EngineCore, EngineSnapshot, SearchState, SteppedEngine, StepOutcome};
use crate::core::SimResult;
use crate::graph::{BranchingConfig, Graph, NodeId};
use crate::services::frontier::{Frontier, KeyedFrontier};
use rand::rngs::StdRng;

/// 欧氏距离到启发值的缩放因子
const HEURISTIC_SCALE: f64 = 15.0;

/// A* 引擎
pub struct AStarEngine {
    core: EngineCore,
    frontier: KeyedFrontier,
}

impl AStarEngine {
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

    /// 多目标取各目标启发值的最小者
    fn heuristic(&self, id: NodeId) -> f64 {
        self.core
            .targets
            .iter()
            .map(|&t| self.core.graph.euclidean(id, t) / HEURISTIC_SCALE)
            .fold(f64::INFINITY, f64::min)
    }

    fn start(&mut self) -> StepOutcome {
        let origin = self.core.origin;
        let h = self.heuristic(origin);
        let node = self.core.graph.node_mut(origin);
        node.g = 0.0;
        node.h = h;
        node.f = h;
        node.in_frontier = true;
        self.frontier.push(origin, h);
        self.core.state = SearchState::Running;
        self.core.message = "Search started".to_string();
        StepOutcome::Started
    }

    /// 松弛 `from` 的全部邻边；g 改进则以新 f 重新入界，不摘除旧条目
    fn relax_neighbors(&mut self, from: NodeId) {
        let neighbors: Vec<NodeId> = self.core.graph.neighbors(from).to_vec();
        let from_g = self.core.graph.node(from).g;
        for neighbor in neighbors {
            let Some(weight) = self.core.graph.weight_between(from, neighbor) else {
                continue;
            };
            let candidate = from_g + f64::from(weight);
            if candidate >= self.core.graph.node(neighbor).g {
                continue;
            }
            let h = self.heuristic(neighbor);
            let node = self.core.graph.node_mut(neighbor);
            node.g = candidate;
            node.h = h;
            node.f = candidate + h;
            node.parent = Some(from);
            node.in_frontier = true;
            self.frontier.push(neighbor, candidate + h);
        }
    }
}

impl SteppedEngine for AStarEngine {
    fn name(&self) -> &'static str {
        "astar"
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

        // 过期条目：该节点已沿更优路径取得更小的 f
        if self.core.graph.node(current).visited && key > self.core.graph.node(current).f {
            return Ok(StepOutcome::StalePop(current));
        }

        self.core.graph.node_mut(current).in_frontier = self.frontier.contains(current);
        self.core.current = Some(current);

        if self.core.targets.contains(&current) {
            self.core.mark_visited(current);
            log::debug!(
                "A* 到达目标节点 {}，g = {}",
                current,
                self.core.graph.node(current).g
            );
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

#[cfg(test)]
mod tests {
    use super::*;

    fn place(g: &mut Graph, id: NodeId, x: f64, y: f64) {
        let node = g.node_mut(id);
        node.x = x;
        node.y = y;
    }

    /// 两条等权分支，启发值把扩展引向靠近目标的一侧
    fn forked_graph() -> Graph {
        let mut g = Graph::new();
        g.add_node(0);
        g.add_node(1);
        g.add_node(1);
        g.add_node(2);
        place(&mut g, 1, 0.0, 0.0);
        place(&mut g, 2, 100.0, 0.0);
        place(&mut g, 3, 0.0, 100.0);
        place(&mut g, 4, 200.0, 0.0);
        g.connect(1, 2, 10);
        g.connect(1, 3, 10);
        g.connect(2, 4, 10);
        g.connect(3, 4, 10);
        g
    }

    #[test]
    fn test_start_arms_origin_without_visiting_it() {
        let mut engine = AStarEngine::new(forked_graph());
        engine.select_target(4);

        let outcome = engine.step().expect("step should succeed in test");
        assert!(matches!(outcome, StepOutcome::Started));

        let snapshot = engine.snapshot();
        assert!(snapshot.visited.is_empty());
        assert_eq!(snapshot.frontier, vec![1]);
    }

    #[test]
    fn test_heuristic_skips_the_far_branch() {
        let mut engine = AStarEngine::new(forked_graph());
        engine.select_target(4);

        for _ in 0..10 {
            if engine.state().is_terminal() {
                break;
            }
            engine.step().expect("step should succeed in test");
        }

        assert_eq!(engine.state(), SearchState::Found);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.solution_paths, vec![vec![1, 2, 4]]);
        // 远离目标的节点 3 入过界但从未被扩展
        assert!(!snapshot.visited.contains(&3));
    }

    #[test]
    fn test_cheaper_route_updates_an_enqueued_neighbor() {
        // 节点同址故 h = 0，搜索退化为 Dijkstra。2 先以 g=5 入界，
        // 随后经 3 改进为 g=2：父指针必须改写，旧条目出队时作废
        let mut g = Graph::new();
        g.add_node(0);
        g.add_node(1);
        g.add_node(1);
        g.add_node(2);
        g.connect(1, 2, 5);
        g.connect(1, 3, 1);
        g.connect(3, 2, 1);
        g.connect(2, 4, 10);

        let mut engine = AStarEngine::new(g);
        engine.select_target(4);

        let mut outcomes = Vec::new();
        for _ in 0..50 {
            if engine.state().is_terminal() {
                break;
            }
            outcomes.push(engine.step().expect("step should succeed in test"));
        }

        assert!(
            outcomes.iter().any(|o| matches!(o, StepOutcome::StalePop(2))),
            "the superseded frontier entry must surface as a no-op step"
        );
        assert_eq!(engine.state(), SearchState::Found);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.solution_paths, vec![vec![1, 3, 2, 4]]);
        assert_eq!(
            engine.graph().path_weight(&snapshot.solution_paths[0]),
            Some(12)
        );
    }

    #[test]
    fn test_two_targets_use_nearest_heuristic() {
        let mut g = Graph::new();
        g.add_node(0);
        g.add_node(1);
        g.add_node(1);
        place(&mut g, 1, 0.0, 0.0);
        place(&mut g, 2, 50.0, 0.0);
        place(&mut g, 3, 0.0, 300.0);
        g.connect(1, 2, 10);
        g.connect(1, 3, 10);

        let mut engine = AStarEngine::new(g);
        engine.select_target(2);
        engine.select_target(3);

        for _ in 0..10 {
            if engine.state().is_terminal() {
                break;
            }
            engine.step().expect("step should succeed in test");
        }

        assert_eq!(engine.state(), SearchState::Found);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.solution_paths.len(), 2);
        // 近目标先被结算
        assert_eq!(snapshot.solution_paths[0], vec![1, 2]);
        assert_eq!(snapshot.message, "All paths found!");
    }
}
