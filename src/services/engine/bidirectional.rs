//! 双向 BFS 逐步引擎
//!
//! 从起点与目标各自发起一条 BFS 波前，逐步交替推进。两侧的
//! 访问集、队列成员与父指针都保存在波前自身，互不污染；图节点
//! 上的标记只为快照服务。每走一步后按节点表顺序扫描相遇节点，
//! 找到后把正向父链与反向父链在相遇节点处拼成完整路径。任一侧
//! 波前先枯竭即判定无路。随机图使用四层分支结构，单目标。

use super::{EngineCore, EngineSnapshot, SearchState, SteppedEngine, StepOutcome};
use crate::core::SimResult;
use crate::graph::{BranchingConfig, Graph, NodeId};
use crate::services::frontier::{FifoFrontier, Frontier};
use crate::services::path;
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};

/// 单侧波前：队列与访问记录都是波前私有的
#[derive(Debug, Default)]
struct Wavefront {
    queue: FifoFrontier,
    visited: HashSet<NodeId>,
    parents: HashMap<NodeId, NodeId>,
}

impl Wavefront {
    fn arm(&mut self, root: NodeId) {
        self.queue.push(root, 0.0);
    }

    /// 出队一个节点，访问之，把本侧未见过的邻居入队
    fn advance(&mut self, graph: &Graph) -> Option<NodeId> {
        let current = self.queue.pop()?;
        self.visited.insert(current);

        for &neighbor in graph.neighbors(current) {
            if !self.visited.contains(&neighbor) && !self.queue.contains(neighbor) {
                self.parents.insert(neighbor, current);
                self.queue.push(neighbor, 0.0);
            }
        }
        Some(current)
    }

    fn clear(&mut self) {
        self.queue.clear();
        self.visited.clear();
        self.parents.clear();
    }
}

/// 双向 BFS 引擎
pub struct BidirectionalEngine {
    core: EngineCore,
    forward: Wavefront,
    backward: Wavefront,
    /// 下一步轮到反向波前
    backward_turn: bool,
}

impl BidirectionalEngine {
    pub fn new(graph: Graph) -> Self {
        Self {
            core: EngineCore::new(graph, BranchingConfig::four_level(), 1),
            forward: Wavefront::default(),
            backward: Wavefront::default(),
            backward_turn: false,
        }
    }

    pub fn with_rng(graph: Graph, rng: StdRng) -> Self {
        Self {
            core: EngineCore::with_rng(graph, BranchingConfig::four_level(), 1, rng),
            forward: Wavefront::default(),
            backward: Wavefront::default(),
            backward_turn: false,
        }
    }

    fn start(&mut self) -> StepOutcome {
        self.forward.arm(self.core.origin);
        if let Some(&target) = self.core.targets.first() {
            self.backward.arm(target);
        }
        self.backward_turn = false;
        self.core.state = SearchState::Running;
        self.core.message = "Search started".to_string();
        StepOutcome::Started
    }

    /// 按节点表顺序扫描两侧都已访问的节点
    fn meeting_node(&self) -> Option<NodeId> {
        self.core
            .graph
            .node_ids()
            .find(|id| self.forward.visited.contains(id) && self.backward.visited.contains(id))
    }

    fn finish_at(&mut self, meeting: NodeId) -> StepOutcome {
        let full_path = path::stitch(&self.forward.parents, &self.backward.parents, meeting);
        log::debug!("双向搜索在节点 {} 相遇，路径长度 {}", meeting, full_path.len());
        self.core.solution_paths.push(full_path);
        self.core.state = SearchState::Found;
        self.core.message = "Path found!".to_string();
        StepOutcome::TargetReached(meeting)
    }
}

impl SteppedEngine for BidirectionalEngine {
    fn name(&self) -> &'static str {
        "bidirectional"
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

        // 任一侧队列枯竭即判定无路，不再单侧空转
        if self.forward.queue.is_empty() || self.backward.queue.is_empty() {
            return Ok(self.core.exhaust());
        }

        let use_backward = self.backward_turn;
        self.backward_turn = !use_backward;

        let wavefront = if use_backward {
            &mut self.backward
        } else {
            &mut self.forward
        };
        let Some(current) = wavefront.advance(&self.core.graph) else {
            return Ok(self.core.exhaust());
        };

        self.core.current = Some(current);
        self.core.mark_visited(current);

        if let Some(meeting) = self.meeting_node() {
            return Ok(self.finish_at(meeting));
        }
        Ok(StepOutcome::Expanded(current))
    }

    fn select_target(&mut self, id: NodeId) {
        self.core.toggle_target(id);
    }

    fn reset(&mut self, full_reset: bool) {
        self.forward.clear();
        self.backward.clear();
        self.backward_turn = false;
        self.core.reset(full_reset);
    }

    fn regenerate(&mut self) {
        self.forward.clear();
        self.backward.clear();
        self.backward_turn = false;
        self.core.regenerate();
    }

    fn graph(&self) -> &Graph {
        &self.core.graph
    }

    fn snapshot(&self) -> EngineSnapshot {
        let mut frontier = self.forward.queue.snapshot();
        frontier.extend(self.backward.queue.snapshot());
        self.core.snapshot(self.name(), frontier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_graph(len: u32) -> Graph {
        let mut g = Graph::new();
        for i in 0..len {
            g.add_node(i as u8);
        }
        for i in 1..len {
            g.connect(i, i + 1, 10);
        }
        g
    }

    fn run_to_termination(engine: &mut BidirectionalEngine) {
        for _ in 0..100 {
            if engine.state().is_terminal() {
                break;
            }
            engine.step().expect("step should succeed in test");
        }
    }

    #[test]
    fn test_waves_meet_in_the_middle_of_a_chain() {
        let mut engine = BidirectionalEngine::new(chain_graph(5));
        engine.select_target(5);
        run_to_termination(&mut engine);

        assert_eq!(engine.state(), SearchState::Found);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.solution_paths, vec![vec![1, 2, 3, 4, 5]]);
    }

    #[test]
    fn test_stitched_path_is_a_valid_walk_without_repeats() {
        let mut engine = BidirectionalEngine::new(chain_graph(7));
        engine.select_target(7);
        run_to_termination(&mut engine);

        let snapshot = engine.snapshot();
        let solution = &snapshot.solution_paths[0];
        for pair in solution.windows(2) {
            assert!(
                engine.graph().weight_between(pair[0], pair[1]).is_some(),
                "consecutive path nodes must share an edge"
            );
        }
        let unique: HashSet<&NodeId> = solution.iter().collect();
        assert_eq!(unique.len(), solution.len(), "meeting node must appear once");
    }

    #[test]
    fn test_lanes_alternate_from_both_ends() {
        let mut engine = BidirectionalEngine::new(chain_graph(7));
        engine.select_target(7);

        engine.step().expect("step should succeed in test");
        engine.step().expect("step should succeed in test");
        engine.step().expect("step should succeed in test");

        let snapshot = engine.snapshot();
        assert!(snapshot.visited.contains(&1), "forward lane must have advanced");
        assert!(snapshot.visited.contains(&7), "backward lane must have advanced");
    }

    #[test]
    fn test_one_drained_lane_ends_the_search_immediately() {
        // 反向波前在孤立目标处耗尽后正向侧仍有待扩展节点，
        // 搜索必须立即判定无路而不是继续单侧推进
        let mut g = chain_graph(5);
        let isolated = g.add_node(3);

        let mut engine = BidirectionalEngine::new(g);
        engine.select_target(isolated);

        engine.step().expect("step should succeed in test"); // 启动
        engine.step().expect("step should succeed in test"); // 正向扩展 1
        engine.step().expect("step should succeed in test"); // 反向扩展孤立目标，队列随之枯竭
        let outcome = engine.step().expect("step should succeed in test");

        assert!(matches!(outcome, StepOutcome::NoPath));
        assert_eq!(engine.state(), SearchState::Exhausted);
        assert!(
            !engine.snapshot().frontier.is_empty(),
            "the forward lane still holds pending nodes at termination"
        );
    }

    #[test]
    fn test_isolated_target_yields_no_path() {
        let mut g = chain_graph(3);
        let isolated = g.add_node(3);

        let mut engine = BidirectionalEngine::new(g);
        engine.select_target(isolated);
        run_to_termination(&mut engine);

        assert_eq!(engine.state(), SearchState::Exhausted);
        assert!(engine.snapshot().solution_paths.is_empty());
    }
}
