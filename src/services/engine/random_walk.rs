//! 随机游走逐步引擎
//!
//! 每步从当前节点的邻居中等概率选一个迁移，踩到目标即成功。
//! 预算步数（默认 100）内未到达则置重启标记，下一步消耗该标记
//! 回到起点重新游走；节点访问计数跨重启累积，只有复位才清零。
//! 没有边界集合，也不会自然进入 Exhausted。单目标。

use super::{EngineCore, EngineSnapshot, SearchState, SteppedEngine, StepOutcome};
use crate::core::SimResult;
use crate::graph::{BranchingConfig, Graph, NodeId};
use rand::rngs::StdRng;
use rand::Rng;

/// 单轮游走的默认步数预算
pub const DEFAULT_MAX_STEPS: u32 = 100;

/// 随机游走引擎
pub struct RandomWalkEngine {
    core: EngineCore,
    max_steps: u32,
    steps_taken: u32,
    restart_pending: bool,
    /// 本轮走过的节点序列（含起点），重启时重新开始记录
    trace: Vec<NodeId>,
}

impl RandomWalkEngine {
    pub fn new(graph: Graph) -> Self {
        Self {
            core: EngineCore::new(graph, BranchingConfig::three_level(), 1),
            max_steps: DEFAULT_MAX_STEPS,
            steps_taken: 0,
            restart_pending: false,
            trace: Vec::new(),
        }
    }

    pub fn with_rng(graph: Graph, rng: StdRng) -> Self {
        Self {
            core: EngineCore::with_rng(graph, BranchingConfig::three_level(), 1, rng),
            max_steps: DEFAULT_MAX_STEPS,
            steps_taken: 0,
            restart_pending: false,
            trace: Vec::new(),
        }
    }

    pub fn set_max_steps(&mut self, max_steps: u32) {
        self.max_steps = max_steps.max(1);
    }

    /// 落脚一个节点：访问计数累加并登记访问顺序
    fn land_on(&mut self, id: NodeId) {
        self.core.graph.node_mut(id).visit_count += 1;
        self.core.mark_visited(id);
        self.core.current = Some(id);
        self.trace.push(id);
    }

    fn start(&mut self) -> StepOutcome {
        self.steps_taken = 0;
        self.restart_pending = false;
        self.trace.clear();
        self.land_on(self.core.origin);
        self.core.state = SearchState::Running;
        self.core.message = "Search started".to_string();
        StepOutcome::Started
    }

    fn restart(&mut self) -> StepOutcome {
        self.restart_pending = false;
        self.steps_taken = 0;
        self.trace.clear();
        self.land_on(self.core.origin);
        self.core.message = "Restarting from the start node".to_string();
        StepOutcome::Restarted
    }

    fn schedule_restart(&mut self) -> StepOutcome {
        self.restart_pending = true;
        self.core.message = format!("No luck after {} steps, restarting", self.steps_taken);
        StepOutcome::RestartScheduled
    }
}

impl SteppedEngine for RandomWalkEngine {
    fn name(&self) -> &'static str {
        "random_walk"
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

        if self.restart_pending {
            return Ok(self.restart());
        }

        let current = self.core.current.unwrap_or(self.core.origin);
        let neighbors = self.core.graph.neighbors(current);
        if neighbors.is_empty() {
            return Ok(self.schedule_restart());
        }
        let next = neighbors[self.core.rng.gen_range(0..neighbors.len())];

        self.land_on(next);
        self.steps_taken += 1;

        if self.core.targets.contains(&next) {
            log::debug!("随机游走第 {} 步踩到目标节点 {}", self.steps_taken, next);
            self.core.solution_paths.push(self.trace.clone());
            self.core.state = SearchState::Found;
            self.core.message = "Path found!".to_string();
            return Ok(StepOutcome::TargetReached(next));
        }

        if self.steps_taken >= self.max_steps {
            return Ok(self.schedule_restart());
        }
        Ok(StepOutcome::Expanded(next))
    }

    fn select_target(&mut self, id: NodeId) {
        self.core.toggle_target(id);
    }

    fn reset(&mut self, full_reset: bool) {
        self.steps_taken = 0;
        self.restart_pending = false;
        self.trace.clear();
        self.core.reset(full_reset);
    }

    fn regenerate(&mut self) {
        self.steps_taken = 0;
        self.restart_pending = false;
        self.trace.clear();
        self.core.regenerate();
    }

    fn graph(&self) -> &Graph {
        &self.core.graph
    }

    fn snapshot(&self) -> EngineSnapshot {
        // 没有边界集合，展示当前这轮的游走轨迹
        self.core.snapshot(self.name(), self.trace.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn two_node_graph() -> Graph {
        let mut g = Graph::new();
        g.add_node(0);
        g.add_node(1);
        g.connect(1, 2, 10);
        g
    }

    #[test]
    fn test_walk_reaches_adjacent_target_in_one_move() {
        let mut engine = RandomWalkEngine::with_rng(two_node_graph(), StdRng::seed_from_u64(1));
        engine.select_target(2);

        engine.step().expect("step should succeed in test");
        let outcome = engine.step().expect("step should succeed in test");

        assert!(matches!(outcome, StepOutcome::TargetReached(2)));
        assert_eq!(engine.state(), SearchState::Found);
        assert_eq!(engine.snapshot().solution_paths, vec![vec![1, 2]]);
    }

    #[test]
    fn test_budget_exhaustion_schedules_then_consumes_restart() {
        // 目标不可达（孤立节点），预算 3 步后必然重启
        let mut g = two_node_graph();
        let isolated = g.add_node(2);
        let mut engine = RandomWalkEngine::with_rng(g, StdRng::seed_from_u64(1));
        engine.set_max_steps(3);
        engine.select_target(isolated);

        engine.step().expect("step should succeed in test");
        let mut scheduled = false;
        let mut restarted = false;
        for _ in 0..8 {
            match engine.step().expect("step should succeed in test") {
                StepOutcome::RestartScheduled => {
                    scheduled = true;
                    // 标记要到下一步才消耗
                    assert!(!restarted);
                }
                StepOutcome::Restarted => {
                    restarted = true;
                    break;
                }
                _ => {}
            }
        }
        assert!(scheduled && restarted);
        assert_eq!(engine.state(), SearchState::Running);
    }

    #[test]
    fn test_visit_counts_accumulate_across_restarts_and_clear_on_reset() {
        let mut g = two_node_graph();
        let isolated = g.add_node(2);
        let mut engine = RandomWalkEngine::with_rng(g, StdRng::seed_from_u64(1));
        engine.set_max_steps(2);
        engine.select_target(isolated);

        for _ in 0..12 {
            engine.step().expect("step should succeed in test");
        }
        // 两节点间往返加上重启落脚，起点计数必然跨轮累积
        assert!(engine.graph().node(1).visit_count > 2);

        engine.reset(false);
        assert_eq!(engine.graph().node(1).visit_count, 0);
        assert_eq!(engine.state(), SearchState::Armed);
    }
}
