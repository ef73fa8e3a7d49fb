//! 逐步搜索引擎模块
//!
//! 每个引擎封装一种搜索策略，按外部触发每次执行一次边界扩展。
//! 引擎共享同一状态机：
//!
//! ```text
//! Idle ──选择目标──▶ Armed ──首次 step──▶ Running ──▶ Found | Exhausted
//!   ▲                                                      │
//!   └────────────── generate / 完全 reset ◀────────────────┘
//! ```
//!
//! 单步副作用是原子的：恰好一个节点从边界转为当前节点，若干邻居
//! 可能入界；步与步之间观察不到中间状态。

use crate::core::{SimError, SimResult};
use crate::graph::{generate, BranchingConfig, Graph, NodeId};
use crate::services::path;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

pub mod astar;
pub mod best_first;
pub mod bfs;
pub mod bidirectional;
pub mod dfs;
pub mod dijkstra;
pub mod random_walk;

pub use astar::AStarEngine;
pub use best_first::BestFirstEngine;
pub use bfs::BfsEngine;
pub use bidirectional::BidirectionalEngine;
pub use dfs::DfsEngine;
pub use dijkstra::DijkstraEngine;
pub use random_walk::RandomWalkEngine;

/// 搜索状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchState {
    /// 未选择目标
    Idle,
    /// 起点与目标已选定，尚未开始
    Armed,
    /// 至少执行过一步，边界非空
    Running,
    /// 终态：已找到全部目标，解可用
    Found,
    /// 终态：边界耗尽而未到达目标
    Exhausted,
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SearchState::Found | SearchState::Exhausted)
    }
}

/// 单步执行结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StepOutcome {
    /// 首次步进：起点入界 / 初始化完成
    Started,
    /// 一个节点出界成为当前节点并扩展其邻居
    Expanded(NodeId),
    /// 过期或重复条目出队，本步无扩展
    StalePop(NodeId),
    /// 到达一个目标（若状态仍为 Running 则为中间成功，继续搜索）
    TargetReached(NodeId),
    /// 边界耗尽，未找到路径
    NoPath,
    /// 随机游走：步数预算耗尽或走入死胡同，下一步将从起点重启
    RestartScheduled,
    /// 随机游走：已从起点重启
    Restarted,
    /// 在终态上调用 step，无操作
    Finished,
}

/// 渲染协作方的只读快照
///
/// 每步之后由引擎导出；渲染方从不直接修改引擎状态。
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub algorithm: String,
    pub state: SearchState,
    pub current: Option<NodeId>,
    /// 边界内容，按出队顺序
    pub frontier: Vec<NodeId>,
    /// 已访问节点，按访问顺序
    pub visited: Vec<NodeId>,
    pub targets: Vec<NodeId>,
    /// 已找到的解路径，每条从起点到其目标
    pub solution_paths: Vec<Vec<NodeId>>,
    pub message: String,
}

/// 逐步搜索引擎统一接口，供驱动器与 CLI 多态使用
pub trait SteppedEngine {
    fn name(&self) -> &'static str;

    fn state(&self) -> SearchState;

    /// 执行一次边界扩展
    ///
    /// 未选择目标（`Idle`）时返回用户输入错误且不修改任何状态。
    fn step(&mut self) -> SimResult<StepOutcome>;

    /// 切换目标选择。再次选择已选目标会取消它；超出目标上限时
    /// 淘汰最早的选择；起点不可选。搜索运行中与终态下忽略。
    fn select_target(&mut self, id: NodeId);

    /// 清除搜索状态。`full_reset` 同时清除目标选择，回到 `Idle`；
    /// 否则保留目标，回到 `Armed`。两次连续的完全重置与一次等效。
    fn reset(&mut self, full_reset: bool);

    /// 重新生成随机图，丢弃先前的图、边界、访问集与解路径，回到 `Idle`
    fn regenerate(&mut self);

    fn graph(&self) -> &Graph;

    fn snapshot(&self) -> EngineSnapshot;
}

/// 各引擎共享的状态：图、目标、访问顺序、解路径与状态机。
///
/// 对应原先散落的全局可变量（运行标志、当前节点等），生命周期
/// 限定在一次搜索会话内，避免跨会话泄漏。
#[derive(Debug)]
pub(crate) struct EngineCore {
    pub graph: Graph,
    pub branching: BranchingConfig,
    pub rng: StdRng,
    pub state: SearchState,
    pub origin: NodeId,
    pub targets: Vec<NodeId>,
    pub max_targets: usize,
    pub current: Option<NodeId>,
    pub visited_order: Vec<NodeId>,
    pub solution_paths: Vec<Vec<NodeId>>,
    pub message: String,
}

impl EngineCore {
    pub fn new(graph: Graph, branching: BranchingConfig, max_targets: usize) -> Self {
        Self::with_rng(graph, branching, max_targets, StdRng::from_entropy())
    }

    pub fn with_rng(
        graph: Graph,
        branching: BranchingConfig,
        max_targets: usize,
        rng: StdRng,
    ) -> Self {
        let origin = graph.root().unwrap_or(1);
        Self {
            graph,
            branching,
            rng,
            state: SearchState::Idle,
            origin,
            targets: Vec::new(),
            max_targets,
            current: None,
            visited_order: Vec::new(),
            solution_paths: Vec::new(),
            message: String::new(),
        }
    }

    /// 目标切换（见 [`SteppedEngine::select_target`]）
    pub fn toggle_target(&mut self, id: NodeId) {
        if self.state == SearchState::Running || self.state.is_terminal() {
            log::debug!("搜索进行中，忽略目标选择: {}", id);
            return;
        }
        if id == self.origin || !self.graph.contains(id) {
            return;
        }

        if let Some(pos) = self.targets.iter().position(|&t| t == id) {
            self.targets.remove(pos);
        } else {
            if self.targets.len() >= self.max_targets {
                // 淘汰最早选择的目标
                self.targets.remove(0);
            }
            self.targets.push(id);
        }

        self.state = if self.targets.is_empty() {
            SearchState::Idle
        } else {
            SearchState::Armed
        };
    }

    /// 步进前的目标检查：未选目标属于用户输入错误，状态不变
    pub fn require_target(&self) -> SimResult<()> {
        if self.targets.is_empty() {
            Err(SimError::NoTargetSelected(
                "please select a target node first".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    /// 记录到达某目标的解路径（每个目标恰好一条，只写一次）
    pub fn record_solution(&mut self, target: NodeId) {
        if self.has_solution_for(target) {
            return;
        }
        let path = path::reconstruct(&self.graph, target);
        self.solution_paths.push(path);
    }

    pub fn has_solution_for(&self, target: NodeId) -> bool {
        self.solution_paths
            .iter()
            .any(|p| p.last() == Some(&target))
    }

    pub fn all_targets_found(&self) -> bool {
        self.targets.iter().all(|&t| self.has_solution_for(t))
    }

    /// 到达目标后的统一收尾：记录路径，全部找到则进入终态
    pub fn finish_target(&mut self, target: NodeId) -> StepOutcome {
        self.record_solution(target);
        if self.all_targets_found() {
            self.state = SearchState::Found;
            self.message = if self.targets.len() > 1 {
                "All paths found!".to_string()
            } else {
                "Path found!".to_string()
            };
        } else {
            self.message = format!("Path to node {} found!", target);
        }
        StepOutcome::TargetReached(target)
    }

    /// 边界耗尽的统一收尾
    pub fn exhaust(&mut self) -> StepOutcome {
        self.state = SearchState::Exhausted;
        self.message = "No path found to target node(s)!".to_string();
        StepOutcome::NoPath
    }

    pub fn reset(&mut self, full_reset: bool) {
        self.graph.reset_transient();
        self.current = None;
        self.visited_order.clear();
        self.solution_paths.clear();
        self.message.clear();

        if full_reset {
            self.targets.clear();
        }
        self.state = if self.targets.is_empty() {
            SearchState::Idle
        } else {
            SearchState::Armed
        };
    }

    /// 重新生成随机图并完全复位
    pub fn regenerate(&mut self) {
        self.graph = generate(&self.branching, &mut self.rng);
        self.origin = self.graph.root().unwrap_or(1);
        self.targets.clear();
        self.reset(true);
    }

    /// 标记节点已访问并登记访问顺序（幂等）
    pub fn mark_visited(&mut self, id: NodeId) {
        let node = self.graph.node_mut(id);
        if !node.visited {
            node.visited = true;
            self.visited_order.push(id);
        }
    }

    pub fn snapshot(&self, algorithm: &str, frontier: Vec<NodeId>) -> EngineSnapshot {
        EngineSnapshot {
            algorithm: algorithm.to_string(),
            state: self.state,
            current: self.current,
            frontier,
            visited: self.visited_order.clone(),
            targets: self.targets.clone(),
            solution_paths: self.solution_paths.clone(),
            message: self.message.clone(),
        }
    }
}
