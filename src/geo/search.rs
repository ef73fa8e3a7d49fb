//! 实景地图 BFS
//!
//! 与随机图 BFS 同样的入队/访问纪律，但节点身份是坐标键，
//! 邻接关系在扩展时由解析器实时求得。到达判定不要求坐标
//! 精确相等：与目标的大圆距离在 30 米以内即视为到达。

use super::resolver::GeoNeighborResolver;
use super::{haversine_m, GeoPoint};
use crate::core::SimResult;
use crate::services::engine::SearchState;
use std::collections::{HashMap, HashSet, VecDeque};

/// 两坐标视为同一地点的距离上限（米）
pub const TARGET_RADIUS_M: f64 = 30.0;

/// 地理单步执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum GeoStepOutcome {
    Started,
    Expanded(GeoPoint),
    TargetReached(GeoPoint),
    NoPath,
    Finished,
}

/// 实景地图上的逐步 BFS
pub struct GeoBfs {
    resolver: GeoNeighborResolver,
    origin: GeoPoint,
    target: GeoPoint,
    state: SearchState,
    queue: VecDeque<GeoPoint>,
    in_queue: HashSet<String>,
    visited: HashSet<String>,
    visited_order: Vec<GeoPoint>,
    parents: HashMap<String, GeoPoint>,
    current: Option<GeoPoint>,
    solution: Option<Vec<GeoPoint>>,
    message: String,
}

impl GeoBfs {
    /// 起点与目标在构造时即已确定，引擎直接处于 Armed
    pub fn new(resolver: GeoNeighborResolver, origin: GeoPoint, target: GeoPoint) -> Self {
        Self {
            resolver,
            origin,
            target,
            state: SearchState::Armed,
            queue: VecDeque::new(),
            in_queue: HashSet::new(),
            visited: HashSet::new(),
            visited_order: Vec::new(),
            parents: HashMap::new(),
            current: None,
            solution: None,
            message: String::new(),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn visited_order(&self) -> &[GeoPoint] {
        &self.visited_order
    }

    /// 找到的路径（起点 → 目标附近的道路点）
    pub fn solution(&self) -> Option<&[GeoPoint]> {
        self.solution.as_deref()
    }

    fn reached_target(&self, point: &GeoPoint) -> bool {
        haversine_m(point, &self.target) <= TARGET_RADIUS_M
    }

    fn mark_visited(&mut self, point: GeoPoint) {
        if self.visited.insert(point.key()) {
            self.visited_order.push(point);
        }
    }

    fn reconstruct(&self, end: &GeoPoint) -> Vec<GeoPoint> {
        let mut path = vec![*end];
        let mut key = end.key();
        while let Some(&parent) = self.parents.get(&key) {
            path.push(parent);
            key = parent.key();
        }
        path.reverse();
        path
    }

    async fn enqueue_neighbors(&mut self, from: GeoPoint) {
        let neighbors = self.resolver.neighbors_of(&from).await;
        for neighbor in neighbors {
            let key = neighbor.key();
            if self.visited.contains(&key) || self.in_queue.contains(&key) {
                continue;
            }
            self.parents.insert(key.clone(), from);
            self.in_queue.insert(key);
            self.queue.push_back(neighbor);
        }
    }

    async fn start(&mut self) -> SimResult<GeoStepOutcome> {
        let origin = self.origin;
        self.current = Some(origin);
        self.mark_visited(origin);
        self.enqueue_neighbors(origin).await;
        self.state = SearchState::Running;
        self.message = "Search started".to_string();
        Ok(GeoStepOutcome::Started)
    }

    /// 执行一次边界扩展
    pub async fn step(&mut self) -> SimResult<GeoStepOutcome> {
        match self.state {
            SearchState::Found | SearchState::Exhausted => return Ok(GeoStepOutcome::Finished),
            SearchState::Idle | SearchState::Armed => return self.start().await,
            SearchState::Running => {}
        }

        let Some(current) = self.queue.pop_front() else {
            self.state = SearchState::Exhausted;
            self.message = "No path found to target node(s)!".to_string();
            return Ok(GeoStepOutcome::NoPath);
        };
        self.in_queue.remove(&current.key());
        self.current = Some(current);
        self.mark_visited(current);

        if self.reached_target(&current) {
            log::info!("地理 BFS 在 {} 到达目标附近", current.key());
            self.solution = Some(self.reconstruct(&current));
            self.state = SearchState::Found;
            self.message = "Path found!".to_string();
            return Ok(GeoStepOutcome::TargetReached(current));
        }

        self.enqueue_neighbors(current).await;
        Ok(GeoStepOutcome::Expanded(current))
    }

    /// 推进到终态，终止条件外加一个步数上限防止在开阔路网上无界扩张
    pub async fn run(&mut self, max_steps: u32) -> SimResult<SearchState> {
        for _ in 0..max_steps {
            if self.state.is_terminal() {
                break;
            }
            self.step().await?;
        }
        Ok(self.state)
    }
}
