//! 地理邻居解析器
//!
//! 把"某坐标的邻居"翻译成一串受配额保护的外呼：先在八个罗盘
//! 方向生成探测点，跳过已处理的和落在已知道路点 25 米以内的，
//! 其余逐个（串行，带限速延迟）吸附到路网。吸附结果离探测点
//! 超过 20 米视为不可信，丢弃。最后按方向过滤：每个方向保留
//! 吸附距离最近的候选，若同方向另有候选距第一个超过 100 米
//! （说明是另一条路），再保留一个。服务失败与预算耗尽都不是
//! 致命错误：记日志、返回已解析的部分邻居。

use super::budget::ApiBudget;
use super::snap::RoadSnapper;
use super::{haversine_m, probe_points, Direction, GeoPoint};
use crate::config::GeoConfig;
use crate::services::session::SearchSession;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// 一次吸附得到的道路邻居候选
#[derive(Debug, Clone)]
pub struct RoadNeighbor {
    pub point: GeoPoint,
    pub direction: Direction,
    pub probe: GeoPoint,
    /// 吸附点到探测点的距离（米）
    pub snap_distance: f64,
}

/// 地理邻居解析器
pub struct GeoNeighborResolver {
    snapper: Arc<dyn RoadSnapper>,
    session: Arc<SearchSession>,
    budget: ApiBudget,
    config: GeoConfig,
    /// 历次解析累计发现的道路点，按坐标键索引
    discovered: HashMap<String, GeoPoint>,
}

impl GeoNeighborResolver {
    pub fn new(
        snapper: Arc<dyn RoadSnapper>,
        session: Arc<SearchSession>,
        config: GeoConfig,
    ) -> Self {
        let budget = ApiBudget::new(
            config.max_calls,
            Duration::from_secs(config.session_timeout_secs),
        );
        Self {
            snapper,
            session,
            budget,
            config,
            discovered: HashMap::new(),
        }
    }

    pub fn budget(&self) -> &ApiBudget {
        &self.budget
    }

    /// 清空已发现的道路点并恢复外呼配额
    pub fn reset(&mut self) {
        self.discovered.clear();
        self.budget.reset();
    }

    /// 该探测点是否落在某个已知道路点的去重半径内
    fn near_known_road(&self, probe: &GeoPoint) -> bool {
        self.discovered
            .values()
            .any(|known| haversine_m(known, probe) < self.config.dedup_radius_m)
    }

    /// 解析 `center` 的道路邻居
    ///
    /// 外呼串行执行，每次之前按速度倍率延迟。预算耗尽时立即
    /// 停止探测，返回已解析的部分集合。
    pub async fn neighbors_of(&mut self, center: &GeoPoint) -> Vec<GeoPoint> {
        let mut processed: HashSet<String> = HashSet::new();
        let mut candidates: Vec<RoadNeighbor> = Vec::new();

        for (direction, probe) in probe_points(center, self.config.probe_offset_deg) {
            if !processed.insert(probe.key()) {
                continue;
            }
            if self.near_known_road(&probe) {
                log::debug!("探测点 {} 紧邻已知道路点，跳过", probe.key());
                continue;
            }
            if !self.budget.try_acquire() {
                log::warn!(
                    "外呼预算耗尽（已用 {} 次），{} 的邻居集不完整",
                    self.budget.calls_made(),
                    center.key()
                );
                break;
            }

            let delay = Duration::from_millis(self.config.request_delay_ms)
                .mul_f64(self.session.speed());
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match self.snapper.snap(&probe).await {
                Ok(Some(snapped)) => {
                    let snap_distance = haversine_m(&snapped, &probe);
                    if snap_distance > self.config.snap_threshold_m {
                        log::debug!(
                            "{:?} 方向吸附点偏离探测点 {:.1} 米，超过阈值，丢弃",
                            direction,
                            snap_distance
                        );
                        continue;
                    }
                    if candidates.iter().any(|c| c.point.key() == snapped.key()) {
                        continue;
                    }
                    candidates.push(RoadNeighbor {
                        point: snapped,
                        direction,
                        probe,
                        snap_distance,
                    });
                }
                Ok(None) => {
                    log::debug!("{:?} 方向无道路", direction);
                }
                Err(e) => {
                    // 外部服务故障降级为该方向无邻居
                    log::warn!("{:?} 方向吸附失败: {}", direction, e);
                }
            }
        }

        let kept = self.filter_by_direction(candidates);
        for neighbor in &kept {
            self.discovered
                .insert(neighbor.point.key(), neighbor.point);
        }
        kept.into_iter().map(|n| n.point).collect()
    }

    /// 每个方向保留吸附距离最近的候选；同方向若另有候选与第一个
    /// 相距超过 `second_road_gap_m`，视为另一条道路，再保留一个
    fn filter_by_direction(&self, candidates: Vec<RoadNeighbor>) -> Vec<RoadNeighbor> {
        let mut by_direction: HashMap<Direction, Vec<RoadNeighbor>> = HashMap::new();
        for candidate in candidates {
            by_direction
                .entry(candidate.direction)
                .or_default()
                .push(candidate);
        }

        let mut kept = Vec::new();
        for direction in Direction::ALL {
            let Some(mut group) = by_direction.remove(&direction) else {
                continue;
            };
            group.sort_by(|a, b| {
                a.snap_distance
                    .partial_cmp(&b.snap_distance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let first = group.remove(0);
            let second = group.into_iter().find(|c| {
                c.snap_distance <= self.config.snap_threshold_m
                    && haversine_m(&c.point, &first.point) > self.config.second_road_gap_m
            });
            kept.push(first);
            if let Some(second) = second {
                kept.push(second);
            }
        }
        kept
    }
}
