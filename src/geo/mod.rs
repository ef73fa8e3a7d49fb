//! 地理搜索模块
//!
//! 实景地图变体：坐标身份由四舍六入到小数点后六位的经纬度
//! 字符串键确定，邻接关系由八个罗盘方向的探测点经外部路网
//! 吸附服务实时解析得到，BFS 在其上逐步推进。

use serde::{Deserialize, Serialize};

pub mod budget;
pub mod resolver;
pub mod search;
pub mod snap;

pub use budget::ApiBudget;
pub use resolver::{GeoNeighborResolver, RoadNeighbor};
pub use search::{GeoBfs, GeoStepOutcome};
pub use snap::{FixtureSnapper, RoadSnapper, RoadsApiClient};

/// 地球半径（米），haversine 公式使用
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// 经纬度坐标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// 坐标键：六位小数，足以区分约 0.1 米的间隔
    pub fn key(&self) -> String {
        format!("{:.6},{:.6}", self.lat, self.lng)
    }
}

/// 两坐标间的大圆距离（米）
pub fn haversine_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// 八个罗盘方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// 单位角偏移，对角线方向缩放 0.7 使探测距离大致均匀
    fn unit_offset(self) -> (f64, f64) {
        match self {
            Direction::North => (1.0, 0.0),
            Direction::NorthEast => (0.7, 0.7),
            Direction::East => (0.0, 1.0),
            Direction::SouthEast => (-0.7, 0.7),
            Direction::South => (-1.0, 0.0),
            Direction::SouthWest => (-0.7, -0.7),
            Direction::West => (0.0, -1.0),
            Direction::NorthWest => (0.7, -0.7),
        }
    }
}

/// 以 `center` 为圆心、`offset_deg` 为角偏移生成八个方向的探测点
pub fn probe_points(center: &GeoPoint, offset_deg: f64) -> Vec<(Direction, GeoPoint)> {
    Direction::ALL
        .iter()
        .map(|&direction| {
            let (lat_unit, lng_unit) = direction.unit_offset();
            let probe = GeoPoint::new(
                center.lat + lat_unit * offset_deg,
                center.lng + lng_unit * offset_deg,
            );
            (direction, probe)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distance() {
        // 赤道上经度相差 0.001 度约 111.2 米
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 0.001);
        let d = haversine_m(&a, &b);
        assert!((d - 111.2).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_haversine_zero_for_same_point() {
        let p = GeoPoint::new(52.52, 13.405);
        assert!(haversine_m(&p, &p).abs() < f64::EPSILON);
    }

    #[test]
    fn test_key_rounds_to_six_decimals() {
        let p = GeoPoint::new(52.520008123, 13.404953987);
        assert_eq!(p.key(), "52.520008,13.404954");
    }

    #[test]
    fn test_probe_points_cover_eight_distinct_directions() {
        // 赤道上经纬度等距，对角线距离约为正向的 0.7·√2 倍
        let center = GeoPoint::new(0.0, 0.0);
        let probes = probe_points(&center, 0.00045);
        assert_eq!(probes.len(), 8);

        let mut keys: Vec<String> = probes.iter().map(|(_, p)| p.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 8);

        // 对角线探测点比正向探测点更近圆心的倍率不超过 1.0
        let north = haversine_m(&center, &probes[0].1);
        let north_east = haversine_m(&center, &probes[1].1);
        assert!(north_east < north * 1.05 && north_east > north * 0.9);
    }
}
