//! 地理搜索集成测试
//!
//! 用按坐标键配置的吸附桩代替外部路网服务，检验解析器的探测、
//! 去重与预算行为，以及地理 BFS 的端到端寻路。

use pathsim::config::GeoConfig;
use pathsim::geo::{
    haversine_m, probe_points, FixtureSnapper, GeoBfs, GeoNeighborResolver, GeoPoint, RoadSnapper,
};
use pathsim::services::engine::SearchState;
use pathsim::services::SearchSession;
use std::sync::Arc;

fn fast_config() -> GeoConfig {
    GeoConfig {
        request_delay_ms: 0,
        ..GeoConfig::default()
    }
}

fn resolver(snapper: Arc<dyn RoadSnapper>, config: GeoConfig) -> GeoNeighborResolver {
    GeoNeighborResolver::new(snapper, Arc::new(SearchSession::new()), config)
}

#[tokio::test]
async fn identity_snapper_resolves_at_most_eight_neighbors() {
    let mut r = resolver(Arc::new(FixtureSnapper::identity()), fast_config());
    let center = GeoPoint::new(40.748817, -73.985428);

    let neighbors = r.neighbors_of(&center).await;

    assert!(!neighbors.is_empty() && neighbors.len() <= 8);
    for (i, neighbor) in neighbors.iter().enumerate() {
        let near_probe = probe_points(&center, 0.00045)
            .iter()
            .any(|(_, probe)| haversine_m(probe, neighbor) <= 20.0);
        assert!(near_probe, "neighbor #{} strays from every probe", i);
    }
}

#[tokio::test]
async fn geo_bfs_follows_a_configured_road_chain() {
    // 只在正北方向铺路：起点的北探测点有路，再往北一跳仍有路
    let origin = GeoPoint::new(40.748817, -73.985428);
    let snapper = FixtureSnapper::new();

    let hop1 = probe_points(&origin, 0.00045)[0].1;
    snapper.set_response(&hop1, Some(hop1));
    let hop2 = probe_points(&hop1, 0.00045)[0].1;
    snapper.set_response(&hop2, Some(hop2));

    let target = hop2;
    let mut bfs = GeoBfs::new(resolver(Arc::new(snapper), fast_config()), origin, target);
    let state = bfs.run(20).await.expect("run should succeed in test");

    assert_eq!(state, SearchState::Found);
    let path = bfs.solution().expect("solution should exist in test");
    assert_eq!(path.len(), 3);
    assert_eq!(path[0].key(), origin.key());
    assert_eq!(path[1].key(), hop1.key());
    assert_eq!(path[2].key(), hop2.key());
}

#[tokio::test]
async fn budget_cutoff_leaves_partial_frontier_without_failing() {
    let config = GeoConfig {
        max_calls: 5,
        ..fast_config()
    };
    let origin = GeoPoint::new(40.748817, -73.985428);
    let target = GeoPoint::new(40.8, -73.985428);

    let mut bfs = GeoBfs::new(
        resolver(Arc::new(FixtureSnapper::identity()), config),
        origin,
        target,
    );
    let state = bfs.run(50).await.expect("run should succeed in test");

    // 预算只够第一轮的部分探测，搜索耗尽而不报错
    assert_eq!(state, SearchState::Exhausted);
    assert!(bfs.visited_order().len() <= 6);
}

#[tokio::test]
async fn discovered_roads_suppress_reprobing_across_expansions() {
    let mut r = resolver(Arc::new(FixtureSnapper::identity()), fast_config());
    let center = GeoPoint::new(40.748817, -73.985428);

    let first = r.neighbors_of(&center).await;
    assert_eq!(r.budget().calls_made() as usize, 8);

    // 从某个已发现邻居出发再解析：回指圆心方向的探测点会命中
    // 已知道路点的 25 米去重半径，不再外呼
    let next = first[0];
    r.neighbors_of(&next).await;
    assert!(
        (r.budget().calls_made() as usize) < 16,
        "at least one probe must be suppressed by dedup"
    );
}
