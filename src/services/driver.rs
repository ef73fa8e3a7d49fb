//! 搜索驱动器
//!
//! 把逐步引擎接到会话控制面上：每轮等待会话可运行，单步模式下
//! 还要等一次放行，然后执行一步并按速度倍率延迟。进入终态或
//! 会话被取消时返回。

use crate::core::SimResult;
use crate::services::engine::{SearchState, SteppedEngine, StepOutcome};
use crate::services::session::SearchSession;
use std::sync::Arc;
use std::time::Duration;

/// 按会话节奏推进引擎的驱动器
pub struct StepDriver {
    session: Arc<SearchSession>,
    base_delay: Duration,
}

impl StepDriver {
    pub fn new(session: Arc<SearchSession>, base_delay: Duration) -> Self {
        Self {
            session,
            base_delay,
        }
    }

    /// 驱动引擎直到终态或取消，返回引擎最终状态
    pub async fn drive(&self, engine: &mut dyn SteppedEngine) -> SimResult<SearchState> {
        loop {
            if !self.session.wait_ready().await {
                log::info!("{} 搜索被取消", engine.name());
                return Ok(engine.state());
            }
            if self.session.is_step_mode() && !self.session.wait_step_request().await {
                log::info!("{} 搜索被取消", engine.name());
                return Ok(engine.state());
            }

            let outcome = engine.step()?;
            match &outcome {
                StepOutcome::Expanded(id) => log::debug!("{} 扩展节点 {}", engine.name(), id),
                StepOutcome::StalePop(id) => log::debug!("{} 作废过期条目 {}", engine.name(), id),
                other => log::debug!("{} 步进结果: {:?}", engine.name(), other),
            }

            if engine.state().is_terminal() {
                log::info!(
                    "{} 搜索结束，状态 {:?}，访问 {} 个节点",
                    engine.name(),
                    engine.state(),
                    engine.snapshot().visited.len()
                );
                return Ok(engine.state());
            }

            let delay = self.base_delay.mul_f64(self.session.speed());
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::services::engine::BfsEngine;

    fn three_node_chain() -> Graph {
        let mut g = Graph::new();
        g.add_node(0);
        g.add_node(1);
        g.add_node(2);
        g.connect(1, 2, 10);
        g.connect(2, 3, 10);
        g
    }

    #[tokio::test]
    async fn test_drive_runs_engine_to_found() {
        let mut engine = BfsEngine::new(three_node_chain());
        engine.select_target(3);

        let driver = StepDriver::new(Arc::new(SearchSession::new()), Duration::ZERO);
        let state = driver
            .drive(&mut engine)
            .await
            .expect("drive should succeed in test");

        assert_eq!(state, SearchState::Found);
        assert_eq!(engine.snapshot().solution_paths, vec![vec![1, 2, 3]]);
    }

    #[tokio::test]
    async fn test_cancelled_session_stops_mid_search() {
        let mut engine = BfsEngine::new(three_node_chain());
        engine.select_target(3);

        let session = Arc::new(SearchSession::new());
        session.cancel();
        let driver = StepDriver::new(Arc::clone(&session), Duration::ZERO);
        let state = driver
            .drive(&mut engine)
            .await
            .expect("drive should succeed in test");

        // 取消发生在第一步之前，引擎停在选中目标后的 Armed
        assert_eq!(state, SearchState::Armed);
    }

    #[tokio::test]
    async fn test_step_mode_advances_one_step_per_request() {
        let mut engine = BfsEngine::new(three_node_chain());
        engine.select_target(3);

        let session = Arc::new(SearchSession::new());
        session.set_step_mode(true);
        let driver = StepDriver::new(Arc::clone(&session), Duration::ZERO);

        // 预先放行三步（Started、Expanded、TargetReached），之后取消
        let controller = {
            let session = Arc::clone(&session);
            tokio::spawn(async move {
                for _ in 0..3 {
                    session.request_step();
                    tokio::task::yield_now().await;
                }
            })
        };

        let state = driver
            .drive(&mut engine)
            .await
            .expect("drive should succeed in test");
        controller.await.expect("controller should finish in test");

        assert_eq!(state, SearchState::Found);
    }
}
