//! 路网吸附客户端
//!
//! 把一个探测坐标吸附到最近的道路上。生产实现走 Roads 风格的
//! HTTP 接口，测试通过 `RoadSnapper` 特征注入可配置的桩实现。

use super::GeoPoint;
use crate::config::GeoConfig;
use crate::core::{GeoError, GeoResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;

/// 路网吸附服务的注入缝
#[async_trait]
pub trait RoadSnapper: Send + Sync {
    /// 返回吸附后的道路点；该处没有道路时返回 `None`
    async fn snap(&self, probe: &GeoPoint) -> GeoResult<Option<GeoPoint>>;
}

/// 吸附服务的线格式
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapResponse {
    snapped_points: Option<Vec<SnappedPoint>>,
}

#[derive(Debug, Deserialize)]
struct SnappedPoint {
    location: SnapLocation,
}

#[derive(Debug, Deserialize)]
struct SnapLocation {
    latitude: f64,
    longitude: f64,
}

/// Roads 风格吸附接口的 HTTP 客户端
pub struct RoadsApiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl RoadsApiClient {
    pub fn new(config: &GeoConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl RoadSnapper for RoadsApiClient {
    async fn snap(&self, probe: &GeoPoint) -> GeoResult<Option<GeoPoint>> {
        let path = format!("{},{}", probe.lat, probe.lng);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("path", path.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body: SnapResponse = response
            .json()
            .await
            .map_err(|e| GeoError::MalformedResponse(e.to_string()))?;

        Ok(body
            .snapped_points
            .and_then(|points| points.into_iter().next())
            .map(|p| GeoPoint::new(p.location.latitude, p.location.longitude)))
    }
}

/// 测试桩：按探测点坐标键配置响应
///
/// 未配置的键按构造方式回退：`identity()` 返回探测点本身
/// （处处有路），`new()` 返回 `None`（处处无路）。
pub struct FixtureSnapper {
    responses: Mutex<HashMap<String, Option<GeoPoint>>>,
    identity_fallback: bool,
}

impl FixtureSnapper {
    /// 无配置时视为无路
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            identity_fallback: false,
        }
    }

    /// 无配置时原样返回探测点
    pub fn identity() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            identity_fallback: true,
        }
    }

    /// 为某个探测点设置固定响应
    pub fn set_response(&self, probe: &GeoPoint, response: Option<GeoPoint>) {
        self.responses.lock().insert(probe.key(), response);
    }
}

impl Default for FixtureSnapper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoadSnapper for FixtureSnapper {
    async fn snap(&self, probe: &GeoPoint) -> GeoResult<Option<GeoPoint>> {
        if let Some(configured) = self.responses.lock().get(&probe.key()) {
            return Ok(*configured);
        }
        if self.identity_fallback {
            Ok(Some(*probe))
        } else {
            Ok(None)
        }
    }
}
