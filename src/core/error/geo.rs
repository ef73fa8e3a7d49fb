//! 地理邻居解析错误类型
//!
//! 外部路网吸附服务的失败均为非致命错误：调用方将其降级为
//! "该探测点无邻居"并继续搜索。

use thiserror::Error;

/// 地理解析错误
#[derive(Error, Debug, Clone)]
pub enum GeoError {
    /// 路网吸附服务请求失败（网络错误、非 2xx 状态码）
    #[error("路网吸附服务请求失败: {0}")]
    Service(String),

    /// 服务响应无法解析
    #[error("路网吸附响应格式错误: {0}")]
    MalformedResponse(String),
}

// 外部 HTTP 错误转换为字符串，避免在错误类型中携带 reqwest 类型
impl From<reqwest::Error> for GeoError {
    fn from(err: reqwest::Error) -> Self {
        GeoError::Service(err.to_string())
    }
}

/// 地理解析结果类型
pub type GeoResult<T> = Result<T, GeoError>;
