//! 统一错误处理系统 for PathSim
//!
//! ## 设计理念
//!
//! 1. **按需设计**：根据错误复杂度选择合适的结构
//!    - 地理解析错误使用独立枚举，保留外部服务失败的上下文
//!    - 简单错误（用户输入、配置）使用字符串变体，简洁高效
//!
//! 2. **分层转换**：
//!    - 子模块错误使用 `#[from]` 注解自动转换
//!    - 外部错误（HTTP 客户端）使用自定义 `From` 实现转换为字符串，降低模块耦合
//!
//! 3. **统一接口**：`SimResult<T>` 提供统一的返回类型，简化错误传播

use thiserror::Error;

// 子模块
pub mod geo;

pub use geo::{GeoError, GeoResult};

/// 统一的模拟器错误类型
#[derive(Error, Debug, Clone)]
pub enum SimError {
    /// 用户输入错误：在未选择目标节点时请求步进。
    /// 引擎状态不会被修改，调用方应将其作为临时提示展示。
    #[error("未选择目标节点: {0}")]
    NoTargetSelected(String),

    #[error("地理邻居解析错误: {0}")]
    Geo(#[from] GeoError),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 统一的结果类型
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_error_converts_to_sim_error() {
        let geo_err = GeoError::Service("connection refused".to_string());
        let sim_err: SimError = geo_err.into();
        assert!(matches!(sim_err, SimError::Geo(_)));
    }

    #[test]
    fn test_error_display() {
        let err = SimError::NoTargetSelected("请先点击选择目标节点".to_string());
        assert!(err.to_string().contains("未选择目标节点"));
    }
}
