//! 核心模块
//!
//! 包含统一错误处理等基础设施

pub mod error;

pub use error::{GeoError, GeoResult, SimError, SimResult};
