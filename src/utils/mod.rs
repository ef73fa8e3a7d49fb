//! 工具模块
//!
//! 包含日志等通用辅助功能

pub mod logging;
