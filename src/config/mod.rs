//! 配置模块
//!
//! 提供 TOML 配置文件的加载与保存，按功能域分节：
//! `[log]` 日志、`[search]` 搜索驱动、`[geo]` 地理邻居解析

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "pathsim".to_string(),
            max_file_size: 10 * 1024 * 1024, // 10MB
            max_files: 5,
        }
    }
}

/// 搜索驱动配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    /// 自动驱动模式下每步之间的基础延迟（毫秒），实际延迟乘以速度倍率
    pub step_delay_ms: u64,
    /// 速度倍率（1.0 = 正常速度）
    pub speed: f64,
    /// 随机游走的步数预算，超出后从起点重新开始
    pub random_walk_max_steps: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 1000,
            speed: 1.0,
            random_walk_max_steps: 100,
        }
    }
}

/// 地理邻居解析配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeoConfig {
    /// 路网吸附服务端点
    pub endpoint: String,
    /// 服务 API 密钥
    pub api_key: String,
    /// 探测点角偏移（度），约 45 米
    pub probe_offset_deg: f64,
    /// 新探测点与已知道路点的最小距离（米），更近则跳过探测
    pub dedup_radius_m: f64,
    /// 吸附点与探测点的最大可接受距离（米）
    pub snap_threshold_m: f64,
    /// 同方向第二候选与第一候选的最小间隔（米），超过视为另一条道路
    pub second_road_gap_m: f64,
    /// 每次外呼之间的基础延迟（毫秒），实际延迟乘以速度倍率
    pub request_delay_ms: u64,
    /// 整个会话允许的最大外呼次数
    pub max_calls: u32,
    /// 会话最长持续时间（秒），超时后不再外呼
    pub session_timeout_secs: u64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://roads.googleapis.com/v1/snapToRoads".to_string(),
            api_key: String::new(),
            probe_offset_deg: 0.00045,
            dedup_radius_m: 25.0,
            snap_threshold_m: 20.0,
            second_road_gap_m: 100.0,
            request_delay_ms: 100,
            max_calls: 500,
            session_timeout_secs: 1800,
        }
    }
}

/// 应用配置
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub geo: GeoConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置文件，不存在时回退到默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("配置文件加载失败，使用默认配置: {}", e);
                Config::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
