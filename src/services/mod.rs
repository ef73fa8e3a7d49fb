//! 服务层模块
//!
//! 包含边界策略、逐步搜索引擎、路径重建与驱动器

pub mod driver;
pub mod engine;
pub mod frontier;
pub mod path;
pub mod session;

pub use driver::StepDriver;
pub use engine::{EngineSnapshot, SearchState, SteppedEngine, StepOutcome};
pub use session::SearchSession;
