// 核心基础设施层
//
// 目前只有日志系统

pub mod logger;

pub use logger::{active_log_config, default_filter_directive, init_logger};
