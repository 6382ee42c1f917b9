// lib.rs - 暴露迁移服务给命令行使用

pub mod core;
pub mod data;
pub mod models;
pub mod services;
pub mod utils;

pub use models::*;
pub use services::migration_manager::{
    create_migration_manager, MigrationManager, MigrationOutcome, MigrationReport,
};
pub use services::store::LevelingStore;

// 重新导出常用类型
pub use anyhow::{Context, Result};

pub use crate::core::init_logger;
