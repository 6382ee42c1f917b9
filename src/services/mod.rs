// 服务层模块
//
// - loader: 读取并分区旧版 levels.json
// - schema: 目标表结构
// - migration_manager: 迁移框架与两项迁移
// - store: 迁移结果的只读访问

pub mod loader;
pub mod migration_manager;
pub mod schema;
pub mod store;

pub use loader::{DocumentLoader, SourceDocument};
pub use migration_manager::{
    create_migration_manager, Migration, MigrationManager, MigrationOutcome, MigrationReport,
    MigrationResult, SkipScope, SkippedKey,
};
pub use schema::{ensure_schema, DAILY_GOALS_TABLE, USER_PROFILES_TABLE};
pub use store::LevelingStore;
