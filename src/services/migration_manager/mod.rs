// Migration Manager Module
//
// 旧版 levels.json → SQLite 的迁移管理

mod manager;
mod migration_trait;
mod migrations;


pub use manager::{MigrationInfo, MigrationManager, MigrationOutcome, MigrationReport};
pub use migration_trait::{Migration, MigrationResult, SkipScope, SkippedKey};
pub use migrations::{
    map_daily_goal, map_user_record, upsert_daily_goal, upsert_user_profile, DailyGoalMigration,
    UserProfileMigration, DAILY_GOAL_MIGRATION_ID, USER_PROFILE_MIGRATION_ID,
};

/// 创建并初始化迁移管理器
///
/// 按顺序注册：
/// - UserProfileMigration - 进度分区 → user_profiles
/// - DailyGoalMigration - 元数据分区 → daily_goals
pub fn create_migration_manager() -> MigrationManager {
    let mut manager = MigrationManager::new();

    manager.register(Box::new(UserProfileMigration::new()));
    manager.register(Box::new(DailyGoalMigration::new()));

    tracing::debug!(
        "迁移管理器初始化完成，已注册 {} 个迁移",
        manager.list_migrations().len()
    );

    manager
}
