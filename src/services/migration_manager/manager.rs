// Migration Manager - 迁移管理器核心
//
// 一次运行的完整流程：加载文档 → 打开数据库 → 单事务内建表并依次执行迁移 → 提交一次

use super::migration_trait::{Migration, MigrationResult, SkippedKey};
use super::migrations::{DAILY_GOAL_MIGRATION_ID, USER_PROFILE_MIGRATION_ID};
use crate::data::SqliteManager;
use crate::models::{LegacyDocument, MigrationConfig};
use crate::services::loader::DocumentLoader;
use crate::services::schema::ensure_schema;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// 迁移管理器
pub struct MigrationManager {
    migrations: Vec<Box<dyn Migration>>,
}

/// 一次运行的结局
#[derive(Debug)]
pub enum MigrationOutcome {
    /// 输入文件不存在，未触碰目标库
    InputMissing { path: PathBuf },
    /// 所有记录处理完毕并已提交
    Completed(MigrationReport),
}

impl MigrationManager {
    /// 创建新的迁移管理器
    pub fn new() -> Self {
        Self {
            migrations: Vec::new(),
        }
    }

    /// 注册迁移（按注册顺序执行）
    pub fn register(&mut self, migration: Box<dyn Migration>) {
        tracing::debug!(
            "注册迁移: {} (目标表: {})",
            migration.id(),
            migration.target_table()
        );
        self.migrations.push(migration);
    }

    /// 执行完整迁移
    ///
    /// 流程：
    /// 1. 加载旧版文档（不存在时直接返回 `InputMissing`，不打开数据库）
    /// 2. 打开目标数据库
    /// 3. 在同一个事务中确保表结构并依次执行所有迁移
    /// 4. 提交一次；连接随管理器 drop 释放
    pub fn run_all(&self, config: &MigrationConfig) -> Result<MigrationOutcome> {
        let start_time = Instant::now();

        let source = match DocumentLoader::new().load(&config.input_path) {
            Ok(source) => source,
            Err(e) if e.is_not_found() => {
                tracing::error!(path = %config.input_path.display(), "未找到输入文件，迁移中止");
                return Ok(MigrationOutcome::InputMissing {
                    path: config.input_path.clone(),
                });
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("加载 {} 失败", config.input_path.display())));
            }
        };

        tracing::info!(path = %config.db_path.display(), "连接目标数据库");
        let mut sqlite = SqliteManager::open(&config.db_path)
            .with_context(|| format!("打开数据库 {} 失败", config.db_path.display()))?;

        let results = self.run_document(&mut sqlite, &source.document)?;
        drop(sqlite);

        let report = MigrationReport {
            input_path: config.input_path.clone(),
            db_path: config.db_path.clone(),
            source_checksum: source.checksum,
            results,
            duration_secs: start_time.elapsed().as_secs_f64(),
        };

        tracing::info!(
            users = report.users_migrated(),
            goals = report.goals_migrated(),
            skipped = report.skipped().count(),
            "迁移完成（耗时 {:.2}s）",
            report.duration_secs
        );

        Ok(MigrationOutcome::Completed(report))
    }

    /// 对已加载的文档执行所有迁移（单事务，结束时提交一次）
    ///
    /// 任一迁移返回错误时事务回滚，本次运行不写入任何数据。
    pub fn run_document(
        &self,
        sqlite: &mut SqliteManager,
        document: &LegacyDocument,
    ) -> Result<Vec<MigrationResult>> {
        sqlite.transaction(|tx| -> Result<Vec<MigrationResult>> {
            ensure_schema(tx).context("创建目标表失败")?;

            let mut results = Vec::with_capacity(self.migrations.len());
            for migration in &self.migrations {
                tracing::info!(
                    "执行迁移: {} (目标表: {})",
                    migration.name(),
                    migration.target_table()
                );

                let start_time = Instant::now();
                let mut result = migration
                    .execute(tx, document)
                    .with_context(|| format!("迁移 {} 失败", migration.name()))?;
                result.duration_secs = start_time.elapsed().as_secs_f64();

                tracing::info!(
                    "迁移 {} 成功: {}（耗时 {:.2}s）",
                    migration.name(),
                    result.message,
                    result.duration_secs
                );
                results.push(result);
            }

            Ok(results)
        })
    }

    /// 获取所有已注册的迁移
    pub fn list_migrations(&self) -> Vec<MigrationInfo> {
        self.migrations
            .iter()
            .map(|m| MigrationInfo {
                id: m.id().to_string(),
                name: m.name().to_string(),
                target_table: m.target_table().to_string(),
            })
            .collect()
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// 迁移信息（用于列表展示）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationInfo {
    pub id: String,
    pub name: String,
    pub target_table: String,
}

/// 一次运行的汇总报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    pub input_path: PathBuf,
    pub db_path: PathBuf,
    /// 源文档 SHA256
    pub source_checksum: String,
    pub results: Vec<MigrationResult>,
    pub duration_secs: f64,
}

impl MigrationReport {
    fn records_for(&self, migration_id: &str) -> usize {
        self.results
            .iter()
            .filter(|r| r.migration_id == migration_id)
            .map(|r| r.records_migrated)
            .sum()
    }

    /// 已迁移的用户档案数
    pub fn users_migrated(&self) -> usize {
        self.records_for(USER_PROFILE_MIGRATION_ID)
    }

    /// 已迁移的每日目标数
    pub fn goals_migrated(&self) -> usize {
        self.records_for(DAILY_GOAL_MIGRATION_ID)
    }

    /// 所有被跳过的键
    pub fn skipped(&self) -> impl Iterator<Item = &SkippedKey> {
        self.results.iter().flat_map(|r| r.skipped.iter())
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "已迁移 {} 个用户档案", self.users_migrated())?;
        writeln!(f, "已迁移 {} 个每日目标", self.goals_migrated())?;

        let skipped: Vec<&SkippedKey> = self.skipped().collect();
        if !skipped.is_empty() {
            writeln!(f, "已跳过 {} 个无效条目:", skipped.len())?;
            for entry in skipped {
                writeln!(f, "  - {}", entry)?;
            }
        }

        write!(
            f,
            "迁移完成: {} → {}（耗时 {:.2}s）",
            self.input_path.display(),
            self.db_path.display(),
            self.duration_secs
        )
    }
}
