// migrate-levels：把旧版 levels.json 一次性导入 SQLite

use clap::Parser;
use leveling_migrate::{
    create_migration_manager, init_logger, LevelingStore, LogConfig, LogFormat, LogLevel,
    MigrationConfig, MigrationOutcome, Result,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "migrate-levels", version, about = "将旧版 levels.json 迁移到 SQLite")]
struct Cli {
    /// 旧版等级数据文件（默认 levels.json）
    input: Option<PathBuf>,

    /// 日志级别：error/warn/info/debug/trace
    #[arg(long, default_value = "info")]
    log_level: LogLevel,

    /// 日志格式：text/json
    #[arg(long, default_value = "text")]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = MigrationConfig::default().with_input(cli.input);
    config.log = LogConfig {
        level: cli.log_level,
        format: cli.log_format,
    };
    init_logger(&config.log)?;

    match create_migration_manager().run_all(&config)? {
        MigrationOutcome::InputMissing { path } => {
            eprintln!("未找到 {}，没有可迁移的数据", path.display());
        }
        MigrationOutcome::Completed(report) => {
            println!("{}", report);

            let store = LevelingStore::open(&report.db_path)?;
            println!(
                "user_profiles 共 {} 行，daily_goals 共 {} 行",
                store.count_profiles()?,
                store.count_daily_goals()?
            );
        }
    }

    Ok(())
}
