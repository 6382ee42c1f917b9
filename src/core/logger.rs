use crate::models::config::{LogConfig, LogFormat, LogLevel};
use std::sync::OnceLock;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// 已生效的日志配置（只允许初始化一次）
static ACTIVE_LOG_CONFIG: OnceLock<LogConfig> = OnceLock::new();

/// 初始化日志系统
///
/// 只输出到控制台（stdout），支持：
/// - 日志级别（trace/debug/info/warn/error）
/// - 输出格式（JSON/纯文本）
///
/// 设置了 `RUST_LOG` 时以环境变量为准。
pub fn init_logger(config: &LogConfig) -> anyhow::Result<()> {
    if ACTIVE_LOG_CONFIG.set(config.clone()).is_err() {
        anyhow::bail!("日志系统已初始化，不能重复初始化");
    }

    let filter = create_env_filter(config.level);
    let output_layer = match config.format {
        LogFormat::Text => create_console_text_layer(),
        LogFormat::Json => create_console_json_layer(),
    };

    Registry::default()
        .with(filter)
        .with(output_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("初始化日志系统失败: {}", e))?;

    tracing::debug!(
        level = config.level.as_str(),
        format = ?config.format,
        "日志系统初始化完成"
    );

    Ok(())
}

/// 当前生效的日志配置（未初始化时为 `None`）
pub fn active_log_config() -> Option<&'static LogConfig> {
    ACTIVE_LOG_CONFIG.get()
}

/// 默认过滤指令：本工具的库与二进制使用指定级别，其余依赖保持 WARN
pub fn default_filter_directive(level: LogLevel) -> String {
    format!(
        "warn,leveling_migrate={lvl},migrate_levels={lvl}",
        lvl = level.as_str()
    )
}

/// 创建环境过滤器
fn create_env_filter(level: LogLevel) -> EnvFilter {
    // 格式：RUST_LOG=debug 或 RUST_LOG=leveling_migrate=trace
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter_directive(level)))
}

/// 创建控制台文本格式输出层
fn create_console_text_layer<S>() -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(cfg!(debug_assertions))
        .with_thread_ids(false)
        .with_ansi(true)
        .boxed()
}

/// 创建控制台 JSON 格式输出层
fn create_console_json_layer<S>() -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_thread_ids(false)
        .with_ansi(false)
        .boxed()
}
