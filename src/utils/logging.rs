use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化 tracing 日志（`RUST_LOG` 优先）
///
/// 重复调用是安全的
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n安全分析日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 向日志文件追加一行
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        line
    )?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 安全分析控制台");
    info!("📋 工作流模式: {:?}", config.workflow_mode);
    info!("🔌 传输方式: {:?} ({})", config.transport, config.api_base_url);
    info!("{}", "=".repeat(60));
}

/// 记录候选文件列表
///
/// # 参数
/// - `files`: (文件名, 字节数) 列表
/// - `max_files`: 最大文件数（`None` 表示不限制）
pub fn log_file_list<'a>(files: impl IntoIterator<Item = (&'a str, u64)>, max_files: Option<usize>) {
    let files: Vec<_> = files.into_iter().collect();
    match max_files {
        Some(max) => info!("📁 已选择文件 ({}/{}):", files.len(), max),
        None => info!("📁 已选择文件 ({}):", files.len()),
    }
    for (i, (name, size)) in files.iter().enumerate() {
        info!("   {}. {} ({})", i + 1, name, format_file_size(*size));
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `succeeded`: 是否生成了报告
/// - `report_path`: 报告保存路径
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(succeeded: bool, report_path: Option<&str>, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 分析流程结束");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    if succeeded {
        info!("✅ 分析完成");
    } else {
        info!("❌ 分析未完成");
    }
    if let Some(path) = report_path {
        info!("📄 报告已保存至: {}", path);
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// 格式化文件大小（1024 进制，最多两位小数）
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
