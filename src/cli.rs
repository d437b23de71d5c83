//! CLI 参数定义

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// shellenv - 从 shell 初始化脚本中提取环境变量
#[derive(Parser)]
#[command(
    name = "shellenv",
    version,
    about = "从 shell 初始化脚本中提取环境变量",
    long_about = "在子 shell 中 source 初始化脚本，对比前后导出的变量，\
                  把变更合并进当前进程或输出为可 eval 的脚本"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 配置文件路径（默认 ~/.shellenv/config.toml）
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// source 单个脚本并输出其导出变更
    Source {
        /// 脚本路径
        file: PathBuf,
        /// 合并进缓存
        #[arg(long)]
        save: bool,
        /// 只在内存副本上演练，不写入进程环境和缓存
        #[arg(long)]
        dry_run: bool,
        /// 输出格式 (env/json)
        #[arg(short, long, default_value = "env")]
        format: String,
    },

    /// 读取缓存（过期则重建）并输出变更
    Load {
        /// 忽略缓存强制重建
        #[arg(long)]
        rebuild: bool,
        /// 输出格式
        #[arg(short, long, default_value = "env")]
        format: String,
    },

    /// 只导入允许列表中的变量
    Snapshot {
        /// 输出格式
        #[arg(short, long, default_value = "env")]
        format: String,
    },

    /// 在合并后的环境中运行命令
    Run {
        /// 要执行的命令
        #[arg(required = true, last = true)]
        command: Vec<String>,
    },

    /// 显示当前状态
    Status,

    /// 缓存管理
    #[command(subcommand)]
    Cache(CacheCommands),

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// 显示缓存状态
    Status,
    /// 清除缓存
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// 初始化配置
    Init {
        #[arg(short, long)]
        force: bool,
    },
    /// 显示生效的配置
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_source_flags() {
        let cli = Cli::parse_from(["shellenv", "source", "x.sh", "--save", "-f", "json"]);
        match cli.command {
            Commands::Source {
                file,
                save,
                dry_run,
                format,
            } => {
                assert_eq!(file, PathBuf::from("x.sh"));
                assert!(save);
                assert!(!dry_run);
                assert_eq!(format, "json");
            }
            _ => panic!("应解析为 source"),
        }
    }

    #[test]
    fn test_parse_run_trailing_command() {
        let cli = Cli::parse_from(["shellenv", "-v", "run", "--", "ls", "-la"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Run { command } => assert_eq!(command, vec!["ls", "-la"]),
            _ => panic!("应解析为 run"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["shellenv", "status", "--config", "/tmp/c.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }
}
