//! 应用程序容器
//!
//! 负责依赖注入和命令分发

use crate::application::{EnvMerger, ShellEnvService, SourcingSettings};
use crate::cli::{CacheCommands, Commands, ConfigCommands};
use crate::commands::cache::{CacheClearCommand, CacheStatusCommand};
use crate::commands::config::{ConfigInfoCommand, ConfigInitCommand};
use crate::commands::load::LoadCommand;
use crate::commands::run::RunCommand;
use crate::commands::snapshot::SnapshotCommand;
use crate::commands::source::SourceCommand;
use crate::commands::status::StatusCommand;
use crate::commands::CommandHandler;
use crate::domain::error::Result;
use crate::domain::models::OutputFormat;
use crate::domain::repositories::{ChangesetCache, ShellRunner};
use crate::format::ExportParser;
use crate::infrastructure::{FileChangesetCache, ProcessShellRunner, ShellEnvConfig, paths};
use std::path::PathBuf;
use std::sync::Arc;

/// 应用程序容器
pub struct Application {
    /// shell 环境服务
    pub service: Arc<ShellEnvService>,
    pub merger: EnvMerger,
    pub config: ShellEnvConfig,
    pub config_path: PathBuf,
}

impl Application {
    /// 读取配置并装配依赖；未指定路径时使用默认配置文件
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => paths::default_config_path()?,
        };
        let config = ShellEnvConfig::load(Some(&config_path))?;
        Ok(Self::with_config(config, config_path))
    }

    pub fn with_config(config: ShellEnvConfig, config_path: PathBuf) -> Self {
        let runner: Arc<dyn ShellRunner> = Arc::new(ProcessShellRunner::new(
            config.shell.clone(),
            config.shell_args.clone(),
            config.timeout(),
        ));
        let cache: Arc<dyn ChangesetCache> = Arc::new(FileChangesetCache::new(config.cache_path()));
        let settings = SourcingSettings {
            source_files: config.source_paths(),
            allow_list: config.allow_list(),
        };

        let service = Arc::new(ShellEnvService::new(
            runner,
            cache,
            ExportParser::new(config.dialect),
            settings,
        ));

        Self {
            service,
            merger: EnvMerger::new(config.path_variable.clone()),
            config,
            config_path,
        }
    }

    /// 为子命令创建处理器
    pub fn handler(&self, command: Commands) -> Box<dyn CommandHandler> {
        let service = Arc::clone(&self.service);
        let merger = self.merger.clone();

        match command {
            Commands::Source {
                file,
                save,
                dry_run,
                format,
            } => Box::new(SourceCommand::new(
                service,
                merger,
                file,
                save,
                dry_run,
                OutputFormat::from(format.as_str()),
            )),
            Commands::Load { rebuild, format } => Box::new(LoadCommand::new(
                service,
                merger,
                rebuild,
                OutputFormat::from(format.as_str()),
            )),
            Commands::Snapshot { format } => Box::new(SnapshotCommand::new(
                service,
                merger,
                OutputFormat::from(format.as_str()),
            )),
            Commands::Run { command } => Box::new(RunCommand::new(service, merger, command)),
            Commands::Status => Box::new(StatusCommand::new(
                service,
                self.config.clone(),
                self.config_path.clone(),
            )),
            Commands::Cache(CacheCommands::Status) => Box::new(CacheStatusCommand::new(service)),
            Commands::Cache(CacheCommands::Clear) => Box::new(CacheClearCommand::new(service)),
            Commands::Config(ConfigCommands::Init { force }) => {
                Box::new(ConfigInitCommand::new(self.config_path.clone(), force))
            }
            Commands::Config(ConfigCommands::Info) => Box::new(ConfigInfoCommand::new(
                self.config.clone(),
                self.config_path.clone(),
            )),
        }
    }
}
