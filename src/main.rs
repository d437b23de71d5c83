//! shellenv 主程序入口
//!
//! - 安静模式：默认只输出变更本身，成功静默
//! - 日志：写到 stderr，默认 warn，--verbose 提升到 debug，RUST_LOG 优先

use clap::Parser;
use shellenv::app::Application;
use shellenv::cli::Cli;
use shellenv::commands::CommandContext;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let app = Application::new(cli.config)?;
    let ctx = CommandContext {
        verbose: cli.verbose,
    };

    app.handler(cli.command).execute(&ctx).await?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}
