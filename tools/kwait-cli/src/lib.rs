mod output;
mod replay;
mod types;

use std::time::Duration;

use anyhow::Context;
use envconfig::Envconfig;
use kwait_core::{
    EventSource, ReadinessWaiter, ResourceId, WaitConfig, WaitContext,
    WaitReport,
};
use tracing::{info, warn};

pub use output::{Formatter, ReportView, format_report, print_report};
pub use replay::{ReplayEventSource, decode_line};
pub use types::{KwaitCli, KwaitCommands, OutputArgs, OutputFormat, WaitArgs};

/// Returns whether every resource became ready.
pub async fn run(cli: KwaitCli) -> anyhow::Result<bool> {
    match cli.command {
        KwaitCommands::Wait { opt, output } => handle_wait(opt, output).await,
    }
}

async fn handle_wait(
    opt: WaitArgs,
    output: OutputArgs,
) -> anyhow::Result<bool> {
    let cfg = WaitConfig::init_from_env()
        .context("invalid KWAIT_* environment")?;
    let timeout = match opt.timeout {
        Some(secs) => (secs > 0).then(|| Duration::from_secs(secs)),
        None => cfg.timeout(),
    };
    let source = ReplayEventSource::open(&opt.input).await?;
    let ctx = context_for(timeout);
    cancel_on_ctrl_c(ctx.clone());

    let report = wait(&ctx, &source, &opt.resources, &cfg).await;
    print_report(&report, &output.output)?;
    Ok(report.is_ready())
}

pub fn context_for(timeout: Option<Duration>) -> WaitContext {
    match timeout {
        Some(t) => WaitContext::with_timeout(t),
        None => WaitContext::background(),
    }
}

pub async fn wait<S: EventSource + ?Sized>(
    ctx: &WaitContext,
    source: &S,
    resources: &[ResourceId],
    cfg: &WaitConfig,
) -> WaitReport {
    info!(
        resources = resources.len(),
        deadline = ?ctx.deadline(),
        "waiting for resources"
    );
    ReadinessWaiter::new(source)
        .with_options(cfg.watch_options())
        .run(ctx, resources)
        .await
}

fn cancel_on_ctrl_c(ctx: WaitContext) {
    tokio::spawn(async move {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if res.is_ok() {
                    warn!("interrupted, cancelling wait");
                    ctx.cancel();
                }
            }
            _ = ctx.done() => {}
        }
    });
}
