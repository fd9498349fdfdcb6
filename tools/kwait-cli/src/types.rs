use std::path::PathBuf;

use kwait_core::ResourceId;

/// Wait for cluster resources to become ready
#[derive(clap::Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct KwaitCli {
    #[command(subcommand)]
    pub command: KwaitCommands,
}

#[derive(clap::Subcommand, Clone, Debug)]
pub enum KwaitCommands {
    /// Wait until every resource reports Current
    #[clap(aliases = &["w"])]
    Wait {
        #[clap(flatten)]
        opt: WaitArgs,
        #[clap(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args, Clone, Debug)]
pub struct WaitArgs {
    /// Resource to wait for, as [<namespace>/]<Kind>[.<group>]/<name>
    #[arg(short = 'r', long = "resource", required = true)]
    pub resources: Vec<ResourceId>,

    /// Deadline in seconds, 0 waits forever (default: KWAIT_TIMEOUT_SECS)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// JSON-lines status event feed; `-` reads stdin
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,
}

/// Output formatting options
#[derive(clap::Args, Clone, Debug)]
pub struct OutputArgs {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Available output formats
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}
