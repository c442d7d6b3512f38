//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use mobilenet_hostapi::{BatchConfig, FailurePolicy, Isolation};
use mobilenet_sandbox::SandboxConfig;

/// Classify every file in a directory with a MobileNet V2 WASI module.
#[derive(Debug, Parser)]
#[command(name = "mobilenet-classify", version)]
pub struct Args {
    /// Directory of input images. Every regular file is one item.
    pub inputs: PathBuf,

    /// Compiled inference module.
    #[arg(long, env = "MOBILENET_MODULE", default_value = "./model/optimized-wasi.wasm")]
    pub module: PathBuf,

    /// Serialized model passed verbatim to the module.
    #[arg(
        long,
        env = "MOBILENET_MODEL",
        default_value = "./model/mobilenet_v2_1.4_224_frozen.pb"
    )]
    pub model: PathBuf,

    /// Newline-separated labels; line N labels class N.
    #[arg(long, env = "MOBILENET_LABELS", default_value = "./model/labels.txt")]
    pub labels: PathBuf,

    /// Instruction fuel per item. Unmetered when omitted.
    #[arg(long, env = "MOBILENET_FUEL")]
    pub fuel: Option<u64>,

    /// Guest memory ceiling in 64 KiB pages.
    #[arg(long, env = "MOBILENET_MAX_MEMORY_PAGES", default_value_t = 32768)]
    pub max_memory_pages: u32,

    /// Instance sharing between items.
    #[arg(long, value_enum, default_value_t = IsolationArg::PerItem)]
    pub isolation: IsolationArg,

    /// Keep going after a failed item instead of stopping the batch.
    #[arg(long)]
    pub keep_going: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IsolationArg {
    PerItem,
    PerBatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

impl Args {
    pub fn sandbox_config(&self) -> SandboxConfig {
        SandboxConfig {
            max_memory_pages: self.max_memory_pages,
            fuel_limit: self.fuel,
            ..SandboxConfig::default()
        }
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            isolation: match self.isolation {
                IsolationArg::PerItem => Isolation::PerItem,
                IsolationArg::PerBatch => Isolation::PerBatch,
            },
            failure_policy: if self.keep_going {
                FailurePolicy::Continue
            } else {
                FailurePolicy::Abort
            },
        }
    }
}
