use clap::{Parser, Subcommand, ValueEnum};
use oshiv_install_core::Platform;
use std::path::PathBuf;

use crate::tracing::{LogLevel, TracingFormat};

#[derive(Parser, Debug)]
#[command(name = "oshiv-install")]
#[command(about = "Install verified oshiv release binaries for this platform")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "OSHIV_INSTALL_MANIFEST",
        help = "Release manifest to use instead of the built-in one"
    )]
    pub manifest: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Download, verify and install the binary for this platform")]
    Install {
        #[arg(
            long,
            env = "OSHIV_INSTALL_BIN_DIR",
            help = "Directory to place the executable in"
        )]
        bin_dir: Option<PathBuf>,
        #[arg(long, help = "Install for <os>-<arch> instead of the host")]
        platform: Option<Platform>,
    },
    #[command(about = "Show the release artifact chosen for a platform")]
    Resolve {
        #[arg(long, help = "Resolve for <os>-<arch> instead of the host")]
        platform: Option<Platform>,
        #[arg(long, help = "Output format", value_enum, default_value = "text")]
        output: OutputFormat,
    },
    #[command(about = "List every release target with its URL and checksum")]
    Platforms {
        #[arg(long, help = "Output format", value_enum, default_value = "text")]
        output: OutputFormat,
    },
    #[command(about = "Print the release as a Homebrew formula")]
    Formula,
    #[command(about = "Show version information")]
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn parse() -> Cli {
    Cli::parse()
}
