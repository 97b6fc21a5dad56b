mod commands;
mod error;
mod manifest;

use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use weave_catalog::TypeName;

#[derive(Parser)]
#[command(name = "weave")]
#[command(about = "Checks and inspects mixin compositions described by a manifest", long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Build and validate the composition of every configured target
    Check {
        /// Manifest holding the type catalog and mixin configuration
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Check only this target
        #[arg(short, long)]
        target: Option<String>,
    },

    /// List the concrete mixin types a target needs generated
    Identify {
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        #[arg(short, long)]
        target: Option<String>,
    },

    /// Export the generation metadata of one concrete mixin type
    Export {
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        #[arg(short, long)]
        target: String,

        #[arg(short, long)]
        mixin: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    match args.command {
        Command::Check { manifest, target } => {
            let target = target.map(TypeName::new);
            commands::handle_check(&manifest, target.as_ref())?;
        }
        Command::Identify { manifest, target } => {
            let target = target.map(TypeName::new);
            commands::handle_identify(&manifest, target.as_ref())?;
        }
        Command::Export { manifest, target, mixin, output } => {
            commands::handle_export(&manifest, &TypeName::new(target), &TypeName::new(mixin), output.as_deref())?;
        }
    }
    Ok(())
}
