use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use tickboot_bundler::{Bundler, BundlerConfig, OutputFormat};
use tickboot_shared::Encoding;

#[derive(Debug, Parser)]
#[command(name = "tickboot-bundle")]
#[command(about = "Packs a published app bundle into a tickboot manifest.", long_about = None)]
struct Cli {
    /// App bundle directory containing mono-config.json
    app_bundle_dir: PathBuf,

    /// Directory to write into (defaults to the app bundle directory)
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = EncodingArg::Base64)]
    encoding: EncodingArg,

    #[arg(long, value_enum, default_value_t = FormatArg::Module)]
    format: FormatArg,

    /// Store payloads without DEFLATE compression
    #[arg(long)]
    no_compress: bool,

    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: u32,

    #[arg(long, short)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EncodingArg {
    Base64,
    Base32768,
}

impl From<EncodingArg> for Encoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Base64 => Encoding::Base64,
            EncodingArg::Base32768 => Encoding::Base32768,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Json,
    Module,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Module => OutputFormat::Module,
        }
    }
}

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::builder()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let config = BundlerConfig {
        encoding: cli.encoding.into(),
        compress: !cli.no_compress,
        level: cli.level,
        format: cli.format.into(),
    };
    let bundler = Bundler::new(config).context("invalid bundler options")?;

    let bundle = bundler
        .bundle_dir(&cli.app_bundle_dir)
        .with_context(|| format!("bundle {}", cli.app_bundle_dir.display()))?;

    let out_dir = cli.out.unwrap_or(cli.app_bundle_dir);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create_dir_all {}", out_dir.display()))?;
    bundle.write_to(&out_dir, bundler.config().format)?;

    Ok(())
}
