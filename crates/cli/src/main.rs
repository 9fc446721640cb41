mod check;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use flagwise_manifest::{DEFAULT_MANIFEST_NAME, Manifest};
use std::{fs, io::Write, path::PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

use crate::check::{CheckStatus, check_command_line};

const FALLBACK_BINARY: &str = "command";

#[derive(Parser)]
#[command(name = "flagwise")]
#[command(version, about = "Validate command lines against a flag manifest", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an example flagwise.json
    Init(InitArgs),

    /// Parse a command line against the manifest and print the resolved flags
    Check(CheckArgs),

    /// Print the usage text generated from the manifest
    Usage(UsageArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Target directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,
}

#[derive(Parser)]
struct CheckArgs {
    /// Path to flagwise.json manifest
    #[arg(short, long, default_value = DEFAULT_MANIFEST_NAME, value_name = "FILE")]
    manifest: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Command line to check, invocation name first (after `--`)
    #[arg(last = true, value_name = "ARGV")]
    argv: Vec<String>,
}

#[derive(Parser)]
struct UsageArgs {
    /// Path to flagwise.json manifest
    #[arg(short, long, default_value = DEFAULT_MANIFEST_NAME, value_name = "FILE")]
    manifest: PathBuf,

    /// Invocation name shown in the usage line (overrides manifest)
    #[arg(short, long, value_name = "NAME")]
    binary: Option<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Check(args) => check_command(args),
        Commands::Usage(args) => usage_command(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let manifest_path = dir.join(DEFAULT_MANIFEST_NAME);
    if manifest_path.exists() {
        bail!("{DEFAULT_MANIFEST_NAME} already exists in {}", dir.display());
    }

    let json = Manifest::example().to_json()?;
    fs::write(&manifest_path, format!("{json}\n"))
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;

    eprintln!("Created: {}", manifest_path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {DEFAULT_MANIFEST_NAME} to declare your flags");
    eprintln!("  2. Run: flagwise usage");
    eprintln!("  3. In your script: flagwise check -- \"$0\" \"$@\"");

    Ok(())
}

fn check_command(args: CheckArgs) -> Result<()> {
    tracing::debug!("executing check command");

    let manifest = Manifest::load(&args.manifest)?;
    let argv = if args.argv.is_empty() {
        vec![binary_name(&manifest, None)]
    } else {
        args.argv
    };
    let report = check_command_line(&manifest, &argv);

    match report.status {
        CheckStatus::Help => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.usage);
            }
            Ok(())
        }
        CheckStatus::Ready => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.to_lines());
            }
            Ok(())
        }
        CheckStatus::Error => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let mut stderr = std::io::stderr().lock();
                stderr
                    .write_all(report.usage.as_bytes())
                    .context("failed to write usage")?;
                writeln!(stderr).context("failed to write usage")?;
            }
            bail!("{}", report.error.unwrap_or_default())
        }
    }
}

fn usage_command(args: UsageArgs) -> Result<()> {
    tracing::debug!("executing usage command");

    let manifest = Manifest::load(&args.manifest)?;
    let mut engine = manifest.to_args();
    engine.set_binary(binary_name(&manifest, args.binary.as_deref()));
    engine.register_help_flag();
    engine.generate_usage();

    let mut stdout = std::io::stdout().lock();
    engine
        .print_usage(&mut stdout)
        .context("failed to write usage")?;
    Ok(())
}

fn binary_name(manifest: &Manifest, explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| manifest.binary.clone())
        .unwrap_or_else(|| FALLBACK_BINARY.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
