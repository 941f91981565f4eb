use anyhow::{Context, anyhow};
use cdmgen::{CdmgenConfig, ProjectInfo, ProjectWriter, WriteError};
use cdmgen_typegen::{Generator, backend_names, get_backend};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Generate source declarations from a CDM manifest tree.
#[derive(Parser, Debug)]
#[command(name = "cdmgen", version, about)]
struct Cli {
    /// Directory mounted as the `local` corpus namespace
    schema_root: PathBuf,

    /// Root manifest file, relative to SCHEMA_ROOT
    manifest: String,

    /// Output directory (default: config `output.directory`, else the system temp dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output backend (default: config `output.backend`, else csharp)
    #[arg(short, long)]
    backend: Option<String>,

    /// Print generated sources to stdout instead of writing a project
    #[arg(long)]
    stdout: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = CdmgenConfig::load(&cli.schema_root);

    let backend_name = cli.backend.as_deref().unwrap_or(config.backend());
    let backend = get_backend(backend_name).ok_or_else(|| {
        anyhow!(
            "unknown backend '{backend_name}' (available: {})",
            backend_names().join(", ")
        )
    })?;
    let generator = Generator::new(config.generate_options());

    if cli.stdout {
        generator
            .generate_from_dir(&cli.schema_root, &cli.manifest, |declaration| {
                print!("{}", backend.generate(declaration));
            })
            .with_context(|| format!("failed to generate from {}", cli.manifest))?;
        return Ok(());
    }

    let project = ProjectInfo::from_manifest_file(&cli.manifest)?;
    let out_dir = cli
        .output
        .clone()
        .or_else(|| config.output_directory().map(PathBuf::from))
        .unwrap_or_else(std::env::temp_dir);
    let mut writer = ProjectWriter::new(&out_dir, project, backend, config.target_framework());

    let mut failure: Option<WriteError> = None;
    let summary = generator
        .generate_from_dir(&cli.schema_root, &cli.manifest, |declaration| {
            if failure.is_some() {
                return;
            }
            match writer.write(declaration) {
                Ok(path) => println!(
                    "Saved {} to {}",
                    declaration.qualified_name(),
                    path.display()
                ),
                Err(err) => failure = Some(err),
            }
        })
        .with_context(|| format!("failed to generate from {}", cli.manifest))?;
    if let Some(err) = failure {
        return Err(err).context("failed to write generated project");
    }

    tracing::info!(
        manifests = summary.manifests,
        declarations = summary.declarations,
        project = %writer.project_dir().display(),
        "done"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
