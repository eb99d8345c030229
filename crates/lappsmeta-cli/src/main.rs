//! lappsmeta CLI
//!
//! - `generate`: turn a class manifest into per-class JSON descriptors
//! - `vocab`: inspect the discriminator vocabulary
//! - `version`: show which version the fallback chain would pick

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use lappsmeta_core::processor::DEFAULT_OUTPUT_ROOT;
use lappsmeta_core::{
    DescriptorKind, Manifest, MetadataProcessor, ProcessorConfig, VersionResolver, Vocabulary,
};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "lappsmeta")]
#[command(author, version, about = "Generate LAPPS service and data source metadata descriptors")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write `<class>.json` descriptors for every concrete class in a manifest.
    Generate {
        /// Class manifest (JSON)
        manifest: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = DEFAULT_OUTPUT_ROOT)]
        out: PathBuf,
        /// Directory searched for VERSION and pom.xml
        #[arg(long, default_value = ".")]
        workdir: PathBuf,
        /// Extra vocabulary entries (JSON), layered over the builtin table
        #[arg(long)]
        vocab: Option<PathBuf>,
    },

    /// Vocabulary lookups.
    Vocab {
        #[command(subcommand)]
        command: VocabCommands,
    },

    /// Print the version the fallback chain resolves to.
    Version {
        #[arg(long, default_value = ".")]
        workdir: PathBuf,
        #[arg(long, value_enum, default_value_t = KindArg::Service)]
        kind: KindArg,
    },
}

#[derive(Subcommand)]
enum VocabCommands {
    /// Resolve a short name (or URI) to its canonical URI.
    Lookup {
        key: String,
        #[arg(long)]
        vocab: Option<PathBuf>,
    },
    /// List every entry.
    List {
        #[arg(long)]
        vocab: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Service,
    DataSource,
}

impl From<KindArg> for DescriptorKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Service => DescriptorKind::Service,
            KindArg::DataSource => DescriptorKind::DataSource,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_vocabulary(extra: Option<&Path>) -> Result<Vocabulary> {
    let mut vocab = Vocabulary::builtin();
    if let Some(path) = extra {
        let loaded = Vocabulary::load(path)
            .with_context(|| format!("loading vocabulary {}", path.display()))?;
        vocab.extend(loaded);
    }
    Ok(vocab)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            manifest,
            out,
            workdir,
            vocab,
        } => cmd_generate(&manifest, out, workdir, vocab.as_deref())?,
        Commands::Vocab { command } => match command {
            VocabCommands::Lookup { key, vocab } => {
                let vocab = load_vocabulary(vocab.as_deref())?;
                println!("{}", vocab.resolve(&key));
            }
            VocabCommands::List { vocab } => {
                let vocab = load_vocabulary(vocab.as_deref())?;
                for entry in vocab.entries() {
                    println!("{:<24} {}", entry.name, entry.uri);
                }
            }
        },
        Commands::Version { workdir, kind } => {
            let resolver = VersionResolver::new(workdir);
            match resolver.resolve(None, kind.into()) {
                Some(version) => println!("{version}"),
                None => println!("{}", "unknown".yellow()),
            }
        }
    }
    Ok(())
}

fn cmd_generate(
    manifest_path: &Path,
    out: PathBuf,
    workdir: PathBuf,
    vocab: Option<&Path>,
) -> Result<()> {
    let manifest = Manifest::load(manifest_path)
        .with_context(|| format!("reading manifest {}", manifest_path.display()))?;
    let vocabulary = load_vocabulary(vocab)?;
    let config = ProcessorConfig {
        output_root: out,
        working_dir: workdir,
    };
    let processor = MetadataProcessor::new(config, vocabulary);
    let report = processor
        .process(&manifest.elements())
        .context("metadata generation aborted")?;

    for path in &report.written {
        eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
    }
    for class in &report.skipped {
        eprintln!("{} {} (not a concrete class)", "skipped".yellow(), class);
    }
    for (class, reason) in &report.failed {
        eprintln!("{} {}: {}", "failed".red().bold(), class, reason);
    }
    eprintln!(
        "{} {} written, {} skipped, {} failed",
        if report.is_clean() { "ok".green().bold() } else { "done".yellow().bold() },
        report.written.len(),
        report.skipped.len(),
        report.failed.len()
    );
    Ok(())
}
