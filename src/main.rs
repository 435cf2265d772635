use clap::{Parser, Subcommand};
use quillpress::pipeline::{self, BuildPaths};
use quillpress::{config, manifest, output};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "quillpress")]
#[command(about = "Static blog generator: Markdown entries in, HTML pages out")]
#[command(long_about = "\
Static blog generator: Markdown entries in, HTML pages out

Site structure:

  config.json                      # {\"owner\": {\"name\": ..., \"picture\": ...}}
  entries/
  ├── hello-world.md               # → _site/entry-hello-world.html
  └── Road Trip.md                 # → _site/entry-road-trip.html
  templates/
  ├── index.html                   # {{BLOG_OWNER_NAME}}, {{ENTRIES_JSON}}, tag buttons
  └── entry.html                   # {{ENTRY_TITLE}}, {{ENTRY_CONTENT}}, {{ENTRY_TAGS}}

Entry metadata (first available wins):
  Title: front-matter `title:` → first `# ` line → filename
  Tags:  front-matter `tags:`  → `Tags: a, b` line → none

Pages for entries that no longer exist are removed on every build.

Run 'quillpress gen-config' to print a stock config.json.")]
#[command(version)]
struct Cli {
    /// Directory of Markdown entries
    #[arg(long, default_value = pipeline::DEFAULT_ENTRIES_DIR, global = true)]
    entries: PathBuf,

    /// Directory holding index.html and entry.html
    #[arg(long, default_value = pipeline::DEFAULT_TEMPLATES_DIR, global = true)]
    templates: PathBuf,

    /// Output directory
    #[arg(long, default_value = pipeline::DEFAULT_OUTPUT_DIR, global = true)]
    output: PathBuf,

    /// Build configuration file
    #[arg(long, default_value = pipeline::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site: scan → generate → remove stale pages (default)
    Build,
    /// Write entries.json for the client-rendered site
    Manifest {
        /// Where to write the manifest
        #[arg(long, default_value = "entries.json")]
        out: PathBuf,
        /// Prefix for each entry's path in the manifest
        #[arg(long, default_value = "entries")]
        path_prefix: String,
    },
    /// Validate config, templates and entries without writing anything
    Check,
    /// Print a stock config.json
    GenConfig {
        /// Print the runtime (browser-side) shape instead
        #[arg(long)]
        runtime: bool,
    },
}

impl Cli {
    fn build_paths(&self) -> BuildPaths {
        BuildPaths {
            entries_dir: self.entries.clone(),
            templates_dir: self.templates.clone(),
            output_dir: self.output.clone(),
            config_path: self.config.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command.as_ref().unwrap_or(&Command::Build) {
        Command::Build => {
            let report = pipeline::build(&cli.build_paths())?;
            output::print_build_output(&report);
        }
        Command::Manifest { out, path_prefix } => {
            let (doc, errors) =
                manifest::build_manifest(&cli.entries, path_prefix, chrono::Utc::now())?;
            manifest::write_manifest(out, &doc)?;
            output::print_manifest_output(&doc, &errors, out);
        }
        Command::Check => {
            let report = pipeline::check(&cli.build_paths())?;
            output::print_scan_output(&report);
            println!("==> Site is valid");
        }
        Command::GenConfig { runtime } => {
            if *runtime {
                println!("{}", config::stock_runtime_config_json());
            } else {
                println!("{}", config::stock_config_json());
            }
        }
    }

    Ok(())
}
