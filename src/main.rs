use clap::{Parser, Subcommand};
use labfolio::{config, generate, output, scan, serve, types, views};
use std::path::PathBuf;

/// Shared flags for commands that touch the visit counter.
#[derive(clap::Args, Clone)]
struct ModeArgs {
    /// Arm the remote visit counter: generated pages start from live counts
    /// and page views increment them
    #[arg(long)]
    production: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "labfolio")]
#[command(about = "Static site generator for academic coursework portfolios")]
#[command(long_about = "\
Static site generator for academic coursework portfolios

Your filesystem is the data source. Top-level directories are subjects,
markdown files are laboratory outputs, and filename markers assign each
output to the midterm or final term.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── cc104/                       # Subject (id from the registry)
  │   ├── meta.json                # Subject description (optional)
  │   ├── m-1.md                   # Midterm output (m- marker)
  │   ├── f-1.md                   # Final output (f- marker)
  │   └── modules/                 # Course handouts
  │       └── sql-basics.md
  └── itwst01/
      └── m-1-lab-markup.md        # \"lab\" in the name picks the card icon

Every document starts with YAML frontmatter:

  ---
  title: \"Lab 1: ER Modeling\"      # Required
  description: One-line summary    # Optional
  difficulty: easy                 # Optional: easy | medium | hard
  files: 2                         # Optional: attachment count
  draft: true                      # Optional: keep off the listings
  ---

Visit counting needs UPSTASH_REDIS_REST_URL and UPSTASH_REDIS_REST_TOKEN
in the environment; without --production, counts are read but never
incremented.

Run 'labfolio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Manifest file written by scan and read by generate
    #[arg(long, default_value = "manifest.json", global = true)]
    manifest: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Produce the final HTML site from the manifest
    Generate(ModeArgs),
    /// Run the full pipeline: scan → generate
    Build(ModeArgs),
    /// Validate content directory without building
    Check,
    /// Serve the output directory with the visit and preview endpoints
    Serve(ServeArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args, Clone)]
struct ServeArgs {
    #[command(flatten)]
    mode: ModeArgs,

    /// Port to listen on (overrides config.toml)
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&cli.manifest, json)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate(mode) => {
            let store = views::VisitStore::from_env(mode.production);
            generate::generate(&cli.manifest, &cli.output, &store)?;
            let manifest_content = std::fs::read_to_string(&cli.manifest)?;
            let manifest: types::Manifest = serde_json::from_str(&manifest_content)?;
            output::print_generate_output(&manifest);
        }
        Command::Build(mode) => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&cli.manifest, json)?;
            output::print_scan_output(&manifest, &cli.source);

            println!(
                "==> Stage 2: Generating HTML \u{2192} {}",
                cli.output.display()
            );
            let store = views::VisitStore::from_env(mode.production);
            generate::generate(&cli.manifest, &cli.output, &store)?;
            output::print_generate_output(&manifest);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::Serve(args) => {
            let config = config::load_config(&cli.source)?;
            let port = args.port.unwrap_or(config.serve.port);
            let store = views::VisitStore::from_env(args.mode.production);
            serve::serve(&cli.output, &config.serve.interface, port, store)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
