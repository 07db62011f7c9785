//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use llmsgen_core::{
    DirRouter, FileSystem, GenerateOptions, GenerateReport, MemoryFs, ProgressReporter, StdFs,
    generate, render_llms_txt, resolve_content,
};
use llmsgen_markdown::{FrontmatterFilter, build_chain};
use llmsgen_shared::{AppConfig, Metadata, init_config, load_config, load_config_from, to_toml};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// llmsgen: sanitized Markdown copies and an llms.txt index for your docs.
#[derive(Parser)]
#[command(
    name = "llmsgen",
    version,
    about = "Rewrite Markdown/MDX content with filtered frontmatter and generate llms.txt.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./llmsgen.toml).
    #[arg(short, long, global = true, env = "LLMSGEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Rewrite content files and write llms.txt.
    Generate {
        /// Output directory (overrides `output.dir`).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Do not write llms.txt.
        #[arg(long)]
        no_llms_txt: bool,

        /// Do not write rewritten content files.
        #[arg(long)]
        no_markdown: bool,

        /// Run everything in memory and list what would be written.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the llms.txt document to stdout.
    Render,

    /// Print a file's parsed frontmatter.
    Frontmatter {
        /// Markdown/MDX file to inspect.
        file: PathBuf,

        /// Print as JSON instead of YAML.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default llmsgen.toml.
    Init {
        /// Directory to create the config in.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "llmsgen=info",
        1 => "llmsgen=debug",
        _ => "llmsgen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Generate {
            out,
            no_llms_txt,
            no_markdown,
            dry_run,
        } => {
            let overrides = Overrides {
                out,
                no_llms_txt,
                no_markdown,
            };
            cmd_generate(config_path, overrides, dry_run)
        }
        Command::Render => cmd_render(config_path),
        Command::Frontmatter { file, json } => cmd_frontmatter(&file, json),
        Command::Config { action } => match action {
            ConfigAction::Init { dir } => cmd_config_init(&dir),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

/// CLI flags layered over the config file.
struct Overrides {
    out: Option<PathBuf>,
    no_llms_txt: bool,
    no_markdown: bool,
}

impl Overrides {
    fn apply(self, config: &mut AppConfig) {
        if let Some(out) = self.out {
            config.output.dir = out;
        }
        if self.no_llms_txt {
            config.output.llms_txt = false;
        }
        if self.no_markdown {
            config.output.markdown = false;
        }
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_generate(config_path: Option<&Path>, overrides: Overrides, dry_run: bool) -> Result<()> {
    let mut config = resolve_config(config_path)?;
    overrides.apply(&mut config);

    let content = resolve_content(&config.content)?;
    let transforms = build_chain(&config.transforms)?;
    let filter = FrontmatterFilter::from(&config.frontmatter);
    let remap = |metadata: &Metadata| filter.apply(metadata);
    let router = DirRouter::from_config(&config.output);

    info!(
        documents = content.len(),
        transforms = transforms.len(),
        out = %config.output.dir.display(),
        dry_run,
        "generating"
    );

    let memory = MemoryFs::overlay();
    let fs: &dyn FileSystem = if dry_run { &memory } else { &StdFs };

    let format_frontmatter = (!config.frontmatter.is_identity())
        .then_some(&remap as &dyn Fn(&Metadata) -> Metadata);

    let options = GenerateOptions {
        transforms: Some(&transforms),
        format_frontmatter,
        ..GenerateOptions::new(&content, &config.llms, &router, fs)
    };

    let reporter = CliProgress::new();
    let report = generate(&options, &reporter)?;

    if dry_run {
        println!();
        println!("  Dry run: nothing was written.");
        for (path, contents) in memory.writes() {
            println!("  would write {} ({} bytes)", path.display(), contents.len());
        }
        println!();
        return Ok(());
    }

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &GenerateReport) {
    println!();
    println!("  Generation complete!");
    println!("  Written:  {}", report.written.len());
    println!("  Skipped:  {}", report.skipped);
    match &report.llms_txt {
        Some(path) => println!("  llms.txt: {}", path.display()),
        None => println!("  llms.txt: skipped"),
    }
    println!("  Time:     {:.2}s", report.elapsed.as_secs_f64());
    println!();
}

fn cmd_render(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    println!("{}", render_llms_txt(&config.llms));
    Ok(())
}

fn cmd_frontmatter(file: &Path, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .wrap_err_with(|| format!("failed to read {}", file.display()))?;
    let metadata = llmsgen_markdown::extract(&raw)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    } else if metadata.is_empty() {
        println!("# no frontmatter");
    } else {
        print!("{}", serde_yaml::to_string(&metadata)?);
    }
    Ok(())
}

fn cmd_config_init(dir: &Path) -> Result<()> {
    let path = init_config(dir)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = to_toml(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        Self::with_bar(ProgressBar::new_spinner())
    }

    fn with_bar(spinner: ProgressBar) -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

// Clears the spinner on the error path too, before the error report prints.
impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn document_written(&self, target: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Writing [{current}/{total}] {}", target.display()));
    }

    fn document_skipped(&self, id: &str) {
        self.spinner.set_message(format!("Skipping {id}"));
    }

    fn done(&self, _report: &GenerateReport) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::parse_from([
            "llmsgen",
            "-vv",
            "--config",
            "site/llmsgen.toml",
            "generate",
            "--out",
            "dist",
            "--no-llms-txt",
            "--dry-run",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("site/llmsgen.toml")));
        match cli.command {
            Command::Generate {
                out,
                no_llms_txt,
                no_markdown,
                dry_run,
            } => {
                assert_eq!(out, Some(PathBuf::from("dist")));
                assert!(no_llms_txt);
                assert!(!no_markdown);
                assert!(dry_run);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn spinner_is_cleared_when_generation_fails() {
        let bar = ProgressBar::hidden();
        {
            let progress = CliProgress::with_bar(bar.clone());
            progress.phase("Rewriting content");
            assert!(!bar.is_finished());
        }
        assert!(bar.is_finished());
    }

    #[test]
    fn spinner_finishes_once_on_success() {
        let bar = ProgressBar::hidden();
        let progress = CliProgress::with_bar(bar.clone());
        progress.done(&GenerateReport {
            written: vec![],
            skipped: 0,
            llms_txt: None,
            elapsed: std::time::Duration::ZERO,
        });
        assert!(bar.is_finished());
        drop(progress);
        assert!(bar.is_finished());
    }

    #[test]
    fn overrides_layer_over_config() {
        let mut config = AppConfig::default();
        Overrides {
            out: Some(PathBuf::from("dist")),
            no_llms_txt: true,
            no_markdown: false,
        }
        .apply(&mut config);

        assert_eq!(config.output.dir, PathBuf::from("dist"));
        assert!(!config.output.llms_txt);
        assert!(config.output.markdown);
    }
}
