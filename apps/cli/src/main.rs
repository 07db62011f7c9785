//! llmsgen CLI: documentation build helper.
//!
//! Writes sanitized copies of Markdown/MDX content with filtered frontmatter
//! and an llms.txt index summarizing the site.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
