//! Command-line interface for the splitter.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::output_root_for;
use crate::error::{Result, SplitterError};
use crate::output::{execute_plan, FsSink};
use crate::splitter::{load_document, plan_split, summarize, FragmentSummary};

/// UI Bakery Splitter - Split an application export into per-page JSON files.
#[derive(Parser)]
#[command(name = "uibakery-splitter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split an export into per-page fragments on disk.
    Split {
        /// Export file (JSON)
        file: PathBuf,

        /// Output directory (default: input file name without extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show the files that would be written without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show how an export would be grouped, without writing anything.
    Inspect {
        /// Export file (JSON)
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            file,
            output,
            dry_run,
        } => split_command(&file, output.as_deref(), dry_run),
        Commands::Inspect { file, json } => inspect_command(&file, json),
    }
}

/// Execute the split command.
fn split_command(file: &Path, output: Option<&Path>, dry_run: bool) -> Result<()> {
    let root = output.map_or_else(|| output_root_for(file), Path::to_path_buf);

    if root.exists() && !root.is_dir() {
        return Err(SplitterError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output path is not a directory: {}", root.display()),
        )));
    }

    println!(
        "{} {} into {}",
        style("Splitting").bold(),
        style(file.display()).cyan(),
        style(root.display()).green()
    );
    println!();

    let document = load_document(file)?;
    let report = plan_split(&document, &root)?;

    println!("  Fragments: {}", report.fragments.len());
    println!("  Files: {}", report.plan.files.len());

    if dry_run {
        println!();
        for path in report.plan.file_paths() {
            println!("  {}", path.display());
        }
        println!();
        println!("{}", style("Dry run, nothing written.").yellow().bold());
        return Ok(());
    }

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Writing fragments...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    if let Err(e) = execute_plan(&report.plan, &mut FsSink) {
        pb.finish_and_clear();
        return Err(e);
    }

    pb.finish_and_clear();

    println!();
    println!("{} {}", style("Saved to:").green().bold(), root.display());

    Ok(())
}

/// Execute the inspect command.
fn inspect_command(file: &Path, json: bool) -> Result<()> {
    let document = load_document(file)?;
    let summary = summarize(&document)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for fragment in &summary {
        print_fragment(fragment);
    }
    Ok(())
}

fn print_fragment(fragment: &FragmentSummary) {
    let owner = if fragment.owner.is_empty() {
        style("(unowned)".to_string()).dim()
    } else {
        style(fragment.owner.clone()).cyan()
    };
    let location = fragment
        .location
        .as_ref()
        .map_or_else(|| "<root>".to_string(), |path| format!("pages/{}", path.display()));

    println!("{owner} -> {location}");
    println!(
        "  pages: {}, components: {}, slots: {}, workflows: {}",
        fragment.pages, fragment.components, fragment.slots, fragment.workflows
    );
}
