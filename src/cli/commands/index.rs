//! screener index - Build the candidate index from a folder

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{emit_json, robot_ok, robot_partial};
use crate::error::Result;
use crate::indexer::{BuildProgress, BuildReport};

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Folder of resumes (defaults to index.corpus_dir)
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Serialize)]
struct IndexOutput<'a> {
    folder: String,
    index_path: String,
    metadata_path: String,
    #[serde(flatten)]
    report: &'a BuildReport,
}

pub fn run(ctx: &AppContext, args: &IndexArgs) -> Result<()> {
    let folder = args
        .dir
        .clone()
        .unwrap_or_else(|| ctx.config.corpus_dir(&ctx.root));
    let builder = ctx.index_builder();

    let pb = if ctx.robot_mode {
        ProgressBar::hidden()
    } else {
        println!("{} {}", "Indexing".bold(), folder.display());
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    };

    let built = builder.build_from_folder_with(&folder, |event| match event {
        BuildProgress::Discovered(total) => pb.set_length(total as u64),
        BuildProgress::Loaded(path) => {
            pb.set_message(
                path.file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .into_owned(),
            );
            pb.inc(1);
        }
        BuildProgress::Failed(path, reason) => {
            pb.println(format!("{} {} - {}", "✗".red(), path.display(), reason));
            // Embedding failures arrive after every file was counted
            if pb.position() < pb.length().unwrap_or(0) {
                pb.inc(1);
            }
        }
        BuildProgress::Embedding(count) => pb.set_message(format!("embedding {count} documents")),
    })?;
    pb.finish_and_clear();

    let report = built.report;
    if let Some(index) = built.index {
        ctx.engine.install(index);
    }

    if ctx.robot_mode {
        let paths = builder.paths();
        let output = IndexOutput {
            folder: folder.display().to_string(),
            index_path: paths.index_path.display().to_string(),
            metadata_path: paths.metadata_path.display().to_string(),
            report: &report,
        };
        if report.failures.is_empty() {
            return emit_json(&robot_ok(output));
        }
        let warnings = report
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.path.display(), f.reason))
            .collect();
        return emit_json(&robot_partial(output, report.indexed, warnings));
    }

    println!();
    if report.indexed == 0 {
        println!("{}", "No documents indexed".yellow());
    } else {
        println!(
            "{} Indexed {} resumes in {:.2}s ({} failed)",
            "✓".green().bold(),
            report.indexed,
            report.elapsed.as_secs_f64(),
            report.failures.len()
        );
    }
    if !report.failures.is_empty() {
        println!();
        println!(
            "{} {} files could not be indexed",
            "!".yellow(),
            report.failures.len()
        );
        if ctx.verbosity > 0 {
            for failure in &report.failures {
                println!("  {} {}", failure.path.display(), failure.reason.dimmed());
            }
        } else {
            println!("  rerun with -v to list them");
        }
    }

    Ok(())
}
