//! screener search - Rank candidates against job requirements

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;

use crate::app::AppContext;
use crate::cli::formatters::SearchResults;
use crate::cli::output::{emit_json, robot_ok};
use crate::core::Query;
use crate::error::{Result, ScreenerError};
use crate::loader::{FsTextLoader, TextLoader};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Job description or requirements text
    #[arg(value_name = "TEXT", required_unless_present = "query_file")]
    pub text: Option<String>,

    /// Read the job description from a document instead
    #[arg(long, value_name = "PATH")]
    pub query_file: Option<PathBuf>,

    /// Required skills, comma separated (e.g. "python, sql")
    #[arg(long, short, default_value = "")]
    pub skills: String,

    /// Desired years of experience
    #[arg(long, short, default_value = "0")]
    pub years: u32,

    /// Number of candidates to return (defaults to ranking.default_k)
    #[arg(short, long)]
    pub k: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let text = query_text(args)?;
    let k = args.k.unwrap_or(ctx.config.ranking.default_k as usize);
    let query = Query::new(text)
        .with_skills(Query::parse_skills(&args.skills))
        .with_desired_years(args.years)
        .with_k(k);

    let start = Instant::now();
    let results = ctx.engine.search(&query)?;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let label = if query.text.chars().count() > 60 {
        crate::utils::format::truncate_string(&query.text, 60)
    } else {
        query.text.clone()
    };
    let formatted = SearchResults::new(label, results).with_duration(elapsed_ms);

    if ctx.robot_mode {
        return emit_json(&robot_ok(formatted.to_json()));
    }
    if !ctx.engine.is_built() {
        println!("Index not built yet. Run `screener index <DIR>` first.");
        return Ok(());
    }
    print!("{}", formatted.format_human(100));
    Ok(())
}

fn query_text(args: &SearchArgs) -> Result<String> {
    let text = match &args.query_file {
        Some(path) => FsTextLoader.load_text(path)?,
        None => args.text.clone().unwrap_or_default(),
    };
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(ScreenerError::InvalidQuery(
            "query text is empty".to_string(),
        ));
    }
    Ok(text)
}
