//! screener extract - Show the record extracted from one resume

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::core::CandidateRecord;
use crate::error::Result;
use crate::extract::RecordExtractor;
use crate::loader::{FsTextLoader, TextLoader};

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Resume file (PDF, Word or plain text)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Include the normalized full text
    #[arg(long)]
    pub full_text: bool,
}

pub fn run(ctx: &AppContext, args: &ExtractArgs) -> Result<()> {
    run_without_context(ctx.robot_mode, args)
}

/// Extraction needs no index or config.
pub fn run_without_context(robot_mode: bool, args: &ExtractArgs) -> Result<()> {
    let text = FsTextLoader.load_text(&args.file)?;
    let id = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut record = RecordExtractor::new().extract(id, &text);

    if robot_mode {
        if !args.full_text {
            record.full_text.clear();
        }
        return emit_json(&robot_ok(record));
    }

    emit_human(layout(&record, args.full_text));
    Ok(())
}

fn layout(record: &CandidateRecord, full_text: bool) -> HumanLayout {
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let skills = record.skills.iter().cloned().collect::<Vec<_>>().join(", ");

    let mut layout = HumanLayout::new();
    layout
        .title(&record.id)
        .kv("Name", &record.name)
        .kv("Email", &optional(&record.email))
        .kv("Phone", &optional(&record.phone))
        .kv("LinkedIn", &optional(&record.linkedin_url))
        .kv("Experience", &format!("{} years", record.years_experience))
        .kv("Skills", if skills.is_empty() { "-" } else { skills.as_str() });

    for (title, body) in [
        ("Experience section", &record.experience_section),
        ("Education section", &record.education_section),
    ] {
        if !body.is_empty() {
            layout.blank().section(title).push_line(body.as_str());
        }
    }
    if full_text {
        layout.blank().section("Full text").push_line(record.full_text.as_str());
    }
    layout
}
