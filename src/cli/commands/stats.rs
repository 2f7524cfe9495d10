//! screener stats - Index status

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::utils::format::format_size;

#[derive(Args, Debug)]
pub struct StatsArgs {}

#[derive(Serialize)]
struct StatsOutput {
    built: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimension: Option<usize>,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    built_at: Option<String>,
    index_path: String,
    metadata_path: String,
    embedding_backend: String,
    root: String,
    config_path: String,
    config_found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_bytes: Option<u64>,
}

pub fn run(ctx: &AppContext, _args: &StatsArgs) -> Result<()> {
    let snapshot = ctx.engine.snapshot();
    let paths = ctx.engine.paths();
    let disk_bytes = snapshot.as_ref().map(|_| {
        [&paths.index_path, &paths.metadata_path]
            .iter()
            .filter_map(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .sum::<u64>()
    });

    let output = StatsOutput {
        built: snapshot.is_some(),
        dimension: snapshot.as_ref().map(|index| index.dimension()),
        count: snapshot.as_ref().map_or(0, |index| index.len()),
        built_at: snapshot.as_ref().map(|index| index.built_at().to_rfc3339()),
        index_path: paths.index_path.display().to_string(),
        metadata_path: paths.metadata_path.display().to_string(),
        embedding_backend: ctx.embedder.name().to_string(),
        root: ctx.root.display().to_string(),
        config_path: ctx.config_path.display().to_string(),
        config_found: ctx.config_path.is_file(),
        disk_bytes,
    };

    if ctx.robot_mode {
        return emit_json(&robot_ok(output));
    }

    let mut layout = HumanLayout::new();
    layout.title("Index");
    if output.built {
        layout
            .kv("Candidates", &output.count.to_string())
            .kv("Dimension", &output.dimension.unwrap_or_default().to_string())
            .kv("Built at", output.built_at.as_deref().unwrap_or("-"))
            .kv("Size", &format_size(output.disk_bytes.unwrap_or_default()));
    } else {
        layout.kv("Status", "not built");
    }
    layout
        .kv("Vectors", &output.index_path)
        .kv("Metadata", &output.metadata_path)
        .kv("Embeddings", &output.embedding_backend);

    layout.blank().section("Workspace");
    let config_label = if output.config_found {
        output.config_path.clone()
    } else {
        format!("{} (not found, using defaults)", output.config_path)
    };
    layout.kv("Root", &output.root).kv("Config", &config_label);
    emit_human(layout);
    Ok(())
}
