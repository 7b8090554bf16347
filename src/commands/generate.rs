use anyhow::{Context, Result};
use std::path::PathBuf;
use validator::Validate;

use crate::config::Settings;
use crate::core::RunRng;
use crate::models::{GenerateRequest, GenerateResponse, Roster, Strategy};
use crate::services::{read_roster, render, write_round_markdown};

/// Command-line overrides for a generation run
#[derive(Debug, Clone, Default)]
pub struct GenerateOverrides {
    pub strategy: Option<Strategy>,
    pub rounds: Option<usize>,
    pub roster: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub no_shuffle: bool,
    pub no_table_shuffle: bool,
}

/// Merge settings with CLI overrides into a validated request
pub fn build_request(settings: &Settings, overrides: &GenerateOverrides) -> Result<GenerateRequest> {
    let request = GenerateRequest {
        rounds: overrides.rounds.unwrap_or(settings.num_rounds),
        strategy: overrides.strategy.unwrap_or(settings.strategy),
        seed: overrides.seed.or(settings.random_seed),
        shuffle_roster: settings.shuffle_roster && !overrides.no_shuffle,
        shuffle_tables: settings.enable_random_table_randomization && !overrides.no_table_shuffle,
    };
    request.validate().context("Invalid generation parameters")?;
    Ok(request)
}

/// Generate every round for `roster` and render it into `output_dir`
///
/// One `RunRng` drives both the initial roster scramble and the per-round
/// table shuffles, so a fixed seed reproduces the whole run.
pub fn run_generation(
    request: &GenerateRequest,
    roster: &Roster,
    output_dir: &std::path::Path,
) -> Result<(GenerateResponse, Vec<String>)> {
    let mut rng = RunRng::new(request.seed);

    let ordered = if request.shuffle_roster {
        rng.shuffle_roster(roster)
    } else {
        roster.clone()
    };

    if request.strategy == Strategy::Similarity && !roster.has_codes() {
        tracing::warn!("Similarity strategy selected but the roster has no category codes");
    }

    let run = request
        .strategy
        .generator()
        .generate(ordered.participants(), request.rounds)
        .context("Failed to generate rounds")?;

    for notice in &run.notices {
        tracing::warn!("{}", notice);
    }
    tracing::info!(
        "Generated {} of {} requested rounds using {} strategy",
        run.rounds.len(),
        request.rounds,
        request.strategy
    );

    let mut rounds = Vec::with_capacity(run.rounds.len());
    let mut console = Vec::with_capacity(run.rounds.len());
    let mut markdown_files = Vec::with_capacity(run.rounds.len());

    for (idx, round) in run.rounds.iter().enumerate() {
        let round_index = idx + 1;
        let display = if request.shuffle_tables {
            rng.shuffle_tables(round)
        } else {
            round.clone()
        };

        console.push(render::render_console(round_index, &display, roster));
        let path = write_round_markdown(output_dir, round_index, &display, roster)
            .with_context(|| format!("Failed to write round {} to {}", round_index, output_dir.display()))?;
        markdown_files.push(path.display().to_string());
        rounds.push(render::to_rendered(round_index, &display, roster));
    }

    let response = GenerateResponse {
        strategy: request.strategy,
        total_participants: roster.len(),
        requested_rounds: request.rounds,
        rounds,
        notices: run.notices,
        markdown_files,
    };
    Ok((response, console))
}

/// Handler for `pair-rounds generate`
pub fn execute(settings: &Settings, overrides: &GenerateOverrides, json: bool) -> Result<()> {
    let request = build_request(settings, overrides)?;

    let roster_path = overrides
        .roster
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.csv_filename));
    let roster = read_roster(&roster_path)
        .with_context(|| format!("Failed to load roster from {}", roster_path.display()))?;

    let output_dir = overrides.output_dir.clone().unwrap_or_else(|| settings.output_dir.clone());

    let (response, console) = run_generation(&request, &roster, &output_dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("Total participants: {}", response.total_participants);
    println!("Generated {} rounds of pairings.\n", response.rounds.len());
    for notice in &response.notices {
        println!("{}\n", notice);
    }
    for table in &console {
        println!("{}", table);
    }

    println!("Markdown files generated:");
    for file in &response.markdown_files {
        println!("  {}", file);
    }
    Ok(())
}
