use anyhow::{Context, Result, anyhow};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::cache::MemoCache;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::events::{parse_event_bouts, parse_event_index};
use crate::extract::{EntityProfile, extract_profile};
use crate::fetch::{HttpFetcher, PageSource};
use crate::history::{StreakFeatures, parse_fighter_page, reconstruct};
use crate::outcome::{SidedBout, assign_sides, run_rng};
use crate::store;

/// One row of the training table. Side 1 is the randomly kept side;
/// `outcome == 1` iff side 1 is the true winner. Profile values are raw
/// source strings, normalized downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRow {
    pub fighter_1: String,
    pub fighter_2: String,
    pub event_year: i32,
    pub outcome: u8,

    pub height_1: Option<String>,
    pub weight_1: Option<String>,
    pub reach_1: Option<String>,
    pub stance_1: Option<String>,
    pub dob_1: Option<String>,
    pub slpm_1: Option<String>,
    pub stracc_1: Option<String>,
    pub sapm_1: Option<String>,
    pub strdef_1: Option<String>,
    pub tdavg_1: Option<String>,
    pub tdacc_1: Option<String>,
    pub tddef_1: Option<String>,
    pub subavg_1: Option<String>,
    pub cur_streak_1: u32,
    pub max_streak_1: u32,

    pub height_2: Option<String>,
    pub weight_2: Option<String>,
    pub reach_2: Option<String>,
    pub stance_2: Option<String>,
    pub dob_2: Option<String>,
    pub slpm_2: Option<String>,
    pub stracc_2: Option<String>,
    pub sapm_2: Option<String>,
    pub strdef_2: Option<String>,
    pub tdavg_2: Option<String>,
    pub tdacc_2: Option<String>,
    pub tddef_2: Option<String>,
    pub subavg_2: Option<String>,
    pub cur_streak_2: u32,
    pub max_streak_2: u32,
}

impl DatasetRow {
    fn assemble(
        sided: &SidedBout,
        profile_1: &EntityProfile,
        streaks_1: StreakFeatures,
        profile_2: &EntityProfile,
        streaks_2: StreakFeatures,
    ) -> Self {
        Self {
            fighter_1: sided.side1_name.clone(),
            fighter_2: sided.side2_name.clone(),
            event_year: sided.event_year,
            outcome: sided.outcome,

            height_1: profile_1.height.clone(),
            weight_1: profile_1.weight.clone(),
            reach_1: profile_1.reach.clone(),
            stance_1: profile_1.stance.clone(),
            dob_1: profile_1.dob.clone(),
            slpm_1: profile_1.slpm.clone(),
            stracc_1: profile_1.stracc.clone(),
            sapm_1: profile_1.sapm.clone(),
            strdef_1: profile_1.strdef.clone(),
            tdavg_1: profile_1.tdavg.clone(),
            tdacc_1: profile_1.tdacc.clone(),
            tddef_1: profile_1.tddef.clone(),
            subavg_1: profile_1.subavg.clone(),
            cur_streak_1: streaks_1.current_streak,
            max_streak_1: streaks_1.max_streak,

            height_2: profile_2.height.clone(),
            weight_2: profile_2.weight.clone(),
            reach_2: profile_2.reach.clone(),
            stance_2: profile_2.stance.clone(),
            dob_2: profile_2.dob.clone(),
            slpm_2: profile_2.slpm.clone(),
            stracc_2: profile_2.stracc.clone(),
            sapm_2: profile_2.sapm.clone(),
            strdef_2: profile_2.strdef.clone(),
            tdavg_2: profile_2.tdavg.clone(),
            tdacc_2: profile_2.tdacc.clone(),
            tddef_2: profile_2.tddef.clone(),
            subavg_2: profile_2.subavg.clone(),
            cur_streak_2: streaks_2.current_streak,
            max_streak_2: streaks_2.max_streak,
        }
    }
}

/// Per-run accounting. Degraded lookups are counted here so a best-effort
/// run can still be audited afterwards.
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub events_seen: usize,
    pub bouts_seen: usize,
    pub rows_built: usize,
    pub fetch_failures: usize,
    pub parse_misses: usize,
    pub anchor_misses: usize,
    pub checkpoints_written: usize,
    pub errors: Vec<String>,
}

impl BuildSummary {
    fn record(&mut self, context: &str, err: &PipelineError) {
        match err {
            PipelineError::FetchExhausted { .. } => self.fetch_failures += 1,
            PipelineError::ParseMismatch(_) => self.parse_misses += 1,
            PipelineError::AnchorNotFound { .. } => self.anchor_misses += 1,
        }
        eprintln!("[WARN] {context}: {err}");
        self.errors.push(format!("{context}: {err}"));
    }
}

/// Build the whole pipeline with the real fetcher and write the final
/// table (plus chronological train/test splits) to the configured paths.
pub fn run(config: &PipelineConfig) -> Result<BuildSummary> {
    let fetcher = HttpFetcher::new(config.retry.clone(), config.delay_min, config.delay_max)?;
    let mut rng = run_rng(config.seed);
    let (rows, summary) = build_dataset(&fetcher, config, &mut rng)?;
    store::write_with_splits(&config.output_path, &rows).context("final table write failed")?;
    Ok(summary)
}

/// Iterate all events and bouts, resolving each side through the
/// run-scoped caches. A failure on one side degrades that side's columns
/// to nulls and default streaks; the run keeps going. Only checkpoint
/// writes abort.
pub fn build_dataset<S: PageSource>(
    source: &S,
    config: &PipelineConfig,
    rng: &mut StdRng,
) -> Result<(Vec<DatasetRow>, BuildSummary)> {
    let mut summary = BuildSummary::default();
    let mut profiles: MemoCache<String, EntityProfile> = MemoCache::new();
    let mut streaks: MemoCache<(String, String), StreakFeatures> = MemoCache::new();

    let index_html = source
        .fetch_page(&config.event_index_url)
        .map_err(|err| anyhow!("event index unavailable: {err}"))?;
    let mut events = parse_event_index(&index_html);
    if let Some(limit) = config.event_limit {
        events.truncate(limit);
    }

    let mut rows: Vec<DatasetRow> = Vec::new();

    for event in &events {
        summary.events_seen += 1;
        let event_html = match source.fetch_page(&event.url) {
            Ok(html) => html,
            Err(err) => {
                summary.record(&format!("event {}", event.name), &err);
                continue;
            }
        };

        for bout in parse_event_bouts(&event_html, event.year) {
            summary.bouts_seen += 1;
            let sided = assign_sides(rng, &bout);

            let profile_1 = lookup_profile(source, &mut profiles, &sided.side1_ref, &mut summary);
            let profile_2 = lookup_profile(source, &mut profiles, &sided.side2_ref, &mut summary);
            let streaks_1 = lookup_streaks(
                source,
                &mut streaks,
                &sided.side1_ref,
                &sided.side2_name,
                &mut summary,
            );
            let streaks_2 = lookup_streaks(
                source,
                &mut streaks,
                &sided.side2_ref,
                &sided.side1_name,
                &mut summary,
            );

            rows.push(DatasetRow::assemble(
                &sided, &profile_1, streaks_1, &profile_2, streaks_2,
            ));
            summary.rows_built += 1;

            if summary.rows_built % config.checkpoint_interval == 0 {
                store::write_full(&config.checkpoint_path, &rows)
                    .context("checkpoint write failed")?;
                summary.checkpoints_written += 1;
            }
        }
    }

    Ok((rows, summary))
}

fn lookup_profile<S: PageSource>(
    source: &S,
    cache: &mut MemoCache<String, EntityProfile>,
    fighter_ref: &str,
    summary: &mut BuildSummary,
) -> EntityProfile {
    cache.get_or_compute(fighter_ref.to_string(), || {
        match source.fetch_page(fighter_ref) {
            Ok(html) => extract_profile(&html),
            Err(err) => {
                summary.record(&format!("profile {fighter_ref}"), &err);
                EntityProfile::default()
            }
        }
    })
}

/// The streak cache key includes the opponent: the anchor bout, and with
/// it the truncation point, depends on who is being matched.
fn lookup_streaks<S: PageSource>(
    source: &S,
    cache: &mut MemoCache<(String, String), StreakFeatures>,
    fighter_ref: &str,
    opponent: &str,
    summary: &mut BuildSummary,
) -> StreakFeatures {
    let key = (fighter_ref.to_string(), opponent.to_string());
    cache.get_or_compute(key, || {
        let derived = source
            .fetch_page(fighter_ref)
            .and_then(|html| parse_fighter_page(&html))
            .and_then(|page| reconstruct(&page, opponent));
        match derived {
            Ok(features) => features,
            Err(err) => {
                summary.record(&format!("history {fighter_ref}"), &err);
                StreakFeatures::default()
            }
        }
    })
}
