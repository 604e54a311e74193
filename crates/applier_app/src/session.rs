use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use applier_core::{SchedulerError, SchedulerEvent, SchedulerPhase};
use applier_engine::{
    BatchScheduler, ChannelEventSink, ReqwestSubmitter, ReqwestVacancySource, SharedRegistry,
    VacancySource,
};
use applier_logging::{applier_info, applier_warn};
use chrono::Local;

use crate::cli::Cli;
use crate::config::{AppConfig, ConfigOrigin};
use crate::logging;
use crate::render::{render_countdown, render_event, render_summary};

const DISPLAY_REFRESH: Duration = Duration::from_secs(1);

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let (mut config, origin) = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(&cli);
    logging::initialize(&config.log);
    match &origin {
        ConfigOrigin::File(path) => applier_info!("Loaded config from {:?}", path),
        ConfigOrigin::Defaults => {
            applier_warn!("No config file found; using built-in defaults")
        }
    }

    let scheduler_config = config
        .scheduler_config()
        .context("invalid scheduler settings")?;
    let settings = config.backend_settings();

    let links = match &cli.links_file {
        Some(path) => read_links_file(path)?,
        None => {
            println!(
                "Searching \"{}\" in {}...",
                config.search.job_title, config.search.location
            );
            let source = ReqwestVacancySource::new(&settings)?;
            source
                .search(&config.search)
                .await
                .context("vacancy search failed")?
        }
    };

    let registry = SharedRegistry::default();
    let stats = registry.ingest_links(&links, &config.search.location);
    applier_info!(
        "Ingested vacancies added={} skipped={}",
        stats.added,
        stats.skipped
    );
    println!(
        "{} vacancies found ({} duplicates skipped).",
        stats.added, stats.skipped
    );

    let submitter = ReqwestSubmitter::new(&settings, config.success_rule.clone().into_policy())?;
    let (sink, events) = ChannelEventSink::channel();
    let scheduler = BatchScheduler::new(
        registry.clone(),
        Arc::new(submitter),
        config.profile.clone(),
        Arc::new(sink),
    );

    match scheduler.start(scheduler_config) {
        Ok(()) => {}
        Err(SchedulerError::NoPendingItems) => bail!("no pending vacancies to apply to"),
        Err(err) => return Err(err.into()),
    }

    spawn_interrupt_handler(scheduler.clone());
    display_until_stopped(&scheduler, &events).await;
    scheduler.wait().await;
    drain_events(&events, false);

    println!("{}", render_summary(&registry.summary()));
    Ok(())
}

fn read_links_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read links file {path:?}"))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToOwned::to_owned)
        .collect())
}

/// Ctrl-C finishes the current batch and stops the timer.
fn spawn_interrupt_handler(scheduler: BatchScheduler) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            applier_info!("Interrupt received; stopping after current batch");
            println!();
            println!("Stopping after the current batch...");
            scheduler.stop();
        }
    });
}

async fn display_until_stopped(scheduler: &BatchScheduler, events: &mpsc::Receiver<SchedulerEvent>) {
    let mut ticker = tokio::time::interval(DISPLAY_REFRESH);
    let mut countdown_shown = false;
    loop {
        ticker.tick().await;
        if drain_events(events, countdown_shown) {
            countdown_shown = false;
        }
        if scheduler.phase() == SchedulerPhase::Stopped || scheduler.is_finished() {
            break;
        }
        if let Some(remaining) = scheduler.countdown() {
            print!("\r{}", render_countdown(remaining, Local::now()));
            let _ = io::stdout().flush();
            countdown_shown = true;
        }
    }
    if countdown_shown {
        println!();
    }
}

/// Prints pending events; returns whether anything was printed.
fn drain_events(events: &mpsc::Receiver<SchedulerEvent>, countdown_shown: bool) -> bool {
    let mut printed = false;
    for event in events.try_iter() {
        if countdown_shown && !printed {
            println!();
        }
        println!("{}", render_event(&event));
        printed = true;
    }
    printed
}
