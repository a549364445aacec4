use std::path::PathBuf;
use std::sync::Arc;

use adchooser_core::domain::{Impression, SinkError};
use adchooser_core::impls::{
    CountingBannerRepository, InMemoryBannerRepository, RecordingImpressionSink,
    TracingImpressionSink,
};
use adchooser_core::ports::{AdChooser, ImpressionSink};
use adchooser_core::{
    AdChooserBuilder, Banner, BannerId, ClientId, Decision, EngineConfig, PageId, PlayerId,
};
use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Banner ad decision engine demo")]
struct Cli {
    /// Engine config (JSON). Built-in defaults when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Ask for an ad for one player on one page
    Choose {
        #[arg(long)]
        player: u64,
        #[arg(long)]
        page: String,
        /// Ask this many times (later calls are served from the cache)
        #[arg(long, default_value_t = 1)]
        repeat: usize,
    },
    /// Hammer one shared chooser from concurrent tasks and print totals
    Simulate {
        #[arg(long, default_value_t = 50)]
        players: u64,
        #[arg(long, value_delimiter = ',', default_value = "top,news,profile")]
        pages: Vec<String>,
        #[arg(long, default_value_t = 3)]
        rounds: usize,
    },
}

#[derive(Serialize)]
struct ChoiceLine<'a> {
    player: PlayerId,
    page: &'a PageId,
    #[serde(flatten)]
    decision: &'a Decision,
}

#[derive(Debug, Default, Serialize)]
struct SimulationReport {
    requests: usize,
    shown: usize,
    suppressed: usize,
    failed: usize,
    impressions: usize,
    repository_lookups: usize,
    repository_random_picks: usize,
}

/// 集計用に記録しつつ、ログにも出す sink
struct DemoSink {
    recorder: RecordingImpressionSink,
    tracer: TracingImpressionSink,
}

#[async_trait]
impl ImpressionSink for DemoSink {
    async fn emit(&self, impression: Impression) -> Result<(), SinkError> {
        self.tracer.emit(impression.clone()).await?;
        self.recorder.emit(impression).await
    }
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let fmt = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => fmt.json().init(),
        LogFormat::Text => fmt.init(),
    }
}

/// デモ用カタログ: ローテーション用バナー数件 + A/B 用クリエイティブ
fn seed_catalogue(config: &EngineConfig) -> InMemoryBannerRepository {
    let rotation = (1..=5).map(|n| Banner::new(BannerId::new(n), ClientId::new(390 + n)));
    InMemoryBannerRepository::new(rotation).with_reserved([Banner::new(
        config.ab_test.banner_id,
        ClientId::new(1),
    )])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let repository = Arc::new(CountingBannerRepository::new(seed_catalogue(&config)));
    let sink = Arc::new(DemoSink {
        recorder: RecordingImpressionSink::new(),
        tracer: TracingImpressionSink,
    });
    let chooser = AdChooserBuilder::new()
        .config(config)
        .repository(repository.clone())
        .impression_sink(sink.clone())
        .build()
        .context("building ad chooser")?;

    match cli.cmd {
        Command::Choose {
            player,
            page,
            repeat,
        } => {
            let player = PlayerId::new(player);
            let page = PageId::new(page);
            for _ in 0..repeat.max(1) {
                let decision = chooser.get_ad(player, &page).await?;
                let line = ChoiceLine {
                    player,
                    page: &page,
                    decision: &decision,
                };
                println!("{}", serde_json::to_string(&line)?);
            }
        }
        Command::Simulate {
            players,
            pages,
            rounds,
        } => {
            let pages: Vec<PageId> = pages.into_iter().map(PageId::new).collect();
            let mut report = simulate(chooser, players, &pages, rounds).await?;
            report.impressions = sink.recorder.len().await;
            report.repository_lookups = repository.lookups();
            report.repository_random_picks = repository.random_picks();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

/// (player, page) ごとに 1 タスク。各タスクが `rounds` 回問い合わせる
async fn simulate(
    chooser: Arc<dyn AdChooser>,
    players: u64,
    pages: &[PageId],
    rounds: usize,
) -> anyhow::Result<SimulationReport> {
    let mut handles = Vec::new();
    for player in 1..=players {
        for page in pages {
            let chooser = Arc::clone(&chooser);
            let page = page.clone();
            handles.push(tokio::spawn(async move {
                let mut outcomes = Vec::with_capacity(rounds);
                for _ in 0..rounds {
                    outcomes.push(chooser.get_ad(PlayerId::new(player), &page).await);
                }
                outcomes
            }));
        }
    }

    let mut report = SimulationReport::default();
    for handle in handles {
        for outcome in handle.await.context("simulation task panicked")? {
            report.requests += 1;
            match outcome {
                Ok(Decision::Show(_)) => report.shown += 1,
                Ok(Decision::Suppress) => report.suppressed += 1,
                Err(err) => {
                    tracing::warn!(error = %err, "request failed");
                    report.failed += 1;
                }
            }
        }
    }
    Ok(report)
}
