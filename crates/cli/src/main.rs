use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use optdash_core::backend::http::{ChainQuery, HttpOptionsBackend, NewsSection};
use optdash_core::dashboard::summary::{sort_rows, NewsImpactView, SortDirection, SortKey, SummaryRow};
use optdash_core::dashboard::tickers::normalize_tickers;
use optdash_core::dashboard::{Dashboard, FetchOutcome, SnapshotQuery};
use optdash_core::domain::options::Side;
use optdash_core::domain::snapshot::MAX_NEWS_COUNT;
use optdash_core::news::freshness::FreshnessPolicy;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;

use render::Painter;

#[derive(Debug, Parser)]
#[command(name = "optdash", about = "Options-chain and news snapshots for a list of tickers")]
struct Cli {
    /// Backend base URL. Overrides OPTDASH_API_BASE_URL.
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Plain output without ANSI colors.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Summary table (and optional detail cards) for one or more tickers.
    Snapshot(SnapshotArgs),
    /// News-impact analysis for one article.
    Analyze(AnalyzeArgs),
    /// List option expirations for a ticker.
    Expirations { ticker: String },
    /// Options chain for a single ticker.
    Chain(ChainArgs),
    /// Latest news or press releases for a ticker.
    News(NewsArgs),
    /// Check that the backend is reachable.
    Health,
}

#[derive(Debug, Args)]
struct DisplayArgs {
    /// Which side of the chain to fetch.
    #[arg(long, default_value = "both")]
    side: Side,

    /// Contracts per side, ranked by volume.
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=200))]
    limit: u32,

    /// Expiration date (YYYY-MM-DD). Defaults to the nearest one.
    #[arg(long)]
    expiration: Option<String>,
}

#[derive(Debug, Args)]
struct SnapshotArgs {
    /// Tickers, separated by spaces or commas.
    #[arg(required = true)]
    tickers: Vec<String>,

    #[command(flatten)]
    display: DisplayArgs,

    /// News items per ticker (0-10).
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(0..=10))]
    news_count: u32,

    /// Skip press releases.
    #[arg(long)]
    no_press_releases: bool,

    /// Sort column: ticker, price, call-volume, put-volume, call-oi, put-oi, pcr, vol-delta, ai.
    #[arg(long, default_value = "ticker")]
    sort: SortKey,

    /// Sort descending.
    #[arg(long)]
    desc: bool,

    /// Print a detail card per ticker after the table.
    #[arg(long)]
    detail: bool,

    /// Print the raw snapshots as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    #[arg(long)]
    ticker: String,

    /// Article URL. Without it, the recent articles for the ticker are listed.
    #[arg(long, conflicts_with = "pick")]
    url: Option<String>,

    /// Analyze the N-th recent article from the listing (1-based).
    #[arg(long)]
    pick: Option<usize>,

    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct ChainArgs {
    ticker: String,

    #[command(flatten)]
    display: DisplayArgs,
}

#[derive(Debug, Args)]
struct NewsArgs {
    ticker: String,

    #[arg(long, default_value_t = 5)]
    count: u32,

    /// Press releases instead of news.
    #[arg(long)]
    press_releases: bool,

    /// Include items older than 24h or with an unknown age.
    #[arg(long)]
    all: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = optdash_core::config::Settings::from_env()?
        .with_api_base_url(cli.api_base_url.clone());
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let painter = Painter::new(!cli.no_color);
    let backend = Arc::new(HttpOptionsBackend::from_settings(&settings)?);
    tracing::debug!(base_url = %backend.base_url(), "backend configured");

    let result = run(cli.command, backend, painter).await;
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %err, "command failed");
    }
    result
}

async fn run(command: Command, backend: Arc<HttpOptionsBackend>, p: Painter) -> anyhow::Result<()> {
    match command {
        Command::Snapshot(args) => snapshot(args, backend, p).await,
        Command::Analyze(args) => analyze(args, backend, p).await,
        Command::Expirations { ticker } => {
            let list = backend.expirations(&ticker).await?;
            if list.expirations.is_empty() {
                println!("{}: no option expirations", list.ticker);
            }
            for exp in &list.expirations {
                println!("{exp}");
            }
            Ok(())
        }
        Command::Chain(args) => {
            let side = args.display.side;
            let chain = backend
                .options_chain(&ChainQuery {
                    ticker: args.ticker,
                    expiration: args.display.expiration,
                    side: args.display.side,
                    limit: args.display.limit,
                })
                .await?;
            print!("{}", render::chain(&chain, side, p));
            Ok(())
        }
        Command::News(args) => {
            let section = if args.press_releases {
                NewsSection::PressReleases
            } else {
                NewsSection::News
            };
            let policy = if args.all {
                FreshnessPolicy::All
            } else {
                FreshnessPolicy::Recent24h
            };
            let list = backend.news(&args.ticker, section, args.count).await?;
            print!("{}", render::news(&list.ticker, &policy.apply(&list.items), p));
            Ok(())
        }
        Command::Health => {
            backend.health().await?;
            println!("ok ({})", backend.base_url());
            Ok(())
        }
    }
}

async fn snapshot(args: SnapshotArgs, backend: Arc<HttpOptionsBackend>, p: Painter) -> anyhow::Result<()> {
    let tickers = normalize_tickers(&args.tickers);
    let query = SnapshotQuery {
        expiration: args.display.expiration,
        side: args.display.side,
        limit: args.display.limit,
        news_count: args.news_count,
        include_press_releases: !args.no_press_releases,
    };

    let dashboard = Dashboard::new(backend);
    if dashboard.fetch_snapshots(&tickers.join(","), &query).await? == FetchOutcome::Skipped {
        println!("no tickers given");
        return Ok(());
    }

    let state = dashboard.state().await;
    if let Some(err) = state.error {
        println!("{}", p.error(&err));
        anyhow::bail!("snapshot request failed");
    }

    if args.json {
        let out = serde_json::to_string_pretty(state.snapshots.as_slice())
            .context("failed to serialize snapshots")?;
        println!("{out}");
        return Ok(());
    }

    let mut rows: Vec<SummaryRow> = state.snapshots.iter().map(SummaryRow::from_snapshot).collect();
    let direction = if args.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    sort_rows(&mut rows, args.sort, direction);

    let today = chrono::Local::now().date_naive();
    print!("{}", render::summary_table(&rows, today, p));

    if args.detail {
        for row in &rows {
            if let Some(snap) = state.snapshots.iter().find(|s| s.ticker == row.ticker) {
                println!();
                print!("{}", render::detail_card(snap, p));
            }
        }
    }
    Ok(())
}

async fn analyze(args: AnalyzeArgs, backend: Arc<HttpOptionsBackend>, p: Painter) -> anyhow::Result<()> {
    let dashboard = Dashboard::new(backend);

    let url = match args.url {
        Some(url) => url,
        None => {
            let query = SnapshotQuery {
                news_count: MAX_NEWS_COUNT,
                ..SnapshotQuery::default()
            };
            dashboard.fetch_snapshots(&args.ticker, &query).await?;
            let state = dashboard.state().await;
            if let Some(err) = state.error {
                println!("{}", p.error(&err));
                anyhow::bail!("snapshot request failed");
            }
            let snap = state
                .snapshots
                .first()
                .with_context(|| format!("backend returned no snapshot for {}", args.ticker))?;

            let view = NewsImpactView::build(snap, FreshnessPolicy::Recent24h, None);
            let Some(pick) = args.pick else {
                print!("{}", render::news_impact(&view, p));
                return Ok(());
            };
            let article = pick
                .checked_sub(1)
                .and_then(|i| view.articles.get(i))
                .with_context(|| {
                    format!("--pick must be 1..={} (got {pick})", view.articles.len())
                })?;
            let view = NewsImpactView::build(snap, FreshnessPolicy::Recent24h, Some(&article.link));
            print!("{}", render::news_impact(&view, p));
            println!();
            article.link.clone()
        }
    };

    dashboard.analyze_article(&args.ticker, &url).await?;
    let state = dashboard.state().await;

    if let Some(err) = state.analysis_error {
        println!("{}", p.error(&err));
        anyhow::bail!("article analysis failed");
    }
    let analysis = state
        .analysis
        .context("article analysis returned no result")?;

    if args.json {
        let out = serde_json::to_string_pretty(analysis.as_ref())
            .context("failed to serialize analysis")?;
        println!("{out}");
    } else {
        print!("{}", render::analysis(&analysis, p));
    }
    Ok(())
}

fn init_sentry(settings: &optdash_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
