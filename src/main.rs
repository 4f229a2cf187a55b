use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use rotoranks::{
    categories::LOWER_IS_BETTER,
    config::{Config, ConfigInput, StorageTarget},
    extract_with, fetch, history,
    report::{index::stamp_index, ReportWriter},
    score,
    storage::{self, key_for},
    HeaderStrategy, RankTable,
};
use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Rotisserie standings for a CBS fantasy baseball league.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Short league name (the subdomain of baseball.cbssports.com)
    #[arg(long, env = "JABOLEAGUE")]
    league: Option<String>,

    #[arg(long, env = "JABOUSER")]
    user: Option<String>,

    #[arg(long, env = "JABOPASS", hide_env_values = true)]
    password: Option<String>,

    /// Number of teams in the league
    #[arg(long, env = "JABOTEAMS")]
    teams: Option<usize>,

    /// Upload target: a bucket name, s3://bucket, or file:///dir
    #[arg(long, env = "ROTO_S3_BUCKET")]
    storage: Option<String>,

    /// Output root; reports go to <root>/csv and <root>/index
    #[arg(long, env = "ROTO_ROOT", default_value = ".")]
    root: PathBuf,

    /// Read the standings page from a saved file instead of logging in
    #[arg(long)]
    html: Option<PathBuf>,

    /// Date to stamp on the snapshots (YYYY-MM-DD), default today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Ask for every credential even if already set
    #[arg(long)]
    prompt: bool,

    #[arg(long)]
    no_upload: bool,

    /// How to find the hitting and pitching header rows
    #[arg(long, value_enum, default_value_t = Headers::Content)]
    headers: Headers,

    /// Print standings as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Headers {
    Content,
    Offset,
}

impl From<Headers> for HeaderStrategy {
    fn from(h: Headers) -> Self {
        match h {
            Headers::Content => HeaderStrategy::ByContent,
            Headers::Offset => HeaderStrategy::ByOffset,
        }
    }
}

fn resolve_config(args: &Args) -> Result<Config> {
    let need_login = args.html.is_none();
    let mut input = ConfigInput {
        league: args.league.clone(),
        user: args.user.clone(),
        password: args.password.clone(),
        team_count: args.teams,
    };
    input.prompt_missing(&mut io::stdin().lock(), &mut io::stdout(), need_login, args.prompt)?;

    let storage = if args.no_upload {
        StorageTarget::None
    } else {
        args.storage
            .as_deref()
            .map(StorageTarget::parse)
            .unwrap_or(StorageTarget::None)
    };
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    input.into_config(need_login, storage, args.root.clone(), date)
}

fn print_standings(ranks: &RankTable, date: NaiveDate, json: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    if json {
        let body = serde_json::json!({
            "date": date.format("%Y-%m-%d").to_string(),
            "categories": ranks.categories(),
            "teams": ranks.rows().collect::<Vec<_>>(),
        });
        serde_json::to_writer_pretty(&mut out, &body)?;
        writeln!(out)?;
    } else {
        writeln!(out, "Rotisserie standings through {}", date)?;
        for (place, row) in ranks.rows().enumerate() {
            writeln!(out, "{:>3}. {:<28} {:>6.1}", place + 1, row.team, row.total)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rotoranks=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    // ─── 2) resolve config ───────────────────────────────────────────
    let args = Args::parse();
    let config = resolve_config(&args)?;
    info!(
        teams = config.team_count,
        root = %config.root.display(),
        date = %config.date,
        storage = ?config.storage,
        "startup"
    );

    // ─── 3) get the standings page ───────────────────────────────────
    let document = match &args.html {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading saved page {}", path.display()))?,
        None => {
            let creds = config
                .credentials
                .as_ref()
                .context("no credentials to log in with")?;
            fetch::download_document(creds)
                .await
                .context("fetching standings page")?
        }
    };

    // ─── 4) extract & score ──────────────────────────────────────────
    let stats = extract_with(&document, config.team_count, args.headers.into())
        .context("extracting team stats")?;
    let ranks = score(&stats, &LOWER_IS_BETTER);
    info!(teams = ranks.len(), leader = ?ranks.teams().first(), "scored");

    // ─── 5) write reports ────────────────────────────────────────────
    let writer = ReportWriter::new(config.csv_dir(), config.date)?;
    let ranks_csv = writer.write_ranks(&ranks)?;
    let stats_csv = writer.write_stats(&stats)?;
    let series_csv = history::update_history(&config.csv_dir(), config.date, &ranks)?;
    let index_page = stamp_index(&config.index_dir(), config.date)?;

    // ─── 6) upload ───────────────────────────────────────────────────
    match storage::open(&config.storage).await {
        Some(store) => {
            let mut files = vec![
                (key_for("data/roto_ranks.csv"), ranks_csv),
                (key_for("data/roto_stats.csv"), stats_csv),
                (key_for("data/time_series.csv"), series_csv),
            ];
            if let Some(page) = index_page {
                files.push((key_for("index.html"), page));
            }
            storage::upload_all(store.as_ref(), &files).await?;
        }
        None => info!("no storage target; reports kept local"),
    }

    print_standings(&ranks, config.date, args.json)?;
    info!("all done");
    Ok(())
}
