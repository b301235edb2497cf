use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

mod chart;
mod db;
mod error;
mod models;
mod report;
mod source;
mod summary;

use chart::{ChartRenderer, JsonChart, TextBarChart};
use source::Loaded;

#[derive(Parser)]
#[command(name = "grade-history")]
#[command(about = "Grade distribution charts per academic term", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("source")
        .args(["csv", "json", "course"])
        .required(true)
        .multiple(false)
))]
struct SourceArgs {
    /// Read grade history rows from a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Read grade history rows from a JSON array
    #[arg(long)]
    json: Option<PathBuf>,
    /// Query Postgres (DATABASE_URL) for a course, e.g. "CMPSC 156"
    #[arg(long)]
    course: Option<String>,
    #[arg(long, requires = "course")]
    instructor: Option<String>,
    /// Only keep terms from the last N years
    #[arg(long)]
    since_years: Option<i32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw one bar chart per term
    Chart {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = 40)]
        width: usize,
        /// Draw a row for every letter grade, including empty ones
        #[arg(long)]
        all_grades: bool,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Show the chart label and tooltip for one bar
    Tooltip {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        chart: usize,
        #[arg(long)]
        bar: usize,
        #[arg(long)]
        all_grades: bool,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn load(source: &SourceArgs) -> anyhow::Result<Loaded> {
    let mut loaded = if let Some(path) = &source.csv {
        source::load_csv(path).with_context(|| format!("failed to load {}", path.display()))?
    } else if let Some(path) = &source.json {
        source::load_json(path).with_context(|| format!("failed to load {}", path.display()))?
    } else if let Some(course) = &source.course {
        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set to query grade history by course")?;
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await
            .context("failed to connect to Postgres")?;
        db::fetch_grade_history(&pool, course, source.instructor.as_deref()).await?
    } else {
        anyhow::bail!("one of --csv, --json or --course is required");
    };

    if let Some(since_years) = source.since_years {
        let cutoff = summary::cutoff_year(since_years);
        loaded.records = summary::filter_since(loaded.records, cutoff);
        tracing::info!(cutoff, kept = loaded.records.len(), "applied year cutoff");
    }

    Ok(loaded)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Chart {
            source,
            width,
            all_grades,
            format,
        } => {
            let loaded = load(&source).await?;
            let groups = summary::summarize(&loaded.records);

            if groups.is_empty() {
                println!("No grade history found.");
                return Ok(());
            }

            let mut renderer: Box<dyn ChartRenderer> = match format {
                Format::Text => Box::new(TextBarChart::new(width).show_empty(all_grades)),
                Format::Json => Box::new(JsonChart::default()),
            };
            print!("{}", renderer.render(&groups)?);
            if matches!(format, Format::Json) {
                println!();
            }
        }
        Commands::Tooltip {
            source,
            chart,
            bar,
            all_grades,
        } => {
            let loaded = load(&source).await?;
            let groups = summary::summarize(&loaded.records);
            let mut renderer = TextBarChart::default().show_empty(all_grades);
            renderer.render(&groups)?;

            let tooltip = renderer
                .hover(chart, bar)
                .with_context(|| format!("no bar {bar} in chart {chart}"))?;
            if let Some((hovered_chart, _)) = renderer.hovered() {
                println!("{}", groups[hovered_chart].label());
            }
            print!("{tooltip}");
        }
        Commands::Report { source, out } => {
            let loaded = load(&source).await?;
            let groups = summary::summarize(&loaded.records);
            let report = report::build_report(source.course.as_deref(), &groups, loaded.skipped);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
