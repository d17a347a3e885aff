use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use grantscope::analysis::{CategoryColumn, Factor};
use grantscope::commands::{self, ApiOptions};
use grantscope::dataset::AmountBand;

#[derive(Parser)]
#[command(name = "grantscope")]
#[command(
  about = "GrantScope - explore grant datasets with charts and AI-assisted commentary"
)]
#[command(version)]
struct Cli {
  /// API key for the insight service (or use OPENAI_API_KEY / GRANTSCOPE_API_KEY)
  #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
  api_key: Option<String>,

  /// Model used for insight generation
  #[arg(long, global = true, default_value = "gpt-4o")]
  model: String,

  /// OpenAI-compatible API base URL
  #[arg(long, global = true, default_value = "https://api.openai.com/v1")]
  base_url: String,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Load, validate, and bind a grant dataset to the session
  Open {
    /// Path to a Candid-style JSON file ({"grants": [...]})
    path: PathBuf,
  },
  /// Set the project theme that frames all generated insights
  Theme {
    /// The theme text
    text: String,
    /// Optional project objectives
    #[arg(short, long)]
    objectives: Option<String>,
  },
  /// Show session status: bound dataset, theme, cached insights
  Status,
  /// Data summary: headline metrics, top funders, funder types, yearly totals
  Summary {
    /// Number of top funders to rank
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Also generate AI commentary
    #[arg(long)]
    insight: bool,
  },
  /// Grant amount distribution across USD bands
  Amounts {
    /// Restrict to specific bands (repeatable)
    #[arg(long, value_enum)]
    band: Vec<AmountBand>,
    /// Also generate AI commentary
    #[arg(long)]
    insight: bool,
  },
  /// Relationship analysis: description length vs. amount, averages by factor
  Relationships {
    /// Tag family to slice by
    #[arg(long, value_enum, default_value = "subject")]
    factor: Factor,
    /// Restrict the affinity breakdown to one funder
    #[arg(long)]
    funder: Option<String>,
    /// Also generate AI commentary
    #[arg(long)]
    insight: bool,
  },
  /// Top categories by unique grant count
  Top {
    /// Categorical column to rank
    #[arg(long, value_enum, default_value = "subject")]
    column: CategoryColumn,
    /// Number of categories to show
    #[arg(long, default_value_t = 10)]
    limit: usize,
    /// Also generate AI commentary
    #[arg(long)]
    insight: bool,
  },
  /// Description text analysis: word frequencies overall and per subject
  Descriptions {
    /// Number of ranked words
    #[arg(long, default_value_t = 15)]
    limit: usize,
    /// Also generate AI commentary
    #[arg(long)]
    insight: bool,
  },
  /// Ask a free-text question about the bound dataset
  Ask {
    /// The question
    question: String,
  },
  /// Generate the full six-section Markdown report
  Report {
    /// Output path
    #[arg(short, long, default_value = "grantscope-report.md")]
    output: PathBuf,
  },
  /// Clear session state and cached insights
  Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let api = ApiOptions { api_key: cli.api_key, model: cli.model, base_url: cli.base_url };

  match cli.command {
    Commands::Open { path } => commands::open::handle(path),
    Commands::Theme { text, objectives } => commands::theme::handle(text, objectives),
    Commands::Status => commands::status::handle(),
    Commands::Summary { top, insight } => commands::summary::handle(&api, top, insight).await,
    Commands::Amounts { band, insight } => commands::amounts::handle(&api, band, insight).await,
    Commands::Relationships { factor, funder, insight } => {
      commands::relationships::handle(&api, factor, funder, insight).await
    }
    Commands::Top { column, limit, insight } => {
      commands::top::handle(&api, column, limit, insight).await
    }
    Commands::Descriptions { limit, insight } => {
      commands::descriptions::handle(&api, limit, insight).await
    }
    Commands::Ask { question } => commands::ask::handle(&api, question).await,
    Commands::Report { output } => commands::report::handle(&api, output).await,
    Commands::Reset => commands::reset::handle(),
  }
}
