use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use reqdraft_core::config::DraftConfig;
use reqdraft_core::export::document::DocumentRenderer;
use reqdraft_core::export::docx::DocxRenderer;
use reqdraft_core::export::markdown::MarkdownRenderer;
use reqdraft_core::export::user_stories::render_user_stories;
use reqdraft_core::extraction::{InputKind, InputPayload};
use reqdraft_core::inventory::store::InventoryStore;
use reqdraft_core::requirements::classifier::classify_into_set;
use reqdraft_core::requirements::clarity::clarity_score;
use reqdraft_core::requirements::generator::{GenerationOutcome, RequirementGenerator};
use reqdraft_core::requirements::model::{Dialect, RequirementSet};
use reqdraft_core::requirements::refinement::Answer;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Drafts software requirements from ideas, documents and web pages.
#[derive(Parser)]
#[command(name = "reqdraft", version)]
struct Cli {
    /// JSON config file; absent means built-in defaults
    #[arg(long, env = "REQDRAFT_CONFIG", default_value = "reqdraft.json")]
    config: PathBuf,

    /// Log filter directive; falls back to RUST_LOG, then "info"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[arg(long, global = true, env = "REQDRAFT_MODEL_ENDPOINT")]
    model_endpoint: Option<String>,

    #[arg(long, global = true, env = "REQDRAFT_MODEL_ID")]
    model_id: Option<String>,

    /// Maximum number of new tokens to generate
    #[arg(long, global = true)]
    max_length: Option<usize>,

    /// Domain rules CSV with a "Rule" column
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[arg(long, global = true, env = "REQDRAFT_INVENTORY")]
    inventory: Option<PathBuf>,

    #[arg(long, global = true)]
    export_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct InputArgs {
    /// text, image, pdf, docx, excel or web
    #[arg(short, long, default_value = "text")]
    kind: String,
    /// Idea text, file path or URL, depending on the kind
    #[arg(short, long)]
    input: String,
    /// American or British spelling; overrides the config
    #[arg(short, long)]
    dialect: Option<String>,
    /// Refinement answer as keyword=yes|no, repeatable
    #[arg(short, long = "answer")]
    answers: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and classify requirements
    Generate {
        #[command(flatten)]
        input: InputArgs,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Split text into functional and non-functional requirements
    Classify { text: String },
    /// Rate how detailed a requirement text is
    Score { text: String },
    /// Generate requirements and record a new document version
    Export {
        #[arg(short, long)]
        user: String,
        #[command(flatten)]
        input: InputArgs,
        /// Write Markdown instead of .docx
        #[arg(long)]
        markdown: bool,
    },
    /// Generate requirements and write the user-story sheet (.xlsx or .csv)
    Stories {
        #[command(flatten)]
        input: InputArgs,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// List recorded versions for a user
    History {
        #[arg(short, long)]
        user: String,
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    fn apply_overrides(&self, cfg: &mut DraftConfig) {
        if let Some(v) = &self.model_endpoint {
            cfg.model_endpoint = v.clone();
        }
        if let Some(v) = &self.model_id {
            cfg.model_id = v.clone();
        }
        if let Some(v) = self.max_length {
            cfg.max_length = v;
        }
        if let Some(v) = &self.rules {
            cfg.rules_path = v.clone();
        }
        if let Some(v) = &self.inventory {
            cfg.inventory_path = v.clone();
        }
        if let Some(v) = &self.export_root {
            cfg.export_root = v.clone();
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let mut cfg = DraftConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    cli.apply_overrides(&mut cfg);
    tracing::debug!(?cfg, "configuration resolved");

    match cli.command {
        Commands::Generate { input, json } => {
            let (outcome, refined) = draft(&cfg, &input)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&refined)?);
            } else {
                print_requirements(&refined);
                print_questions(&outcome, &input.answers);
            }
        }
        Commands::Classify { text } => print_requirements(&classify_into_set(&text)),
        Commands::Score { text } => {
            let s = clarity_score(&text);
            println!("Clarity Score: {}/10 ({})", s.score, s.comment);
        }
        Commands::Export {
            user,
            input,
            markdown,
        } => {
            let (_, refined) = draft(&cfg, &input)?;
            let renderer: Box<dyn DocumentRenderer> = if markdown {
                Box::new(MarkdownRenderer)
            } else {
                Box::new(DocxRenderer)
            };
            let record = InventoryStore::from_config(&cfg).record_version(
                &user,
                &refined.functional,
                &refined.non_functional,
                renderer.as_ref(),
            )?;
            println!("Version {} saved to {}", record.version, record.filename);
        }
        Commands::Stories { input, out } => {
            let (_, refined) = draft(&cfg, &input)?;
            let path = render_user_stories(&refined.functional, &out)?;
            println!("{} user stories written to {}", refined.functional.len(), path.display());
        }
        Commands::History { user, json } => {
            let records = InventoryStore::from_config(&cfg).history(&user)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No versions recorded for {}", user);
            } else {
                for r in records {
                    println!("Version {} ({}): {}", r.version, r.timestamp, r.filename);
                }
            }
        }
    }
    Ok(())
}

fn draft(cfg: &DraftConfig, input: &InputArgs) -> anyhow::Result<(GenerationOutcome, RequirementSet)> {
    let kind: InputKind = input.kind.parse()?;
    let dialect = input
        .dialect
        .as_deref()
        .map(Dialect::from_label)
        .unwrap_or(cfg.dialect);
    let payload = InputPayload::for_kind(kind, &input.input)
        .with_context(|| format!("reading {} input", kind.as_str()))?;
    let generator = RequirementGenerator::from_config(cfg)?;
    let outcome = generator.generate(&payload, kind, dialect)?;
    let answers = parse_answers(&input.answers)?;
    let refined = outcome.refine(&answers);
    Ok((outcome, refined))
}

fn parse_answers(raw: &[String]) -> anyhow::Result<Vec<(String, Answer)>> {
    let mut out = Vec::new();
    for item in raw {
        let Some((keyword, answer)) = item.split_once('=') else {
            bail!("answer '{}' must look like keyword=yes", item);
        };
        let Some(answer) = Answer::parse(answer) else {
            bail!("answer for '{}' must be yes or no", keyword);
        };
        out.push((keyword.trim().to_string(), answer));
    }
    Ok(out)
}

fn print_requirements(set: &RequirementSet) {
    println!("Functional Requirements:");
    for (i, r) in set.functional.iter().enumerate() {
        println!("  FR{}: {}", i + 1, r);
    }
    println!("Non-Functional Requirements:");
    for (i, r) in set.non_functional.iter().enumerate() {
        println!("  NFR{}: {}", i + 1, r);
    }
    let s = clarity_score(&set.raw_text);
    println!("Clarity Score: {}/10 ({})", s.score, s.comment);
}

fn print_questions(outcome: &GenerationOutcome, answered: &[String]) {
    let pending: Vec<_> = outcome
        .refinement_questions()
        .into_iter()
        .filter(|q| {
            !answered
                .iter()
                .any(|a| a.split('=').next().is_some_and(|k| k.trim().eq_ignore_ascii_case(q.keyword)))
        })
        .collect();
    if pending.is_empty() {
        return;
    }
    println!("Refinement questions (answer with --answer keyword=yes|no):");
    for q in pending {
        println!("  [{}] {} ({})", q.keyword, q.question, q.options.join("/"));
    }
}
