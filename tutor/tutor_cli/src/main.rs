use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::json;
use shared_event_bus::{EventPublisher, FileEventPublisher};
use shared_logging::{JsonLogger, LogLevel, LogRecord};
use tutor_agents::{AgentTelemetry, Orchestrator, TutorConfig};
use tutor_knowledge::{
    filter_by_bandwidth, summarize_resources, Corpus, ExtractiveSummarizer, PassthroughTranslator,
    Resource, SummaryMode, Translator,
};
use tutor_planning::{planned_kb, PlanningRuntime, PlanningTelemetry, StudentProfile};

#[derive(Parser, Debug)]
#[command(name = "tutor", version, about = "Offline tutoring pipeline and weekly planner")]
struct Cli {
    /// TOML file with pipeline settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// JSON-lines log file; overrides `log_path` from the config.
    #[arg(long, global = true)]
    log_path: Option<PathBuf>,
    /// File receiving one JSON event per line.
    #[arg(long, global = true)]
    event_log: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answers questions against a corpus, sharing one session.
    Ask(AskArgs),
    /// Grades a free-text answer against the expected one.
    Assess(AssessArgs),
    /// Plans a week of lessons within a student's bandwidth.
    Plan(PlanArgs),
    /// Prints extractive summaries for a resource manifest.
    Summarize(SummarizeArgs),
}

#[derive(Args, Debug)]
#[command(group(clap::ArgGroup::new("source").required(true).args(["corpus", "resources"])))]
struct AskArgs {
    /// JSON array of documents.
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// JSON array of manifest resources.
    #[arg(long)]
    resources: Option<PathBuf>,
    /// JSON object mapping resource id to summary (with `--resources`).
    #[arg(long, requires = "resources")]
    summaries: Option<PathBuf>,
    /// Drop resources larger than this many KB (with `--resources`).
    #[arg(long, requires = "resources")]
    max_kb: Option<u64>,
    #[arg(long, default_value = "cli")]
    session: String,
    /// Student grade (1-12) forwarded to the tutor.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
    grade: Option<u8>,
    /// Language code the answer is translated to.
    #[arg(long)]
    translate_to: Option<String>,
    /// Print full responses as JSON.
    #[arg(long)]
    json: bool,
    #[arg(required = true)]
    questions: Vec<String>,
}

#[derive(Args, Debug)]
struct AssessArgs {
    #[arg(long, default_value = "cli")]
    session: String,
    #[arg(long)]
    student: String,
    #[arg(long)]
    expected: String,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// JSON student profile.
    #[arg(long)]
    profile: PathBuf,
    /// JSON array of manifest resources.
    #[arg(long)]
    resources: PathBuf,
    /// JSON object mapping resource id to summary; extractive summaries otherwise.
    #[arg(long)]
    summaries: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SummarizeArgs {
    #[arg(long)]
    resources: PathBuf,
    #[arg(long, value_enum, default_value_t = ModeArg::Short)]
    mode: ModeArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ModeArg {
    Short,
    Long,
}

impl From<ModeArg> for SummaryMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Short => Self::Short,
            ModeArg::Long => Self::Long,
        }
    }
}

/// Settings resolved from the global flags.
struct RunContext {
    config: TutorConfig,
    log_path: Option<PathBuf>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl RunContext {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => TutorConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => TutorConfig::default(),
        };
        let log_path = cli.log_path.clone().or_else(|| config.log_path.clone());
        let events = match &cli.event_log {
            Some(path) => Some(Arc::new(FileEventPublisher::new(path)?) as Arc<dyn EventPublisher>),
            None => None,
        };
        Ok(Self {
            config,
            log_path,
            events,
        })
    }

    fn agent_telemetry(&self) -> Result<AgentTelemetry> {
        let mut builder = AgentTelemetry::builder("tutor-agents");
        if let Some(path) = &self.log_path {
            builder = builder.log_path(path);
        }
        if let Some(events) = &self.events {
            builder = builder.event_publisher(Arc::clone(events));
        }
        builder.build()
    }

    fn planning_telemetry(&self) -> Result<PlanningTelemetry> {
        let mut builder = PlanningTelemetry::builder("tutor-planning");
        if let Some(path) = &self.log_path {
            builder = builder.log_path(path);
        }
        if let Some(events) = &self.events {
            builder = builder.event_publisher(Arc::clone(events));
        }
        builder.build()
    }

    fn log(&self, level: LogLevel, message: &str, metadata: serde_json::Value) -> Result<()> {
        if let Some(path) = &self.log_path {
            let logger = JsonLogger::new(path)?;
            logger.log(&LogRecord::new("tutor-cli", level, message).with_fields(&metadata))?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    run(cli, &mut stdout.lock())
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let ctx = RunContext::from_cli(&cli)?;
    match cli.command {
        Commands::Ask(args) => handle_ask(&ctx, args, out),
        Commands::Assess(args) => handle_assess(&ctx, &args, out),
        Commands::Plan(args) => handle_plan(&ctx, &args, out),
        Commands::Summarize(args) => handle_summarize(&ctx, &args, out),
    }
}

fn handle_ask(ctx: &RunContext, args: AskArgs, out: &mut dyn Write) -> Result<()> {
    let corpus = load_corpus(&args)?;
    ctx.log(
        LogLevel::Info,
        "cli.ask.corpus_loaded",
        json!({ "documents": corpus.len(), "questions": args.questions.len() }),
    )?;
    let orchestrator = Orchestrator::new(Arc::new(corpus), ctx.config.clone())
        .with_telemetry(ctx.agent_telemetry()?);
    let profile = args
        .grade
        .map(|grade| StudentProfile::new(&args.session, &args.session, grade, "en", 0));
    if let Some(profile) = &profile {
        profile.validate()?;
    }
    let translator = PassthroughTranslator;

    for question in &args.questions {
        let mut response = orchestrator.handle_question(&args.session, question, profile.as_ref());
        if let Some(target) = &args.translate_to {
            response.answer = translator.translate(&response.answer, target);
        }
        if args.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;
            continue;
        }
        writeln!(out, "Q: {question}")?;
        writeln!(out, "A: {}", response.answer)?;
        writeln!(out, "Explanation: {}", response.teaching.explanation)?;
        for example in &response.teaching.examples {
            writeln!(out, "  {example}")?;
        }
        for (idx, item) in response.teaching.practice.iter().enumerate() {
            writeln!(out, "Practice {}: {} ({})", idx + 1, item.question, item.expected_answer)?;
        }
        for candidate in &response.retrieved {
            writeln!(out, "  [{:.3}] {}", candidate.score, candidate.id)?;
        }
    }
    Ok(())
}

fn load_corpus(args: &AskArgs) -> Result<Corpus> {
    if let Some(path) = &args.corpus {
        return Corpus::load(path).with_context(|| format!("loading corpus {}", path.display()));
    }
    let path = args
        .resources
        .as_ref()
        .context("either --corpus or --resources is required")?;
    let mut resources: Vec<Resource> = read_json(path)?;
    if let Some(max_kb) = args.max_kb {
        resources = filter_by_bandwidth(&resources, max_kb);
    }
    let summaries = load_summaries(args.summaries.as_deref(), &resources)?;
    Corpus::from_resources(&resources, &summaries)
        .with_context(|| format!("building corpus from {}", path.display()))
}

fn load_summaries(path: Option<&Path>, resources: &[Resource]) -> Result<IndexMap<String, String>> {
    match path {
        Some(path) => read_json(path),
        None => Ok(summarize_resources(
            resources,
            &ExtractiveSummarizer,
            SummaryMode::Short,
        )),
    }
}

fn handle_assess(ctx: &RunContext, args: &AssessArgs, out: &mut dyn Write) -> Result<()> {
    let orchestrator = Orchestrator::new(Arc::new(Corpus::new()), ctx.config.clone())
        .with_telemetry(ctx.agent_telemetry()?);
    let result = orchestrator.assess_answer(&args.session, &args.student, &args.expected);
    writeln!(out, "score: {:.3}", result.score)?;
    writeln!(out, "correct: {}", result.correct)?;
    writeln!(out, "feedback: {}", result.feedback)?;
    Ok(())
}

fn handle_plan(ctx: &RunContext, args: &PlanArgs, out: &mut dyn Write) -> Result<()> {
    let profile: StudentProfile = read_json(&args.profile)?;
    let resources: Vec<Resource> = read_json(&args.resources)?;
    let summaries = load_summaries(args.summaries.as_deref(), &resources)?;
    let runtime = PlanningRuntime::default().with_telemetry(ctx.planning_telemetry()?);
    let lessons = runtime.plan_week(&profile, &resources, &summaries)?;
    for lesson in &lessons {
        writeln!(
            out,
            "Day {}: {} ({} KB) - {}",
            lesson.day, lesson.title, lesson.estimated_kb, lesson.summary
        )?;
    }
    writeln!(
        out,
        "Planned {} of {} KB across {} lessons",
        planned_kb(&lessons),
        profile.weekly_bandwidth_kb,
        lessons.len()
    )?;
    Ok(())
}

fn handle_summarize(ctx: &RunContext, args: &SummarizeArgs, out: &mut dyn Write) -> Result<()> {
    let resources: Vec<Resource> = read_json(&args.resources)?;
    let summaries = summarize_resources(&resources, &ExtractiveSummarizer, args.mode.into());
    ctx.log(
        LogLevel::Info,
        "cli.summarize.done",
        json!({ "resources": summaries.len() }),
    )?;
    for (id, summary) in &summaries {
        writeln!(out, "{id}: {summary}")?;
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
