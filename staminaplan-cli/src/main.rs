mod common;
mod interactive;
mod logic;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdin, stdout};
use std::path::PathBuf;
use std::time::Instant;

use staminaplan_game::{ActionCatalog, PlannerEngine, PlannerSession, enumerate_async};

use common::{FileLoader, PlanOverrides, split_csv};
use logic::{SCENARIO_KEYS, ScenarioResult, ScenarioTester, get_scenario, list_scenarios};
use render::{PlanView, write_costs};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RunMode {
    /// Search once and print ranked plans
    Plan,
    /// Run verification scenarios against the engine
    Verify,
    /// Edit the configuration and recalculate on demand
    Interactive,
}

#[derive(Debug, Parser)]
#[command(name = "staminaplan", version = "0.1.0")]
#[command(about = "Find action plans that spend stamina down to a target over the remaining turns")]
struct Args {
    /// Run mode: plan (one search), verify (scenario checks), or interactive
    #[arg(long, value_enum, default_value_t = RunMode::Plan)]
    mode: RunMode,

    /// Starting stamina (clamped to 0-100)
    #[arg(long, allow_negative_numbers = true)]
    start: Option<i64>,

    /// Target stamina (clamped to 0-100)
    #[arg(long, allow_negative_numbers = true)]
    target: Option<i64>,

    /// Remaining turns (clamped to 1-14)
    #[arg(long, allow_negative_numbers = true)]
    turns: Option<i64>,

    /// Skill level (floored at 0)
    #[arg(long, allow_negative_numbers = true)]
    skill: Option<i64>,

    /// JSON configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON action catalog replacing the bundled one
    #[arg(long)]
    actions: Option<PathBuf>,

    /// Show at most this many plan cards in console output
    #[arg(long)]
    limit: Option<usize>,

    /// Scenarios to verify (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    const fn overrides(&self) -> PlanOverrides {
        PlanOverrides {
            start_stamina: self.start,
            target_stamina: self.target,
            remaining_turns: self.turns,
            skill_level: self.skill,
        }
    }

    fn loader(&self) -> FileLoader {
        FileLoader::new(self.actions.clone(), self.config.clone(), self.overrides())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let engine = PlannerEngine::new(args.loader());
    let mut session = engine
        .create_session()
        .context("failed to load planner inputs")?;

    match args.mode {
        RunMode::Plan => run_plan(&args, &mut session).await,
        RunMode::Interactive => {
            let mut input = stdin().lock();
            let mut out = stdout().lock();
            interactive::run(&mut input, &mut out, &mut session, args.limit)
        }
        RunMode::Verify => {
            let start_time = Instant::now();
            let scenarios = expand_scenarios(&args.scenarios);
            let results = run_verify_scenarios(&args, &scenarios, session.catalog());
            write_reports(&args, &results, start_time)?;
            if results.iter().any(|r| !r.passed) {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:20} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎮 StaminaPlan".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for key in SCENARIO_KEYS {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push((*key).to_string());
            }
        }
    }
    scenarios
}

async fn run_plan(args: &Args, session: &mut PlannerSession) -> Result<()> {
    let console = args.report == "console";
    if console {
        let mut out = stdout().lock();
        write_costs(&mut out, session.catalog(), session.costs())?;
        writeln!(out, "{}", "⏳ Calculating…".dimmed())?;
    }

    let started = Instant::now();
    let plans = enumerate_async(*session.config(), session.costs().clone()).await?;
    let summary = session.install(plans);
    log::info!("plan search finished in {:?}", started.elapsed());

    let view = PlanView {
        catalog: session.catalog(),
        config: session.config(),
        costs: session.costs(),
        plans: session.plans(),
        summary,
    };
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report.as_str() {
        "json" => render::generate_json_report(&mut output_target, &view)?,
        "markdown" => render::generate_markdown_report(&mut output_target, &view)?,
        "csv" => render::generate_csv_report(&mut output_target, &view)?,
        _ => render::generate_console_report(&mut output_target, &view, args.limit)?,
    }
    output_target.flush_inner()?;
    Ok(())
}

fn run_verify_scenarios(
    args: &Args,
    scenarios: &[String],
    catalog: &ActionCatalog,
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Verification Scenarios".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = ScenarioTester::new(catalog, args.verbose);
    let mut results = Vec::new();
    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.push(tester.run_scenario(&scenario));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            if results.is_empty() {
                writeln!(&mut output_target, "[]")?;
            } else {
                logic::reports::generate_json_report(&mut output_target, results)?;
            }
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# StaminaPlan Verification Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        "csv" => logic::reports::generate_csv_report(&mut output_target, results)?,
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
        }
    }

    if args.report == "console" {
        let duration = start_time.elapsed();
        writeln!(&mut output_target)?;
        writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn base_args() -> Args {
        Args {
            mode: RunMode::Plan,
            start: None,
            target: None,
            turns: None,
            skill: None,
            config: None,
            actions: None,
            limit: None,
            scenarios: "all".to_string(),
            list_scenarios: false,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "staminaplan-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    fn sample_result(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "turn-sweep".to_string(),
            passed,
            iterations_run: 2,
            successful_iterations: if passed { 2 } else { 1 },
            failures: if passed {
                Vec::new()
            } else {
                vec!["failure".to_string()]
            },
            average_duration: Duration::from_micros(10),
            performance_data: vec![Duration::from_micros(10)],
        }
    }

    #[test]
    fn parses_flags_and_negative_values() {
        let args = Args::try_parse_from([
            "staminaplan",
            "--mode",
            "verify",
            "--start",
            "-5",
            "--skill",
            "3",
            "--report",
            "csv",
        ])
        .unwrap();
        assert!(matches!(args.mode, RunMode::Verify));
        assert_eq!(args.start, Some(-5));
        let config = args.overrides().apply(staminaplan_game::PlanConfig::default());
        assert_eq!(config.start_stamina(), 0);
        assert_eq!(config.skill_level(), 3);
    }

    #[test]
    fn rejects_unknown_report_format() {
        assert!(Args::try_parse_from(["staminaplan", "--report", "xml"]).is_err());
    }

    #[test]
    fn expands_all_scenarios_keyword() {
        let expanded = expand_scenarios("skill-sweep,all");
        assert_eq!(expanded[0], "skill-sweep");
        assert_eq!(expanded.len(), SCENARIO_KEYS.len());
        assert!(expanded.contains(&"reference-default".to_string()));
    }

    #[test]
    fn expand_scenarios_without_all_preserves_order() {
        let expanded = expand_scenarios("turn-sweep,empty-result");
        assert_eq!(
            expanded,
            vec!["turn-sweep".to_string(), "empty-result".to_string()]
        );
    }

    #[test]
    fn verify_skips_unknown_scenarios() {
        let catalog = ActionCatalog::load_from_static();
        let results = run_verify_scenarios(
            &base_args(),
            &["empty-result".to_string(), "unknown".to_string()],
            &catalog,
        );
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = temp_path("scenarios.txt");
        let args = Args {
            list_scenarios: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("target-sweep"));
    }

    #[test]
    fn maybe_list_scenarios_returns_false_when_disabled() {
        assert!(!maybe_list_scenarios(&base_args()).unwrap());
    }

    #[test]
    fn write_reports_emits_json_for_empty_results() {
        let temp = temp_path("report.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[test]
    fn write_reports_markdown_empty_results() {
        let temp = temp_path("report.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No scenarios executed"));
    }

    #[test]
    fn write_reports_console_includes_total_time() {
        colored::control::set_override(false);
        let temp = temp_path("report.txt");
        let args = Args {
            report: "console".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result(false)], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("❌ FAIL turn-sweep"));
        assert!(content.contains("🏁 Total time"));
    }

    #[test]
    fn plan_mode_writes_json_report() {
        let temp = temp_path("plan.json");
        let args = Args {
            start: Some(50),
            target: Some(30),
            turns: Some(2),
            output: Some(temp.clone()),
            ..base_args()
        };
        let mut session = PlannerEngine::new(args.loader()).create_session().unwrap();
        tokio_test::block_on(run_plan(&args, &mut session)).unwrap();

        let content = std::fs::read_to_string(temp).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["summary"]["total"], 2);
        assert_eq!(parsed["plans"][0]["tag"], "perfect_match");
        assert!(!session.is_stale());
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
