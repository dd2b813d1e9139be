//! Plan rendering: console cards plus JSON, Markdown and CSV reports.
use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use staminaplan_game::{
    ActionCatalog, ActionRole, CostTable, PlanConfig, PlanSummary, PlanTag, StrategyPlan,
    constants::TOLERANCE, format_delta,
};

/// Counts at or above this threshold are highlighted on a card.
const EMPHASIS_THRESHOLD: u8 = 4;

pub const DISCLAIMER: &str =
    "Stamina values are estimates; in-game random events may shift the actual result.";
pub const EMPTY_STATE: &str = "No action combination lands within the tolerance window.";
pub const EMPTY_HINT: &str = "Try adjusting the target stamina or raising the skill level.";

/// Everything a report needs about one calculation.
#[derive(Debug, Clone, Copy)]
pub struct PlanView<'a> {
    pub catalog: &'a ActionCatalog,
    pub config: &'a PlanConfig,
    pub costs: &'a CostTable,
    pub plans: &'a [StrategyPlan],
    pub summary: PlanSummary,
}

#[derive(Debug, Serialize)]
struct KindCount<'a> {
    id: &'a str,
    name: &'a str,
    count: u8,
}

#[derive(Debug, Serialize)]
struct PlanRecord<'a> {
    rank: usize,
    label: &'a str,
    tag: PlanTag,
    tag_label: &'static str,
    tag_style: &'static str,
    recommended: bool,
    final_stamina: i32,
    deviation: i32,
    counts: Vec<KindCount<'a>>,
}

#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    generated_at: String,
    config: &'a PlanConfig,
    costs: &'a CostTable,
    summary: PlanSummary,
    plans: Vec<PlanRecord<'a>>,
}

fn plan_record<'a>(catalog: &'a ActionCatalog, plan: &'a StrategyPlan) -> PlanRecord<'a> {
    PlanRecord {
        rank: plan.rank,
        label: &plan.label,
        tag: plan.tag,
        tag_label: plan.tag.label(),
        tag_style: plan.tag.style(),
        recommended: plan.recommended,
        final_stamina: plan.final_stamina,
        deviation: plan.deviation,
        counts: catalog
            .iter()
            .zip(plan.counts.iter())
            .map(|(kind, count)| KindCount {
                id: &kind.id,
                name: &kind.name,
                count,
            })
            .collect(),
    }
}

/// Resolved cost list, one kind per line.
pub fn write_costs(out: &mut dyn Write, catalog: &ActionCatalog, costs: &CostTable) -> Result<()> {
    writeln!(
        out,
        "{}",
        format!("Current costs (skill Lv.{})", costs.skill_level()).bold()
    )?;
    for (idx, (kind, delta)) in catalog.iter().zip(costs.deltas()).enumerate() {
        let value = format_delta(delta);
        let value = if costs.role_at(idx) == ActionRole::Restore {
            value.green()
        } else {
            value.normal()
        };
        writeln!(out, "  {:<16} {value:>4}", kind.name)?;
    }
    Ok(())
}

fn tag_badge(tag: PlanTag) -> colored::ColoredString {
    let text = format!("[{}]", tag.label());
    match tag {
        PlanTag::PerfectMatch => text.green(),
        PlanTag::MeetsTarget => text.blue(),
        PlanTag::NearTarget => text.yellow(),
    }
}

fn write_card(out: &mut dyn Write, catalog: &ActionCatalog, plan: &StrategyPlan) -> Result<()> {
    let mut header = format!("{}  {}", plan.label.bold(), tag_badge(plan.tag));
    if plan.recommended {
        header.push_str(&format!("  {}", "★ RECOMMENDED".bright_cyan().bold()));
    }
    writeln!(out, "{header}")?;

    let cells: Vec<String> = catalog
        .iter()
        .zip(plan.counts.iter())
        .map(|(kind, count)| {
            let cell = format!("{} {count}", kind.name);
            if count >= EMPHASIS_THRESHOLD {
                cell.bold().to_string()
            } else {
                cell.dimmed().to_string()
            }
        })
        .collect();
    writeln!(out, "   {}", cells.join(" │ "))?;

    let stamina = format!("{} pts", plan.final_stamina);
    let status = if plan.is_perfect() {
        "✔ Perfect match".green().to_string()
    } else if plan.is_achieved() {
        format!("✔ Target reached ({})", plan.deviation_label())
            .green()
            .to_string()
    } else {
        format!("✖ Near target ({})", plan.deviation_label())
            .red()
            .to_string()
    };
    let stamina = if plan.is_achieved() {
        stamina.blue()
    } else {
        stamina.red()
    };
    writeln!(out, "   Final stamina: {stamina}  {status}")?;
    writeln!(out)?;
    Ok(())
}

fn write_footer(out: &mut dyn Write, view: &PlanView<'_>) -> Result<()> {
    writeln!(out, "{}", "-".repeat(30).cyan())?;
    writeln!(
        out,
        "Start: {} → Target: {} → Perfect matches: {}",
        view.config.start_stamina(),
        view.config.target_stamina(),
        view.summary.perfect_matches.to_string().green().bold()
    )?;
    writeln!(out, "ℹ️  {DISCLAIMER}")?;
    Ok(())
}

/// Ranked cards, most accurate first, followed by the summary footer.
pub fn generate_console_report(
    out: &mut dyn Write,
    view: &PlanView<'_>,
    limit: Option<usize>,
) -> Result<()> {
    writeln!(
        out,
        "{}",
        format!("🔎 Results ({})", view.summary.total).bright_cyan().bold()
    )?;
    writeln!(
        out,
        "Target: {} | showing plans within ±{TOLERANCE} points",
        view.config.target_stamina()
    )?;
    writeln!(out)?;

    if view.plans.is_empty() {
        writeln!(out, "🚫 {}", EMPTY_STATE.yellow())?;
        writeln!(out, "   {EMPTY_HINT}")?;
        writeln!(out)?;
    } else {
        let shown = limit.unwrap_or(view.plans.len()).min(view.plans.len());
        for plan in &view.plans[..shown] {
            write_card(out, view.catalog, plan)?;
        }
        if shown < view.plans.len() {
            writeln!(out, "… and {} more plans", view.plans.len() - shown)?;
            writeln!(out)?;
        }
    }

    write_footer(out, view)
}

pub fn generate_json_report(out: &mut dyn Write, view: &PlanView<'_>) -> Result<()> {
    let report = PlanReport {
        generated_at: Utc::now().to_rfc3339(),
        config: view.config,
        costs: view.costs,
        summary: view.summary,
        plans: view
            .plans
            .iter()
            .map(|p| plan_record(view.catalog, p))
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, view: &PlanView<'_>) -> Result<()> {
    writeln!(out, "# StaminaPlan Results\n")?;
    writeln!(out, "_Generated {}_\n", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;

    writeln!(out, "## Configuration\n")?;
    writeln!(out, "- **Start stamina**: {}", view.config.start_stamina())?;
    writeln!(out, "- **Target stamina**: {}", view.config.target_stamina())?;
    writeln!(out, "- **Remaining turns**: {}", view.config.remaining_turns())?;
    writeln!(out, "- **Skill level**: {}\n", view.config.skill_level())?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Plans**: {}", view.summary.total)?;
    writeln!(out, "- **Perfect matches**: {}", view.summary.perfect_matches)?;
    writeln!(out, "- **Recommended**: {}\n", view.summary.recommended)?;

    if view.plans.is_empty() {
        writeln!(out, "_{EMPTY_STATE} {EMPTY_HINT}_")?;
        return Ok(());
    }

    let names: Vec<&str> = view.catalog.iter().map(|k| k.name.as_str()).collect();
    writeln!(out, "## Plans\n")?;
    writeln!(
        out,
        "| Plan | Tag | {} | Final | Δ | Recommended |",
        names.join(" | ")
    )?;
    writeln!(out, "|{}", "---|".repeat(names.len() + 5))?;
    for plan in view.plans {
        let counts: Vec<String> = plan.counts.iter().map(|c| c.to_string()).collect();
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} |",
            plan.label,
            plan.tag.label(),
            counts.join(" | "),
            plan.final_stamina,
            plan.deviation_label(),
            if plan.recommended { "✅" } else { "" }
        )?;
    }
    writeln!(out)?;
    writeln!(out, "> {DISCLAIMER}")?;
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, view: &PlanView<'_>) -> Result<()> {
    let ids: Vec<&str> = view.catalog.iter().map(|k| k.id.as_str()).collect();
    writeln!(
        out,
        "rank,label,tag,recommended,final_stamina,deviation,{}",
        ids.join(",")
    )?;
    for plan in view.plans {
        let counts: Vec<String> = plan.counts.iter().map(|c| c.to_string()).collect();
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            plan.rank,
            plan.label,
            plan.tag.key(),
            plan.recommended,
            plan.final_stamina,
            plan.deviation,
            counts.join(",")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use staminaplan_game::{enumerate, resolve, summarize};

    fn render<F>(config: PlanConfig, f: F) -> String
    where
        F: Fn(&mut dyn Write, &PlanView<'_>) -> Result<()>,
    {
        colored::control::set_override(false);
        let catalog = ActionCatalog::load_from_static();
        let costs = resolve(&catalog, config.skill_level());
        let plans = enumerate(&config, &costs);
        let view = PlanView {
            catalog: &catalog,
            config: &config,
            costs: &costs,
            summary: summarize(&plans),
            plans: &plans,
        };
        let mut buf = Vec::new();
        f(&mut buf, &view).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn console_report_renders_cards_and_footer() {
        let text = render(PlanConfig::new(50, 30, 2, 0), |out, view| {
            generate_console_report(out, view, None)
        });
        assert!(text.contains("Plan 1  [Perfect Match]"));
        assert!(text.contains("RECOMMENDED"));
        assert!(text.contains("Part-time Job 1"));
        assert!(text.contains("Final stamina: 30 pts"));
        assert!(text.contains("Perfect matches: 1"));
        assert!(text.contains(DISCLAIMER));
    }

    #[test]
    fn console_report_respects_limit() {
        let text = render(PlanConfig::default(), |out, view| {
            generate_console_report(out, view, Some(3))
        });
        assert!(text.contains("Plan 3"));
        assert!(!text.contains("Plan 4 "));
        assert!(text.contains("more plans"));
    }

    #[test]
    fn empty_results_render_empty_state() {
        let text = render(PlanConfig::new(0, 100, 1, 0), |out, view| {
            generate_console_report(out, view, None)
        });
        assert!(text.contains("Results (0)"));
        assert!(text.contains(EMPTY_STATE));
        assert!(text.contains(EMPTY_HINT));

        let md = render(PlanConfig::new(0, 100, 1, 0), generate_markdown_report);
        assert!(md.contains(EMPTY_STATE));
    }

    #[test]
    fn json_report_is_parseable() {
        let text = render(PlanConfig::new(50, 30, 2, 0), generate_json_report);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["summary"]["perfect_matches"], 1);
        assert_eq!(value["plans"][0]["tag"], "perfect_match");
        assert_eq!(value["plans"][0]["counts"][3]["id"], "work");
        assert_eq!(value["plans"][0]["counts"][3]["count"], 1);
        assert_eq!(value["config"]["remaining_turns"], 2);
    }

    #[test]
    fn csv_and_markdown_list_every_plan() {
        let config = PlanConfig::new(50, 30, 2, 0);
        let csv = render(config, generate_csv_report);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("rank,label,tag,recommended,final_stamina,deviation,school,research,fitness,work,rest")
        );
        assert!(csv.contains("1,Plan 1,perfect_match,true,30,0,0,0,0,1,1"));

        let md = render(config, generate_markdown_report);
        assert!(md.contains("# StaminaPlan Results"));
        assert!(md.contains("| Plan 1 | Perfect Match |"));
    }

    #[test]
    fn costs_list_signs_restorative_delta() {
        colored::control::set_override(false);
        let catalog = ActionCatalog::load_from_static();
        let costs = resolve(&catalog, 0);
        let mut buf = Vec::new();
        write_costs(&mut buf, &catalog, &costs).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("skill Lv.0"));
        assert!(text.contains("+10"));
        assert!(text.contains("-30"));
    }
}
