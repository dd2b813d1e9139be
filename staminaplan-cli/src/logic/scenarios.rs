//! Named verification scenarios and the checks they run.
use anyhow::{Result, ensure};

use staminaplan_game::{
    ActionCatalog, ActionRole, Compositions, CostTable, EnumerationStats, PlanConfig, PlanTag,
    StrategyPlan, constants::TOLERANCE, final_stamina, is_recommended, resolve, scheduled_cap,
};

/// One engine run handed to each check.
#[derive(Debug, Clone)]
pub struct ScenarioRun<'a> {
    pub catalog: &'a ActionCatalog,
    pub config: PlanConfig,
    pub costs: CostTable,
    pub plans: Vec<StrategyPlan>,
    pub stats: EnumerationStats,
}

pub type Check = fn(&ScenarioRun<'_>) -> Result<()>;

pub struct VerifyScenario {
    pub key: &'static str,
    pub description: &'static str,
    pub configs: Vec<PlanConfig>,
    pub checks: Vec<Check>,
}

impl VerifyScenario {
    fn new(key: &'static str, description: &'static str, configs: Vec<PlanConfig>) -> Self {
        Self {
            key,
            description,
            configs,
            checks: vec![plan_invariants],
        }
    }

    fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }
}

pub const SCENARIO_KEYS: &[&str] = &[
    "reference-default",
    "empty-result",
    "skill-sweep",
    "turn-sweep",
    "target-sweep",
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIO_KEYS
        .iter()
        .filter_map(|key| get_scenario(key))
        .map(|s| (s.key, s.description))
        .collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<VerifyScenario> {
    let scenario = match key {
        "reference-default" => VerifyScenario::new(
            "reference-default",
            "Startup configuration (100 → 1 over 14 turns) yields the best plan first",
            vec![PlanConfig::default()],
        )
        .with_check(non_empty)
        .with_check(best_plan_first),
        "empty-result" => VerifyScenario::new(
            "empty-result",
            "One turn cannot close a 100-point gap; the result is empty",
            vec![PlanConfig::new(0, 100, 1, 0)],
        )
        .with_check(empty),
        "skill-sweep" => VerifyScenario::new(
            "skill-sweep",
            "Skill levels 0-30 erode spend costs without turning them positive",
            (0..=30).map(|s| PlanConfig::default().with_skill_level(s)).collect(),
        )
        .with_check(cost_floor),
        "turn-sweep" => VerifyScenario::new(
            "turn-sweep",
            "Every turn budget generates exactly the capped compositions",
            (1..=14)
                .map(|t| PlanConfig::new(60, 40, t, 0))
                .collect(),
        )
        .with_check(generated_count),
        "target-sweep" => VerifyScenario::new(
            "target-sweep",
            "Targets 0-100 keep every plan inside the tolerance band",
            (0..=20)
                .map(|t| PlanConfig::default().with_target_stamina(t * 5))
                .collect(),
        ),
        _ => return None,
    };
    Some(scenario)
}

/// Run the engine for one configuration of a scenario.
#[must_use]
pub fn execute<'a>(catalog: &'a ActionCatalog, config: PlanConfig) -> ScenarioRun<'a> {
    let costs = resolve(catalog, config.skill_level());
    let (plans, stats) = staminaplan_game::enumerate_with_stats(&config, &costs);
    ScenarioRun {
        catalog,
        config,
        costs,
        plans,
        stats,
    }
}

fn plan_invariants(run: &ScenarioRun<'_>) -> Result<()> {
    let turns = u32::from(run.config.remaining_turns());
    let cap = scheduled_cap(run.config.remaining_turns());
    let target = run.config.target_stamina();
    let scheduled = run.catalog.scheduled_index();

    for (idx, plan) in run.plans.iter().enumerate() {
        ensure!(plan.rank == idx + 1, "{} has rank {}", plan.label, plan.rank);
        ensure!(
            plan.counts.total() == turns,
            "{} uses {} turns, expected {turns}",
            plan.label,
            plan.counts.total()
        );
        ensure!(
            plan.counts.count_at(scheduled) <= cap,
            "{} exceeds the scheduled cap {cap}",
            plan.label
        );
        ensure!(
            (0..=100).contains(&plan.final_stamina),
            "{} final stamina {} outside [0, 100]",
            plan.label,
            plan.final_stamina
        );
        ensure!(
            (plan.final_stamina - target).abs() <= TOLERANCE,
            "{} misses target {target} by more than {TOLERANCE}",
            plan.label
        );
        let expected_tag = PlanTag::for_deviation(plan.final_stamina - target);
        ensure!(
            plan.tag == expected_tag,
            "{} tagged {:?}, expected {expected_tag:?}",
            plan.label,
            plan.tag
        );
        ensure!(
            plan.recommended == is_recommended(plan.deviation),
            "{} recommendation flag is wrong",
            plan.label
        );
    }

    for pair in run.plans.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        ensure!(
            a.abs_error() < b.abs_error()
                || (a.abs_error() == b.abs_error() && a.final_stamina >= b.final_stamina),
            "{} and {} are out of order",
            a.label,
            b.label
        );
    }
    Ok(())
}

fn non_empty(run: &ScenarioRun<'_>) -> Result<()> {
    ensure!(!run.plans.is_empty(), "expected at least one plan");
    Ok(())
}

fn empty(run: &ScenarioRun<'_>) -> Result<()> {
    ensure!(
        run.plans.is_empty(),
        "expected no plans, got {}",
        run.plans.len()
    );
    Ok(())
}

fn best_plan_first(run: &ScenarioRun<'_>) -> Result<()> {
    let target = run.config.target_stamina();
    let start = run.config.start_stamina();
    let best = Compositions::for_plan(&run.config, &run.costs)
        .map(|a| (final_stamina(start, &a, &run.costs) - target).abs())
        .min();
    let top = run.plans.first().map(StrategyPlan::abs_error);
    ensure!(
        top == best,
        "top plan error {top:?} is not the best achievable {best:?}"
    );
    Ok(())
}

fn cost_floor(run: &ScenarioRun<'_>) -> Result<()> {
    let skill = run.config.skill_level();
    let previous = skill.checked_sub(1).map(|s| resolve(run.catalog, s));
    for (idx, kind) in run.catalog.iter().enumerate() {
        let delta = run
            .costs
            .delta_at(idx)
            .ok_or_else(|| anyhow::anyhow!("no resolved cost for {}", kind.id))?;
        if kind.role == ActionRole::Restore {
            ensure!(
                delta == kind.base_cost,
                "{} changed with skill {skill}",
                kind.id
            );
        } else {
            ensure!(delta <= 0, "{} turned restorative at skill {skill}", kind.id);
        }
        if let Some(before) = previous.as_ref().and_then(|p| p.delta_at(idx)) {
            ensure!(
                delta >= before,
                "{} costs more at skill {skill} than at {}",
                kind.id,
                skill - 1
            );
        }
    }
    Ok(())
}

fn generated_count(run: &ScenarioRun<'_>) -> Result<()> {
    let turns = run.config.remaining_turns();
    let cap = scheduled_cap(turns);
    let scheduled = run.catalog.scheduled_index();
    let expected = Compositions::new(run.catalog.len(), turns, None)
        .filter(|a| a.count_at(scheduled) <= cap)
        .count();
    ensure!(
        run.stats.generated == expected,
        "generated {} tuples for {turns} turns, expected {expected}",
        run.stats.generated
    );
    ensure!(run.stats.kept == run.plans.len(), "kept count mismatch");
    Ok(())
}
