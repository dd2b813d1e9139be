use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use staminaplan_game::ActionCatalog;

use super::scenarios::{VerifyScenario, execute};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct ScenarioTester<'a> {
    catalog: &'a ActionCatalog,
    verbose: bool,
}

impl<'a> ScenarioTester<'a> {
    pub const fn new(catalog: &'a ActionCatalog, verbose: bool) -> Self {
        Self { catalog, verbose }
    }

    /// Run every configuration of a scenario through the engine and its checks.
    pub fn run_scenario(&self, scenario: &VerifyScenario) -> ScenarioResult {
        if self.verbose {
            println!(
                "🧪 Testing scenario: {} ({} configurations)",
                scenario.key.bright_white(),
                scenario.configs.len()
            );
        }

        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();
        let iterations = scenario.configs.len();

        for (i, config) in scenario.configs.iter().enumerate() {
            let start_time = Instant::now();
            let run = execute(self.catalog, *config);
            let outcome = scenario.checks.iter().try_for_each(|check| check(&run));
            let duration = start_time.elapsed();

            match outcome {
                Ok(()) => {
                    successes += 1;
                    performance_data.push(duration);
                    if self.verbose {
                        println!(
                            "  ✅ Configuration {}/{} passed ({duration:?}) plans:{} generated:{}",
                            i + 1,
                            iterations,
                            run.plans.len(),
                            run.stats.generated
                        );
                    }
                }
                Err(err) => {
                    let settings = config.settings();
                    failures.push(format!(
                        "Configuration {} (start {}, target {}, turns {}, skill {}): {err}",
                        i + 1,
                        settings.start_stamina,
                        settings.target_stamina,
                        settings.remaining_turns,
                        settings.skill_level
                    ));
                    if self.verbose {
                        println!(
                            "  ❌ Configuration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            err.to_string().red()
                        );
                    }
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.key.to_string(),
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let micros: Vec<u128> = durations.iter().map(Duration::as_micros).collect();
        micros.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = Vec::<u128>::deserialize(deserializer)?;
        Ok(micros
            .into_iter()
            .map(|m| Duration::from_micros(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
