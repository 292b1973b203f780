use crate::error::{LedgerError, LfResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub timing: TimingParams,
    #[command(flatten)]
    pub scoring: ScoringParams,
    #[command(flatten)]
    pub report: ReportParams,
}

/// Delays driving the session's scheduled tasks.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingParams {
    /// Pause between "all required slots filled" and completion.
    #[arg(long, default_value_t = 1000)]
    pub settle_ms: u64,
    #[arg(long, default_value_t = 1000)]
    pub wrong_display_ms: u64,
    #[arg(long, default_value_t = 1000)]
    pub excess_clear_ms: u64,
    /// Formula mode: wait after the last "next" before the settle phase starts.
    #[arg(long, default_value_t = 500)]
    pub final_question_delay_ms: u64,
}

impl Default for TimingParams {
    fn default() -> Self {
        Self {
            settle_ms: 1000,
            wrong_display_ms: 1000,
            excess_clear_ms: 1000,
            final_question_delay_ms: 500,
        }
    }
}

impl TimingParams {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn wrong_display(&self) -> Duration {
        Duration::from_millis(self.wrong_display_ms)
    }

    pub fn excess_clear(&self) -> Duration {
        Duration::from_millis(self.excess_clear_ms)
    }

    pub fn final_question_delay(&self) -> Duration {
        Duration::from_millis(self.final_question_delay_ms)
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    #[arg(long, default_value_t = 2)]
    pub points_original: u32,
    #[arg(long, default_value_t = 1)]
    pub points_clone: u32,
    #[arg(long, default_value_t = 1)]
    pub wrong_penalty: u32,
    /// Penalty duplicates injected into the pool per wrong move (not in formula mode).
    #[arg(long, default_value_t = 2)]
    pub clones_per_mistake: usize,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            points_original: 2,
            points_clone: 1,
            wrong_penalty: 1,
            clones_per_mistake: 2,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportParams {
    /// Result endpoint. Empty disables submission.
    #[arg(long, default_value = "")]
    pub endpoint: String,
    #[arg(long, default_value_t = 0)]
    pub max_retries: u32,
    #[arg(long, default_value_t = 500)]
    pub retry_backoff_ms: u64,
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            max_retries: 0,
            retry_backoff_ms: 500,
            timeout_ms: 10_000,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LedgerError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Rejects combinations the engine cannot honour.
    pub fn check(&self) -> LfResult<()> {
        if self.scoring.points_clone > self.scoring.points_original {
            return Err(LedgerError::Config(format!(
                "points_clone ({}) must not exceed points_original ({})",
                self.scoring.points_clone, self.scoring.points_original
            )));
        }
        if !self.report.endpoint.is_empty()
            && !(self.report.endpoint.starts_with("http://")
                || self.report.endpoint.starts_with("https://"))
        {
            return Err(LedgerError::Config(format!(
                "endpoint '{}' is not an http(s) URL",
                self.report.endpoint
            )));
        }
        Ok(())
    }

    /// Copies every flag the user typed on the command line over the file values.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(timing.settle_ms);
        update_if_present!(timing.wrong_display_ms);
        update_if_present!(timing.excess_clear_ms);
        update_if_present!(timing.final_question_delay_ms);

        update_if_present!(scoring.points_original);
        update_if_present!(scoring.points_clone);
        update_if_present!(scoring.wrong_penalty);
        update_if_present!(scoring.clones_per_mistake);

        update_if_present!(report.endpoint);
        update_if_present!(report.max_retries);
        update_if_present!(report.retry_backoff_ms);
        update_if_present!(report.timeout_ms);
    }
}
