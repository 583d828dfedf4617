//! Runtime tuning, read from the environment (a `.env` file is honoured by the binary).

use std::env;
use std::str::FromStr;

use crate::infra::{ConfigError, Cost};

/// Default buffer kept in reserve when deciding whether a detour is affordable:
/// one round trip over a unit edge.
pub const DEFAULT_SAFETY_MARGIN: Cost = 2;

/// How to choose among nodes that share the highest gold amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoldTieBreak {
    /// Smallest node id wins.
    #[default]
    LowestId,
    /// Cheapest to reach from the current node wins, then smallest id.
    Nearest,
}

impl FromStr for GoldTieBreak {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lowest-id" => Ok(GoldTieBreak::LowestId),
            "nearest" => Ok(GoldTieBreak::Nearest),
            _ => Err(()),
        }
    }
}

/// When standing on the exit ends the escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    /// Starting on the exit may still detour for gold; any later arrival
    /// on the exit ends the escape.
    #[default]
    HarvestFromStart,
    /// Stop the moment the agent stands on the exit, even at the start.
    StopOnArrival,
}

impl FromStr for ExitPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "harvest-from-start" => Ok(ExitPolicy::HarvestFromStart),
            "stop-on-arrival" => Ok(ExitPolicy::StopOnArrival),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    pub safety_margin: Cost,
    pub tie_break: GoldTieBreak,
    pub exit_policy: ExitPolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            safety_margin: DEFAULT_SAFETY_MARGIN,
            tie_break: GoldTieBreak::default(),
            exit_policy: ExitPolicy::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            safety_margin: parse_var(&lookup, "CAVEBOT_SAFETY_MARGIN")?
                .unwrap_or(defaults.safety_margin),
            tie_break: parse_var(&lookup, "CAVEBOT_GOLD_TIE_BREAK")?.unwrap_or(defaults.tie_break),
            exit_policy: parse_var(&lookup, "CAVEBOT_EXIT_POLICY")?
                .unwrap_or(defaults.exit_policy),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.safety_margin < 0 {
            return Err(ConfigError::OutOfRange {
                key: "CAVEBOT_SAFETY_MARGIN",
                reason: format!("must not be negative, got {}", self.safety_margin),
            });
        }
        Ok(())
    }
}

/// Parameters for the random cave used by the demo binary.
#[derive(Debug, Clone, PartialEq)]
pub struct CaveConfig {
    pub width: i32,
    pub height: i32,
    /// Random when unset.
    pub seed: Option<u64>,
    /// Chance of opening a wall between two tiles already joined by the maze.
    pub loop_chance: f64,
    pub max_weight: Cost,
    pub gold_chance: f64,
    pub max_gold: u32,
    /// Escape budget as a multiple of the shortest orb-to-exit route.
    pub time_slack: f64,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            width: 12,
            height: 8,
            seed: None,
            loop_chance: 0.15,
            max_weight: 5,
            gold_chance: 0.3,
            max_gold: 25,
            time_slack: 1.8,
        }
    }
}

impl CaveConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            width: parse_var(&lookup, "CAVEBOT_WIDTH")?.unwrap_or(defaults.width),
            height: parse_var(&lookup, "CAVEBOT_HEIGHT")?.unwrap_or(defaults.height),
            seed: parse_var(&lookup, "CAVEBOT_SEED")?.or(defaults.seed),
            loop_chance: parse_var(&lookup, "CAVEBOT_LOOP_CHANCE")?.unwrap_or(defaults.loop_chance),
            max_weight: parse_var(&lookup, "CAVEBOT_MAX_WEIGHT")?.unwrap_or(defaults.max_weight),
            gold_chance: parse_var(&lookup, "CAVEBOT_GOLD_CHANCE")?.unwrap_or(defaults.gold_chance),
            max_gold: parse_var(&lookup, "CAVEBOT_MAX_GOLD")?.unwrap_or(defaults.max_gold),
            time_slack: parse_var(&lookup, "CAVEBOT_TIME_SLACK")?.unwrap_or(defaults.time_slack),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let out_of_range =
            |key: &'static str, reason: String| Err(ConfigError::OutOfRange { key, reason });

        if self.width < 1 || self.height < 1 {
            return out_of_range(
                "CAVEBOT_WIDTH",
                format!("cave must be at least 1x1, got {}x{}", self.width, self.height),
            );
        }
        if i64::from(self.width) * i64::from(self.height) < 2 {
            return out_of_range("CAVEBOT_HEIGHT", "cave needs at least two tiles".to_string());
        }
        if self.max_weight < 1 {
            return out_of_range(
                "CAVEBOT_MAX_WEIGHT",
                format!("must be positive, got {}", self.max_weight),
            );
        }
        if self.max_gold < 1 {
            return out_of_range("CAVEBOT_MAX_GOLD", "must be positive".to_string());
        }
        for (key, chance) in [
            ("CAVEBOT_LOOP_CHANCE", self.loop_chance),
            ("CAVEBOT_GOLD_CHANCE", self.gold_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return out_of_range(key, format!("must be within [0, 1], got {}", chance));
            }
        }
        if self.time_slack.is_nan() || self.time_slack < 1.0 {
            return out_of_range(
                "CAVEBOT_TIME_SLACK",
                format!("must be at least 1.0, got {}", self.time_slack),
            );
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Parse { key, value }),
    }
}
