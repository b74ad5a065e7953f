//! Engine options.
//!
//! Every tunable has a default; `setoption` lines override them at runtime.

use std::time::Duration;

use crate::board::{PlayerId, DEFAULT_DIRTY_WINDOW};

/// Errors raised by `setoption`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("unknown option '{0}'")]
    Unknown(String),

    #[error("option '{0}' requires a value")]
    MissingValue(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },
}

/// Tunables read by the move cascade and the board.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// The outward expansion step only runs on turns divisible by this.
    pub outward_every: u32,
    /// Generals and cities start splitting armies after this turn.
    pub halve_after_turn: u32,
    /// Chance that a late-game general move is halved.
    pub general_halve_chance: f64,
    /// How long a predicted tile update is shielded from attack.
    pub dirty_window: Duration,
    /// Apply each emitted move to the local board before the server echoes it.
    pub predict_moves: bool,
    /// Players whose tiles are never targeted.
    pub do_not_attack: Vec<PlayerId>,
    /// RNG seed; zero draws one from the OS.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            outward_every: 3,
            halve_after_turn: 250,
            general_halve_chance: 0.75,
            dirty_window: DEFAULT_DIRTY_WINDOW,
            predict_moves: true,
            do_not_attack: Vec::new(),
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Applies one `setoption name <name> value <value>` pair.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), OptionError> {
        let value = value.map(str::trim);
        let raw = || value.ok_or_else(|| OptionError::MissingValue(name.to_string()));
        let invalid = |v: &str| OptionError::InvalidValue {
            name: name.to_string(),
            value: v.to_string(),
        };

        match name {
            "OutwardEvery" => {
                let v = raw()?;
                let every: u32 = v.parse().map_err(|_| invalid(v))?;
                if every == 0 {
                    return Err(invalid(v));
                }
                self.outward_every = every;
            }
            "HalveAfterTurn" => {
                let v = raw()?;
                self.halve_after_turn = v.parse().map_err(|_| invalid(v))?;
            }
            "GeneralHalveChance" => {
                let v = raw()?;
                let chance: f64 = v.parse().map_err(|_| invalid(v))?;
                if !(0.0..=1.0).contains(&chance) {
                    return Err(invalid(v));
                }
                self.general_halve_chance = chance;
            }
            "DirtyWindowMs" => {
                let v = raw()?;
                self.dirty_window = Duration::from_millis(v.parse().map_err(|_| invalid(v))?);
            }
            "PredictMoves" => {
                let v = raw()?;
                self.predict_moves = match v {
                    "true" | "1" | "on" => true,
                    "false" | "0" | "off" => false,
                    _ => return Err(invalid(v)),
                };
            }
            "DoNotAttack" => {
                // An absent or blank value clears the list.
                let v = value.unwrap_or("");
                self.do_not_attack = v
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| s.parse::<PlayerId>().map_err(|_| invalid(v)))
                    .collect::<Result<_, _>>()?;
            }
            "Seed" => {
                let v = raw()?;
                self.seed = v.parse().map_err(|_| invalid(v))?;
            }
            _ => return Err(OptionError::Unknown(name.to_string())),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.outward_every, 3);
        assert_eq!(config.halve_after_turn, 250);
        assert_eq!(config.dirty_window, Duration::from_millis(600));
        assert!(config.predict_moves);
        assert!(config.do_not_attack.is_empty());
    }

    #[test]
    fn set_numeric_options() {
        let mut config = EngineConfig::default();
        config.set_option("OutwardEvery", Some("5")).unwrap();
        config.set_option("HalveAfterTurn", Some("100")).unwrap();
        config.set_option("DirtyWindowMs", Some("250")).unwrap();
        config.set_option("Seed", Some("42")).unwrap();
        assert_eq!(config.outward_every, 5);
        assert_eq!(config.halve_after_turn, 100);
        assert_eq!(config.dirty_window, Duration::from_millis(250));
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn do_not_attack_list() {
        let mut config = EngineConfig::default();
        config.set_option("DoNotAttack", Some("1, 3,")).unwrap();
        assert_eq!(config.do_not_attack, vec![1, 3]);
        config.set_option("DoNotAttack", None).unwrap();
        assert!(config.do_not_attack.is_empty());
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = EngineConfig::default();
        assert_eq!(
            config.set_option("OutwardEvery", Some("0")),
            Err(OptionError::InvalidValue {
                name: "OutwardEvery".into(),
                value: "0".into()
            })
        );
        assert!(config.set_option("GeneralHalveChance", Some("1.5")).is_err());
        assert!(config.set_option("PredictMoves", Some("maybe")).is_err());
        assert_eq!(
            config.set_option("Seed", None),
            Err(OptionError::MissingValue("Seed".into()))
        );
        assert_eq!(
            config.set_option("Threads", Some("4")),
            Err(OptionError::Unknown("Threads".into()))
        );
        assert_eq!(config, EngineConfig::default());
    }
}
