use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Largest accepted grid side. Keeps a runaway value from allocating gigabytes.
pub const MAX_WORLD_SIZE: usize = 10_000;

/// Upper bound of the speed control
pub const MAX_SIMULATION_SPEED: f64 = 10.0;

/// Errors raised while validating simulation parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("{name} must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: ParamName,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{name} must be a whole number, got {value}")]
    NotInteger { name: ParamName, value: f64 },

    #[error("initial densities must sum below 100% (got {prey}% rabbits + {predator}% foxes)")]
    DensityOverflow { prey: u32, predator: u32 },

    #[error("unknown parameter '{0}'")]
    Unknown(String),
}

/// Names of the runtime-tunable parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamName {
    WorldSize,
    InitialPrey,
    InitialPredator,
    BreedingPrey,
    BreedingPredator,
    MortalityPredator,
    EffectivenessPredator,
    SimulationSpeed,
}

impl ParamName {
    pub const ALL: [ParamName; 8] = [
        ParamName::WorldSize,
        ParamName::InitialPrey,
        ParamName::InitialPredator,
        ParamName::BreedingPrey,
        ParamName::BreedingPredator,
        ParamName::MortalityPredator,
        ParamName::EffectivenessPredator,
        ParamName::SimulationSpeed,
    ];

    /// Stable snake_case key, used for lookups and environment variables
    pub fn key(self) -> &'static str {
        match self {
            ParamName::WorldSize => "world_size",
            ParamName::InitialPrey => "initial_prey",
            ParamName::InitialPredator => "initial_predator",
            ParamName::BreedingPrey => "breeding_prey",
            ParamName::BreedingPredator => "breeding_predator",
            ParamName::MortalityPredator => "mortality_predator",
            ParamName::EffectivenessPredator => "effectiveness_predator",
            ParamName::SimulationSpeed => "simulation_speed",
        }
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            ParamName::WorldSize => "World size",
            ParamName::InitialPrey => "Initial rabbits [%]",
            ParamName::InitialPredator => "Initial foxes [%]",
            ParamName::BreedingPrey => "Rabbit breeding",
            ParamName::BreedingPredator => "Fox breeding",
            ParamName::MortalityPredator => "Fox mortality",
            ParamName::EffectivenessPredator => "Fox effectiveness",
            ParamName::SimulationSpeed => "Simulation speed",
        }
    }

    /// Inclusive range of accepted values
    pub fn range(self) -> (f64, f64) {
        match self {
            ParamName::WorldSize => (1.0, MAX_WORLD_SIZE as f64),
            ParamName::InitialPrey | ParamName::InitialPredator => (0.0, 100.0),
            ParamName::BreedingPrey
            | ParamName::BreedingPredator
            | ParamName::MortalityPredator
            | ParamName::EffectivenessPredator => (0.0, 1.0),
            ParamName::SimulationSpeed => (0.0, MAX_SIMULATION_SPEED),
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ParamName::WorldSize | ParamName::InitialPrey | ParamName::InitialPredator
        )
    }

    /// Changing these re-seeds the grid
    pub fn requires_reseed(self) -> bool {
        self.is_integer()
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ParamName {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamName::ALL
            .into_iter()
            .find(|name| name.key() == s)
            .ok_or_else(|| ParamError::Unknown(s.to_string()))
    }
}

/// Simulation parameters, all mutable at runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// Side length of the square grid
    pub world_size: usize,

    /// Percentage of cells seeded with rabbits on reset
    pub initial_prey: u32,

    /// Percentage of cells seeded with foxes on reset
    pub initial_predator: u32,

    /// Per-rabbit per-tick probability of offspring
    pub breeding_prey: f64,

    /// Probability a fox breeds after a successful hunt
    pub breeding_predator: f64,

    /// Probability a fox dies at the end of its step
    pub mortality_predator: f64,

    /// Probability a hunt succeeds
    pub effectiveness_predator: f64,

    /// 0.0 is slowest; see [`SimParams::tick_interval`]
    pub simulation_speed: f64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            world_size: 50,
            initial_prey: 30,
            initial_predator: 10,
            breeding_prey: 0.1,
            breeding_predator: 0.1,
            mortality_predator: 0.05,
            effectiveness_predator: 0.5,
            simulation_speed: 0.9,
        }
    }
}

impl SimParams {
    /// Check every field against its range
    pub fn validate(&self) -> Result<(), ParamError> {
        for name in ParamName::ALL {
            check_range(name, self.get(name))?;
        }
        check_densities(self.initial_prey, self.initial_predator)
    }

    /// Read a parameter as a float
    pub fn get(&self, name: ParamName) -> f64 {
        match name {
            ParamName::WorldSize => self.world_size as f64,
            ParamName::InitialPrey => self.initial_prey as f64,
            ParamName::InitialPredator => self.initial_predator as f64,
            ParamName::BreedingPrey => self.breeding_prey,
            ParamName::BreedingPredator => self.breeding_predator,
            ParamName::MortalityPredator => self.mortality_predator,
            ParamName::EffectivenessPredator => self.effectiveness_predator,
            ParamName::SimulationSpeed => self.simulation_speed,
        }
    }

    /// Set a parameter after validating it. On error the previous value is kept.
    pub fn set(&mut self, name: ParamName, value: f64) -> Result<(), ParamError> {
        check_range(name, value)?;

        match name {
            ParamName::WorldSize => self.world_size = value as usize,
            ParamName::InitialPrey => {
                check_densities(value as u32, self.initial_predator)?;
                self.initial_prey = value as u32;
            }
            ParamName::InitialPredator => {
                check_densities(self.initial_prey, value as u32)?;
                self.initial_predator = value as u32;
            }
            ParamName::BreedingPrey => self.breeding_prey = value,
            ParamName::BreedingPredator => self.breeding_predator = value,
            ParamName::MortalityPredator => self.mortality_predator = value,
            ParamName::EffectivenessPredator => self.effectiveness_predator = value,
            ParamName::SimulationSpeed => self.simulation_speed = value,
        }

        Ok(())
    }

    /// Set one initial density and lower the other one if the pair would
    /// reach 100%. Mirrors the linked density sliders of the desktop app.
    pub fn set_initial_coupled(&mut self, name: ParamName, value: u32) -> Result<(), ParamError> {
        let value = value.min(99);
        match name {
            ParamName::InitialPrey => {
                self.initial_prey = value;
                self.initial_predator = self.initial_predator.min(99 - value);
            }
            ParamName::InitialPredator => {
                self.initial_predator = value;
                self.initial_prey = self.initial_prey.min(99 - value);
            }
            other => return self.set(other, value as f64),
        }
        Ok(())
    }

    /// Delay between automatic ticks: `1001 - 1000 * speed` ms, at least 1 ms
    pub fn tick_interval(&self) -> Duration {
        let millis = (1001.0 - 1000.0 * self.simulation_speed) as i64;
        Duration::from_millis(millis.max(1) as u64)
    }

    /// Number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.world_size * self.world_size
    }
}

fn check_range(name: ParamName, value: f64) -> Result<(), ParamError> {
    let (min, max) = name.range();
    if !(min..=max).contains(&value) {
        return Err(ParamError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    if name.is_integer() && value.fract() != 0.0 {
        return Err(ParamError::NotInteger { name, value });
    }
    Ok(())
}

fn check_densities(prey: u32, predator: u32) -> Result<(), ParamError> {
    if prey + predator >= 100 {
        return Err(ParamError::DensityOverflow { prey, predator });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimParams::default().validate().is_ok());
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut params = SimParams::default();
        let err = params.set(ParamName::BreedingPrey, 1.5).unwrap_err();
        assert!(matches!(err, ParamError::OutOfRange { .. }));
        assert_eq!(params.breeding_prey, 0.1);

        assert!(params.set(ParamName::WorldSize, 0.0).is_err());
        assert!(params.set(ParamName::SimulationSpeed, -0.1).is_err());
        assert!(params.set(ParamName::MortalityPredator, f64::NAN).is_err());
    }

    #[test]
    fn test_set_rejects_fractional_integers() {
        let mut params = SimParams::default();
        let err = params.set(ParamName::WorldSize, 12.5).unwrap_err();
        assert!(matches!(err, ParamError::NotInteger { .. }));
        assert_eq!(params.world_size, 50);
    }

    #[test]
    fn test_density_sum_must_stay_below_100() {
        let mut params = SimParams::default();
        params.set(ParamName::InitialPrey, 89.0).unwrap();

        let err = params.set(ParamName::InitialPredator, 11.0).unwrap_err();
        assert_eq!(
            err,
            ParamError::DensityOverflow {
                prey: 89,
                predator: 11
            }
        );
        assert_eq!(params.initial_predator, 10);
    }

    #[test]
    fn test_coupled_density_lowers_other() {
        let mut params = SimParams::default();
        params
            .set_initial_coupled(ParamName::InitialPrey, 95)
            .unwrap();
        assert_eq!(params.initial_prey, 95);
        assert_eq!(params.initial_predator, 4);
        assert!(params.validate().is_ok());

        params
            .set_initial_coupled(ParamName::InitialPredator, 100)
            .unwrap();
        assert_eq!(params.initial_predator, 99);
        assert_eq!(params.initial_prey, 0);
    }

    #[test]
    fn test_tick_interval() {
        let mut params = SimParams::default();
        params.simulation_speed = 0.0;
        assert_eq!(params.tick_interval(), Duration::from_millis(1001));

        params.simulation_speed = 0.5;
        assert_eq!(params.tick_interval(), Duration::from_millis(501));

        params.simulation_speed = 10.0;
        assert_eq!(params.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_param_name_parsing() {
        for name in ParamName::ALL {
            assert_eq!(name.key().parse::<ParamName>().unwrap(), name);
        }
        assert!(matches!(
            "speed".parse::<ParamName>(),
            Err(ParamError::Unknown(_))
        ));
    }

    #[test]
    fn test_params_serialization() {
        let params = SimParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let decoded: SimParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, decoded);
    }

    proptest! {
        #[test]
        fn prop_probabilities_accept_unit_interval(value in 0.0f64..=1.0) {
            let mut params = SimParams::default();
            for name in [
                ParamName::BreedingPrey,
                ParamName::BreedingPredator,
                ParamName::MortalityPredator,
                ParamName::EffectivenessPredator,
            ] {
                prop_assert!(params.set(name, value).is_ok());
                prop_assert_eq!(params.get(name), value);
            }
        }

        #[test]
        fn prop_rejected_values_leave_params_untouched(value in 1.0001f64..1e6) {
            let mut params = SimParams::default();
            let before = params.clone();
            prop_assert!(params.set(ParamName::EffectivenessPredator, value).is_err());
            prop_assert_eq!(params, before);
        }
    }
}
