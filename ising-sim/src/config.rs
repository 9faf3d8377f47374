use validator::{Validate, ValidationError};

use crate::error::{IsingError, IsingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Metropolis,
    Wolff,
    SwendsenWang,
}

impl TryFrom<&str> for Algorithm {
    type Error = IsingError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "metropolis" => Ok(Self::Metropolis),
            "wolff" => Ok(Self::Wolff),
            "sw" | "swendsen-wang" => Ok(Self::SwendsenWang),
            _ => Err(IsingError::UnknownAlgorithm(s.to_string())),
        }
    }
}

fn validate_ising_config(cfg: &IsingConfig) -> Result<(), ValidationError> {
    if cfg.shape.is_empty() {
        return Err(ValidationError::new("shape must have at least one axis"));
    }
    if cfg.shape.iter().any(|&l| l == 0) {
        return Err(ValidationError::new("every lattice extent must be >= 1"));
    }
    if !cfg.j.is_finite() || !cfg.b.is_finite() || !cfg.beta.is_finite() {
        return Err(ValidationError::new("j, b and beta must be finite"));
    }
    Ok(())
}

/// Construction parameters of one model.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_ising_config"))]
pub struct IsingConfig {
    /// Extent along each axis.
    pub shape: Vec<usize>,
    /// External field.
    pub b: f64,
    /// Coupling constant, must be >= 0.
    pub j: f64,
    /// Inverse temperature. Not checked for sign.
    pub beta: f64,
    pub algorithm: Algorithm,
    /// Seed of the model's random source.
    pub seed: u64,
}

impl IsingConfig {
    pub fn new(shape: Vec<usize>, b: f64, j: f64, beta: f64, algorithm: Algorithm) -> Self {
        Self {
            shape,
            b,
            j,
            beta,
            algorithm,
            seed: 42,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate; a negative coupling is reported as [`IsingError::NegativeCoupling`].
    pub fn check(&self) -> IsingResult<()> {
        if self.j < 0.0 {
            return Err(IsingError::NegativeCoupling(self.j));
        }
        self.validate()
            .map_err(|e| IsingError::InvalidConfig(format!("{e}")))
    }
}

fn validate_recorder_config(cfg: &RecorderConfig) -> Result<(), ValidationError> {
    if cfg.sample_rate < 1 {
        return Err(ValidationError::new("sample_rate must be >= 1"));
    }
    Ok(())
}

/// Which steps an [`ObservableRecorder`](crate::recorder::ObservableRecorder) keeps.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_recorder_config"))]
pub struct RecorderConfig {
    /// Calls up to and including this one are skipped.
    pub start_iteration: usize,
    /// Keep every `sample_rate`-th call.
    pub sample_rate: usize,
    /// Also store a copy of the lattice per kept row.
    pub record_lattice: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            start_iteration: 0,
            sample_rate: 1,
            record_lattice: false,
        }
    }
}

fn validate_scan_config(cfg: &ScanConfig) -> Result<(), ValidationError> {
    if cfg.steps < 1 {
        return Err(ValidationError::new("steps must be >= 1"));
    }
    if cfg.warmup_steps > cfg.steps {
        return Err(ValidationError::new("warmup_steps must be <= steps"));
    }
    if cfg.sample_rate < 1 {
        return Err(ValidationError::new("sample_rate must be >= 1"));
    }
    Ok(())
}

#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_scan_config"))]
pub struct ScanConfig {
    pub steps: usize,
    pub warmup_steps: usize,
    pub sample_rate: usize,
    /// Run the β points one after another on the current thread.
    pub sequential: bool,
}
