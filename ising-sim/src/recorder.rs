//! Observable recording for [`IsingModel::run`](crate::simulation::IsingModel::run).
//!
//! [`ObservableRecorder`] is a [`StepObserver`] that keeps one
//! [`ObservationRow`] per sampled step and answers summary and
//! autocorrelation queries over the recorded series.

use std::path::Path;

use csv::Writer;
use ndarray::ArrayD;
use serde::Serialize;
use validator::Validate;

use crate::config::RecorderConfig;
use crate::error::{IsingError, IsingResult};
use crate::simulation::{IsingModel, StepObserver};
use crate::statistics::{sokal_tau, AutocorrAccum, Statistics};

/// Maximum number of lags in the default lag set.
const DEFAULT_LAG_SAMPLES: usize = 50;

/// Observables sampled once per kept step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRow {
    pub step: u64,
    pub energy: f64,
    pub magnetization: i64,
    pub size: usize,
    pub susceptibility: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observable {
    Step,
    Energy,
    Magnetization,
    Size,
    Susceptibility,
}

impl Observable {
    fn value(self, row: &ObservationRow) -> Option<f64> {
        match self {
            Observable::Step => Some(row.step as f64),
            Observable::Energy => Some(row.energy),
            Observable::Magnetization => Some(row.magnetization as f64),
            Observable::Size => Some(row.size as f64),
            Observable::Susceptibility => row.susceptibility,
        }
    }
}

/// Mean with spread and standard error of the mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    /// Sample standard deviation; `None` for the fluctuation estimate.
    pub std: Option<f64>,
    pub stderr: f64,
}

pub struct ObservableRecorder {
    config: RecorderConfig,
    iteration: usize,
    rows: Vec<ObservationRow>,
    snapshots: Vec<ArrayD<i8>>,
}

impl ObservableRecorder {
    pub fn new(config: RecorderConfig) -> IsingResult<Self> {
        config
            .validate()
            .map_err(|e| IsingError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            config,
            iteration: 0,
            rows: Vec::new(),
            snapshots: Vec::new(),
        })
    }

    pub fn rows(&self) -> &[ObservationRow] {
        &self.rows
    }

    /// Lattice copies, one per row; empty unless `record_lattice` is set.
    pub fn snapshots(&self) -> &[ArrayD<i8>] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All recorded values of `obs`. Rows without a susceptibility estimate
    /// are skipped for [`Observable::Susceptibility`].
    pub fn column(&self, obs: Observable) -> Vec<f64> {
        self.rows.iter().filter_map(|r| obs.value(r)).collect()
    }

    pub fn mean(&self, obs: Observable) -> Option<f64> {
        self.stats(obs).mean()
    }

    /// Population standard deviation.
    pub fn std(&self, obs: Observable) -> Option<f64> {
        self.stats(obs).std(0)
    }

    fn stats(&self, obs: Observable) -> Statistics {
        self.column(obs).into_iter().collect()
    }

    fn summary(&self, obs: Observable) -> Option<Summary> {
        let stats = self.stats(obs);
        Some(Summary {
            mean: stats.mean()?,
            std: Some(stats.std(1)?),
            stderr: stats.stderr()?,
        })
    }

    /// Needs at least two rows.
    pub fn energy_summary(&self) -> Option<Summary> {
        self.summary(Observable::Energy)
    }

    /// Mean of the algorithm's own estimator when the rows carry one.
    /// Otherwise the fluctuation estimate `(<m^2> - <m>^2) / N` with error
    /// `sqrt(2 chi^2 / (n - 1))`.
    pub fn susceptibility_summary(&self) -> Option<Summary> {
        if self.rows.iter().any(|r| r.susceptibility.is_some()) {
            return self.summary(Observable::Susceptibility);
        }
        let n = self.rows.len();
        if n < 2 {
            return None;
        }
        let size = self.rows[0].size as f64;
        let var = self.stats(Observable::Magnetization).variance(0)?;
        let chi = var / size;
        Some(Summary {
            mean: chi,
            std: None,
            stderr: (2.0 * chi * chi / (n - 1) as f64).sqrt(),
        })
    }

    /// Unnormalized autocorrelation `mean(x[i] * x[i + k])` at a lag of `t`
    /// steps, `k = t / sample_rate` rows. `None` when the lag reaches past
    /// the recorded series.
    pub fn autocorrelation(&self, obs: Observable, t: usize) -> Option<f64> {
        let data = self.column(obs);
        let n = data.len();
        let k = t / self.config.sample_rate;
        if k >= n {
            return None;
        }
        let sum: f64 = data[..n - k].iter().zip(&data[k..]).map(|(a, b)| a * b).sum();
        Some(sum / (n - k) as f64)
    }

    /// Default lags: `1..=min(50, n - 1)` rows, expressed in steps.
    pub fn default_lags(&self) -> Vec<usize> {
        let max_lag = self.rows.len().saturating_sub(1).min(DEFAULT_LAG_SAMPLES);
        (1..=max_lag).map(|k| k * self.config.sample_rate).collect()
    }

    /// `(t, C(t))` pairs; lags beyond the series are dropped.
    pub fn autocorrelations(&self, obs: Observable, lags: Option<&[usize]>) -> Vec<(usize, f64)> {
        let default;
        let lags = match lags {
            Some(l) => l,
            None => {
                default = self.default_lags();
                default.as_slice()
            }
        };
        lags.iter()
            .filter_map(|&t| self.autocorrelation(obs, t).map(|c| (t, c)))
            .collect()
    }

    /// Decay time `tau` of an exponential `C(t) = A exp(-t / tau)` fitted to
    /// the positive autocorrelations, in steps.
    pub fn fit_autocorrelation_time(&self, obs: Observable, lags: Option<&[usize]>) -> Option<f64> {
        let points: Vec<(f64, f64)> = self
            .autocorrelations(obs, lags)
            .into_iter()
            .filter(|&(_, c)| c > 0.0)
            .map(|(t, c)| (t as f64, c.ln()))
            .collect();
        fit_exponential_decay(&points)
    }

    /// Integrated autocorrelation time of the mean-subtracted, normalized
    /// series, in steps. Needs at least two rows.
    pub fn integrated_autocorrelation_time(&self, obs: Observable, max_lag: usize) -> Option<f64> {
        let data = self.column(obs);
        if data.len() < 2 {
            return None;
        }
        let mut acc = AutocorrAccum::new(max_lag.min(data.len() - 1));
        for x in data {
            acc.push(x);
        }
        Some(sokal_tau(&acc.finish()) * self.config.sample_rate as f64)
    }

    /// Write all rows to `path` with a header line.
    pub fn write_csv(&self, path: &Path) -> IsingResult<()> {
        let mut writer = Writer::from_path(path)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl StepObserver for ObservableRecorder {
    fn on_step(&mut self, model: &IsingModel) -> IsingResult<()> {
        self.iteration += 1;
        if self.iteration <= self.config.start_iteration
            || self.iteration % self.config.sample_rate != 0
        {
            return Ok(());
        }
        self.rows.push(ObservationRow {
            step: model.get_steps(),
            energy: model.hamiltonian(),
            magnetization: model.magnetization(),
            size: model.get_size(),
            susceptibility: model.get_susceptibility(),
        });
        if self.config.record_lattice {
            self.snapshots.push(model.get_lattice());
        }
        Ok(())
    }
}

/// Least-squares line through `(t, ln C)`; returns `-1 / slope`.
fn fit_exponential_decay(points: &[(f64, f64)]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_t = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for &(t, y) in points {
        sxy += (t - mean_t) * (y - mean_y);
        sxx += (t - mean_t) * (t - mean_t);
    }
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    if slope >= 0.0 {
        return None;
    }
    Some(-1.0 / slope)
}
