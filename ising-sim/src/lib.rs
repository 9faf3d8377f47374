pub mod clusters;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod recorder;
pub mod rng;
pub mod simulation;
pub mod spins;
pub mod statistics;
pub mod theory;

pub use config::{Algorithm, IsingConfig, RecorderConfig, ScanConfig};
pub use error::{IsingError, IsingResult};
pub use geometry::Lattice;
pub use recorder::{Observable, ObservableRecorder, ObservationRow, Summary};
pub use simulation::{run_beta_scan, IsingModel, NoopObserver, ScanPoint, StepObserver};
