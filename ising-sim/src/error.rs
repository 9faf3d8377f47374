use thiserror::Error;

/// Errors raised by model construction, multi-index access, the run loop
/// and the recorder.
#[derive(Debug, Error)]
pub enum IsingError {
    #[error("coupling constant must be >= 0, got J = {0}")]
    NegativeCoupling(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("index has {got} coordinates, lattice has {expected} dimensions")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("coordinate {index} out of range on axis {axis} (extent {extent})")]
    IndexOutOfBounds {
        axis: usize,
        index: usize,
        extent: usize,
    },

    #[error("unknown algorithm '{0}', expected 'metropolis', 'wolff' or 'sw'")]
    UnknownAlgorithm(String),

    #[error("observer failed: {0}")]
    Observer(String),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type IsingResult<T> = Result<T, IsingError>;
