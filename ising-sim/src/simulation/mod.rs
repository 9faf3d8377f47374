pub mod model;
pub mod scan;

pub use model::IsingModel;
pub use scan::{run_beta_scan, ScanPoint};

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::IsingResult;

/// Callback invoked by [`IsingModel::run`] after every step.
///
/// Observers see the model read-only. Returning an error stops the run and
/// the error is handed back to the caller of `run`.
///
/// Closures `FnMut(&IsingModel) -> IsingResult<()>` are observers:
///
/// ```rust,ignore
/// let mut energies = Vec::new();
/// model.run(1000, &mut |m: &IsingModel| -> IsingResult<()> {
///     energies.push(m.hamiltonian());
///     Ok(())
/// }, false)?;
/// ```
pub trait StepObserver {
    fn on_step(&mut self, model: &IsingModel) -> IsingResult<()>;
}

impl<F> StepObserver for F
where
    F: FnMut(&IsingModel) -> IsingResult<()>,
{
    fn on_step(&mut self, model: &IsingModel) -> IsingResult<()> {
        self(model)
    }
}

/// Observer that does nothing.
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn on_step(&mut self, _model: &IsingModel) -> IsingResult<()> {
        Ok(())
    }
}

fn progress_bar(steps: usize, show_progress: bool) -> ProgressBar {
    if !show_progress {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(steps as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
    ) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.set_message("running simulation");
    pb
}

impl IsingModel {
    /// Run `steps` updates in sequence, calling `observer` after each one.
    ///
    /// `show_progress` only toggles a progress bar on stderr.
    pub fn run<O>(&mut self, steps: usize, observer: &mut O, show_progress: bool) -> IsingResult<()>
    where
        O: StepObserver + ?Sized,
    {
        let pb = progress_bar(steps, show_progress);
        for _ in 0..steps {
            self.update();
            if let Err(e) = observer.on_step(self) {
                pb.abandon();
                return Err(e);
            }
            pb.inc(1);
        }
        pb.finish();
        Ok(())
    }
}
