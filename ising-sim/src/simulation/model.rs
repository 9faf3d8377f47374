use ndarray::{ArrayD, IxDyn};

use crate::clusters::{self, ClusterLabels};
use crate::config::{Algorithm, IsingConfig};
use crate::error::{IsingError, IsingResult};
use crate::geometry::Lattice;
use crate::mcmc;
use crate::rng::SpinRng;
use crate::spins::energy;

/// One Ising system: lattice, spins, couplings and the update algorithm.
///
/// Spins are stored in a flat row-major `Vec<i8>` of ±1. The model owns its
/// random source; every draw (initial spins included) comes from it, so
/// `config.seed` fully determines a trajectory.
pub struct IsingModel {
    lattice: Lattice,
    spins: Vec<i8>,
    j: f64,
    b: f64,
    beta: f64,
    algorithm: Algorithm,
    rng: SpinRng,
    steps: u64,
    /// Cluster labels of the last cluster update, reused between steps.
    clusters: ClusterLabels,
    susceptibility: Option<f64>,
}

impl IsingModel {
    /// Build a model with independent uniformly random ±1 spins.
    pub fn new(config: &IsingConfig) -> IsingResult<Self> {
        config.check()?;
        let lattice = Lattice::new(config.shape.clone())?;
        let mut rng = SpinRng::new(config.seed);
        let spins = (0..lattice.n_spins).map(|_| rng.spin()).collect();
        Ok(Self::assemble(config, lattice, spins, rng))
    }

    /// Build a model from an explicit row-major spin configuration.
    pub fn with_spins(config: &IsingConfig, spins: Vec<i8>) -> IsingResult<Self> {
        config.check()?;
        let lattice = Lattice::new(config.shape.clone())?;
        if spins.len() != lattice.n_spins {
            return Err(IsingError::InvalidConfig(format!(
                "expected {} spins, got {}",
                lattice.n_spins,
                spins.len()
            )));
        }
        if let Some(i) = spins.iter().position(|&s| s != 1 && s != -1) {
            return Err(IsingError::InvalidConfig(format!(
                "spin {i} is {}, expected +1 or -1",
                spins[i]
            )));
        }
        let rng = SpinRng::new(config.seed);
        Ok(Self::assemble(config, lattice, spins, rng))
    }

    fn assemble(config: &IsingConfig, lattice: Lattice, spins: Vec<i8>, rng: SpinRng) -> Self {
        let clusters = ClusterLabels::new(lattice.n_spins);
        Self {
            lattice,
            spins,
            j: config.j,
            b: config.b,
            beta: config.beta,
            algorithm: config.algorithm,
            rng,
            steps: 0,
            clusters,
            susceptibility: None,
        }
    }

    /// Re-randomize all spins from a fresh seed and zero the step counter.
    pub fn reset(&mut self, seed: u64) {
        self.rng = SpinRng::new(seed);
        for s in self.spins.iter_mut() {
            *s = self.rng.spin();
        }
        self.steps = 0;
        self.clusters.reset();
        self.susceptibility = None;
    }

    /// Advance one step of the configured algorithm.
    ///
    /// The step counter is bumped first, for every algorithm.
    pub fn update(&mut self) {
        self.steps += 1;
        match self.algorithm {
            Algorithm::Metropolis => {
                mcmc::metropolis::metropolis_step(
                    &self.lattice,
                    &mut self.spins,
                    self.j,
                    self.b,
                    self.beta,
                    &mut self.rng,
                );
            }
            Algorithm::Wolff => {
                let size = clusters::wolff_update(
                    &self.lattice,
                    &mut self.spins,
                    self.beta,
                    self.j,
                    &mut self.clusters,
                    &mut self.rng,
                );
                self.susceptibility = Some(size as f64);
            }
            Algorithm::SwendsenWang => {
                clusters::swendsen_wang_update(
                    &self.lattice,
                    &mut self.spins,
                    self.beta,
                    self.j,
                    &mut self.clusters,
                    &mut self.rng,
                );
                let sum_sq: usize = self.clusters.sizes.iter().map(|&s| s * s).sum();
                self.susceptibility = Some(sum_sq as f64 / self.lattice.n_spins as f64);
            }
        }
    }

    /// Owned copy of the spins in lattice shape.
    pub fn get_lattice(&self) -> ArrayD<i8> {
        let strides = &self.lattice.strides;
        ArrayD::from_shape_fn(IxDyn(&self.lattice.shape), |ix| {
            let flat: usize = (0..strides.len()).map(|d| ix[d] * strides[d]).sum();
            self.spins[flat]
        })
    }

    /// Flat row-major view of the spins.
    #[inline]
    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    #[inline]
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    #[inline]
    pub fn get_steps(&self) -> u64 {
        self.steps
    }

    #[inline]
    pub fn get_size(&self) -> usize {
        self.lattice.n_spins
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn coupling(&self) -> f64 {
        self.j
    }

    pub fn field(&self) -> f64 {
        self.b
    }

    pub fn magnetization(&self) -> i64 {
        energy::magnetization(&self.spins)
    }

    pub fn neighbor_spin_corr(&self) -> i64 {
        energy::neighbor_spin_corr(&self.lattice, &self.spins)
    }

    pub fn hamiltonian(&self) -> f64 {
        energy::hamiltonian(&self.lattice, &self.spins, self.j, self.b)
    }

    /// Algorithm-specific susceptibility estimator of the latest step.
    ///
    /// Swendsen-Wang: `Σ size² / N` over the latest partition. Wolff: size of
    /// the latest cluster. `None` for Metropolis and before the first cluster
    /// update.
    pub fn get_susceptibility(&self) -> Option<f64> {
        self.susceptibility
    }

    /// Cluster sizes of the latest cluster update (empty for Metropolis).
    pub fn cluster_sizes(&self) -> &[usize] {
        &self.clusters.sizes
    }

    pub fn spin(&self, index: &[usize]) -> IsingResult<i8> {
        Ok(self.spins[self.lattice.flat_index(index)?])
    }

    /// Negate the spin at `index`.
    pub fn flip_spin(&mut self, index: &[usize]) -> IsingResult<()> {
        let i = self.lattice.flat_index(index)?;
        self.spins[i] = -self.spins[i];
        Ok(())
    }

    /// Energy change of flipping the spin at `index`.
    pub fn delta_energy(&self, index: &[usize]) -> IsingResult<f64> {
        let i = self.lattice.flat_index(index)?;
        Ok(energy::delta_energy(
            &self.lattice,
            &self.spins,
            i,
            self.j,
            self.b,
        ))
    }

    pub fn neighbours(&self, index: &[usize]) -> IsingResult<Vec<Vec<usize>>> {
        self.lattice.neighbours_of(index)
    }
}
