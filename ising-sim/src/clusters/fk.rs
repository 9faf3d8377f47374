use super::growth::{grow_cluster, partition, ClusterLabels};
use crate::geometry::Lattice;
use crate::rng::SpinRng;

/// Wolff single-cluster update.
///
/// Grows one Fortuin-Kasteleyn cluster from a uniformly chosen seed and
/// flips it unconditionally. `clusters` holds that single cluster (label 0)
/// afterwards. Returns its size.
#[cfg_attr(feature = "profile", inline(never))]
pub fn wolff_update(
    lattice: &Lattice,
    spins: &mut [i8],
    beta: f64,
    j: f64,
    clusters: &mut ClusterLabels,
    rng: &mut SpinRng,
) -> usize {
    clusters.reset();
    let seed = rng.site(lattice.n_spins);
    let mut stack = Vec::with_capacity(lattice.n_spins);
    let size = grow_cluster(
        lattice,
        spins,
        seed,
        beta,
        j,
        &mut clusters.labels,
        0,
        rng,
        &mut stack,
    );
    clusters.sizes.push(size);

    for (s, &l) in spins.iter_mut().zip(clusters.labels.iter()) {
        if l == 0 {
            *s = -*s;
        }
    }
    size
}

/// Swendsen-Wang update.
///
/// Partitions the lattice into clusters, then flips each cluster with
/// probability 1/2. Coins are drawn once per cluster in id order.
#[cfg_attr(feature = "profile", inline(never))]
pub fn swendsen_wang_update(
    lattice: &Lattice,
    spins: &mut [i8],
    beta: f64,
    j: f64,
    clusters: &mut ClusterLabels,
    rng: &mut SpinRng,
) {
    partition(lattice, spins, beta, j, clusters, rng);

    let flip: Vec<bool> = (0..clusters.n_clusters())
        .map(|_| rng.uniform() < 0.5)
        .collect();
    for (s, &l) in spins.iter_mut().zip(clusters.labels.iter()) {
        if flip[l as usize] {
            *s = -*s;
        }
    }
}
