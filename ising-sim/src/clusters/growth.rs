use crate::geometry::Lattice;
use crate::rng::SpinRng;

/// Label of a site not yet assigned to any cluster.
pub const UNLABELED: u32 = u32::MAX;

/// Per-site cluster ids plus the size of each cluster, for the most recent
/// growth or partition. Reused across steps to avoid reallocating; reset
/// before every use.
#[derive(Debug, Clone)]
pub struct ClusterLabels {
    pub labels: Vec<u32>,
    pub sizes: Vec<usize>,
}

impl ClusterLabels {
    pub fn new(n_spins: usize) -> Self {
        Self {
            labels: vec![UNLABELED; n_spins],
            sizes: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.labels.fill(UNLABELED);
        self.sizes.clear();
    }

    #[inline]
    pub fn n_clusters(&self) -> usize {
        self.sizes.len()
    }

    /// Sites carrying label `id`, in canonical order.
    pub fn members(&self, id: u32) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(move |&(_, &l)| l == id)
            .map(|(i, _)| i)
    }
}

/// Grow one cluster from `seed`, labeling members with `label`.
///
/// The seed's sign is frozen at entry. Every bond from a member to an
/// unlabeled neighbor of that sign gets exactly one uniform draw and is
/// activated iff the draw exceeds `exp(-2 beta J)`, i.e. with the
/// Fortuin-Kasteleyn probability `1 - exp(-2 beta J)`. Sites already
/// carrying any label are never absorbed, so repeated calls partition the
/// lattice.
/// Caller owns `stack`, which must be empty; it is empty again on return.
///
/// Returns the number of sites added (at least 1, the seed).
#[allow(clippy::too_many_arguments)]
pub fn grow_cluster(
    lattice: &Lattice,
    spins: &[i8],
    seed: usize,
    beta: f64,
    j: f64,
    labels: &mut [u32],
    label: u32,
    rng: &mut SpinRng,
    stack: &mut Vec<usize>,
) -> usize {
    debug_assert_eq!(labels[seed], UNLABELED);
    let sign = spins[seed];
    let reject = (-2.0 * beta * j).exp();

    labels[seed] = label;
    stack.push(seed);
    let mut size = 1usize;

    while let Some(site) = stack.pop() {
        for nb in lattice.neighbours(site) {
            if labels[nb] == UNLABELED && spins[nb] == sign && rng.uniform() > reject {
                labels[nb] = label;
                stack.push(nb);
                size += 1;
            }
        }
    }

    size
}

/// Split the whole lattice into clusters.
///
/// Seeds [`grow_cluster`] at the first unlabeled site in canonical order,
/// numbering clusters `0, 1, 2, ...`, until no site is left unlabeled.
pub fn partition(
    lattice: &Lattice,
    spins: &[i8],
    beta: f64,
    j: f64,
    clusters: &mut ClusterLabels,
    rng: &mut SpinRng,
) {
    clusters.reset();
    let mut stack = Vec::with_capacity(lattice.n_spins);
    for site in 0..lattice.n_spins {
        if clusters.labels[site] != UNLABELED {
            continue;
        }
        let id = clusters.sizes.len() as u32;
        let size = grow_cluster(
            lattice,
            spins,
            site,
            beta,
            j,
            &mut clusters.labels,
            id,
            rng,
            &mut stack,
        );
        clusters.sizes.push(size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // 4×4 periodic lattice:
    //
    //    0  1  2  3
    //    4  5  6  7
    //    8  9 10 11
    //   12 13 14 15

    fn lattice_4x4() -> Lattice {
        Lattice::new(vec![4, 4]).unwrap()
    }

    fn grow(lattice: &Lattice, spins: &[i8], seed: usize, beta: f64, j: f64) -> HashSet<usize> {
        let mut labels = vec![UNLABELED; lattice.n_spins];
        let mut stack = Vec::new();
        let mut rng = SpinRng::new(9);
        let size = grow_cluster(
            lattice,
            spins,
            seed,
            beta,
            j,
            &mut labels,
            0,
            &mut rng,
            &mut stack,
        );
        assert!(stack.is_empty());
        let members: HashSet<usize> = (0..lattice.n_spins).filter(|&i| labels[i] == 0).collect();
        assert_eq!(members.len(), size);
        members
    }

    #[test]
    fn test_zero_coupling_gives_singleton() {
        let lattice = lattice_4x4();
        let spins = vec![1i8; 16];
        assert_eq!(grow(&lattice, &spins, 5, 10.0, 0.0), [5].into_iter().collect());
    }

    #[test]
    fn test_frozen_coupling_fills_like_sign_domain() {
        // exp(-2 beta J) underflows to 0, so every like-sign bond activates.
        //
        //    +  +  -  -
        //    +  +  -  -
        //    -  -  -  -
        //    -  -  -  +
        let lattice = lattice_4x4();
        let mut spins = vec![-1i8; 16];
        for i in [0, 1, 4, 5, 15] {
            spins[i] = 1;
        }
        assert_eq!(
            grow(&lattice, &spins, 0, 1e3, 1.0),
            [0, 1, 4, 5].into_iter().collect()
        );
        // 15 touches 3 and 12 across the boundary, but they are down spins
        assert_eq!(grow(&lattice, &spins, 15, 1e3, 1.0), [15].into_iter().collect());
        assert_eq!(grow(&lattice, &spins, 10, 1e3, 1.0).len(), 11);
    }

    #[test]
    fn test_cluster_never_crosses_sign() {
        let lattice = Lattice::new(vec![6, 6]).unwrap();
        let mut rng = SpinRng::new(77);
        let spins: Vec<i8> = (0..36).map(|_| rng.spin()).collect();
        for seed in 0..36 {
            let members = grow(&lattice, &spins, seed, 0.7, 1.0);
            assert!(members.contains(&seed));
            assert!(members.iter().all(|&i| spins[i] == spins[seed]));
        }
    }

    #[test]
    fn test_partition_covers_every_site_once() {
        let lattice = Lattice::new(vec![5, 4, 3]).unwrap();
        let mut rng = SpinRng::new(123);
        let spins: Vec<i8> = (0..lattice.n_spins).map(|_| rng.spin()).collect();
        let mut clusters = ClusterLabels::new(lattice.n_spins);

        for beta in [0.0, 0.2, 0.44, 1.0, 5.0] {
            partition(&lattice, &spins, beta, 1.0, &mut clusters, &mut rng);
            assert!(clusters.labels.iter().all(|&l| l != UNLABELED));
            assert_eq!(clusters.sizes.iter().sum::<usize>(), lattice.n_spins);

            let mut counts = vec![0usize; clusters.n_clusters()];
            for &l in &clusters.labels {
                counts[l as usize] += 1;
            }
            assert_eq!(counts, clusters.sizes);
            assert!(clusters.sizes.iter().all(|&s| s >= 1));
        }
    }

    #[test]
    fn test_partition_ids_follow_canonical_order() {
        let lattice = Lattice::new(vec![6]).unwrap();
        let spins = vec![1i8, 1, -1, -1, -1, 1];
        let mut clusters = ClusterLabels::new(6);
        let mut rng = SpinRng::new(0);
        partition(&lattice, &spins, 1e3, 1.0, &mut clusters, &mut rng);
        // 5 wraps onto 0, so it belongs to cluster 0
        assert_eq!(clusters.labels, vec![0, 0, 1, 1, 1, 0]);
        assert_eq!(clusters.sizes, vec![3, 3]);
        assert_eq!(clusters.members(1).collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_infinite_temperature_partition_is_all_singletons() {
        let lattice = lattice_4x4();
        let spins = vec![1i8; 16];
        let mut clusters = ClusterLabels::new(16);
        let mut rng = SpinRng::new(1);
        partition(&lattice, &spins, 0.0, 1.0, &mut clusters, &mut rng);
        assert_eq!(clusters.sizes, vec![1; 16]);
        assert_eq!(clusters.labels, (0..16).collect::<Vec<u32>>());
    }
}
