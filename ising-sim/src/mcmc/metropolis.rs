use crate::geometry::Lattice;
use crate::rng::SpinRng;
use crate::spins::energy::delta_energy;

/// One single-spin Metropolis move at a uniformly chosen site.
///
/// A flip with `ΔE <= 0` is always taken; otherwise it is taken iff a
/// uniform draw is strictly below `exp(-beta * ΔE)`. Returns whether the
/// spin was flipped.
#[cfg_attr(feature = "profile", inline(never))]
pub fn metropolis_step(
    lattice: &Lattice,
    spins: &mut [i8],
    j: f64,
    b: f64,
    beta: f64,
    rng: &mut SpinRng,
) -> bool {
    let i = rng.site(lattice.n_spins);
    let de = delta_energy(lattice, spins, i, j, b);
    let accept = de <= 0.0 || rng.uniform() < (-beta * de).exp();
    if accept {
        spins[i] = -spins[i];
    }
    accept
}
