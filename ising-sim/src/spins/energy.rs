use crate::geometry::Lattice;

/// Magnetic moment per spin.
pub const MU: f64 = 1.0;

/// Sum of all spins.
pub fn magnetization(spins: &[i8]) -> i64 {
    spins.iter().map(|&s| s as i64).sum()
}

/// Σ over axes with extent > 1 of Σ_i s(i) · s(forward neighbor of i).
///
/// Only the forward direction is summed, so each bond appears once. Extent-1
/// axes are skipped: the forward neighbor is the site itself.
pub fn neighbor_spin_corr(lattice: &Lattice, spins: &[i8]) -> i64 {
    let mut total = 0i64;
    for d in 0..lattice.n_dims {
        if lattice.is_trivial_axis(d) {
            continue;
        }
        for (i, &si) in spins.iter().enumerate() {
            let j = lattice.neighbor(i, d, true);
            total += (si * spins[j]) as i64;
        }
    }
    total
}

/// `H = -J Σ s_i s_j - MU B Σ s_i`.
pub fn hamiltonian(lattice: &Lattice, spins: &[i8], j: f64, b: f64) -> f64 {
    -j * neighbor_spin_corr(lattice, spins) as f64 - MU * b * magnetization(spins) as f64
}

/// Sum of the neighbor spins of site `i`, skipping extent-1 axes.
#[inline]
pub fn local_field(lattice: &Lattice, spins: &[i8], i: usize) -> i64 {
    let mut h = 0i64;
    for d in 0..lattice.n_dims {
        if lattice.is_trivial_axis(d) {
            continue;
        }
        h += spins[lattice.neighbor(i, d, true)] as i64;
        h += spins[lattice.neighbor(i, d, false)] as i64;
    }
    h
}

/// Energy change of flipping site `i` alone.
///
/// `ΔE = 2 MU B s_i + 2 J s_i Σ_nb s_nb`; `ΔE <= 0` means the flip lowers
/// (or keeps) the energy.
#[inline]
pub fn delta_energy(lattice: &Lattice, spins: &[i8], i: usize, j: f64, b: f64) -> f64 {
    let si = spins[i] as f64;
    let field = 2.0 * MU * b * si;
    let bonds = 2.0 * j * si * local_field(lattice, spins, i) as f64;
    field + bonds
}
