//! Closed-form results for the periodic chain and brute-force enumeration of
//! small lattices.
//!
//! The 1-d formulas assume a ring of `l` sites at zero field with
//! `K = beta * J`.

use crate::error::{IsingError, IsingResult};
use crate::geometry::Lattice;
use crate::spins::energy;

/// Largest lattice [`exact_energy_distribution`] will enumerate.
pub const MAX_ENUMERATED_SPINS: usize = 20;

/// Energies closer than this are merged into one level.
const ENERGY_TOL: f64 = 1e-9;

/// `Z = (2 cosh K)^l + (2 sinh K)^l`.
pub fn partition_function_1d(l: usize, j: f64, beta: f64) -> f64 {
    let k = beta * j;
    let l = l as f64;
    (2.0 * k.cosh()).powf(l) + (2.0 * k.sinh()).powf(l)
}

/// `<s_0 s_r> = (t^r + t^(l - r)) / (1 + t^l)`, `t = tanh K`, for sites `r`
/// apart along the ring.
pub fn spin_correlation_1d(l: usize, r: usize, j: f64, beta: f64) -> f64 {
    let t = (beta * j).tanh();
    let r = r % l.max(1);
    (t.powf(r as f64) + t.powf((l - r) as f64)) / (1.0 + t.powf(l as f64))
}

/// `chi = (1 - t^l) / (1 + t^l) * exp(2K)`.
pub fn susceptibility_1d(l: usize, j: f64, beta: f64) -> f64 {
    let k = beta * j;
    let tl = k.tanh().powf(l as f64);
    (1.0 - tl) / (1.0 + tl) * (2.0 * k).exp()
}

/// Boltzmann probability of every energy level, by enumerating all `2^N`
/// microstates. Levels are sorted by energy.
pub fn exact_energy_distribution(
    shape: &[usize],
    j: f64,
    b: f64,
    beta: f64,
) -> IsingResult<Vec<(f64, f64)>> {
    let lattice = Lattice::new(shape.to_vec())?;
    let n = lattice.n_spins;
    if n > MAX_ENUMERATED_SPINS {
        return Err(IsingError::InvalidConfig(format!(
            "cannot enumerate {n} spins, limit is {MAX_ENUMERATED_SPINS}"
        )));
    }

    let mut spins = vec![0i8; n];
    let mut energies: Vec<f64> = (0..1u32 << n)
        .map(|state| {
            for (i, s) in spins.iter_mut().enumerate() {
                *s = if state >> i & 1 == 1 { 1 } else { -1 };
            }
            energy::hamiltonian(&lattice, &spins, j, b)
        })
        .collect();
    energies.sort_by(f64::total_cmp);

    // Shift by the most probable level so every weight is at most 1, for
    // either sign of beta.
    let e_ref = if beta >= 0.0 {
        energies[0]
    } else {
        energies[energies.len() - 1]
    };
    let mut levels: Vec<(f64, f64)> = Vec::new();
    for e in energies {
        let w = (-beta * (e - e_ref)).exp();
        match levels.last_mut() {
            Some((level, weight)) if (e - *level).abs() < ENERGY_TOL => *weight += w,
            _ => levels.push((e, w)),
        }
    }

    let z: f64 = levels.iter().map(|l| l.1).sum();
    for level in levels.iter_mut() {
        level.1 /= z;
    }
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_function_matches_enumeration() {
        let (l, j, beta) = (6, 1.0, 0.7);
        let lattice = Lattice::new(vec![l]).unwrap();
        let mut spins = vec![0i8; l];
        let mut z = 0.0;
        for state in 0..1u32 << l {
            for (i, s) in spins.iter_mut().enumerate() {
                *s = if state >> i & 1 == 1 { 1 } else { -1 };
            }
            z += (-beta * energy::hamiltonian(&lattice, &spins, j, 0.0)).exp();
        }
        let exact = partition_function_1d(l, j, beta);
        assert!((z - exact).abs() < 1e-9 * exact, "{z} vs {exact}");
    }

    #[test]
    fn test_spin_correlation_limits() {
        assert!((spin_correlation_1d(10, 0, 1.0, 0.3) - 1.0).abs() < 1e-12);
        // symmetric around the far side of the ring
        let a = spin_correlation_1d(10, 3, 1.0, 0.3);
        let b = spin_correlation_1d(10, 7, 1.0, 0.3);
        assert!((a - b).abs() < 1e-12);
        assert!(spin_correlation_1d(10, 5, 1.0, 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_susceptibility_infinite_temperature() {
        assert!((susceptibility_1d(8, 1.0, 0.0) - 1.0).abs() < 1e-12);
        assert!(susceptibility_1d(8, 1.0, 0.5) > 1.0);
    }

    #[test]
    fn test_four_site_chain_distribution() {
        let levels = exact_energy_distribution(&[4], 1.0, 0.0, 0.5).unwrap();
        let energies: Vec<f64> = levels.iter().map(|l| l.0).collect();
        assert_eq!(energies, vec![-4.0, 0.0, 4.0]);

        // degeneracies 2, 12, 2
        let z = 2.0 * 2f64.exp() + 12.0 + 2.0 * (-2f64).exp();
        assert!((levels[0].1 - 2.0 * 2f64.exp() / z).abs() < 1e-12);
        assert!((levels[1].1 - 12.0 / z).abs() < 1e-12);
        assert!((levels[2].1 - 2.0 * (-2f64).exp() / z).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_is_normalized_with_field() {
        let levels = exact_energy_distribution(&[2, 3], 0.5, 0.3, 1.2).unwrap();
        let total: f64 = levels.iter().map(|l| l.1).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(levels.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_negative_beta_favours_high_energy() {
        let levels = exact_energy_distribution(&[4, 4], 1.0, 0.0, -30.0).unwrap();
        assert!(levels.iter().all(|l| l.1.is_finite()));
        let total: f64 = levels.iter().map(|l| l.1).sum();
        assert!((total - 1.0).abs() < 1e-12);
        // the two checkerboards carry almost all the weight
        let (e_top, p_top) = levels[levels.len() - 1];
        assert_eq!(e_top, 32.0);
        assert!(p_top > 0.999);

        // beta -> -beta mirrors the zero-field distribution
        let hot = exact_energy_distribution(&[4], 1.0, 0.0, 0.5).unwrap();
        let mirrored = exact_energy_distribution(&[4], 1.0, 0.0, -0.5).unwrap();
        for (a, b) in hot.iter().zip(mirrored.iter().rev()) {
            assert_eq!(a.0, -b.0);
            assert!((a.1 - b.1).abs() < 1e-12);
        }
    }

    #[test]
    fn test_long_chain_formulas_stay_finite() {
        let l = 3_000_000_000usize;
        let z = partition_function_1d(l, 1.0, 0.0);
        assert!(z.is_infinite() && z > 0.0);
        let t = (0.3f64).tanh();
        assert!((spin_correlation_1d(l, 1, 1.0, 0.3) - t).abs() < 1e-12);
        assert!((susceptibility_1d(l, 1.0, 0.3) - 0.6f64.exp()).abs() < 1e-12);
    }

    #[test]
    fn test_too_many_spins_rejected() {
        assert!(matches!(
            exact_energy_distribution(&[3, 7], 1.0, 0.0, 1.0),
            Err(IsingError::InvalidConfig(_))
        ));
    }
}
