use crate::error::{IsingError, IsingResult};

/// Periodic hyper-cubic lattice with precomputed neighbor table.
///
/// Sites are indexed in row-major (C) order: axis 0 varies slowest. Every
/// site has exactly `2 * n_dims` neighbors, one forward and one backward per
/// axis, each coordinate wrapped modulo that axis's extent.
#[derive(Debug, Clone)]
pub struct Lattice {
    /// Extent along each axis (e.g. `[8, 8, 8]`).
    pub shape: Vec<usize>,
    /// Row-major strides: `strides[d] = product of shape[d+1..]`.
    pub strides: Vec<usize>,
    /// Total number of sites (`shape.iter().product()`).
    pub n_spins: usize,
    /// Number of axes (`shape.len()`).
    pub n_dims: usize,
    /// Layout: `neighbors[(i * n_dims + d) * 2 + dir]` where `dir = 0` is
    /// forward and `dir = 1` is backward.
    neighbors: Vec<u32>,
}

impl Lattice {
    /// Build a periodic lattice with the given per-axis extents.
    pub fn new(shape: Vec<usize>) -> IsingResult<Self> {
        if shape.is_empty() {
            return Err(IsingError::InvalidConfig(
                "lattice shape must have at least one axis".to_string(),
            ));
        }
        if let Some(axis) = shape.iter().position(|&l| l == 0) {
            return Err(IsingError::InvalidConfig(format!(
                "lattice extent on axis {axis} must be >= 1"
            )));
        }

        let n_dims = shape.len();
        let too_large = || {
            IsingError::InvalidConfig(format!(
                "lattice shape {shape:?} has more than {} sites",
                u32::MAX
            ))
        };
        let n_spins = shape
            .iter()
            .try_fold(1usize, |acc, &l| acc.checked_mul(l))
            .filter(|&n| n <= u32::MAX as usize)
            .ok_or_else(too_large)?;
        let table_len = n_spins
            .checked_mul(n_dims * 2)
            .ok_or_else(too_large)?;

        let mut strides = vec![1usize; n_dims];
        for d in (0..n_dims.saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * shape[d + 1];
        }

        let mut neighbors = vec![0u32; table_len];
        for i in 0..n_spins {
            for d in 0..n_dims {
                let extent = shape[d];
                let c = (i / strides[d]) % extent;
                let base = i - c * strides[d];
                let fwd = (c + 1) % extent;
                let bwd = (c + extent - 1) % extent;
                neighbors[(i * n_dims + d) * 2] = (base + fwd * strides[d]) as u32;
                neighbors[(i * n_dims + d) * 2 + 1] = (base + bwd * strides[d]) as u32;
            }
        }

        Ok(Self {
            shape,
            strides,
            n_spins,
            n_dims,
            neighbors,
        })
    }

    /// Return the neighbor of site `flat_idx` along axis `dim`.
    /// `forward = true` means `+1`, `forward = false` means `-1`.
    #[inline]
    pub fn neighbor(&self, flat_idx: usize, dim: usize, forward: bool) -> usize {
        self.neighbors[(flat_idx * self.n_dims + dim) * 2 + (!forward as usize)] as usize
    }

    /// All `2 * n_dims` neighbors of `flat_idx`, axis-major, forward first.
    #[inline]
    pub fn neighbours(&self, flat_idx: usize) -> Neighbours<'_> {
        let start = flat_idx * self.n_dims * 2;
        Neighbours {
            table: &self.neighbors[start..start + self.n_dims * 2],
            pos: 0,
        }
    }

    /// `true` when the axis has extent 1, i.e. both neighbors along it are
    /// the site itself.
    #[inline]
    pub fn is_trivial_axis(&self, dim: usize) -> bool {
        self.shape[dim] == 1
    }

    /// Row-major flat index of a multi-index, with bounds and rank checks.
    pub fn flat_index(&self, index: &[usize]) -> IsingResult<usize> {
        if index.len() != self.n_dims {
            return Err(IsingError::DimensionMismatch {
                expected: self.n_dims,
                got: index.len(),
            });
        }
        let mut flat = 0usize;
        for (axis, (&c, &extent)) in index.iter().zip(self.shape.iter()).enumerate() {
            if c >= extent {
                return Err(IsingError::IndexOutOfBounds {
                    axis,
                    index: c,
                    extent,
                });
            }
            flat += c * self.strides[axis];
        }
        Ok(flat)
    }

    /// Multi-index of a flat site index.
    pub fn coords(&self, flat_idx: usize) -> Vec<usize> {
        (0..self.n_dims)
            .map(|d| (flat_idx / self.strides[d]) % self.shape[d])
            .collect()
    }

    /// Neighbor multi-indices of `index`, in the same order as [`Self::neighbours`].
    pub fn neighbours_of(&self, index: &[usize]) -> IsingResult<Vec<Vec<usize>>> {
        let flat = self.flat_index(index)?;
        Ok(self.neighbours(flat).map(|nb| self.coords(nb)).collect())
    }
}

/// Fixed-length iterator over one site's neighbor row of the table.
///
/// Holds no state beyond a cursor into the precomputed row, so calling
/// [`Lattice::neighbours`] again always restarts the same sequence.
#[derive(Debug, Clone)]
pub struct Neighbours<'a> {
    table: &'a [u32],
    pos: usize,
}

impl Iterator for Neighbours<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        let nb = *self.table.get(self.pos)?;
        self.pos += 1;
        Some(nb as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.table.len() - self.pos;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Neighbours<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_2d_neighbors() {
        // 3x4 lattice
        let lat = Lattice::new(vec![3, 4]).unwrap();
        assert_eq!(lat.n_spins, 12);
        assert_eq!(lat.strides, vec![4, 1]);

        // Spin 0 = (0,0): forward in dim 0 -> (1,0)=4, forward in dim 1 -> (0,1)=1
        assert_eq!(lat.neighbor(0, 0, true), 4);
        assert_eq!(lat.neighbor(0, 1, true), 1);

        // backward wraps: dim 0 -> (2,0)=8, dim 1 -> (0,3)=3
        assert_eq!(lat.neighbor(0, 0, false), 8);
        assert_eq!(lat.neighbor(0, 1, false), 3);

        // Spin 11 = (2,3): both forward neighbors wrap
        assert_eq!(lat.neighbor(11, 0, true), 3);
        assert_eq!(lat.neighbor(11, 1, true), 8);
    }

    #[test]
    fn test_neighbour_order_is_axis_major() {
        let lat = Lattice::new(vec![2, 3, 4]).unwrap();
        assert_eq!(lat.strides, vec![12, 4, 1]);
        let nbs: Vec<usize> = lat.neighbours(0).collect();
        // (1,0,0) (1,0,0) (0,1,0) (0,2,0) (0,0,1) (0,0,3)
        assert_eq!(nbs, vec![12, 12, 4, 8, 1, 3]);
        assert_eq!(lat.neighbours(0).len(), 6);
    }

    #[test]
    fn test_neighbours_of_multi_index() {
        let lat = Lattice::new(vec![5]).unwrap();
        assert_eq!(lat.neighbours_of(&[0]).unwrap(), vec![vec![1], vec![4]]);
        assert_eq!(lat.neighbours_of(&[4]).unwrap(), vec![vec![0], vec![3]]);

        let lat = Lattice::new(vec![1, 5]).unwrap();
        assert_eq!(
            lat.neighbours_of(&[0, 2]).unwrap(),
            vec![vec![0, 2], vec![0, 2], vec![0, 3], vec![0, 1]]
        );
    }

    #[test]
    fn test_neighbours_restart() {
        let lat = Lattice::new(vec![4, 4]).unwrap();
        let a: Vec<usize> = lat.neighbours(5).collect();
        let b: Vec<usize> = lat.neighbours(5).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_index_errors() {
        let lat = Lattice::new(vec![3, 3]).unwrap();
        assert!(matches!(
            lat.flat_index(&[1]),
            Err(IsingError::DimensionMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            lat.flat_index(&[1, 3]),
            Err(IsingError::IndexOutOfBounds { axis: 1, index: 3, extent: 3 })
        ));
        assert_eq!(lat.flat_index(&[2, 1]).unwrap(), 7);
        assert_eq!(lat.coords(7), vec![2, 1]);
    }

    #[test]
    fn test_bad_shapes_rejected() {
        assert!(Lattice::new(vec![]).is_err());
        assert!(Lattice::new(vec![4, 0]).is_err());
    }

    #[test]
    fn test_site_count_overflow_rejected() {
        let half = usize::MAX / 2;
        assert!(matches!(
            Lattice::new(vec![half, half]),
            Err(IsingError::InvalidConfig(_))
        ));
        assert!(matches!(
            Lattice::new(vec![1 << 16, 1 << 16, 2]),
            Err(IsingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_neighbour_symmetry_small_extents() {
        let extents = [1usize, 2, 5];
        let mut shapes: Vec<Vec<usize>> = Vec::new();
        for &a in &extents {
            shapes.push(vec![a]);
            for &b in &extents {
                shapes.push(vec![a, b]);
                for &c in &extents {
                    shapes.push(vec![a, b, c]);
                }
            }
        }

        for shape in shapes {
            let lat = Lattice::new(shape.clone()).unwrap();
            for i in 0..lat.n_spins {
                assert_eq!(lat.neighbours(i).len(), 2 * lat.n_dims);
                for nb in lat.neighbours(i) {
                    assert!(
                        lat.neighbours(nb).any(|x| x == i),
                        "shape {shape:?}: {nb} in N({i}) but {i} not in N({nb})"
                    );
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_coords_round_trip(shape in prop::collection::vec(1usize..6, 1..4), seed in 0usize..1000) {
            let lat = Lattice::new(shape).unwrap();
            let i = seed % lat.n_spins;
            prop_assert_eq!(lat.flat_index(&lat.coords(i)).unwrap(), i);
        }

        #[test]
        fn prop_forward_then_backward_is_identity(shape in prop::collection::vec(1usize..7, 1..4), seed in 0usize..1000) {
            let lat = Lattice::new(shape).unwrap();
            let i = seed % lat.n_spins;
            for d in 0..lat.n_dims {
                prop_assert_eq!(lat.neighbor(lat.neighbor(i, d, true), d, false), i);
            }
        }
    }
}
