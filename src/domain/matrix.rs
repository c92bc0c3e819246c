/// Square matrix where `get(i, j) == get(j, i)` always holds.
///
/// Stored as a flat row-major `Vec<T>`; growing rebuilds the buffer with the
/// old values copied into the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricMatrix<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> SymmetricMatrix<T> {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![T::default(); size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        self.cells[i * self.size + j]
    }

    /// Writes both `(i, j)` and `(j, i)`.
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        let n = self.size;
        self.cells[i * n + j] = value;
        self.cells[j * n + i] = value;
    }

    /// Adds one row and one column of defaults, keeping existing values.
    pub fn grow(&mut self) {
        let old = self.size;
        let new = old + 1;
        let mut cells = vec![T::default(); new * new];
        for i in 0..old {
            cells[i * new..i * new + old].copy_from_slice(&self.cells[i * old..(i + 1) * old]);
        }
        self.size = new;
        self.cells = cells;
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.cells[i * self.size..(i + 1) * self.size]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.size).map(move |i| self.row(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_mirrored() {
        let mut m: SymmetricMatrix<f64> = SymmetricMatrix::new(3);
        m.set(0, 2, 7.5);
        assert_eq!(m.get(0, 2), 7.5);
        assert_eq!(m.get(2, 0), 7.5);
        assert_eq!(m.get(1, 1), 0.0);
    }

    #[test]
    fn grow_preserves_old_submatrix() {
        let mut m: SymmetricMatrix<bool> = SymmetricMatrix::new(2);
        m.set(0, 1, true);
        m.grow();
        assert_eq!(m.size(), 3);
        assert!(m.get(0, 1));
        assert!(m.get(1, 0));
        for k in 0..3 {
            assert!(!m.get(2, k));
            assert!(!m.get(k, 2));
        }
    }

    #[test]
    fn grow_from_empty() {
        let mut m: SymmetricMatrix<bool> = SymmetricMatrix::new(0);
        m.grow();
        m.grow();
        assert_eq!(m.size(), 2);
        assert_eq!(m.rows().count(), 2);
        assert_eq!(m.row(1), &[false, false]);
    }
}
