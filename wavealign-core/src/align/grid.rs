//! Dense DP arenas addressed by `(i, j)` with `0 <= i <= n`, `0 <= j <= m`.
//!
//! `Grid` is row-major and backs the sequential engines. `DiagonalGrid` stores
//! anti-diagonal `d = i + j` as one contiguous run, so the wavefront can hand out
//! the current diagonal as a `&mut` slice while earlier diagonals stay shared.

/// Read access shared by both layouts; traceback is written against this.
pub(crate) trait Cells<T> {
    fn at(&self, i: usize, j: usize) -> &T;
}

/// The three predecessors of an interior cell.
pub(crate) struct Neighbors<'g, T> {
    pub diag: &'g T,
    pub up: &'g T,
    pub left: &'g T,
}

pub(crate) struct Grid<T> {
    cols: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    pub fn from_fn(n: usize, m: usize, mut init: impl FnMut(usize, usize) -> T) -> Self {
        let cols = m + 1;
        let mut cells = Vec::with_capacity((n + 1) * cols);
        for i in 0..=n {
            for j in 0..=m {
                cells.push(init(i, j));
            }
        }
        Self { cols, cells }
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        i * self.cols + j
    }

    /// Fill every interior cell row by row.
    pub fn fill_rows<F>(&mut self, n: usize, m: usize, kernel: F)
    where
        F: Fn(usize, usize, Neighbors<'_, T>) -> T,
    {
        for i in 1..=n {
            for j in 1..=m {
                let value = kernel(
                    i,
                    j,
                    Neighbors {
                        diag: self.at(i - 1, j - 1),
                        up: self.at(i - 1, j),
                        left: self.at(i, j - 1),
                    },
                );
                let idx = self.index(i, j);
                self.cells[idx] = value;
            }
        }
    }
}

impl<T> Cells<T> for Grid<T> {
    #[inline]
    fn at(&self, i: usize, j: usize) -> &T {
        &self.cells[self.index(i, j)]
    }
}

/// Smallest row index present on anti-diagonal `d` of an `(n+1) x (m+1)` table.
#[inline]
pub(crate) fn first_row(d: usize, m: usize) -> usize {
    d.saturating_sub(m)
}

pub(crate) struct DiagonalGrid<T> {
    m: usize,
    /// `offsets[d]..offsets[d + 1]` is diagonal `d`.
    offsets: Vec<usize>,
    cells: Vec<T>,
}

impl<T> DiagonalGrid<T> {
    pub fn from_fn(n: usize, m: usize, mut init: impl FnMut(usize, usize) -> T) -> Self {
        let mut offsets = Vec::with_capacity(n + m + 2);
        let mut cells = Vec::with_capacity((n + 1) * (m + 1));
        for d in 0..=n + m {
            offsets.push(cells.len());
            for i in first_row(d, m)..=d.min(n) {
                cells.push(init(i, d - i));
            }
        }
        offsets.push(cells.len());
        Self { m, offsets, cells }
    }

    /// Split into the finished diagonals `0..d` (shared) and diagonal `d` (exclusive).
    /// Element `k` of the returned slice is cell `(first_row(d, m) + k, d - first_row(d, m) - k)`.
    pub fn split_at_diagonal(&mut self, d: usize) -> (DiagonalView<'_, T>, &mut [T]) {
        let start = self.offsets[d];
        let len = self.offsets[d + 1] - start;
        let (done, rest) = self.cells.split_at_mut(start);
        let view = DiagonalView {
            m: self.m,
            offsets: &self.offsets,
            cells: done,
        };
        (view, &mut rest[..len])
    }
}

impl<T> Cells<T> for DiagonalGrid<T> {
    #[inline]
    fn at(&self, i: usize, j: usize) -> &T {
        let d = i + j;
        &self.cells[self.offsets[d] + (i - first_row(d, self.m))]
    }
}

/// Read-only window onto the diagonals preceding the one being written.
pub(crate) struct DiagonalView<'g, T> {
    m: usize,
    offsets: &'g [usize],
    cells: &'g [T],
}

impl<'g, T> DiagonalView<'g, T> {
    /// Predecessors of interior cell `(i, j)`; they lie on diagonals `i+j-1` and `i+j-2`.
    #[inline]
    pub fn neighbors(&self, i: usize, j: usize) -> Neighbors<'g, T> {
        Neighbors {
            diag: self.get(i - 1, j - 1),
            up: self.get(i - 1, j),
            left: self.get(i, j - 1),
        }
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> &'g T {
        let d = i + j;
        &self.cells[self.offsets[d] + (i - first_row(d, self.m))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_addresses_round_trip() {
        let g = Grid::from_fn(3, 5, |i, j| (i, j));
        for i in 0..=3 {
            for j in 0..=5 {
                assert_eq!(*g.at(i, j), (i, j));
            }
        }
    }

    #[test]
    fn diagonal_addresses_round_trip() {
        for (n, m) in [(0, 0), (0, 4), (4, 0), (1, 1), (3, 7), (7, 3), (5, 5)] {
            let g = DiagonalGrid::from_fn(n, m, |i, j| (i, j));
            assert_eq!(g.cells.len(), (n + 1) * (m + 1));
            for i in 0..=n {
                for j in 0..=m {
                    assert_eq!(*g.at(i, j), (i, j), "n={n} m={m}");
                }
            }
        }
    }

    #[test]
    fn diagonal_slices_are_contiguous_and_ordered() {
        let (n, m) = (4, 6);
        let mut g = DiagonalGrid::from_fn(n, m, |i, j| (i, j));
        for d in 0..=n + m {
            let lo = first_row(d, m);
            let expected: Vec<(usize, usize)> = (lo..=d.min(n)).map(|i| (i, d - i)).collect();
            let (_, current) = g.split_at_diagonal(d);
            assert_eq!(current, expected.as_slice());
        }
    }

    #[test]
    fn view_exposes_predecessors_only() {
        let (n, m) = (3, 3);
        let mut g = DiagonalGrid::from_fn(n, m, |i, j| i * 10 + j);
        let (view, current) = g.split_at_diagonal(4);
        // diagonal 4 of a 4x4 table holds rows 1..=3
        assert_eq!(current, &[13, 22, 31]);
        let nb = view.neighbors(2, 2);
        assert_eq!((*nb.diag, *nb.up, *nb.left), (11, 12, 21));
    }

    #[test]
    fn fill_rows_visits_in_dependency_order() {
        let (n, m) = (3, 4);
        let mut g = Grid::from_fn(n, m, |i, j| if i == 0 || j == 0 { 1u64 } else { 0 });
        g.fill_rows(n, m, |_, _, nb| nb.diag + nb.up + nb.left);
        // Delannoy numbers D(3, 4) = 129.
        assert_eq!(*g.at(3, 4), 129);
    }
}
