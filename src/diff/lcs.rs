use super::SegmentKind;

/// Longest-common-subsequence table over two token slices.
///
/// Cell `(i, j)` holds the LCS length of the first `i` tokens of `a` and the
/// first `j` tokens of `b`.
pub(crate) struct LcsTable {
    rows: usize,
    cols: usize,
    cells: Vec<usize>,
}

impl LcsTable {
    pub(crate) fn build(a: &[&str], b: &[&str]) -> Self {
        let rows = a.len() + 1;
        let cols = b.len() + 1;
        let mut cells = vec![0usize; rows * cols];

        for i in 1..rows {
            for j in 1..cols {
                cells[i * cols + j] = if a[i - 1] == b[j - 1] {
                    cells[(i - 1) * cols + (j - 1)] + 1
                } else {
                    cells[(i - 1) * cols + j].max(cells[i * cols + (j - 1)])
                };
            }
        }

        Self { rows, cols, cells }
    }

    fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }

    /// Length of the full LCS.
    pub(crate) fn lcs_len(&self) -> usize {
        self.get(self.rows - 1, self.cols - 1)
    }

    /// Walk back from the bottom-right corner and return one
    /// `(kind, token)` pair per token, in document order.
    pub(crate) fn backtrack<'a>(&self, a: &[&'a str], b: &[&'a str]) -> Vec<(SegmentKind, &'a str)> {
        let mut ops = Vec::with_capacity(a.len() + b.len());
        let mut i = a.len();
        let mut j = b.len();

        while i > 0 || j > 0 {
            if i > 0 && j > 0 && a[i - 1] == b[j - 1] {
                ops.push((SegmentKind::Equal, a[i - 1]));
                i -= 1;
                j -= 1;
            } else if j > 0 && (i == 0 || self.get(i, j - 1) >= self.get(i - 1, j)) {
                ops.push((SegmentKind::Insert, b[j - 1]));
                j -= 1;
            } else {
                ops.push((SegmentKind::Delete, a[i - 1]));
                i -= 1;
            }
        }

        ops.reverse();
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcs_length() {
        let a = ["a", " ", "b", " ", "c"];
        let b = ["a", " ", "c"];
        assert_eq!(LcsTable::build(&a, &b).lcs_len(), 3);
    }

    #[test]
    fn test_backtrack_prefers_insert_on_ties() {
        let a = ["x"];
        let b = ["y"];
        let table = LcsTable::build(&a, &b);
        let ops = table.backtrack(&a, &b);
        // Walking backwards the insert is taken first, so the delete comes
        // first in document order.
        assert_eq!(
            ops,
            vec![(SegmentKind::Delete, "x"), (SegmentKind::Insert, "y")]
        );
    }

    #[test]
    fn test_backtrack_with_empty_side() {
        let a: [&str; 0] = [];
        let b = ["new", " ", "text"];
        let table = LcsTable::build(&a, &b);
        assert_eq!(table.lcs_len(), 0);
        assert!(table
            .backtrack(&a, &b)
            .iter()
            .all(|(kind, _)| *kind == SegmentKind::Insert));
    }
}
