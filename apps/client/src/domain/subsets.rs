//! Lexicographic k-subset enumeration over hand indices.

/// Iterator over every `k`-element index subset of `0..n`, in lexicographic order.
///
/// Yields `C(n, k)` items; nothing when `k > n`, a single empty subset when `k == 0`.
#[derive(Debug, Clone)]
pub struct IndexSubsets {
    n: usize,
    current: Option<Vec<usize>>,
}

impl IndexSubsets {
    pub fn new(n: usize, k: usize) -> Self {
        let current = (k <= n).then(|| (0..k).collect());
        Self { n, current }
    }
}

impl Iterator for IndexSubsets {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let out = self.current.take()?;
        let k = out.len();

        // Advance: find the rightmost position that can still move right.
        let mut next = out.clone();
        let mut i = k;
        while i > 0 {
            i -= 1;
            if next[i] < self.n - k + i {
                next[i] += 1;
                for j in i + 1..k {
                    next[j] = next[j - 1] + 1;
                }
                self.current = Some(next);
                break;
            }
        }
        Some(out)
    }
}

/// Every `k`-card subset of `items`, cloned, in lexicographic index order.
pub fn subsets_of<T: Clone>(items: &[T], k: usize) -> impl Iterator<Item = Vec<T>> + '_ {
    IndexSubsets::new(items.len(), k).map(move |idx| idx.iter().map(|&i| items[i].clone()).collect())
}

/// Binomial coefficient, used to size searches and in tests.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1usize, |acc, i| acc * (n - i) / (i + 1))
}
