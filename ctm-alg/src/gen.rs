use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use itertools::Itertools;
use ctm_core::util::format::fmt_strands;

/// A strand diagram of `A^-(P)`: an injective partial map on the black points.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AlgGen { 
    strands: BTreeMap<usize, usize>
}

impl AlgGen { 
    /// Wraps `strands` without checking it against an algebra. 
    /// Use `AMinus::generator` for validated construction.
    pub fn new(strands: BTreeMap<usize, usize>) -> Self { 
        debug_assert!(strands.values().all_unique());
        Self { strands }
    }

    pub fn idempotent<I>(points: I) -> Self
    where I: IntoIterator<Item = usize> { 
        Self::new(points.into_iter().map(|p| (p, p)).collect())
    }

    pub fn strands(&self) -> &BTreeMap<usize, usize> { 
        &self.strands
    }

    pub fn get(&self, p: usize) -> Option<usize> { 
        self.strands.get(&p).copied()
    }

    pub fn domain(&self) -> BTreeSet<usize> { 
        self.strands.keys().copied().collect()
    }

    pub fn range(&self) -> BTreeSet<usize> { 
        self.strands.values().copied().collect()
    }

    pub fn left_idempotent(&self) -> AlgGen { 
        Self::idempotent(self.strands.keys().copied())
    }

    pub fn right_idempotent(&self) -> AlgGen { 
        Self::idempotent(self.strands.values().copied())
    }

    pub fn is_idempotent(&self) -> bool { 
        self.strands.iter().all(|(a, b)| a == b)
    }

    /// Pairs of sources `(i, j)`, `i < j`, whose strands cross.
    pub fn inversions(&self) -> Vec<(usize, usize)> { 
        self.strands.iter().tuple_combinations().filter(|((_, si), (_, sj))| 
            si > sj
        ).map(|((&i, _), (&j, _))| (i, j)).collect()
    }

    /// Replaces the targets of `i` and `j` with each other.
    pub fn swap_targets(&self, i: usize, j: usize) -> AlgGen { 
        let mut strands = self.strands.clone();
        let (si, sj) = (strands[&i], strands[&j]);
        strands.insert(i, sj);
        strands.insert(j, si);
        Self::new(strands)
    }
}

impl Display for AlgGen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", fmt_strands(&self.strands))
    }
}

impl std::fmt::Debug for AlgGen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
