use std::collections::BTreeMap;
use dinglebit_combinatorics::Combination;
use itertools::Itertools;

/// All `r`-element subsets of `0..n`, as ascending index lists.
pub fn combi(n: usize, r: usize) -> impl Iterator<Item = Vec<usize>> {
    Combination::new(n, r).into_iter()
}

/// All injective maps `source -> target`.
pub fn injections(source: &[usize], target: &[usize]) -> Vec<BTreeMap<usize, usize>> { 
    let k = source.len();
    target.iter().copied().permutations(k).map(|image| 
        source.iter().copied().zip(image).collect()
    ).collect()
}

/// All injective maps from a subset of `source` (of any size) to `target`.
pub fn partial_bijections(source: &[usize], target: &[usize]) -> Vec<BTreeMap<usize, usize>> { 
    let n = source.len();
    (0..=n).flat_map(|r| 
        combi(n, r).flat_map(|idx| { 
            let sub = idx.into_iter().map(|i| source[i]).collect_vec();
            injections(&sub, target)
        })
    ).collect()
}
