use std::collections::BTreeMap;
use std::fmt::Display;
use itertools::Itertools;
use ctm_core::{Error, Lc, Result, Sign, Z2Poly, Z2Ring};
use ctm_core::combi::injections;

use log::trace;

use crate::{pt, AlgGen, Relation, StrandDiagram};

/// Elements of `A^-(P)`.
pub type AlgElem = Lc<AlgGen>;

/// The algebra `A^-(P)` for a sign sequence `P`.
/// 
/// Black points are `0..=n`, orange strand `k` (`1 <= k <= n`) lies between 
/// points `k-1` and `k` and carries the sign `P[k-1]`. The ground ring has a
/// variable `U<k>` for each positive orange strand `k`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AMinus { 
    signs: Vec<Sign>,
    ring: Z2Ring,
}

impl AMinus { 
    pub fn new(signs: Vec<Sign>) -> Self { 
        let vars = signs.iter().enumerate().filter(|(_, s)| 
            s.is_positive()
        ).map(|(i, _)| 
            Self::var_name(i + 1)
        ).collect_vec();
        let ring = Z2Ring::new(vars);
        Self { signs, ring }
    }

    pub fn var_name(k: usize) -> String { 
        format!("U{k}")
    }

    pub fn signs(&self) -> &[Sign] { 
        &self.signs
    }

    /// The sign of orange strand `k`.
    pub fn sign(&self, k: usize) -> Sign { 
        assert!(0 < k && k <= self.n(), "no orange strand {k}");
        self.signs[k - 1]
    }

    /// The number of orange strands.
    pub fn n(&self) -> usize { 
        self.signs.len()
    }

    pub fn points(&self) -> Vec<usize> { 
        (0..=self.n()).collect()
    }

    pub fn ring(&self) -> &Z2Ring { 
        &self.ring
    }

    pub fn var(&self, k: usize) -> Option<Z2Poly> { 
        self.ring.try_var(&Self::var_name(k)).ok()
    }

    pub fn generator(&self, strands: BTreeMap<usize, usize>) -> Result<AlgGen> { 
        let n = self.n();
        if strands.iter().any(|(&a, &b)| a > n || b > n) { 
            return Err(Error::InvalidStrands(format!("points out of 0..={n}: {strands:?}")))
        }
        if !strands.values().all_unique() { 
            return Err(Error::InvalidStrands(format!("not injective: {strands:?}")))
        }
        Ok(AlgGen::new(strands))
    }

    pub fn idempotent<I>(&self, points: I) -> Result<AlgGen>
    where I: IntoIterator<Item = usize> { 
        self.generator(points.into_iter().map(|p| (p, p)).collect())
    }

    pub fn zero(&self) -> AlgElem { 
        AlgElem::new(&self.ring)
    }

    pub fn elem(&self, g: AlgGen) -> AlgElem { 
        AlgElem::from_gen(&self.ring, g)
    }

    /// All generators with domain `points`.
    pub fn left_gens(&self, points: &[usize]) -> Vec<AlgGen> { 
        injections(points, &self.points()).into_iter().map(AlgGen::new).collect()
    }

    /// All generators with range `points`.
    pub fn right_gens(&self, points: &[usize]) -> Vec<AlgGen> { 
        injections(points, &self.points()).into_iter().map(|f| 
            AlgGen::new(f.into_iter().map(|(a, b)| (b, a)).collect())
        ).collect()
    }

    fn diagram(&self) -> StrandDiagram { 
        StrandDiagram::with_flat_oranges(&self.signs)
    }

    fn coefficient(&self, sd: &StrandDiagram) -> Option<Z2Poly> { 
        sd.coefficient(Relation::Figure6, &self.ring, Self::var_name)
    }

    /// `g1 · g2` as a coefficient and a generator, `None` when the product vanishes.
    pub fn mul_gens(&self, g1: &AlgGen, g2: &AlgGen) -> Option<(AlgGen, Z2Poly)> { 
        if g1.range() != g2.domain() { 
            return None
        }

        let mut sd = self.diagram();
        for (&a, &b) in g1.strands().iter() { 
            let c = g2.get(b)?;
            sd.add_black([pt(a), pt(b), pt(c)]);
        }
        let coeff = self.coefficient(&sd)?;

        let strands = g1.strands().iter().filter_map(|(&a, &b)| 
            g2.get(b).map(|c| (a, c))
        ).collect();

        Some((AlgGen::new(strands), coeff))
    }

    pub fn mul(&self, x: &AlgElem, y: &AlgElem) -> AlgElem { 
        let terms = x.iter().cartesian_product(y.iter().collect_vec()).filter_map(|((g1, c1), (g2, c2))| {
            let (g, c) = self.mul_gens(g1, g2)?;
            Some((g, c * c1 * c2))
        });
        AlgElem::from_terms(&self.ring, terms)
    }

    /// The differential of a generator: the sum over its crossings whose
    /// resolution removes exactly one crossing. The resolved pair bounds a
    /// region containing the oranges `max(i, sj) < k <= min(j, si)`, each
    /// contributing `U<k>`, and the term vanishes if one of them is negative.
    pub fn diff_gen(&self, g: &AlgGen) -> AlgElem { 
        let inv = g.inversions().len();
        let terms = g.inversions().into_iter().filter_map(|(i, j)| { 
            let h = g.swap_targets(i, j);
            if h.inversions().len() + 1 != inv { 
                return None
            }
            let c = self.smoothing_coeff(g, i, j);
            if c.is_none() { 
                trace!("{g}: smoothing {i}, {j} passes a negative orange");
            }
            Some((h, c?))
        });
        AlgElem::from_terms(&self.ring, terms)
    }

    fn smoothing_coeff(&self, g: &AlgGen, i: usize, j: usize) -> Option<Z2Poly> { 
        let s = g.strands();
        let (si, sj) = (s[&i], s[&j]);
        let (lo, hi) = (usize::max(i, sj), usize::min(j, si));

        (lo + 1 ..= hi).try_fold(self.ring.one(), |c, k| 
            self.var(k).map(|u| c * u)
        )
    }

    pub fn diff(&self, x: &AlgElem) -> AlgElem { 
        x.apply(|g| self.diff_gen(g))
    }

    /// Orange strands passed by the strand `a -> b`.
    fn passed(&self, a: usize, b: usize) -> impl Iterator<Item = Sign> + '_ { 
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        (lo + 1 ..= hi).map(|k| self.sign(k))
    }

    pub fn maslov_gen(&self, g: &AlgGen, coeff: &Z2Poly) -> Result<isize> { 
        let deg = coeff.degree()?.unwrap_or(0) as isize;
        let inv = g.inversions().len() as isize;
        let pos = g.strands().iter().map(|(&a, &b)| 
            self.passed(a, b).filter(|s| s.is_positive()).count()
        ).sum::<usize>() as isize;

        Ok(-2 * deg + inv - pos)
    }

    pub fn two_alexander_gen(&self, g: &AlgGen, coeff: &Z2Poly) -> Result<isize> { 
        let deg = coeff.degree()?.unwrap_or(0) as isize;
        let signs = g.strands().iter().map(|(&a, &b)| 
            self.passed(a, b).map(|s| s.to_isize()).sum::<isize>()
        ).sum::<isize>();

        Ok(-2 * deg - signs)
    }

    /// The Maslov grading of a homogeneous element, `None` for zero.
    pub fn maslov(&self, x: &AlgElem) -> Result<Option<isize>> { 
        self.homogeneous_grading(x, |g, c| self.maslov_gen(g, c))
    }

    pub fn two_alexander(&self, x: &AlgElem) -> Result<Option<isize>> { 
        self.homogeneous_grading(x, |g, c| self.two_alexander_gen(g, c))
    }

    fn homogeneous_grading<F>(&self, x: &AlgElem, f: F) -> Result<Option<isize>>
    where F: Fn(&AlgGen, &Z2Poly) -> Result<isize> { 
        let degs = x.iter().map(|(g, c)| f(g, c)).collect::<Result<Vec<_>>>()?;
        match degs.iter().unique().count() { 
            0 => Ok(None),
            1 => Ok(Some(degs[0])),
            _ => Err(Error::NonHomogeneous(x.to_string()))
        }
    }
}

impl Display for AMinus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "A-({})", self.signs.iter().join(""))
    }
}

impl std::fmt::Debug for AMinus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
