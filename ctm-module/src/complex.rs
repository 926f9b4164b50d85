use ahash::AHashMap;
use itertools::Itertools;
use ctm_core::{Lc, Z2Ring};

use crate::{GenKey, Grading, TypeDA};

/// A free chain complex over `F₂[U...]`.
#[derive(Clone, Debug)]
pub struct ChainComplex { 
    ring: Z2Ring,
    gens: Vec<(GenKey, Grading)>,
    d: AHashMap<GenKey, Lc<GenKey>>
}

impl ChainComplex { 
    pub fn ring(&self) -> &Z2Ring { 
        &self.ring
    }

    pub fn rank(&self) -> usize { 
        self.gens.len()
    }

    /// Generators sorted by key.
    pub fn gens(&self) -> impl Iterator<Item = &GenKey> { 
        self.gens.iter().map(|(k, _)| k)
    }

    pub fn grading(&self, x: &GenKey) -> Option<Grading> { 
        self.gens.iter().find(|(k, _)| k == x).map(|(_, g)| *g)
    }

    pub fn d(&self, x: &GenKey) -> Lc<GenKey> { 
        self.d.get(x).cloned().unwrap_or_else(|| Lc::new(&self.ring))
    }

    pub fn d_elem(&self, z: &Lc<GenKey>) -> Lc<GenKey> { 
        z.apply(|x| self.d(x))
    }

    pub fn d_squared_is_zero(&self) -> bool { 
        self.gens().all(|x| 
            self.d_elem(&self.d(x)).is_zero()
        )
    }

    pub fn nonzero_entries(&self) -> usize { 
        self.d.values().map(|z| z.nterms()).sum()
    }
}

impl TypeDA { 
    /// The underlying complex: the edges labeled `(e, ())` with `e` idempotent.
    pub fn to_chain_complex(&self) -> ChainComplex { 
        let gens = self.gens().map(|v| 
            (v.key().clone(), v.grading())
        ).sorted_by(|a, b| a.0.cmp(&b.0)).collect_vec();

        let d = self.gens().map(|v| { 
            let x = v.key();
            let terms = self.edges_from(x).filter(|(_, l, _)| 
                l.is_differential()
            ).map(|(y, _, c)| 
                (y.clone(), c.clone())
            );
            (x.clone(), Lc::from_terms(self.ring(), terms))
        }).filter(|(_, z)| 
            !z.is_zero()
        ).collect();

        ChainComplex { ring: self.ring().clone(), gens, d }
    }
}

#[cfg(test)]
mod tests { 
    use ctm_alg::{AlgGen, TensorGen};
    use crate::module::tests::sample;
    use crate::EdgeKey;
    use super::*;

    #[test]
    fn complex() { 
        let mut m = sample();
        let r = m.ring().clone();
        let (x, y) = (GenKey::from("x"), GenKey::from("y"));
        let e0 = AlgGen::idempotent([0]);
        let e1 = AlgGen::idempotent([1]);

        m.add_edge(&x, &y, EdgeKey::new(e0.clone(), TensorGen::empty()), r.var("U1")).unwrap();
        m.add_edge(&x, &x, EdgeKey::new(e0.clone(), TensorGen::from(e1)), r.one()).unwrap();

        let c = m.to_chain_complex();
        assert_eq!(c.rank(), 3);
        assert_eq!(c.nonzero_entries(), 1);
        assert_eq!(c.d(&x), Lc::from_term(y.clone(), r.var("U1")));
        assert!(c.d(&y).is_zero());
        assert_eq!(c.grading(&y), Some((-1, 0)));
        assert!(c.d_squared_is_zero());
    }

    #[test]
    fn d_squared_nonzero() { 
        let mut m = sample();
        let r = m.ring().clone();
        let e0 = AlgGen::idempotent([0]);
        let e1 = AlgGen::idempotent([1]);

        m.add_generator("w".into(), e0.clone(), e1, (-2, 0)).unwrap();
        let (w, x, y) = (GenKey::from("w"), GenKey::from("x"), GenKey::from("y"));
        let l = EdgeKey::new(e0, TensorGen::empty());

        m.add_edge(&x, &y, l.clone(), r.one()).unwrap();
        m.add_edge(&y, &w, l.clone(), r.var("V")).unwrap();

        let c = m.to_chain_complex();
        assert!(!c.d_squared_is_zero());
    }
}
