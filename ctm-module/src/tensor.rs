use std::sync::{Arc, RwLock};
use ahash::AHashMap;
use cartesian::cartesian;
use itertools::Itertools;
use log::{debug, info, log_enabled, warn, Level};
use ctm_alg::TensorGen;
use ctm_core::{Error, Lc, Result, Z2Poly};

use crate::par::flat_map_vec;
use crate::{EdgeKey, GenKey, TypeDA};

type Paths = Lc<(TensorGen, GenKey)>;

/// Memoized `δ_n` of one module, scoped to a single tensor product.
struct DeltaCache<'a> { 
    module: &'a TypeDA,
    memo: RwLock<AHashMap<(TensorGen, GenKey), Arc<Paths>>>
}

impl<'a> DeltaCache<'a> { 
    fn new(module: &'a TypeDA) -> Self { 
        Self { module, memo: RwLock::new(AHashMap::new()) }
    }

    /// The sum over paths from `x` whose left outputs are exactly `seq`, as 
    /// `c·(r, y)` with `r` the concatenated right inputs and `y` the end point.
    fn delta_n(&self, seq: &TensorGen, x: &GenKey) -> Arc<Paths> { 
        let key = (seq.clone(), x.clone());
        if let Some(res) = self.memo.read().ok().and_then(|m| m.get(&key).cloned()) { 
            return res
        }

        let ring = self.module.ring();
        let res = match seq.split_first() { 
            None => Paths::from_gen(ring, (TensorGen::empty(), x.clone())),
            Some((b, rest)) => { 
                let mut res = Paths::new(ring);
                for (y, label, c) in self.module.edges_from(x) { 
                    if &label.left != b { 
                        continue
                    }
                    for ((r, z), d) in self.delta_n(&rest, y).iter() { 
                        res.add_term((&label.right * r, z.clone()), c * d);
                    }
                }
                res
            }
        };

        let res = Arc::new(res);
        if let Ok(mut memo) = self.memo.write() { 
            memo.insert(key, res.clone());
        }
        res
    }
}

impl TypeDA { 
    /// The box tensor product `self ⊠ other`, over the pushout of the two module rings
    /// along the scalar actions of the middle algebra.
    pub fn tensor(&self, other: &TypeDA) -> Result<TypeDA> { 
        if self.right_alg() != other.left_alg() { 
            return Err(Error::SignMismatch(format!("{} vs {}", self.right_alg(), other.left_alg())))
        }

        let (in_m, in_n) = self.right_action().pushout(other.left_action())?;
        let ring = in_m.target().clone();
        let left_action = in_m.compose(self.left_action())?;
        let right_action = in_n.compose(other.right_action())?;

        let mut res = TypeDA::new(&ring, self.left_alg(), other.right_alg(), left_action, right_action)?;

        let pairs = cartesian!(
            self.keys().sorted(), 
            other.keys().sorted()
        ).filter(|(k, l)| 
            self.gens[*k].right_idem() == other.gens[*l].left_idem()
        ).map(|(k, l)| 
            (k.clone(), l.clone())
        ).collect_vec();

        info!("tensor: ({}) ⊠ ({}) -> {} gens", self.stat(), other.stat(), pairs.len());

        for (k, l) in pairs.iter() { 
            let (v, w) = (&self.gens[k], &other.gens[l]);
            let grading = (v.grading().0 + w.grading().0, v.grading().1 + w.grading().1);
            res.add_generator(GenKey::pair(k, l), v.left_idem().clone(), w.right_idem().clone(), grading)?;
        }

        let cache = DeltaCache::new(other);
        let edges = flat_map_vec(&pairs, |(k, l)| { 
            let source = GenKey::pair(k, l);
            self.edges_from(k).flat_map(|(k1, label, c)| { 
                let c = in_m.apply(c);
                cache.delta_n(&label.right, l).iter().filter_map(|((r, l1), d)| { 
                    let target = GenKey::pair(k1, l1);
                    if !res.contains(&target) { 
                        return None
                    }
                    let e = EdgeKey::new(label.left.clone(), r.clone());
                    Some((source.clone(), target, e, &c * &in_n.apply(d)))
                }).collect_vec()
            }).collect_vec()
        });

        debug!("tensor: add {} edges", edges.len());

        for (x, y, e, c) in edges { 
            res.add_edge(&x, &y, e, c)?;
        }

        info!("tensor: {}", res.stat());

        if cfg!(debug_assertions) && log_enabled!(Level::Debug) && !res.to_chain_complex().d_squared_is_zero() { 
            warn!("tensor: d² != 0 on the underlying complex");
        }

        Ok(res)
    }
}

#[cfg(test)]
mod tests { 
    use std::collections::BTreeMap;
    use ctm_alg::{AMinus, AlgGen};
    use ctm_core::{strands, Map, Sign, Z2Ring};
    use super::*;

    fn action(alg: &AMinus, ring: &Z2Ring, pairs: &[(&str, &str)]) -> Map { 
        let mapping = pairs.iter().map(|(s, t)| (s.to_string(), t.to_string())).collect::<BTreeMap<_, _>>();
        Map::new(alg.ring(), ring, mapping).unwrap()
    }

    // The identity-like module over A-(+): one generator per idempotent, with units.
    fn unit_module(name: &str) -> TypeDA { 
        let alg = AMinus::new(vec![Sign::Pos]);
        let v = format!("{name}1");
        let ring = Z2Ring::new([v.clone()]);
        let a = action(&alg, &ring, &[("U1", v.as_str())]);
        let mut m = TypeDA::new(&ring, &alg, &alg, a.clone(), a).unwrap();

        for p in [0, 1] { 
            let (l, r) = (1 - p, p);
            let k = GenKey::label(format!("{name}{p}"));
            let (el, er) = (AlgGen::idempotent([l]), AlgGen::idempotent([r]));
            m.add_generator(k.clone(), el.clone(), er.clone(), (0, 0)).unwrap();
            m.add_edge(&k, &k, EdgeKey::new(el, TensorGen::from(er)), ring.one()).unwrap();
        }
        m
    }

    #[test]
    fn pairs_and_units() { 
        let m = unit_module("X");
        let n = unit_module("Y");
        let t = m.tensor(&n).unwrap();

        // x_p pairs with y_{1-p}
        assert_eq!(t.ngens(), 2);
        assert_eq!(t.nedges(), 2);
        assert_eq!(t.ring().nvars(), 1);
        assert!(t.contains(&GenKey::pair(&"X0".into(), &"Y1".into())));

        for v in t.gens() { 
            let e = t.edge(v.key(), v.key()).unwrap();
            assert_eq!(e.nterms(), 1);
            assert!(e.gens().all(|l| l.is_unit()));
        }
        t.validate();
    }

    #[test]
    fn pass_through() { 
        let mut m = unit_module("X");
        let n = unit_module("Y");
        let ring = m.ring().clone();

        // δ(X0, {0:1}) = X1·{1:0} ⊗ X1
        let (x0, x1) = (GenKey::from("X0"), GenKey::from("X1"));
        let a = AlgGen::new(strands!{ 0 => 1 });
        let b = AlgGen::new(strands!{ 1 => 0 });
        m.add_edge(&x0, &x1, EdgeKey::new(b.clone(), TensorGen::from(a.clone())), ring.var("X1")).unwrap();

        // δ(Y1, {1:0}) = {0:1} ⊗ Y0
        let mut n = n;
        let (y0, y1) = (GenKey::from("Y0"), GenKey::from("Y1"));
        n.add_edge(&y1, &y0, EdgeKey::new(a.clone(), TensorGen::from(b.clone())), n.ring().one()).unwrap();

        let t = m.tensor(&n).unwrap();
        let (s, u) = (GenKey::pair(&x0, &y1), GenKey::pair(&x1, &y0));
        let e = t.edge(&s, &u).unwrap();

        assert_eq!(e.nterms(), 1);
        let (label, c) = e.iter().next().unwrap();
        assert_eq!(label, &EdgeKey::new(b.clone(), TensorGen::from(b)));
        assert_eq!(c.nterms(), 1);
        assert_eq!(c.degree(), Ok(Some(1)));
        t.validate();
    }

    #[test]
    fn sign_mismatch() { 
        let m = unit_module("X");
        let alg = AMinus::new(vec![Sign::Neg]);
        let ring = Z2Ring::trivial();
        let a = action(&alg, &ring, &[]);
        let n = TypeDA::new(&ring, &alg, &alg, a.clone(), a).unwrap();

        assert!(matches!(m.tensor(&n), Err(Error::SignMismatch(_))));
    }
}
