use std::collections::BTreeMap;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use log::debug;
use ctm_alg::{AMinus, AlgGen, TensorGen};
use ctm_core::{Error, KeyedUnionFind, Lc, Map, Result, Z2Poly, Z2Ring};

use crate::{DAGen, EdgeKey, GenKey, Grading};

/// Outputs of a structure map: a linear combination of `a ⊗ y`.
pub type DAElem = Lc<(AlgGen, GenKey)>;

/// A type-DA bimodule over `(left_alg, right_alg)` with coefficients in `ring`,
/// stored as a graph.
/// 
/// An edge `x -> y` carries a linear combination of labels `EdgeKey { left: a, right: (b_1, ..., b_k) }`,
/// the term `c·(a, b)` meaning `δ¹_{k+1}(x, b_1, ..., b_k) ∋ c·a ⊗ y`. Labels whose 
/// coefficients cancel are removed, and so are edges without labels.
/// 
/// The ground rings of the algebras act on `ring` through `left_action` and `right_action`.
#[derive(Clone)]
pub struct TypeDA { 
    ring: Z2Ring,
    left_alg: AMinus,
    right_alg: AMinus,
    left_action: Map,
    right_action: Map,
    pub(crate) gens: AHashMap<GenKey, DAGen>,
}

impl TypeDA { 
    pub fn new(ring: &Z2Ring, left_alg: &AMinus, right_alg: &AMinus, left_action: Map, right_action: Map) -> Result<Self> { 
        for (alg, action) in [(left_alg, &left_action), (right_alg, &right_action)] { 
            if action.source() != alg.ring() { 
                return Err(Error::RingMismatch { left: action.source().to_string(), right: alg.ring().to_string() })
            }
            if action.target() != ring { 
                return Err(Error::RingMismatch { left: action.target().to_string(), right: ring.to_string() })
            }
        }

        Ok(Self { 
            ring: ring.clone(), 
            left_alg: left_alg.clone(), 
            right_alg: right_alg.clone(), 
            left_action, 
            right_action, 
            gens: AHashMap::new() 
        })
    }

    /// An empty module with the same rings and actions.
    pub(crate) fn empty_like(&self) -> Self { 
        Self { 
            ring: self.ring.clone(),
            left_alg: self.left_alg.clone(),
            right_alg: self.right_alg.clone(),
            left_action: self.left_action.clone(),
            right_action: self.right_action.clone(),
            gens: AHashMap::new()
        }
    }

    pub fn ring(&self) -> &Z2Ring { 
        &self.ring
    }

    pub fn left_alg(&self) -> &AMinus { 
        &self.left_alg
    }

    pub fn right_alg(&self) -> &AMinus { 
        &self.right_alg
    }

    pub fn left_action(&self) -> &Map { 
        &self.left_action
    }

    pub fn right_action(&self) -> &Map { 
        &self.right_action
    }

    pub fn ngens(&self) -> usize { 
        self.gens.len()
    }

    /// The number of labels over all edges.
    pub fn nedges(&self) -> usize { 
        self.gens.values().map(|v| 
            v.out_edges.values().map(|e| e.nterms()).sum::<usize>()
        ).sum()
    }

    pub fn contains(&self, k: &GenKey) -> bool { 
        self.gens.contains_key(k)
    }

    pub fn gen(&self, k: &GenKey) -> Option<&DAGen> { 
        self.gens.get(k)
    }

    pub fn gens(&self) -> impl Iterator<Item = &DAGen> { 
        self.gens.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &GenKey> { 
        self.gens.keys()
    }

    pub fn keys_into(&self, k: &GenKey) -> impl Iterator<Item = &GenKey> { 
        self.gens[k].in_edges()
    }

    pub fn keys_out_from(&self, k: &GenKey) -> impl Iterator<Item = &GenKey> { 
        self.gens[k].out_edges()
    }

    pub fn edge(&self, x: &GenKey, y: &GenKey) -> Option<&Lc<EdgeKey>> { 
        self.gens.get(x)?.out_edges.get(y)
    }

    pub fn has_edge(&self, x: &GenKey, y: &GenKey) -> bool { 
        debug_assert_eq!(
            self.gens[x].out_edges.contains_key(y),
            self.gens[y].in_edges.contains(x)
        );
        self.gens[x].out_edges.contains_key(y)
    }

    /// The labels of the edges out of `x`, as `(y, label, coeff)`.
    pub fn edges_from<'a>(&'a self, x: &'a GenKey) -> impl Iterator<Item = (&'a GenKey, &'a EdgeKey, &'a Z2Poly)> { 
        self.gens[x].out_edges.iter().flat_map(|(y, e)| 
            e.iter().map(move |(l, c)| (y, l, c))
        )
    }

    /// The labels of the edges into `y`, as `(x, label, coeff)`.
    pub fn edges_into<'a>(&'a self, y: &'a GenKey) -> impl Iterator<Item = (&'a GenKey, &'a EdgeKey, &'a Z2Poly)> { 
        self.gens[y].in_edges.iter().flat_map(move |x| 
            self.gens[x].out_edges[y].iter().map(move |(l, c)| (x, l, c))
        )
    }

    pub fn add_generator(&mut self, key: GenKey, left_idem: AlgGen, right_idem: AlgGen, grading: Grading) -> Result<()> { 
        if self.contains(&key) { 
            return Err(Error::DuplicateGenerator(key.to_string()))
        }
        if !left_idem.is_idempotent() || !right_idem.is_idempotent() { 
            return Err(Error::IdempotentMismatch(format!("{key}: {left_idem}, {right_idem}")))
        }
        self.left_alg.generator(left_idem.strands().clone())?;
        self.right_alg.generator(right_idem.strands().clone())?;

        let v = DAGen::new(key.clone(), left_idem, right_idem, grading);
        self.gens.insert(key, v);
        Ok(())
    }

    pub(crate) fn insert_gen(&mut self, v: DAGen) { 
        assert!(!self.contains(&v.key));
        self.gens.insert(v.key.clone(), v);
    }

    pub(crate) fn remove_generator(&mut self, k: &GenKey) -> Option<DAGen> { 
        let v = self.gens.remove(k)?;

        for j in v.in_edges.iter().filter(|&j| j != k) { 
            if let Some(u) = self.gens.get_mut(j) { 
                u.out_edges.remove(k);
            }
        }
        for l in v.out_edges.keys().filter(|&l| l != k) { 
            if let Some(w) = self.gens.get_mut(l) { 
                w.in_edges.remove(k);
            }
        }

        Some(v)
    }

    fn check_label(&self, x: &DAGen, y: &DAGen, label: &EdgeKey) -> Result<()> { 
        let err = || Error::IdempotentMismatch(format!("{} -> {}: {label}", x.key, y.key));

        if label.left.domain() != x.left_idem.domain() || label.left.range() != y.left_idem.domain() { 
            return Err(err())
        }

        let right = label.right.factors();
        let ok = match (right.first(), right.last()) { 
            (Some(b0), Some(b1)) => 
                b0.domain() == x.right_idem.domain() && 
                b1.range() == y.right_idem.domain() && 
                label.right.is_composable(),
            _ => x.right_idem == y.right_idem
        };

        if ok { Ok(()) } else { Err(err()) }
    }

    /// Adds `c·label` to the edge `x -> y`. A label whose coefficient becomes zero is 
    /// removed, and so is an edge left without labels.
    pub fn add_edge(&mut self, x: &GenKey, y: &GenKey, label: EdgeKey, c: Z2Poly) -> Result<()> { 
        let Some(vx) = self.gens.get(x) else { 
            return Err(Error::UnknownGenerator(x.to_string()))
        };
        let Some(vy) = self.gens.get(y) else { 
            return Err(Error::UnknownGenerator(y.to_string()))
        };

        self.check_label(vx, vy, &label)?;

        if c.is_zero() { 
            return Ok(())
        }

        let ring = self.ring.clone();
        let Some(v) = self.gens.get_mut(x) else { 
            return Err(Error::UnknownGenerator(x.to_string()))
        };
        let e = v.out_edges.entry(y.clone()).or_insert_with(|| Lc::new(&ring));
        e.try_add_term(label, c)?;
        let emptied = e.is_zero();
        if emptied { 
            v.out_edges.remove(y);
        }

        if let Some(w) = self.gens.get_mut(y) { 
            if emptied { 
                w.in_edges.remove(x);
            } else { 
                w.in_edges.insert(x.clone());
            }
        }

        Ok(())
    }

    /// Adds `δ(x, right) = output`.
    pub fn add_structure_map(&mut self, x: &GenKey, right: &TensorGen, output: &DAElem) -> Result<()> { 
        for ((a, y), c) in output.iter() { 
            let label = EdgeKey::new(a.clone(), right.clone());
            self.add_edge(x, y, label, c.clone())?;
        }
        Ok(())
    }

    /// The quotient by `v1 = v2`; `v2` is removed from the ring.
    pub fn identify_variables(&self, v1: &str, v2: &str) -> Result<Self> { 
        for v in [v1, v2] { 
            if !self.ring.contains(v) { 
                return Err(Error::UnknownVariable(format!("{v} in {}", self.ring)))
            }
        }
        if v1 == v2 { 
            return Ok(self.clone())
        }

        let ring = self.ring.without(v2);
        let mapping = self.ring.vars().map(|v| { 
            let w = if v == v2 { v1 } else { v.as_str() };
            (v.clone(), w.to_string())
        }).collect::<BTreeMap<_, _>>();
        let q = Map::new(&self.ring, &ring, mapping)?;

        let left_action = q.compose(&self.left_action)?;
        let right_action = q.compose(&self.right_action)?;

        let gens = self.gens.iter().map(|(k, v)| { 
            let mut w = v.clone();
            w.out_edges = v.out_edges.iter().map(|(l, e)| 
                (l.clone(), e.map_coeffs(&ring, |c| q.apply(c)))
            ).filter(|(_, e)| 
                !e.is_zero()
            ).collect();
            (k.clone(), w)
        }).collect::<AHashMap<_, _>>();

        let mut res = Self { ring, left_alg: self.left_alg.clone(), right_alg: self.right_alg.clone(), left_action, right_action, gens };
        res.rebuild_in_edges();
        Ok(res)
    }

    fn rebuild_in_edges(&mut self) { 
        let pairs = self.gens.iter().flat_map(|(k, v)| 
            v.out_edges.keys().map(move |l| (k.clone(), l.clone()))
        ).collect_vec();

        for v in self.gens.values_mut() { 
            v.in_edges.clear();
        }
        for (k, l) in pairs { 
            if let Some(w) = self.gens.get_mut(&l) { 
                w.in_edges.insert(k);
            }
        }
    }

    /// Shifts the grading of every generator by `(maslov, two_alexander)`.
    pub fn shifted(&self, maslov: isize, two_alexander: isize) -> Self { 
        let mut res = self.clone();
        for v in res.gens.values_mut() { 
            v.grading = (v.grading.0 + maslov, v.grading.1 + two_alexander);
        }
        res
    }

    fn ensure_compatible(&self, other: &Self) -> Result<()> { 
        if self.left_alg != other.left_alg || self.right_alg != other.right_alg { 
            return Err(Error::SignMismatch(format!(
                "({}, {}) vs ({}, {})", self.left_alg, self.right_alg, other.left_alg, other.right_alg
            )))
        }
        if self.ring != other.ring { 
            return Err(Error::RingMismatch { left: self.ring.to_string(), right: other.ring.to_string() })
        }
        if self.left_action != other.left_action || self.right_action != other.right_action { 
            return Err(Error::RingMismatch { 
                left: format!("{} / {}", self.left_action, self.right_action),
                right: format!("{} / {}", other.left_action, other.right_action),
            })
        }
        Ok(())
    }

    pub fn direct_sum(&self, other: &Self) -> Result<Self> { 
        self.ensure_compatible(other)?;

        let mut res = self.clone();
        for (k, v) in other.gens.iter() { 
            if res.contains(k) { 
                return Err(Error::DuplicateGenerator(k.to_string()))
            }
            res.gens.insert(k.clone(), v.clone());
        }
        Ok(res)
    }

    pub(crate) fn direct_sum_all<I>(&self, modules: I) -> Result<Self>
    where I: IntoIterator<Item = Self> { 
        let mut res = self.empty_like();
        for m in modules { 
            res.ensure_compatible(&m)?;
            for (k, v) in m.gens { 
                if res.contains(&k) { 
                    return Err(Error::DuplicateGenerator(k.to_string()))
                }
                res.gens.insert(k, v);
            }
        }
        Ok(res)
    }

    /// The weakly connected components, ordered by their smallest key.
    pub fn components(&self) -> Vec<Self> { 
        let mut u = KeyedUnionFind::new();
        for k in self.keys().sorted() { 
            u.insert(k.clone());
        }
        for (k, v) in self.gens.iter() { 
            for l in v.out_edges.keys() { 
                u.union(k, l);
            }
        }

        let comps = u.into_groups();
        debug!("{} components", comps.len());

        comps.into_iter().map(|keys| { 
            let mut c = self.empty_like();
            for k in keys { 
                let v = self.gens[&k].clone();
                c.gens.insert(k, v);
            }
            c
        }).collect()
    }

    /// Whether `self` and `other` agree up to relabeling of generator keys, 
    /// with matching idempotents, gradings and edge labels.
    pub fn is_isomorphic_to(&self, other: &Self) -> bool { 
        if self.ensure_compatible(other).is_err() || self.ngens() != other.ngens() || self.nedges() != other.nedges() { 
            return false
        }

        let mut rest = other.components();
        for c in self.components() { 
            let Some(i) = rest.iter().position(|d| c.is_isomorphic_component(d)) else { 
                return false
            };
            rest.swap_remove(i);
        }
        true
    }

    fn signature(&self, k: &GenKey) -> (Grading, &AlgGen, &AlgGen, usize, usize) { 
        let v = &self.gens[k];
        (v.grading, &v.left_idem, &v.right_idem, v.in_degree(), v.out_degree())
    }

    fn neighbors(&self, k: &GenKey) -> impl Iterator<Item = &GenKey> { 
        self.keys_out_from(k).chain(self.keys_into(k)).sorted().dedup()
    }

    fn is_isomorphic_component(&self, other: &Self) -> bool { 
        if self.ngens() != other.ngens() || self.nedges() != other.nedges() { 
            return false
        }
        let Some(start) = self.keys().min() else { 
            return true
        };

        // breadth-first order, each key after the first paired with an earlier neighbor
        let mut order = vec![(start.clone(), None)];
        let mut seen = AHashSet::from_iter([start.clone()]);
        let mut i = 0;
        while i < order.len() { 
            let k = order[i].0.clone();
            for l in self.neighbors(&k) { 
                if seen.insert(l.clone()) { 
                    order.push((l.clone(), Some(k.clone())));
                }
            }
            i += 1;
        }

        let mut assigned = AHashMap::new();
        let mut used = AHashSet::new();
        self.extend_isomorphism(other, &order, &mut assigned, &mut used)
    }

    fn extend_isomorphism(&self, other: &Self, order: &[(GenKey, Option<GenKey>)], assigned: &mut AHashMap<GenKey, GenKey>, used: &mut AHashSet<GenKey>) -> bool { 
        let Some(((k, parent), rest)) = order.split_first() else { 
            return true
        };

        let candidates = match parent { 
            Some(p) => other.neighbors(&assigned[p]).cloned().collect_vec(),
            None => other.keys().sorted().cloned().collect_vec(),
        };
        let sig = self.signature(k);

        for c in candidates { 
            if used.contains(&c) || other.signature(&c) != sig { 
                continue
            }
            let consistent = assigned.iter().chain([(k, &c)]).all(|(x, y)| 
                self.edge(k, x) == other.edge(&c, y) && 
                self.edge(x, k) == other.edge(y, &c)
            );
            if !consistent { 
                continue
            }

            assigned.insert(k.clone(), c.clone());
            used.insert(c.clone());
            if self.extend_isomorphism(other, rest, assigned, used) { 
                return true
            }
            assigned.remove(k);
            used.remove(&c);
        }
        false
    }

    /// A module `C` with `self ≅ C ⊕ C[1, 2]`, matching components up to the 
    /// grading shift. `None` if the components do not pair up.
    pub fn halve(&self) -> Option<Self> { 
        let min_grading = |c: &Self| c.gens().map(|v| v.grading).min();
        let comps = self.components().into_iter().sorted_by_cached_key(min_grading).collect_vec();

        let mut matched = vec![false; comps.len()];
        let mut res = vec![];

        for i in 0..comps.len() { 
            if matched[i] { 
                continue
            }
            let shifted = comps[i].shifted(1, 2);
            let j = (i + 1 .. comps.len()).find(|&j| 
                !matched[j] && comps[j].is_isomorphic_component(&shifted)
            )?;
            matched[i] = true;
            matched[j] = true;
            res.push(comps[i].clone());
        }

        debug!("halve: {} of {} components", res.len(), comps.len());
        self.direct_sum_all(res).ok()
    }

    pub fn validate(&self) { 
        for (k, v) in self.gens.iter() { 
            for j in v.in_edges() { 
                assert!(self.contains(j), "no generator for in-edge {j} -> {k}");
                assert!(self.gens[j].out_edges.contains_key(k), "no out-edge {j} -> {k}");
            }

            for l in v.out_edges() { 
                assert!(self.contains(l), "no generator for out-edge {k} -> {l}");

                let w = &self.gens[l];
                assert!(w.in_edges.contains(k), "no in-edge {k} -> {l}");

                let e = &v.out_edges[l];
                assert!(!e.is_zero(), "empty edge {k} -> {l}");

                for (label, c) in e.iter() { 
                    assert!(!c.is_zero(), "zero coefficient on {k} -> {l}: {label}");
                    assert_eq!(c.ring(), &self.ring);
                    assert!(self.check_label(v, w, label).is_ok(), "invalid label {k} -> {l}: {label}");
                }
            }
        }
    }

    pub fn desc_d(&self) -> String { 
        let mut str = format!("{} ⊠ {} over {}\n", self.left_alg, self.right_alg, self.ring);
        for (i, k) in self.keys().sorted().enumerate() { 
            let v = &self.gens[k];
            str += &format!(" ({i}) {v}");

            for l in self.keys_out_from(k).sorted() { 
                let e = &v.out_edges[l];
                str += &format!("\n  -> {l}: {e}");
            }
            str += "\n";
        }
        str
    }

    pub fn print_d(&self) { 
        println!("{}", self.desc_d());
    }

    pub fn stat(&self) -> String { 
        format!("gens: {}, edges: {}", self.ngens(), self.nedges())
    }
}

impl std::fmt::Debug for TypeDA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeDA({}, {}; {})", self.left_alg, self.right_alg, self.stat())
    }
}
