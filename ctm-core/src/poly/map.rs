use std::collections::BTreeMap;
use std::fmt::Display;
use itertools::Itertools;

use crate::{Error, KeyedUnionFind, Result};
use super::{Z2Mono, Z2Poly, Z2Ring};

/// A ring homomorphism `source -> target` sending each variable to a variable.
#[derive(Clone, PartialEq, Eq)]
pub struct Map { 
    source: Z2Ring,
    target: Z2Ring,
    mapping: BTreeMap<String, String>
}

impl Map { 
    pub fn new(source: &Z2Ring, target: &Z2Ring, mapping: BTreeMap<String, String>) -> Result<Self> { 
        for v in source.vars() { 
            if !mapping.contains_key(v) { 
                return Err(Error::UnknownVariable(format!("{v} is not mapped")))
            }
        }
        for (s, t) in mapping.iter() { 
            if !source.contains(s) { 
                return Err(Error::UnknownVariable(format!("{s} in {source}")))
            }
            if !target.contains(t) { 
                return Err(Error::UnknownVariable(format!("{t} in {target}")))
            }
        }
        Ok(Self { source: source.clone(), target: target.clone(), mapping })
    }

    pub fn identity(ring: &Z2Ring) -> Self { 
        let mapping = ring.vars().map(|v| (v.clone(), v.clone())).collect();
        Self { source: ring.clone(), target: ring.clone(), mapping }
    }

    pub fn source(&self) -> &Z2Ring { 
        &self.source
    }

    pub fn target(&self) -> &Z2Ring { 
        &self.target
    }

    pub fn get(&self, v: &str) -> Option<&String> { 
        self.mapping.get(v)
    }

    pub fn mapping(&self) -> &BTreeMap<String, String> { 
        &self.mapping
    }

    pub fn apply(&self, p: &Z2Poly) -> Z2Poly { 
        match self.try_apply(p) { 
            Ok(q) => q,
            Err(e) => panic!("{e}")
        }
    }

    pub fn try_apply(&self, p: &Z2Poly) -> Result<Z2Poly> { 
        self.source.ensure_same(p.ring())?;
        let terms = p.terms().map(|m| self.apply_mono(m));
        Ok(Z2Poly::from_terms(&self.target, terms))
    }

    fn apply_mono(&self, m: &Z2Mono) -> Z2Mono { 
        m.iter().map(|(v, &e)| (self.mapping[v].clone(), e)).collect()
    }

    pub fn is_injective(&self) -> bool { 
        self.mapping.values().all_unique()
    }

    /// The inverse map defined on the image, if the map is injective.
    pub fn retract(&self) -> Option<Map> { 
        if !self.is_injective() { 
            return None
        }
        let image = Z2Ring::new(self.mapping.values().cloned());
        let mapping = self.mapping.iter().map(|(s, t)| (t.clone(), s.clone())).collect();
        Some(Map { source: image, target: self.source.clone(), mapping })
    }

    /// `self ∘ other`.
    pub fn compose(&self, other: &Map) -> Result<Map> { 
        self.source.ensure_same(&other.target)?;
        let mapping = other.mapping.iter().map(|(v, w)| 
            (v.clone(), self.mapping[w].clone())
        ).collect();
        Ok(Map { source: other.source.clone(), target: self.target.clone(), mapping })
    }

    /// For `self: A -> B` and `other: A -> C`, the inclusions `B -> D`, `C -> D` into 
    /// the pushout `D`, so that `in_b ∘ self == in_c ∘ other`.
    /// 
    /// The variables of `D` are named `<v>b` for the classes containing the image of a
    /// variable `v` of `A` (the smallest such `v`), `<w>a` for the remaining variables 
    /// of `B` and `<w>c` for those of `C`.
    pub fn pushout(&self, other: &Map) -> Result<(Map, Map)> { 
        self.source.ensure_same(&other.source)?;

        let b = |w: &String| (0u8, w.clone());
        let c = |w: &String| (1u8, w.clone());

        let mut u = KeyedUnionFind::new();
        for w in self.target.vars() { u.insert(b(w)); }
        for w in other.target.vars() { u.insert(c(w)); }
        for (v, w) in self.mapping.iter() { 
            u.union(&b(w), &c(&other.mapping[v]));
        }

        let mut name = BTreeMap::new();
        for class in u.groups() { 
            let common = self.source.vars().find(|v| 
                class.contains(&&b(&self.mapping[*v]))
            );
            let label = match (common, class[0]) { 
                (Some(v), _)      => format!("{v}b"),
                (None, (0, w))    => format!("{w}a"),
                (None, (_, w))    => format!("{w}c"),
            };
            for x in class { 
                name.insert(x.clone(), label.clone());
            }
        }

        let pushout = Z2Ring::new(name.values().cloned());
        let in_b = self.target.vars().map(|w| (w.clone(), name[&b(w)].clone())).collect();
        let in_c = other.target.vars().map(|w| (w.clone(), name[&c(w)].clone())).collect();

        Ok((
            Map { source: self.target.clone(), target: pushout.clone(), mapping: in_b },
            Map { source: other.target.clone(), target: pushout, mapping: in_c },
        ))
    }
}

impl Display for Map {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body = self.mapping.iter().map(|(s, t)| format!("{s} -> {t}")).join(", ");
        write!(f, "{} -> {}: {{{body}}}", self.source, self.target)
    }
}

impl std::fmt::Debug for Map {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests { 
    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> BTreeMap<String, String> { 
        pairs.iter().map(|(s, t)| (s.to_string(), t.to_string())).collect()
    }

    #[test]
    fn apply() { 
        let a = Z2Ring::new(["U1", "U2"]);
        let b = Z2Ring::new(["V"]);
        let f = Map::new(&a, &b, mapping(&[("U1", "V"), ("U2", "V")])).unwrap();

        let p = a.var("U1") * a.var("U2") + a.var("U1");
        assert_eq!(f.apply(&p), b.var("V").pow(2) + b.var("V"));
        assert_eq!(f.apply(&(a.var("U1") + a.var("U2"))), b.zero());
        assert!(!f.is_injective());
        assert!(f.retract().is_none());
    }

    #[test]
    fn new_rejects_partial() { 
        let a = Z2Ring::new(["U1", "U2"]);
        let b = Z2Ring::new(["V"]);
        assert!(Map::new(&a, &b, mapping(&[("U1", "V")])).is_err());
        assert!(Map::new(&a, &b, mapping(&[("U1", "V"), ("U2", "W")])).is_err());
    }

    #[test]
    fn retract() { 
        let a = Z2Ring::new(["U1", "U2"]);
        let b = Z2Ring::new(["V1", "V2", "V3"]);
        let f = Map::new(&a, &b, mapping(&[("U1", "V2"), ("U2", "V3")])).unwrap();
        let g = f.retract().unwrap();

        let p = a.var("U1") * a.var("U2");
        let q = f.apply(&p);
        assert_eq!(g.apply(&q.clone().with_ring(g.source())), p);
    }

    #[test]
    fn compose() { 
        let a = Z2Ring::new(["U1"]);
        let b = Z2Ring::new(["V1", "V2"]);
        let c = Z2Ring::new(["W"]);
        let f = Map::new(&a, &b, mapping(&[("U1", "V2")])).unwrap();
        let g = Map::new(&b, &c, mapping(&[("V1", "W"), ("V2", "W")])).unwrap();
        let h = g.compose(&f).unwrap();

        assert_eq!(h.source(), &a);
        assert_eq!(h.target(), &c);
        assert_eq!(h.apply(&a.var("U1")), c.var("W"));
        assert!(f.compose(&g).is_err());
    }

    #[test]
    fn pushout() { 
        let a = Z2Ring::new(["U1"]);
        let b = Z2Ring::new(["X1", "X2"]);
        let c = Z2Ring::new(["Y1", "Y2", "Y3"]);
        let f = Map::new(&a, &b, mapping(&[("U1", "X2")])).unwrap();
        let g = Map::new(&a, &c, mapping(&[("U1", "Y1")])).unwrap();

        let (in_b, in_c) = f.pushout(&g).unwrap();
        let d = in_b.target();

        assert_eq!(d, in_c.target());
        assert_eq!(d, &Z2Ring::new(["X1a", "U1b", "Y2c", "Y3c"]));
        assert_eq!(in_b.apply(&b.var("X2")), d.var("U1b"));
        assert_eq!(in_c.apply(&c.var("Y1")), d.var("U1b"));
        assert_eq!(in_b.apply(&b.var("X1")), d.var("X1a"));
        assert_eq!(in_c.apply(&c.var("Y3")), d.var("Y3c"));

        let p = a.var("U1");
        assert_eq!(in_b.apply(&f.apply(&p)), in_c.apply(&g.apply(&p)));
    }

    #[test]
    fn pushout_non_injective() { 
        let a = Z2Ring::new(["U1", "U2"]);
        let b = Z2Ring::new(["X"]);
        let c = Z2Ring::new(["Y1", "Y2"]);
        let f = Map::new(&a, &b, mapping(&[("U1", "X"), ("U2", "X")])).unwrap();
        let g = Map::new(&a, &c, mapping(&[("U1", "Y1"), ("U2", "Y2")])).unwrap();

        let (in_b, in_c) = f.pushout(&g).unwrap();
        let d = in_b.target();

        assert_eq!(d, &Z2Ring::new(["U1b"]));
        assert_eq!(in_c.apply(&c.var("Y1")), in_c.apply(&c.var("Y2")));
        for v in ["U1", "U2"] { 
            let p = a.var(v);
            assert_eq!(in_b.apply(&f.apply(&p)), in_c.apply(&g.apply(&p)));
        }
    }
}
