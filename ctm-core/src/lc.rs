use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Add, AddAssign, Mul, MulAssign};
use ahash::AHashMap;
use auto_impl_ops::auto_ops;
use itertools::Itertools;

use crate::{Error, Result, Z2Poly, Z2Ring};

/// A finite sum `Σ c_x·x` with nonzero coefficients in a `Z2Ring`.
#[derive(Clone)]
pub struct Lc<X>
where X: Clone + Eq + Hash { 
    ring: Z2Ring,
    data: AHashMap<X, Z2Poly>
}

impl<X> Lc<X>
where X: Clone + Eq + Hash { 
    pub fn new(ring: &Z2Ring) -> Self {
        let hasher = ahash::RandomState::with_seeds(0, 0, 0, 0);
        let data = AHashMap::with_hasher(hasher);
        Self { ring: ring.clone(), data }
    }

    pub fn from_gen(ring: &Z2Ring, x: X) -> Self { 
        Self::from_term(x, ring.one())
    }

    pub fn from_term(x: X, c: Z2Poly) -> Self { 
        let mut res = Self::new(c.ring());
        res.add_term(x, c);
        res
    }

    pub fn from_terms<I>(ring: &Z2Ring, iter: I) -> Self
    where I: IntoIterator<Item = (X, Z2Poly)> { 
        let mut res = Self::new(ring);
        for (x, c) in iter { 
            res.add_term(x, c);
        }
        res
    }

    pub fn ring(&self) -> &Z2Ring { 
        &self.ring
    }

    pub fn nterms(&self) -> usize {
        self.data.len()
    }

    pub fn is_zero(&self) -> bool { 
        self.data.is_empty()
    }

    pub fn gens(&self) -> impl Iterator<Item = &X> {
        self.data.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&X, &Z2Poly)> {
        self.data.iter()
    }

    pub fn coeff(&self, x: &X) -> Z2Poly { 
        self.data.get(x).cloned().unwrap_or_else(|| self.ring.zero())
    }

    /// Adds `c·x`, dropping the term when it cancels.
    pub fn add_term(&mut self, x: X, c: Z2Poly) { 
        match self.try_add_term(x, c) { 
            Ok(()) => (),
            Err(e) => panic!("{e}")
        }
    }

    pub fn try_add_term(&mut self, x: X, c: Z2Poly) -> Result<()> { 
        if &self.ring != c.ring() { 
            return Err(Error::RingMismatch { left: self.ring.to_string(), right: c.ring().to_string() })
        }
        if c.is_zero() { 
            return Ok(())
        }
        if let Some(d) = self.data.get_mut(&x) { 
            *d = &*d + &c;
            if d.is_zero() { 
                self.data.remove(&x);
            }
        } else { 
            self.data.insert(x, c);
        }
        Ok(())
    }

    pub fn map_gens<Y, F>(&self, f: F) -> Lc<Y>
    where Y: Clone + Eq + Hash, F: Fn(&X) -> Y { 
        Lc::from_terms(&self.ring, self.iter().map(|(x, c)| (f(x), c.clone())))
    }

    /// Moves the coefficients into `ring` through `f`.
    pub fn map_coeffs<F>(&self, ring: &Z2Ring, f: F) -> Lc<X>
    where F: Fn(&Z2Poly) -> Z2Poly { 
        Lc::from_terms(ring, self.iter().map(|(x, c)| (x.clone(), f(c))))
    }

    pub fn filter_gens<F>(&self, f: F) -> Self
    where F: Fn(&X) -> bool { 
        Self::from_terms(&self.ring, self.iter().filter(|(x, _)| f(x)).map(|(x, c)| (x.clone(), c.clone())))
    }

    /// Extends `f` linearly.
    pub fn apply<Y, F>(&self, f: F) -> Lc<Y>
    where Y: Clone + Eq + Hash, F: Fn(&X) -> Lc<Y> {
        let terms = self.iter().flat_map(|(x, c)| { 
            f(x).into_iter().map(move |(y, d)| (y, c * &d))
        });
        Lc::from_terms(&self.ring, terms)
    }

    pub fn fmt_with(&self, f: &mut std::fmt::Formatter<'_>, gen_fmt: impl Fn(&X) -> String) -> std::fmt::Result { 
        if self.is_zero() { 
            return write!(f, "0")
        }
        let terms = self.iter().map(|(x, c)| { 
            let x = gen_fmt(x);
            if c.is_one() { 
                x
            } else if c.nterms() == 1 { 
                format!("{c}·{x}")
            } else { 
                format!("({c})·{x}")
            }
        }).sorted().join(" + ");
        write!(f, "{terms}")
    }
}

impl<X> PartialEq for Lc<X>
where X: Clone + Eq + Hash {
    fn eq(&self, other: &Self) -> bool {
        self.ring == other.ring && self.data == other.data
    }
}

impl<X> Eq for Lc<X> where X: Clone + Eq + Hash {}

impl<X> IntoIterator for Lc<X>
where X: Clone + Eq + Hash {
    type Item = (X, Z2Poly);
    type IntoIter = std::collections::hash_map::IntoIter<X, Z2Poly>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

#[auto_ops]
impl<X> AddAssign<&Lc<X>> for Lc<X>
where X: Clone + Eq + Hash {
    fn add_assign(&mut self, rhs: &Self) {
        for (x, c) in rhs.iter() { 
            self.add_term(x.clone(), c.clone());
        }
    }
}

#[auto_ops]
impl<X> MulAssign<&Z2Poly> for Lc<X>
where X: Clone + Eq + Hash {
    fn mul_assign(&mut self, rhs: &Z2Poly) {
        let data = std::mem::take(&mut self.data);
        for (x, c) in data { 
            self.add_term(x, &c * rhs);
        }
    }
}

impl<X> Display for Lc<X>
where X: Clone + Eq + Hash + Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_with(f, |x| x.to_string())
    }
}

impl<X> Debug for Lc<X>
where X: Clone + Eq + Hash + Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests { 
    use super::*;

    fn ring() -> Z2Ring { 
        Z2Ring::new(["U1", "U2"])
    }

    #[test]
    fn add_cancels() { 
        let r = ring();
        let mut z = Lc::new(&r);

        z.add_term("x", r.var("U1"));
        z.add_term("y", r.one());
        assert_eq!(z.nterms(), 2);

        z.add_term("x", r.var("U1"));
        assert_eq!(z.nterms(), 1);
        assert_eq!(z.coeff(&"x"), r.zero());
        assert_eq!(z.coeff(&"y"), r.one());

        z.add_term("y", r.zero());
        assert_eq!(z.nterms(), 1);
    }

    #[test]
    fn add() { 
        let r = ring();
        let z = Lc::from_terms(&r, [("x", r.one()), ("y", r.var("U2"))]);
        let w = Lc::from_terms(&r, [("x", r.var("U1")), ("y", r.var("U2"))]);

        let s = &z + &w;
        assert_eq!(s, Lc::from_term("x", r.one() + r.var("U1")));
        assert!((&z + &z).is_zero());
    }

    #[test]
    fn scale() { 
        let r = ring();
        let z = Lc::from_terms(&r, [("x", r.one()), ("y", r.var("U2"))]);
        let w = &z * &r.var("U1");

        assert_eq!(w.coeff(&"y"), r.var("U1") * r.var("U2"));
        assert!((&z * &r.zero()).is_zero());
    }

    #[test]
    fn apply() { 
        let r = ring();
        let z = Lc::from_terms(&r, [(1, r.one()), (2, r.var("U1"))]);
        let w = z.apply(|&i| Lc::from_terms(&r, [(i * 10, r.var("U2")), (0, r.one())]));

        assert_eq!(w.coeff(&10), r.var("U2"));
        assert_eq!(w.coeff(&20), r.var("U1") * r.var("U2"));
        assert_eq!(w.coeff(&0), r.one() + r.var("U1"));
    }

    #[test]
    fn try_add_term() { 
        let r = ring();
        let mut z = Lc::new(&r);
        let other = Z2Ring::new(["V"]);

        assert!(z.try_add_term("x", other.one()).is_err());
        assert!(z.is_zero());
    }

    #[test]
    fn display() { 
        let r = ring();
        let z = Lc::from_terms(&r, [("x", r.one()), ("y", r.var("U2")), ("z", r.var("U1") + r.var("U2"))]);
        assert_eq!(z.to_string(), "(U1 + U2)·z + U2·y + x");
        assert_eq!(Lc::<&str>::new(&r).to_string(), "0");
    }
}
