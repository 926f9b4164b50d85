use std::collections::BTreeSet;
use std::fmt::Display;
use std::ops::{Add, AddAssign, Mul, MulAssign};
use auto_impl_ops::auto_ops;
use itertools::Itertools;

use crate::{Error, Result};
use super::{Z2Mono, Z2Ring};

/// A polynomial over F₂: a set of monomials, summed.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Z2Poly { 
    ring: Z2Ring,
    terms: BTreeSet<Z2Mono>
}

impl Z2Poly { 
    pub fn zero(ring: &Z2Ring) -> Self { 
        Self { ring: ring.clone(), terms: BTreeSet::new() }
    }

    pub fn from_mono(ring: &Z2Ring, m: Z2Mono) -> Self { 
        debug_assert!(m.iter().all(|(v, _)| ring.contains(v)), "{m} is not in {ring}");
        Self { ring: ring.clone(), terms: BTreeSet::from([m]) }
    }

    /// Sums the given monomials, cancelling pairs.
    pub fn from_terms<I>(ring: &Z2Ring, terms: I) -> Self
    where I: IntoIterator<Item = Z2Mono> { 
        let mut res = Self::zero(ring);
        for m in terms { 
            res.toggle(m);
        }
        res
    }

    pub fn ring(&self) -> &Z2Ring { 
        &self.ring
    }

    pub fn terms(&self) -> impl Iterator<Item = &Z2Mono> { 
        self.terms.iter()
    }

    pub fn nterms(&self) -> usize { 
        self.terms.len()
    }

    pub fn is_zero(&self) -> bool { 
        self.terms.is_empty()
    }

    pub fn is_one(&self) -> bool { 
        self.terms.len() == 1 && self.terms.iter().all(|m| m.is_one())
    }

    /// The common total degree of the terms, `None` for zero.
    pub fn degree(&self) -> Result<Option<usize>> { 
        let degs = self.terms.iter().map(|m| m.degree()).unique().collect_vec();
        match degs.len() { 
            0 => Ok(None),
            1 => Ok(Some(degs[0])),
            _ => Err(Error::NonHomogeneous(self.to_string()))
        }
    }

    pub fn pow(&self, n: usize) -> Self { 
        (0..n).fold(self.ring.one(), |res, _| &res * self)
    }

    pub fn try_add(&self, rhs: &Self) -> Result<Self> { 
        self.ring.ensure_same(&rhs.ring)?;
        let mut res = self.clone();
        for m in rhs.terms.iter() { 
            res.toggle(m.clone());
        }
        Ok(res)
    }

    pub fn try_mul(&self, rhs: &Self) -> Result<Self> { 
        self.ring.ensure_same(&rhs.ring)?;
        let terms = self.terms.iter().cartesian_product(rhs.terms.iter()).map(|(x, y)| 
            x * y
        );
        Ok(Self::from_terms(&self.ring, terms))
    }

    fn toggle(&mut self, m: Z2Mono) { 
        if !self.terms.remove(&m) { 
            self.terms.insert(m);
        }
    }

    /// Reinterprets the polynomial in `ring`, which must contain all of its variables.
    pub(crate) fn with_ring(self, ring: &Z2Ring) -> Self { 
        Self { ring: ring.clone(), terms: self.terms }
    }
}

#[auto_ops]
impl<'a, 'b> Add<&'b Z2Poly> for &'a Z2Poly {
    type Output = Z2Poly;
    fn add(self, rhs: &'b Z2Poly) -> Self::Output {
        match self.try_add(rhs) { 
            Ok(res) => res,
            Err(e) => panic!("{e}")
        }
    }
}

#[auto_ops]
impl<'a, 'b> Mul<&'b Z2Poly> for &'a Z2Poly {
    type Output = Z2Poly;
    fn mul(self, rhs: &'b Z2Poly) -> Self::Output {
        match self.try_mul(rhs) { 
            Ok(res) => res,
            Err(e) => panic!("{e}")
        }
    }
}

impl Display for Z2Poly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() { 
            write!(f, "0")
        } else { 
            write!(f, "{}", self.terms.iter().join(" + "))
        }
    }
}

impl std::fmt::Debug for Z2Poly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests { 
    use super::*;

    fn ring() -> Z2Ring { 
        Z2Ring::new(["U1", "U2", "U3"])
    }

    #[test]
    fn add() { 
        let r = ring();
        let (x, y) = (r.var("U1"), r.var("U2"));

        assert_eq!(&x + &y, &y + &x);
        assert_eq!(&x + &x, r.zero());
        assert!((&x + &x).is_zero());
        assert_eq!((&x + &y).nterms(), 2);
    }

    #[test]
    fn mul() { 
        let r = ring();
        let (x, y, z) = (r.var("U1"), r.var("U2"), r.var("U3"));

        assert_eq!(&x * &r.one(), x);
        assert_eq!(&x * (&y + &z), &x * &y + &x * &z);
        assert_eq!((&x + &y) * (&x + &y), &x * &x + &y * &y);
        assert_eq!(&x * &r.zero(), r.zero());
    }

    #[test]
    fn ring_laws() { 
        let r = ring();
        let (x, y, z) = (r.var("U1"), r.var("U2"), r.var("U3"));
        let a = &x * &y + &z;
        let b = &y + r.one();
        let c = &z * &z;

        assert_eq!(&a + &b, &b + &a);
        assert_eq!((&a + &b) + &c, &a + (&b + &c));
        assert_eq!(&a * (&b + &c), &a * &b + &a * &c);
        assert_eq!(&a + &a, r.zero());
        assert_eq!(&a * r.one(), a);
    }

    #[test]
    fn pow() { 
        let r = ring();
        let x = r.var("U1");
        let y = r.var("U2");

        assert_eq!(x.pow(0), r.one());
        assert_eq!(x.pow(3), &x * &x * &x);
        assert_eq!((&x + &y).pow(2).to_string(), "U1^2 + U2^2");
    }

    #[test]
    fn degree() { 
        let r = ring();
        let x = r.var("U1");
        let y = r.var("U2");

        assert_eq!(r.zero().degree(), Ok(None));
        assert_eq!(r.one().degree(), Ok(Some(0)));
        assert_eq!((&x * &y + &y * &y).degree(), Ok(Some(2)));
        assert!(matches!((&x + r.one()).degree(), Err(Error::NonHomogeneous(_))));
    }

    #[test]
    fn ring_mismatch() { 
        let r1 = ring();
        let r2 = Z2Ring::new(["V1"]);
        let x = r1.var("U1");
        let y = r2.var("V1");

        assert!(matches!(x.try_add(&y), Err(Error::RingMismatch { .. })));
        assert!(matches!(x.try_mul(&y), Err(Error::RingMismatch { .. })));
    }

    #[test]
    #[should_panic]
    fn ring_mismatch_panics() { 
        let x = ring().var("U1");
        let y = Z2Ring::new(["V1"]).var("V1");
        let _ = x + y;
    }

    #[test]
    fn display() { 
        let r = ring();
        let p = r.var("U1") * r.var("U3") + r.one();
        assert_eq!(p.to_string(), "1 + U1·U3");
        assert_eq!(r.zero().to_string(), "0");
    }
}
