use std::fmt::Display;
use std::ops::{Mul, MulAssign};
use auto_impl_ops::auto_ops;
use itertools::Itertools;
use ctm_core::Lc;

use crate::AlgGen;

/// A pure tensor `a_1 ⊗ ... ⊗ a_k` of algebra generators, possibly empty.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TensorGen(Vec<AlgGen>);

pub type TensorElem = Lc<TensorGen>;

impl TensorGen { 
    pub fn empty() -> Self { 
        Self(vec![])
    }

    pub fn len(&self) -> usize { 
        self.0.len()
    }

    pub fn is_empty(&self) -> bool { 
        self.0.is_empty()
    }

    pub fn factors(&self) -> &[AlgGen] { 
        &self.0
    }

    pub fn first(&self) -> Option<&AlgGen> { 
        self.0.first()
    }

    pub fn last(&self) -> Option<&AlgGen> { 
        self.0.last()
    }

    /// Whether consecutive factors compose, i.e. the range of each factor is the
    /// domain of the next.
    pub fn is_composable(&self) -> bool { 
        self.0.iter().tuple_windows().all(|(a, b)| a.range() == b.domain())
    }

    pub fn split_first(&self) -> Option<(&AlgGen, TensorGen)> { 
        let (a, rest) = self.0.split_first()?;
        Some((a, TensorGen(rest.to_vec())))
    }
}

impl From<AlgGen> for TensorGen {
    fn from(a: AlgGen) -> Self {
        Self(vec![a])
    }
}

impl From<Vec<AlgGen>> for TensorGen {
    fn from(v: Vec<AlgGen>) -> Self {
        Self(v)
    }
}

impl FromIterator<AlgGen> for TensorGen {
    fn from_iter<T: IntoIterator<Item = AlgGen>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[auto_ops]
impl<'a, 'b> Mul<&'b TensorGen> for &'a TensorGen {
    type Output = TensorGen;
    fn mul(self, rhs: &'b TensorGen) -> Self::Output {
        TensorGen(self.0.iter().chain(rhs.0.iter()).cloned().collect())
    }
}

/// The tensor-algebra product, extended bilinearly.
pub fn tensor_mul(x: &TensorElem, y: &TensorElem) -> TensorElem { 
    x.apply(|a| y.apply(|b| TensorElem::from_gen(y.ring(), a * b)))
}

impl Display for TensorGen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() { 
            write!(f, "()")
        } else { 
            write!(f, "({})", self.0.iter().join(" ⊗ "))
        }
    }
}

impl std::fmt::Debug for TensorGen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests { 
    use super::*;
    use ctm_core::{strands, Sign};
    use crate::AMinus;

    #[test]
    fn concat() { 
        let a = AlgGen::new(strands!{ 0 => 1 });
        let b = AlgGen::new(strands!{ 1 => 0 });
        let t = TensorGen::from(a.clone()) * TensorGen::from(b.clone());

        assert_eq!(t.factors(), &[a.clone(), b.clone()]);
        assert!(t.is_composable());
        assert_eq!(&t * &TensorGen::empty(), t);
        assert_eq!(t.to_string(), "({0:1} ⊗ {1:0})");
        assert_eq!(TensorGen::empty().to_string(), "()");

        let u = TensorGen::from(vec![a.clone(), a]);
        assert!(!u.is_composable());
    }

    #[test]
    fn associativity() { 
        let alg = AMinus::new(vec![Sign::Pos]);
        let r = alg.ring().clone();
        let a = TensorElem::from_term(TensorGen::from(AlgGen::new(strands!{ 0 => 1 })), r.var("U1"));
        let b = TensorElem::from_gen(&r, TensorGen::from(AlgGen::new(strands!{ 1 => 1 })));
        let one = TensorElem::from_gen(&r, TensorGen::empty());
        let zero = TensorElem::new(&r);

        let l = &zero + tensor_mul(&tensor_mul(&a, &one), &b);
        let rr = tensor_mul(&a, &(&zero + tensor_mul(&one, &b)));
        assert_eq!(l, rr);
        assert_eq!(tensor_mul(&a, &zero), zero);
        assert_eq!(l.nterms(), 1);
    }
}
