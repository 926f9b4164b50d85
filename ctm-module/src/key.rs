use std::collections::BTreeMap;
use std::sync::Arc;
use derive_more::Display;
use ctm_alg::{AlgGen, TensorGen};
use ctm_core::util::format::fmt_strands;

/// Identifies a generator of a module.
/// 
/// Generators of an elementary tangle are keyed by their strands, generators of a 
/// box tensor product by the pair of their factors.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum GenKey { 
    #[display("{_0}")]
    Label(String),
    #[display("L{}R{}", fmt_strands(left), fmt_strands(right))]
    Strands { 
        left: BTreeMap<usize, usize>, 
        right: BTreeMap<usize, usize> 
    },
    #[display("({_0}, {_1})")]
    Pair(Arc<GenKey>, Arc<GenKey>),
}

impl GenKey { 
    pub fn label<S: Into<String>>(s: S) -> Self { 
        GenKey::Label(s.into())
    }

    pub fn pair(x: &GenKey, y: &GenKey) -> Self { 
        GenKey::Pair(Arc::new(x.clone()), Arc::new(y.clone()))
    }

    pub fn as_pair(&self) -> Option<(&GenKey, &GenKey)> { 
        match self { 
            GenKey::Pair(x, y) => Some((x, y)),
            _ => None
        }
    }
}

impl From<&str> for GenKey {
    fn from(s: &str) -> Self {
        GenKey::label(s)
    }
}

impl std::fmt::Debug for GenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

/// The label of a structure map `x -> y`: the left algebra output and the right 
/// algebra inputs, as in `δ(x, b_1, ..., b_k) ∋ a ⊗ y`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{left} ⊗ {right}")]
pub struct EdgeKey { 
    pub left: AlgGen,
    pub right: TensorGen,
}

impl EdgeKey { 
    pub fn new(left: AlgGen, right: TensorGen) -> Self { 
        Self { left, right }
    }

    /// A differential edge: idempotent output, no inputs.
    pub fn is_differential(&self) -> bool { 
        self.left.is_idempotent() && self.right.is_empty()
    }

    /// The unit `δ(x, e_R(x)) = e_L(x) ⊗ x`.
    pub fn is_unit(&self) -> bool { 
        self.left.is_idempotent() && 
        self.right.len() == 1 && 
        self.right.factors()[0].is_idempotent()
    }
}

impl std::fmt::Debug for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests { 
    use super::*;
    use ctm_core::strands;

    #[test]
    fn display() { 
        let x = GenKey::Strands { left: strands!{ 1 => 0 }, right: strands!{ 2 => 2, 0 => 1 } };
        let y = GenKey::label("y");
        let xy = GenKey::pair(&x, &y);

        assert_eq!(x.to_string(), "L{1:0}R{0:1, 2:2}");
        assert_eq!(xy.to_string(), "(L{1:0}R{0:1, 2:2}, y)");
        assert_eq!(xy.as_pair(), Some((&x, &y)));
        assert_eq!(y.as_pair(), None);
    }

    #[test]
    fn edge_kinds() { 
        let e = AlgGen::idempotent([0, 1]);
        let a = AlgGen::new(strands!{ 0 => 1 });

        assert!(EdgeKey::new(e.clone(), TensorGen::empty()).is_differential());
        assert!(EdgeKey::new(e.clone(), TensorGen::from(e.clone())).is_unit());
        assert!(!EdgeKey::new(e.clone(), TensorGen::from(a.clone())).is_unit());
        assert!(!EdgeKey::new(a, TensorGen::empty()).is_differential());
    }

    #[test]
    fn edge_display() { 
        let a = AlgGen::new(strands!{ 0 => 1 });
        let b = AlgGen::new(strands!{ 1 => 0 });

        assert_eq!(EdgeKey::new(a.clone(), TensorGen::empty()).to_string(), "{0:1} ⊗ ()");
        assert_eq!(EdgeKey::new(a, TensorGen::from(b)).to_string(), "{0:1} ⊗ ({1:0})");
    }
}
