use std::collections::BTreeSet;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use itertools::Itertools;

use crate::{Error, Result};
use super::{Z2Mono, Z2Poly};

/// The polynomial ring `F₂[vars]`. 
/// 
/// Two rings are the same iff they have the same set of variable names,
/// so handles can be cloned freely and rebuilt from the names.
#[derive(Clone, Eq)]
pub struct Z2Ring { 
    vars: Arc<BTreeSet<String>>
}

impl Z2Ring { 
    pub fn new<I, S>(vars: I) -> Self
    where I: IntoIterator<Item = S>, S: Into<String> { 
        let vars = vars.into_iter().map(|v| v.into()).collect();
        Self { vars: Arc::new(vars) }
    }

    pub fn trivial() -> Self { 
        Self::new(Vec::<String>::new())
    }

    pub fn vars(&self) -> impl Iterator<Item = &String> { 
        self.vars.iter()
    }

    pub fn nvars(&self) -> usize { 
        self.vars.len()
    }

    pub fn contains(&self, v: &str) -> bool { 
        self.vars.contains(v)
    }

    pub fn zero(&self) -> Z2Poly { 
        Z2Poly::zero(self)
    }

    pub fn one(&self) -> Z2Poly { 
        Z2Poly::from_mono(self, Z2Mono::one())
    }

    pub fn var(&self, v: &str) -> Z2Poly { 
        match self.try_var(v) { 
            Ok(p) => p,
            Err(e) => panic!("{e}")
        }
    }

    pub fn try_var(&self, v: &str) -> Result<Z2Poly> { 
        if self.contains(v) { 
            Ok(Z2Poly::from_mono(self, Z2Mono::var(v)))
        } else { 
            Err(Error::UnknownVariable(format!("{v} in {self}")))
        }
    }

    /// The ring obtained by removing `v`.
    pub fn without(&self, v: &str) -> Self { 
        Self::new(self.vars().filter(|w| w.as_str() != v).cloned())
    }

    pub(crate) fn ensure_same(&self, other: &Self) -> Result<()> { 
        if self == other { 
            Ok(())
        } else { 
            Err(Error::RingMismatch { left: self.to_string(), right: other.to_string() })
        }
    }
}

impl PartialEq for Z2Ring {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.vars, &other.vars) || self.vars == other.vars
    }
}

impl Hash for Z2Ring {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vars.hash(state)
    }
}

impl Display for Z2Ring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "F₂[{}]", self.vars.iter().join(", "))
    }
}

impl std::fmt::Debug for Z2Ring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests { 
    use super::*;

    #[test]
    fn identity_by_names() { 
        let r1 = Z2Ring::new(["U1", "U2"]);
        let r2 = Z2Ring::new(["U2", "U1"]);
        let r3 = Z2Ring::new(["U1"]);

        assert_eq!(r1, r2);
        assert_ne!(r1, r3);
        assert_eq!(r1.to_string(), "F₂[U1, U2]");
    }

    #[test]
    fn var() { 
        let r = Z2Ring::new(["U1"]);
        assert!(r.try_var("U1").is_ok());
        assert_eq!(r.try_var("U2"), Err(Error::UnknownVariable("U2 in F₂[U1]".to_string())));
    }

    #[test]
    #[should_panic]
    fn var_unknown() { 
        let r = Z2Ring::new(["U1"]);
        r.var("U3");
    }
}
