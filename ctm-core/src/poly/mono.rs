use std::collections::BTreeMap;
use std::fmt::Display;
use std::ops::{Mul, MulAssign};
use auto_impl_ops::auto_ops;
use itertools::Itertools;

/// A monic monomial over F₂, stored as `var -> exponent` with no zero exponents.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Z2Mono(BTreeMap<String, usize>);

impl Z2Mono { 
    pub fn one() -> Self { 
        Self(BTreeMap::new())
    }

    pub fn var(v: &str) -> Self { 
        Self::from_iter([(v.to_string(), 1)])
    }

    pub fn is_one(&self) -> bool { 
        self.0.is_empty()
    }

    pub fn degree(&self) -> usize { 
        self.0.values().sum()
    }

    pub fn exponent(&self, v: &str) -> usize { 
        self.0.get(v).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &usize)> { 
        self.0.iter()
    }

    pub fn pow(&self, n: usize) -> Self { 
        Self::from_iter(self.0.iter().map(|(v, e)| (v.clone(), e * n)))
    }
}

impl FromIterator<(String, usize)> for Z2Mono {
    fn from_iter<T: IntoIterator<Item = (String, usize)>>(iter: T) -> Self {
        let mut map = BTreeMap::new();
        for (v, e) in iter { 
            if e > 0 { 
                *map.entry(v).or_insert(0) += e;
            }
        }
        Self(map)
    }
}

#[auto_ops]
impl<'a, 'b> Mul<&'b Z2Mono> for &'a Z2Mono {
    type Output = Z2Mono;
    fn mul(self, rhs: &'b Z2Mono) -> Self::Output {
        let mut res = self.0.clone();
        for (v, e) in rhs.0.iter() { 
            *res.entry(v.clone()).or_insert(0) += e;
        }
        Z2Mono(res)
    }
}

impl Display for Z2Mono {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_one() { 
            return write!(f, "1")
        }
        let s = self.0.iter().map(|(v, e)| 
            if *e == 1 { 
                v.to_string()
            } else { 
                format!("{v}^{e}")
            }
        ).join("·");
        write!(f, "{s}")
    }
}

impl std::fmt::Debug for Z2Mono {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests { 
    use super::*;

    #[test]
    fn mul() { 
        let x = Z2Mono::var("U1");
        let y = Z2Mono::from_iter([("U1".to_string(), 2), ("U3".to_string(), 1)]);
        let z = &x * &y;

        assert_eq!(z.exponent("U1"), 3);
        assert_eq!(z.exponent("U2"), 0);
        assert_eq!(z.degree(), 4);
        assert_eq!(z.to_string(), "U1^3·U3");
    }

    #[test]
    fn one() { 
        let one = Z2Mono::one();
        assert!(one.is_one());
        assert_eq!(one.to_string(), "1");
        assert_eq!(Z2Mono::from_iter([("U1".to_string(), 0)]), one);
    }
}
