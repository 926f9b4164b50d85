use std::fmt::Display;
use std::str::FromStr;
use itertools::Itertools;
use log::info;
use regex::Regex;
use ctm_core::{Error, Result, Sign};
use ctm_module::TypeDA;

use crate::{type_da, ETangle, ETangleType};

/// A tangle given as a sequence of elementary tangles, read from left to right.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Tangle {
    pieces: Vec<ETangle>
}

impl Tangle {
    pub fn new(pieces: Vec<ETangle>) -> Result<Self> {
        for (e1, e2) in pieces.iter().tuple_windows() {
            Self::check_adjacent(e1, e2)?;
        }
        Ok(Self { pieces })
    }

    fn check_adjacent(e1: &ETangle, e2: &ETangle) -> Result<()> {
        if e1.right_signs() == e2.left_signs() {
            Ok(())
        } else {
            Err(Error::SignMismatch(format!("{e1} does not end where {e2} starts")))
        }
    }

    /// Reads pieces like `cup(1,-1)@1 cap(1,-1)@1`, separated by whitespace.
    pub fn parse(s: &str) -> Result<Self> {
        let r = Regex::new(r"(?i)(over|under|cup|cap)\s*\(([^)]*)\)\s*@\s*(\d+)")
            .map_err(|e| Error::Parse(e.to_string()))?;

        let mut pieces = vec![];
        let mut last = 0;

        for c in r.captures_iter(s) {
            let Some(m) = c.get(0) else { continue };
            if !s[last..m.start()].trim().is_empty() {
                return Err(Error::Parse(format!("unexpected `{}`", s[last..m.start()].trim())))
            }
            last = m.end();

            let etype = ETangleType::parse(&c[1])?;
            let signs = Sign::parse_seq(&c[2])?;
            let pos = c[3].parse::<usize>().map_err(|e| Error::Parse(e.to_string()))?;
            pieces.push(ETangle::new(etype, signs, pos)?);
        }

        if !s[last..].trim().is_empty() {
            return Err(Error::Parse(format!("unexpected `{}`", s[last..].trim())))
        }
        if pieces.is_empty() {
            return Err(Error::Parse(format!("no elementary tangle in `{s}`")))
        }

        Self::new(pieces)
    }

    pub fn pieces(&self) -> &[ETangle] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn left_signs(&self) -> Option<Vec<Sign>> {
        self.pieces.first().map(|e| e.left_signs())
    }

    pub fn right_signs(&self) -> Option<Vec<Sign>> {
        self.pieces.last().map(|e| e.right_signs())
    }

    /// `self` followed by `other`.
    pub fn compose(&self, other: &Tangle) -> Result<Tangle> {
        if let (Some(e1), Some(e2)) = (self.pieces.last(), other.pieces.first()) {
            Self::check_adjacent(e1, e2)?;
        }
        let pieces = self.pieces.iter().chain(other.pieces.iter()).cloned().collect();
        Ok(Tangle { pieces })
    }

    /// The reduced type-DA bimodule, built piece by piece: each elementary
    /// bimodule is reduced, tensored onto the accumulated one, and the
    /// product reduced again.
    pub fn reduced_type_da(&self) -> Result<TypeDA> {
        let Some((first, rest)) = self.pieces.split_first() else {
            return Err(Error::InvalidStrands("empty tangle".to_string()))
        };

        let mut m = type_da(first)?.reduce()?;
        for e in rest {
            let n = type_da(e)?.reduce()?;
            m = m.tensor(&n)?.reduce()?;
            info!("after {e}: {}", m.stat());
        }
        Ok(m)
    }
}

impl From<ETangle> for Tangle {
    fn from(e: ETangle) -> Self {
        Tangle { pieces: vec![e] }
    }
}

impl FromStr for Tangle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Tangle::parse(s)
    }
}

impl Display for Tangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pieces.iter().join(" "))
    }
}

impl std::fmt::Debug for Tangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Sign::*;
    use ETangleType::*;

    #[test]
    fn parse() {
        let t = Tangle::parse("cup(1,-1)@1 cap(1,-1)@1").unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.pieces()[0], ETangle::new(Cup, vec![Pos, Neg], 1).unwrap());
        assert_eq!(t.left_signs(), Some(vec![]));
        assert_eq!(t.right_signs(), Some(vec![]));
        assert_eq!(t.to_string(), "cup(1,-1)@1 cap(1,-1)@1");

        let t: Tangle = "OVER(1, 1) @ 1".parse().unwrap();
        assert_eq!(t.pieces()[0].etype(), Over);
    }

    #[test]
    fn parse_err() {
        assert!(matches!(Tangle::parse(""), Err(Error::Parse(_))));
        assert!(matches!(Tangle::parse("cup(1,-1)@1 foo"), Err(Error::Parse(_))));
        assert!(matches!(Tangle::parse("cup(1,2)@1"), Err(Error::Parse(_))));
        assert!(matches!(Tangle::parse("cup(1,1)@1"), Err(Error::SignMismatch(_))));
        assert!(matches!(Tangle::parse("cup(1,-1)@1 cap(1,-1,1)@1"), Err(Error::SignMismatch(_))));
    }

    #[test]
    fn compose() {
        let cup = Tangle::from(ETangle::new(Cup, vec![Pos, Neg], 1).unwrap());
        let over = Tangle::from(ETangle::new(Over, vec![Pos, Neg], 1).unwrap());
        let under = Tangle::from(ETangle::new(Under, vec![Pos, Neg], 1).unwrap());

        let t = cup.compose(&over).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.right_signs(), Some(vec![Neg, Pos]));

        let u = cup.compose(&under).unwrap();
        assert_eq!(u.right_signs(), Some(vec![Neg, Pos]));

        let back = Tangle::from(ETangle::new(Under, vec![Neg, Pos], 1).unwrap());
        assert!(t.compose(&back).is_ok());
        assert!(matches!(t.compose(&under), Err(Error::SignMismatch(_))));
        assert!(matches!(t.compose(&over), Err(Error::SignMismatch(_))));
    }

    #[test]
    fn under_starts_at_its_signs() {
        let t = Tangle::parse("cup(1,-1)@1 under(1,-1)@1").unwrap();
        assert_eq!(t.right_signs(), Some(vec![Neg, Pos]));

        let t = Tangle::parse("cup(1,-1)@1 over(1,-1)@1 under(-1,1)@1 cap(1,-1)@1").unwrap();
        assert_eq!(t.right_signs(), Some(vec![]));
    }
}
