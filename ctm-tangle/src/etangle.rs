use std::collections::BTreeMap;
use derive_more::Display;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use ctm_core::{Error, Map, Result, Sign, Z2Poly, Z2Ring};
use ctm_alg::{orange_height, pt, AMinus, Height};

use ETangleType::{Over, Under, Cup, Cap};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ETangleType {
    #[display("over")]
    Over,
    #[display("under")]
    Under,
    #[display("cup")]
    Cup,
    #[display("cap")]
    Cap
}

impl ETangleType {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "over"  => Ok(Over),
            "under" => Ok(Under),
            "cup"   => Ok(Cup),
            "cap"   => Ok(Cap),
            _ => Err(Error::Parse(format!("unknown elementary tangle: {s}")))
        }
    }

    pub fn is_crossing(self) -> bool {
        matches!(self, Over | Under)
    }
}

/// An elementary tangle: a crossing, cup or cap between the orange strands
/// `p` and `p+1` of a sign sequence.
///
/// Orange strands are labeled `1..=n` in the middle of the tangle, where all `n`
/// of them are present. The left and right columns may permute (crossing) or
/// omit (cup, cap) the two strands involved.
///
/// `signs` is read along the left edge for crossings and caps, and along the
/// right edge for cups. Both crossings exchange the signs at `p, p+1` on the
/// right edge; an over crossing swaps its oranges in the right half, an under
/// crossing in the left half.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ETangleData", into = "ETangleData")]
pub struct ETangle {
    etype: ETangleType,
    signs: Vec<Sign>,
    position: usize,
}

impl ETangle {
    pub fn new(etype: ETangleType, signs: Vec<Sign>, position: usize) -> Result<Self> {
        let n = signs.len();
        if position == 0 || position >= n {
            return Err(Error::InvalidStrands(format!("position {position} out of 1..{n}")))
        }
        if !etype.is_crossing() && signs[position - 1] == signs[position] {
            return Err(Error::SignMismatch(format!(
                "{etype} needs opposite signs at {position} and {}", position + 1
            )))
        }
        Ok(Self { etype, signs, position })
    }

    pub fn etype(&self) -> ETangleType {
        self.etype
    }

    pub fn signs(&self) -> &[Sign] {
        &self.signs
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The number of orange strands in the middle.
    pub fn n(&self) -> usize {
        self.signs.len()
    }

    /// The sign of orange strand `k`.
    pub fn sign(&self, k: usize) -> Sign {
        match self.etype {
            Under => self.signs[self.swap(k) - 1],
            _ => self.signs[k - 1],
        }
    }

    pub fn oranges(&self) -> impl Iterator<Item = usize> {
        1..=self.n()
    }

    fn swap(&self, k: usize) -> usize {
        let p = self.position;
        if k == p {
            p + 1
        } else if k == p + 1 {
            p
        } else {
            k
        }
    }

    /// The label of the orange strand at position `j` of a column where the
    /// strands `p, p+1` are omitted.
    fn skip(&self, j: usize) -> usize {
        if j < self.position { j } else { j + 2 }
    }

    /// The orange strand at position `j` of the left column.
    pub fn left_orange(&self, j: usize) -> usize {
        match self.etype {
            Over | Cap => j,
            Under => self.swap(j),
            Cup => self.skip(j),
        }
    }

    /// The orange strand at position `j` of the right column.
    pub fn right_orange(&self, j: usize) -> usize {
        match self.etype {
            Under | Cup => j,
            Over => self.swap(j),
            Cap => self.skip(j),
        }
    }

    fn signs_along<F>(&self, len: usize, f: F) -> Vec<Sign>
    where F: Fn(usize) -> usize {
        (1..=len).map(|j| self.sign(f(j))).collect()
    }

    pub fn left_signs(&self) -> Vec<Sign> {
        let len = if self.etype == Cup { self.n() - 2 } else { self.n() };
        self.signs_along(len, |j| self.left_orange(j))
    }

    pub fn right_signs(&self) -> Vec<Sign> {
        let len = if self.etype == Cap { self.n() - 2 } else { self.n() };
        self.signs_along(len, |j| self.right_orange(j))
    }

    pub fn left_points(&self) -> Vec<usize> {
        (0..=self.left_signs().len()).collect()
    }

    pub fn middle_points(&self) -> Vec<usize> {
        let p = self.position;
        (0..=self.n()).filter(|&b| self.etype.is_crossing() || b != p).collect()
    }

    pub fn right_points(&self) -> Vec<usize> {
        (0..=self.right_signs().len()).collect()
    }

    fn is_turning(&self, k: usize) -> bool {
        let p = self.position;
        k == p || k == p + 1
    }

    /// Height of orange `k` in a column where `p, p+1` are omitted.
    fn skipped_y(&self, k: usize) -> Option<Height> {
        let p = self.position;
        if k < p {
            Some(orange_height(k))
        } else if self.is_turning(k) {
            None
        } else {
            Some(orange_height(k - 2))
        }
    }

    pub fn left_y(&self, k: usize) -> Option<Height> {
        match self.etype {
            Over | Cap => Some(orange_height(k)),
            Under => Some(orange_height(self.swap(k))),
            Cup => self.skipped_y(k),
        }
    }

    pub fn middle_y(&self, k: usize) -> Option<Height> {
        if !self.etype.is_crossing() && self.is_turning(k) {
            Some(pt(self.position))
        } else {
            Some(orange_height(k))
        }
    }

    pub fn right_y(&self, k: usize) -> Option<Height> {
        match self.etype {
            Under | Cup => Some(orange_height(k)),
            Over => Some(orange_height(self.swap(k))),
            Cap => self.skipped_y(k),
        }
    }

    pub fn left_alg(&self) -> AMinus {
        AMinus::new(self.left_signs())
    }

    pub fn right_alg(&self) -> AMinus {
        AMinus::new(self.right_signs())
    }

    /// Index of the tangle component containing orange `k`.
    /// The two strands of a cup or cap form a single component.
    pub fn component(&self, k: usize) -> usize {
        let p = self.position;
        if self.etype.is_crossing() || k <= p {
            k
        } else {
            k - 1
        }
    }

    pub fn var_name(&self, k: usize) -> String {
        format!("U{}", self.component(k))
    }

    pub fn ring(&self) -> Z2Ring {
        let vars = self.oranges().map(|k| self.var_name(k)).unique().collect_vec();
        Z2Ring::new(vars)
    }

    pub fn var(&self, ring: &Z2Ring, k: usize) -> Z2Poly {
        ring.var(&self.var_name(k))
    }

    fn action<F>(&self, alg: &AMinus, orange: F) -> Result<Map>
    where F: Fn(usize) -> usize {
        let mapping: BTreeMap<_, _> = (1..=alg.n()).filter(|&j|
            alg.sign(j).is_positive()
        ).map(|j|
            (AMinus::var_name(j), self.var_name(orange(j)))
        ).collect();
        Map::new(alg.ring(), &self.ring(), mapping)
    }

    /// The scalar action of the left algebra: `U<j>` acts as the variable of
    /// the orange strand at left position `j`.
    pub fn left_action(&self) -> Result<Map> {
        self.action(&self.left_alg(), |j| self.left_orange(j))
    }

    pub fn right_action(&self) -> Result<Map> {
        self.action(&self.right_alg(), |j| self.right_orange(j))
    }
}

impl Display for ETangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let signs = self.signs.iter().map(|s| s.to_isize()).join(",");
        write!(f, "{}({signs})@{}", self.etype, self.position)
    }
}

impl std::fmt::Debug for ETangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[derive(Serialize, Deserialize)]
struct ETangleData {
    #[serde(rename = "type")]
    etype: ETangleType,
    signs: Vec<Sign>,
    position: usize
}

impl TryFrom<ETangleData> for ETangle {
    type Error = Error;

    fn try_from(d: ETangleData) -> Result<Self> {
        ETangle::new(d.etype, d.signs, d.position)
    }
}

impl From<ETangle> for ETangleData {
    fn from(e: ETangle) -> Self {
        Self { etype: e.etype, signs: e.signs, position: e.position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Sign::*;

    #[test]
    fn init() {
        let e = ETangle::new(Over, vec![Pos, Pos, Neg, Neg], 2).unwrap();
        assert_eq!(e.n(), 4);
        assert_eq!(e.to_string(), "over(1,1,-1,-1)@2");
    }

    #[test]
    fn invalid() {
        assert!(matches!(ETangle::new(Over, vec![Pos, Pos], 0), Err(Error::InvalidStrands(_))));
        assert!(matches!(ETangle::new(Over, vec![Pos, Pos], 2), Err(Error::InvalidStrands(_))));
        assert!(matches!(ETangle::new(Cup, vec![Pos, Pos], 1), Err(Error::SignMismatch(_))));
    }

    #[test]
    fn signs() {
        let s = vec![Pos, Neg, Neg];
        let over  = ETangle::new(Over,  s.clone(), 1).unwrap();
        let under = ETangle::new(Under, s.clone(), 1).unwrap();
        let cup   = ETangle::new(Cup,   s.clone(), 1).unwrap();
        let cap   = ETangle::new(Cap,   s.clone(), 1).unwrap();

        assert_eq!(over.left_signs(),   vec![Pos, Neg, Neg]);
        assert_eq!(over.right_signs(),  vec![Neg, Pos, Neg]);
        assert_eq!(under.left_signs(),  vec![Pos, Neg, Neg]);
        assert_eq!(under.right_signs(), vec![Neg, Pos, Neg]);
        assert_eq!(under.sign(1), Neg);
        assert_eq!(under.sign(2), Pos);
        assert_eq!(cup.left_signs(),    vec![Neg]);
        assert_eq!(cup.right_signs(),   vec![Pos, Neg, Neg]);
        assert_eq!(cap.left_signs(),    vec![Pos, Neg, Neg]);
        assert_eq!(cap.right_signs(),   vec![Neg]);
    }

    #[test]
    fn points() {
        let cap = ETangle::new(Cap, vec![Pos, Pos, Neg, Pos], 2).unwrap();
        assert_eq!(cap.left_points(), vec![0, 1, 2, 3, 4]);
        assert_eq!(cap.middle_points(), vec![0, 1, 3, 4]);
        assert_eq!(cap.right_points(), vec![0, 1, 2]);

        let cup = ETangle::new(Cup, vec![Pos, Neg], 1).unwrap();
        assert_eq!(cup.left_points(), vec![0]);
        assert_eq!(cup.middle_points(), vec![0, 2]);
        assert_eq!(cup.right_points(), vec![0, 1, 2]);
    }

    #[test]
    fn heights() {
        let over = ETangle::new(Over, vec![Pos, Pos, Neg, Neg], 2).unwrap();
        assert_eq!(over.left_y(2),   Some(orange_height(2)));
        assert_eq!(over.middle_y(2), Some(orange_height(2)));
        assert_eq!(over.right_y(2),  Some(orange_height(3)));
        assert_eq!(over.right_y(3),  Some(orange_height(2)));

        let cap = ETangle::new(Cap, vec![Pos, Pos, Neg, Pos], 2).unwrap();
        assert_eq!(cap.middle_y(2), Some(pt(2)));
        assert_eq!(cap.middle_y(3), Some(pt(2)));
        assert_eq!(cap.right_y(2), None);
        assert_eq!(cap.right_y(1), Some(orange_height(1)));
        assert_eq!(cap.right_y(4), Some(orange_height(2)));
    }

    #[test]
    fn ring() {
        let cap = ETangle::new(Cap, vec![Pos, Pos, Neg, Pos], 2).unwrap();
        assert_eq!(cap.ring(), Z2Ring::new(["U1", "U2", "U3"]));
        assert_eq!(cap.var_name(3), "U2");
        assert_eq!(cap.var_name(4), "U3");

        let under = ETangle::new(Under, vec![Pos, Neg], 1).unwrap();
        assert_eq!(under.ring(), Z2Ring::new(["U1", "U2"]));
    }

    #[test]
    fn actions() {
        let ring = Z2Ring::new(["U1", "U2", "U3"]);

        let over = ETangle::new(Over, vec![Pos, Pos, Pos], 1).unwrap();
        let r = over.right_action().unwrap();
        assert_eq!(r.apply(&over.right_alg().ring().var("U1")), ring.var("U2"));
        assert_eq!(r.apply(&over.right_alg().ring().var("U3")), ring.var("U3"));

        let cup = ETangle::new(Cup, vec![Neg, Pos, Pos], 1).unwrap();
        let l = cup.left_action().unwrap();
        let ring = cup.ring();
        assert_eq!(ring, Z2Ring::new(["U1", "U2"]));
        assert_eq!(l.apply(&cup.left_alg().ring().var("U1")), ring.var("U2"));
    }

    #[test]
    fn serde() {
        let e = ETangle::new(Cap, vec![Pos, Neg], 1).unwrap();
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, r#"{"type":"cap","signs":[1,-1],"position":1}"#);

        let f: ETangle = serde_json::from_str(&json).unwrap();
        assert_eq!(e, f);

        let res = serde_json::from_str::<ETangle>(r#"{"type":"cup","signs":[1,1],"position":1}"#);
        assert!(res.is_err());
    }
}
