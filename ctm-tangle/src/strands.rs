use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use itertools::Itertools;
use ctm_core::{Error, Result, Sign};
use ctm_core::combi::{injections, partial_bijections};
use ctm_core::util::format::fmt_strands;
use ctm_alg::{crosses, pt, AlgGen, Height};
use ctm_module::{GenKey, Grading};

use crate::ETangle;

/// A generator of the bimodule of an elementary tangle.
///
/// Left (dashed) strands go from left points to middle points, right (solid)
/// strands from middle points to right points. Every middle point is the end
/// of exactly one strand.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ETangleStrands {
    left: BTreeMap<usize, usize>,
    right: BTreeMap<usize, usize>,
}

impl ETangleStrands {
    pub fn new(left: BTreeMap<usize, usize>, right: BTreeMap<usize, usize>) -> Self {
        Self { left, right }
    }

    /// Validates the strands against the points of `e`.
    pub fn checked(e: &ETangle, left: BTreeMap<usize, usize>, right: BTreeMap<usize, usize>) -> Result<Self> {
        let x = Self::new(left, right);
        x.check(e)?;
        Ok(x)
    }

    fn check(&self, e: &ETangle) -> Result<()> {
        let err = |msg: &str| Err(Error::InvalidStrands(format!("{msg}: {self}")));

        let (lp, mp, rp) = (e.left_points(), e.middle_points(), e.right_points());
        if !self.left.iter().all(|(a, b)| lp.contains(a) && mp.contains(b)) {
            return err("left strands out of range")
        }
        if !self.right.iter().all(|(b, a)| mp.contains(b) && rp.contains(a)) {
            return err("right strands out of range")
        }
        if !self.left.values().all_unique() || !self.right.values().all_unique() {
            return err("not injective")
        }
        let ends = self.left.values().chain(self.right.keys()).collect_vec();
        if ends.len() != mp.len() || !ends.iter().all_unique() {
            return err("middle points are not covered once")
        }
        Ok(())
    }

    pub fn left(&self) -> &BTreeMap<usize, usize> {
        &self.left
    }

    pub fn right(&self) -> &BTreeMap<usize, usize> {
        &self.right
    }

    /// The left point the dashed strand ending at `b` comes from.
    pub fn left_source(&self, b: usize) -> Option<usize> {
        self.left.iter().find(|(_, &c)| c == b).map(|(&a, _)| a)
    }

    pub fn right_values(&self) -> Vec<usize> {
        self.right.values().copied().sorted().collect()
    }

    pub fn unoccupied(&self, e: &ETangle) -> Vec<usize> {
        e.left_points().into_iter().filter(|a| !self.left.contains_key(a)).collect()
    }

    pub fn left_idempotent(&self, e: &ETangle) -> AlgGen {
        AlgGen::idempotent(self.unoccupied(e))
    }

    pub fn right_idempotent(&self) -> AlgGen {
        AlgGen::idempotent(self.right.values().copied())
    }

    pub(crate) fn with_left(&self, left: BTreeMap<usize, usize>) -> Self {
        Self::new(left, self.right.clone())
    }

    pub(crate) fn with_right(&self, right: BTreeMap<usize, usize>) -> Self {
        Self::new(self.left.clone(), right)
    }

    pub fn to_key(&self) -> GenKey {
        GenKey::Strands { left: self.left.clone(), right: self.right.clone() }
    }

    /// Dashed strands as segments from the left column to the middle column.
    pub(crate) fn left_segments(&self) -> impl Iterator<Item = (usize, (Height, Height))> + '_ {
        self.left.iter().map(|(&a, &b)| (b, (pt(a), pt(b))))
    }

    /// Solid strands as segments from the middle column to the right column.
    pub(crate) fn right_segments(&self) -> impl Iterator<Item = (usize, (Height, Height))> + '_ {
        self.right.iter().map(|(&b, &a)| (b, (pt(b), pt(a))))
    }

    /// `(maslov, two_alexander)` of the generator, counted from the crossings
    /// of its strands: `maslov = inv(solid) - inv(dashed) - #(positive oranges
    /// crossed by solid) + #(negative oranges crossed by dashed)` and
    /// `two_alexander = -Σ(signs crossed by solid) - Σ(signs crossed by dashed)`.
    pub fn grading(&self, e: &ETangle) -> Grading {
        let inv = |segs: Vec<(Height, Height)>| segs.iter().tuple_combinations().filter(|(s, t)|
            crosses(**s, **t)
        ).count() as isize;

        let dashed = self.left_segments().map(|(_, s)| s).collect_vec();
        let solid = self.right_segments().map(|(_, s)| s).collect_vec();

        let crossed = |segs: &[(Height, Height)], orange: &dyn Fn(usize) -> Option<(Height, Height)>| {
            e.oranges().flat_map(|k|
                orange(k).map(|o| (k, o))
            ).flat_map(|(k, o)|
                segs.iter().filter(move |s| crosses(**s, o)).map(move |_| e.sign(k))
            ).collect_vec()
        };

        let by_dashed = crossed(&dashed, &|k| Some((e.left_y(k)?, e.middle_y(k)?)));
        let by_solid = crossed(&solid, &|k| Some((e.middle_y(k)?, e.right_y(k)?)));

        let pos = |signs: &[Sign]| signs.iter().filter(|s| s.is_positive()).count() as isize;
        let neg = |signs: &[Sign]| signs.iter().filter(|s| s.is_negative()).count() as isize;
        let sum = |signs: &[Sign]| signs.iter().map(|s| s.to_isize()).sum::<isize>();

        let maslov = inv(solid) - inv(dashed) - pos(&by_solid) + neg(&by_dashed);
        let two_alexander = -sum(&by_solid) - sum(&by_dashed);
        (maslov, two_alexander)
    }
}

impl Display for ETangleStrands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}R{}", fmt_strands(&self.left), fmt_strands(&self.right))
    }
}

impl std::fmt::Debug for ETangleStrands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// All generators of the bimodule of `e`: a partial bijection from the left
/// points into the middle points, and an injection of the remaining middle
/// points into the right points.
pub fn enumerate_gens(e: &ETangle) -> Vec<ETangleStrands> {
    let (lp, mp, rp) = (e.left_points(), e.middle_points(), e.right_points());
    partial_bijections(&lp, &mp).into_iter().flat_map(|left| {
        let used = left.values().copied().collect::<BTreeSet<_>>();
        let rest = mp.iter().copied().filter(|b| !used.contains(b)).collect_vec();
        injections(&rest, &rp).into_iter().map(move |right|
            ETangleStrands::new(left.clone(), right)
        )
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctm_core::Sign::*;
    use ctm_core::strands;
    use crate::ETangleType::*;

    #[test]
    fn check() {
        let e = ETangle::new(Over, vec![Pos, Pos], 1).unwrap();
        assert!(ETangleStrands::checked(&e, strands!{ 0 => 1 }, strands!{ 0 => 0, 2 => 2 }).is_ok());
        assert!(ETangleStrands::checked(&e, strands!{ 0 => 1 }, strands!{ 0 => 0 }).is_err());
        assert!(ETangleStrands::checked(&e, strands!{ 0 => 1 }, strands!{ 1 => 0, 0 => 2, 2 => 1 }).is_err());
        assert!(ETangleStrands::checked(&e, strands!{ 0 => 1, 1 => 1 }, strands!{ 0 => 0, 2 => 2 }).is_err());
    }

    #[test]
    fn idempotents() {
        let e = ETangle::new(Over, vec![Pos, Pos, Neg, Neg], 2).unwrap();
        let x = ETangleStrands::new(strands!{ 1 => 2, 2 => 1, 3 => 4 }, strands!{ 0 => 1, 3 => 2 });

        assert_eq!(x.unoccupied(&e), vec![0, 4]);
        assert_eq!(x.left_idempotent(&e), AlgGen::idempotent([0, 4]));
        assert_eq!(x.right_idempotent(), AlgGen::idempotent([1, 2]));
        assert_eq!(x.left_source(1), Some(2));
        assert_eq!(x.left_source(0), None);
        assert_eq!(x.to_string(), "L{1:2, 2:1, 3:4}R{0:1, 3:2}");
    }

    #[test]
    fn count() {
        let cup = ETangle::new(Cup, vec![Pos, Neg], 1).unwrap();
        let cap = ETangle::new(Cap, vec![Pos, Neg], 1).unwrap();
        let over = ETangle::new(Over, vec![Pos, Pos], 1).unwrap();

        assert_eq!(enumerate_gens(&cup).len(), 12);
        assert_eq!(enumerate_gens(&cap).len(), 12);

        let gens = enumerate_gens(&over);
        assert!(gens.iter().all_unique());
        assert!(gens.iter().all(|x| x.check(&over).is_ok()));
    }

    #[test]
    fn grading() {
        let e = ETangle::new(Over, vec![Pos, Pos], 1).unwrap();

        // the oranges cross each other in the right half, both passing the strand at 1
        let x = ETangleStrands::new(strands!{}, strands!{ 0 => 0, 1 => 1, 2 => 2 });
        assert_eq!(x.grading(&e), (-2, -2));

        let y = ETangleStrands::new(strands!{}, strands!{ 0 => 2, 1 => 0, 2 => 1 });
        assert_eq!(y.grading(&e), (2 - 4, -4));
    }

    #[test]
    fn grading_dashed() {
        let e = ETangle::new(Over, vec![Neg, Pos], 1).unwrap();

        // the dashed strand 0 -> 1 passes the negative orange 1
        let x = ETangleStrands::new(strands!{ 0 => 1 }, strands!{ 0 => 0, 2 => 2 });
        assert_eq!(x.grading(&e), (1, 1));

        let y = ETangleStrands::new(strands!{ 0 => 1, 1 => 0 }, strands!{ 2 => 2 });
        assert_eq!(y.grading(&e), (1, 2));

        let z = ETangleStrands::new(strands!{ 2 => 0 }, strands!{ 1 => 1, 2 => 2 });
        assert_eq!(z.grading(&e), (0, 0));
    }
}
