use std::collections::{BTreeMap, BTreeSet};
use itertools::Itertools;
use log::{debug, info, trace};
use ctm_core::{Lc, Result, Sign, Z2Poly, Z2Ring};
use ctm_alg::{pt, AlgGen, Height, Relation, StrandDiagram, TensorGen};
use ctm_module::TypeDA;

use crate::{enumerate_gens, ETangle, ETangleStrands};

pub type StrandsElem = Lc<ETangleStrands>;
pub type LeftElem = Lc<(AlgGen, ETangleStrands)>;

/// A strand of one half, from its point on the first column of the half to
/// its point on the second.
type Strand = (usize, usize);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Half {
    Left,
    Right,
}

impl Half {
    fn orange(self, e: &ETangle, k: usize) -> Option<(Height, Height)> {
        match self {
            Half::Left  => Some((e.left_y(k)?, e.middle_y(k)?)),
            Half::Right => Some((e.middle_y(k)?, e.right_y(k)?)),
        }
    }
}

fn inversions(strands: &[Strand]) -> usize {
    strands.iter().tuple_combinations().filter(|(s, t)|
        (s.0 < t.0) != (s.1 < t.1)
    ).count()
}

fn swapped_ends(strands: &[Strand], s1: Strand, s2: Strand) -> Vec<Strand> {
    strands.iter().map(|&s|
        if s == s1 { (s1.0, s2.1) } else if s == s2 { (s2.0, s1.1) } else { s }
    ).sorted().collect()
}

/// Evaluates the crossing of `s1 = (b1, a1)` and `s2 = (b2, a2)`, `b1 < b2`
/// and `a1 > a2`, resolved at the point where the two meet. All heights are
/// scaled by `4 * den` so that the meeting point and the other strands at
/// the same moment are integral. The resolved pair passes just below and
/// just above the meeting point, and each orange is lowered slightly there.
fn resolve(e: &ETangle, ring: &Z2Ring, half: Half, strands: &[Strand], s1: Strand, s2: Strand, rel: Relation) -> Option<Z2Poly> {
    let (b1, a1, b2, a2) = (pt(s1.0), pt(s1.1), pt(s2.0), pt(s2.1));
    debug_assert!(b1 < b2 && a1 > a2);

    let num = b2 - b1;
    let den = num + (a1 - a2);
    let scale = |y: Height| 4 * den * y;
    let at = |y0: Height, y1: Height| 4 * (den * y0 + num * (y1 - y0));
    let p = at(b1, a1);

    let mut sd = StrandDiagram::new();
    for &s in strands {
        let (y0, y1) = (pt(s.0), pt(s.1));
        let ys = if s == s1 {
            [scale(b1), p - 1, scale(a2)]
        } else if s == s2 {
            [scale(b2), p + 1, scale(a1)]
        } else {
            [scale(y0), at(y0, y1), scale(y1)]
        };
        sd.add_black(ys);
    }
    for k in e.oranges() {
        if let Some((y0, y1)) = half.orange(e, k) {
            sd.add_orange(k, e.sign(k), [Some(scale(y0)), Some(at(y0, y1) - 2), Some(scale(y1))]);
        }
    }

    sd.coefficient(rel, ring, |k| e.var_name(k))
}

/// Evaluates black strands through three columns of points over the oranges
/// placed by `orange`.
fn slab<I, F>(e: &ETangle, ring: &Z2Ring, blacks: I, orange: F, rel: Relation) -> Option<Z2Poly>
where I: IntoIterator<Item = [usize; 3]>, F: Fn(usize) -> [Option<Height>; 3] {
    let mut sd = StrandDiagram::new();
    for [p, q, r] in blacks {
        sd.add_black([pt(p), pt(q), pt(r)]);
    }
    for k in e.oranges() {
        sd.add_orange(k, e.sign(k), orange(k));
    }
    sd.coefficient(rel, ring, |k| e.var_name(k))
}

/// `rho` followed by the solid strands of `x`, where `rho` maps middle points
/// onto the starts of the solid strands. Returns the composed solid strands.
fn rho_solid(e: &ETangle, ring: &Z2Ring, x: &ETangleStrands, rho: &BTreeMap<usize, usize>) -> Option<(BTreeMap<usize, usize>, Z2Poly)> {
    let s = x.right();
    let blacks = rho.iter().map(|(&p, &b)| Some([p, b, *s.get(&b)?])).collect::<Option<Vec<_>>>()?;
    let c = slab(e, ring, blacks.iter().copied(), |k| [e.middle_y(k), e.middle_y(k), e.right_y(k)], Relation::Figure6)?;
    let right = blacks.into_iter().map(|[p, _, r]| (p, r)).collect();
    Some((right, c))
}

/// The dashed strands `dashed` followed by `rho` on the middle column.
fn dashed_rho(e: &ETangle, ring: &Z2Ring, dashed: &BTreeMap<usize, usize>, rho: &BTreeMap<usize, usize>) -> Option<Z2Poly> {
    let blacks = dashed.iter().map(|(&a, &m)| Some([a, m, *rho.get(&m)?])).collect::<Option<Vec<_>>>()?;
    slab(e, ring, blacks, |k| [e.left_y(k), e.middle_y(k), e.middle_y(k)], Relation::Figure7)
}

/// `rho` on the left column followed by the dashed strands `dashed`.
fn rho_dashed(e: &ETangle, ring: &Z2Ring, rho: &BTreeMap<usize, usize>, dashed: &BTreeMap<usize, usize>) -> Option<Z2Poly> {
    let blacks = rho.iter().map(|(&a, &q)| Some([a, q, *dashed.get(&q)?])).collect::<Option<Vec<_>>>()?;
    slab(e, ring, blacks, |k| [e.left_y(k), e.left_y(k), e.middle_y(k)], Relation::Figure7)
}

/// Whether the span between middle points `p` and `q` contains the point
/// where the oranges of a cup or cap turn. Chords across it vanish.
fn across_turn(e: &ETangle, p: usize, q: usize) -> bool {
    let (lo, hi) = (pt(p.min(q)), pt(p.max(q)));
    e.oranges().any(|k|
        (e.left_y(k).is_none() || e.right_y(k).is_none())
            && e.middle_y(k).is_some_and(|h| lo < h && h < hi)
    )
}

fn identity<'a, I>(points: I) -> BTreeMap<usize, usize>
where I: IntoIterator<Item = &'a usize> {
    points.into_iter().map(|&p| (p, p)).collect()
}

fn with_swapped(map: &BTreeMap<usize, usize>, p: usize, q: usize) -> BTreeMap<usize, usize> {
    let mut res = map.clone();
    res.insert(p, map[&q]);
    res.insert(q, map[&p]);
    res
}

fn with_values_swapped(map: &BTreeMap<usize, usize>, p: usize, q: usize) -> BTreeMap<usize, usize> {
    map.iter().map(|(&a, &m)|
        (a, if m == p { q } else if m == q { p } else { m })
    ).collect()
}

/// Pairs `p < q` of `points` between which the oranges placed by `y` all
/// carry one sign, with the product of their variables. Every point of
/// `points` between `p` and `q` must satisfy `inside`, as must `p` and `q`.
fn orange_pairs<Y, F>(e: &ETangle, ring: &Z2Ring, points: &[usize], y: Y, inside: F) -> Vec<(usize, usize, Sign, Z2Poly)>
where Y: Fn(usize) -> Option<Height>, F: Fn(usize) -> bool {
    points.iter().copied().tuple_combinations().filter_map(|(p, q)| {
        let ks = e.oranges().filter(|&k|
            y(k).is_some_and(|h| pt(p) < h && h < pt(q))
        ).collect_vec();
        let sign = e.sign(*ks.first()?);
        if !ks.iter().all(|&k| e.sign(k) == sign) {
            return None
        }
        if !points.iter().filter(|&&r| p <= r && r <= q).all(|&r| inside(r)) {
            return None
        }
        let c = ks.iter().fold(ring.one(), |c, &k| c * e.var(ring, k));
        Some((p, q, sign, c))
    }).collect()
}

/// Smooths each crossing between two solid strands that removes exactly one
/// crossing.
pub fn d_plus(e: &ETangle, x: &ETangleStrands) -> StrandsElem {
    let ring = e.ring();
    let solid = x.right().iter().map(|(&b, &a)| (b, a)).collect_vec();
    let inv = inversions(&solid);

    let terms = solid.iter().copied().tuple_combinations().filter(|(s1, s2)|
        s1.1 > s2.1
    ).filter_map(|(s1, s2)| {
        let new = swapped_ends(&solid, s1, s2);
        if inversions(&new) + 1 != inv {
            return None
        }
        let c = resolve(e, &ring, Half::Right, &solid, s1, s2, Relation::Figure6)?;
        Some((x.with_right(new.into_iter().collect()), c))
    });
    Lc::from_terms(&ring, terms)
}

/// Introduces a crossing between two dashed strands that adds exactly one
/// crossing.
pub fn d_minus(e: &ETangle, x: &ETangleStrands) -> StrandsElem {
    let ring = e.ring();
    let dashed = x.left().iter().map(|(&a, &m)| (a, m)).collect_vec();
    let inv = inversions(&dashed);

    let terms = dashed.iter().copied().tuple_combinations().filter(|(s1, s2)|
        s1.1 < s2.1
    ).filter_map(|(s1, s2)| {
        let new = swapped_ends(&dashed, s1, s2);
        if inversions(&new) != inv + 1 {
            return None
        }
        let (n1, n2) = ((s1.0, s2.1), (s2.0, s1.1));
        let c = resolve(e, &ring, Half::Left, &new, n1, n2, Relation::Figure7)?;
        Some((x.with_left(new.into_iter().collect()), c))
    });
    Lc::from_terms(&ring, terms)
}

/// Terms of the differential involving both halves: a chord on the middle
/// column from the end of a dashed strand to the start of a solid strand,
/// and a pair of middle points exchanged across oranges of one sign. Chords
/// never pass the turning point of a cup or cap.
pub fn d_mixed(e: &ETangle, x: &ETangleStrands) -> StrandsElem {
    let ring = e.ring();
    let mut res = StrandsElem::new(&ring);

    let (dashed, solid) = (x.left(), x.right());
    let starts = solid.keys().copied().collect::<BTreeSet<_>>();
    let ends = dashed.values().copied().collect::<BTreeSet<_>>();

    // chords d -> b
    for (&a, &d) in dashed.iter() {
        for &b in starts.iter().filter(|&&b| !across_turn(e, d, b)) {
            let mut rho = identity(starts.iter().filter(|&&s| s != b));
            rho.insert(d, b);
            let Some((right, c1)) = rho_solid(e, &ring, x, &rho) else {
                continue
            };

            let mut left = dashed.clone();
            left.insert(a, b);
            let mut rho = identity(left.values().filter(|&&m| m != b));
            rho.insert(b, d);
            let Some(c2) = dashed_rho(e, &ring, &left, &rho) else {
                continue
            };

            res.add_term(ETangleStrands::new(left, right), c1 * c2);
        }
    }

    // exchanges of two solid starts across negative oranges
    let middle = e.middle_points();
    for (p, q, sign, u) in orange_pairs(e, &ring, &middle, |k| e.middle_y(k), |r| starts.contains(&r)) {
        if sign.is_positive() {
            continue
        }
        let rho = with_swapped(&identity(starts.iter()), p, q);
        if let Some((right, c)) = rho_solid(e, &ring, x, &rho) {
            res.add_term(x.with_right(right), c * u);
        }
    }

    // exchanges of two dashed ends across positive oranges
    for (p, q, sign, u) in orange_pairs(e, &ring, &middle, |k| e.middle_y(k), |r| ends.contains(&r)) {
        if sign.is_negative() {
            continue
        }
        let left = with_values_swapped(dashed, p, q);
        let rho = with_swapped(&identity(left.values()), p, q);
        if let Some(c) = dashed_rho(e, &ring, &left, &rho) {
            res.add_term(x.with_left(left), c * u);
        }
    }

    res
}

fn idempotent_with(points: &[usize], from: usize, to: usize) -> AlgGen {
    let mut strands = identity(points);
    strands.insert(from, to);
    AlgGen::new(strands)
}

/// Outputs of the left algebra: a chord on the left column from an
/// unoccupied point to the start of a dashed strand, and a pair of left
/// points exchanged across oranges of one sign.
pub fn delta_ell(e: &ETangle, x: &ETangleStrands) -> LeftElem {
    let ring = e.ring();
    let mut res = LeftElem::new(&ring);

    let unoccupied = x.unoccupied(e);
    let dashed = x.left();

    // chords u -> a
    for &u in unoccupied.iter() {
        for (&a, &m) in dashed.iter() {
            let mut left = dashed.clone();
            left.remove(&a);
            left.insert(u, m);

            let mut rho = identity(left.keys().filter(|&&q| q != u));
            rho.insert(a, u);
            let Some(c) = rho_dashed(e, &ring, &rho, &left) else {
                continue
            };
            res.add_term((idempotent_with(&unoccupied, u, a), x.with_left(left)), c);
        }
    }

    let points = e.left_points();
    let idem = x.left_idempotent(e);

    // crossings of two unoccupied points across negative oranges
    for (p, q, sign, u) in orange_pairs(e, &ring, &points, |k| e.left_y(k), |r| unoccupied.contains(&r)) {
        if sign.is_negative() {
            let a = AlgGen::new(with_swapped(&identity(unoccupied.iter()), p, q));
            res.add_term((a, x.clone()), u);
        }
    }

    // exchanges of two dashed starts across positive oranges
    for (p, q, sign, u) in orange_pairs(e, &ring, &points, |k| e.left_y(k), |r| dashed.contains_key(&r)) {
        if sign.is_negative() {
            continue
        }
        let left = with_swapped(dashed, p, q);
        let rho = with_swapped(&identity(left.keys()), p, q);
        if let Some(c) = rho_dashed(e, &ring, &rho, &left) {
            res.add_term((idem.clone(), x.with_left(left)), c * u);
        }
    }

    trace!("delta_ell({x}) = {:?}", res.iter().collect::<Vec<_>>());
    res
}

/// The action of a right algebra generator `a` whose domain is the right
/// idempotent of `x`, zero otherwise.
pub fn m2(e: &ETangle, x: &ETangleStrands, a: &AlgGen) -> StrandsElem {
    let ring = e.ring();
    if a.domain() != x.right_idempotent().domain() {
        return StrandsElem::new(&ring)
    }

    let mut sd = StrandDiagram::new();
    for k in e.oranges() {
        let r = e.right_y(k);
        sd.add_orange(k, e.sign(k), [e.middle_y(k), r, r]);
    }

    let mut right = BTreeMap::new();
    for (&b, &r) in x.right().iter() {
        let Some(t) = a.get(r) else {
            return StrandsElem::new(&ring)
        };
        sd.add_black([pt(b), pt(r), pt(t)]);
        right.insert(b, t);
    }

    match sd.coefficient(Relation::Figure6, &ring, |k| e.var_name(k)) {
        Some(c) => Lc::from_term(x.with_right(right), c),
        None => StrandsElem::new(&ring)
    }
}

/// The type-DA bimodule of an elementary tangle.
pub fn type_da(e: &ETangle) -> Result<TypeDA> {
    let ring = e.ring();
    let (left_alg, right_alg) = (e.left_alg(), e.right_alg());
    let mut m = TypeDA::new(&ring, &left_alg, &right_alg, e.left_action()?, e.right_action()?)?;

    let gens = enumerate_gens(e);
    for x in gens.iter() {
        m.add_generator(x.to_key(), x.left_idempotent(e), x.right_idempotent(), x.grading(e))?;
    }

    for x in gens.iter() {
        let key = x.to_key();
        let idem = x.left_idempotent(e);

        let mut d = d_plus(e, x);
        d += &d_minus(e, x);
        d += &d_mixed(e, x);

        let mut out = d.map_gens(|y| (idem.clone(), y.to_key()));
        out += &delta_ell(e, x).map_gens(|(a, y)| (a.clone(), y.to_key()));
        m.add_structure_map(&key, &TensorGen::empty(), &out)?;

        for a in right_alg.left_gens(&x.right_values()) {
            let out = m2(e, x, &a).map_gens(|y| (idem.clone(), y.to_key()));
            m.add_structure_map(&key, &TensorGen::from(a), &out)?;
        }
        debug!("{x}: {} out-edges", m.keys_out_from(&key).count());
    }

    info!("type_da({e}): {}", m.stat());
    Ok(m)
}
