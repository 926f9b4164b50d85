use std::collections::BTreeMap;
use derive_more::Display;
use itertools::Itertools;
use ctm_core::{Sign, Z2Poly, Z2Ring};

/// Vertical position in a strand diagram, in eighths of the unit spacing 
/// between black points. Black point `p` is at `pt(p)`, orange strand `k` 
/// at `orange_height(k)`, halfway between points `k-1` and `k`.
pub type Height = i64;

pub const fn pt(p: usize) -> Height { 
    8 * p as Height
}

pub const fn orange_height(k: usize) -> Height { 
    8 * k as Height - 4
}

/// Half of the unit spacing.
pub const HALF: Height = 4;

/// Small offset used to separate strands near a common height.
pub const NUDGE: Height = 2;

/// Whether the segments `a` and `b` spanning the same horizontal interval cross.
/// Segments sharing an endpoint do not cross.
pub fn crosses(a: (Height, Height), b: (Height, Height)) -> bool { 
    (a.0 - b.0).signum() * (a.1 - b.1).signum() < 0
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum Relation { 
    /// Black-black double crossings vanish, a black strand passing twice 
    /// across a positive orange strand gives one power of its variable,
    /// across a negative one vanishes.
    #[display("figure-6")]
    Figure6,

    /// As figure 6 with the orange signs exchanged.
    #[display("figure-7")]
    Figure7,
}

#[derive(Clone, Debug)]
pub struct Orange { 
    pub label: usize,
    pub sign: Sign,
    pub ys: [Option<Height>; 3]
}

impl Orange { 
    fn segment(&self, i: usize) -> Option<(Height, Height)> { 
        Some((self.ys[i]?, self.ys[i + 1]?))
    }
}

/// Three columns of heights, with black strands drawn as two straight segments
/// and orange strands possibly absent in some columns.
#[derive(Clone, Debug, Default)]
pub struct StrandDiagram { 
    blacks: Vec<[Height; 3]>,
    oranges: Vec<Orange>,
}

impl StrandDiagram { 
    pub fn new() -> Self { 
        Self::default()
    }

    pub fn add_black(&mut self, ys: [Height; 3]) -> &mut Self { 
        self.blacks.push(ys);
        self
    }

    pub fn add_orange(&mut self, label: usize, sign: Sign, ys: [Option<Height>; 3]) -> &mut Self { 
        self.oranges.push(Orange { label, sign, ys });
        self
    }

    /// Orange strands at constant heights, one per entry of `signs`.
    pub fn with_flat_oranges(signs: &[Sign]) -> Self { 
        let mut sd = Self::new();
        for (i, &s) in signs.iter().enumerate() { 
            let y = orange_height(i + 1);
            sd.add_orange(i + 1, s, [Some(y); 3]);
        }
        sd
    }

    pub fn blacks(&self) -> &[[Height; 3]] { 
        &self.blacks
    }

    pub fn oranges(&self) -> &[Orange] { 
        &self.oranges
    }

    fn black_segment(b: &[Height; 3], i: usize) -> (Height, Height) { 
        (b[i], b[i + 1])
    }

    /// The powers of the orange labels, or `None` if the diagram vanishes.
    pub fn evaluate(&self, rel: Relation) -> Option<BTreeMap<usize, usize>> { 
        let double = |a: &[Height; 3], b: &[Height; 3]| (0..2).all(|i| 
            crosses(Self::black_segment(a, i), Self::black_segment(b, i))
        );
        if self.blacks.iter().tuple_combinations().any(|(a, b)| double(a, b)) { 
            return None
        }

        let mut powers = BTreeMap::new();
        for b in self.blacks.iter() { 
            for o in self.oranges.iter() { 
                let twice = (0..2).all(|i| 
                    o.segment(i).is_some_and(|s| crosses(Self::black_segment(b, i), s))
                );
                if !twice { 
                    continue
                }
                let sign = match rel { 
                    Relation::Figure6 => o.sign,
                    Relation::Figure7 => -o.sign,
                };
                if sign.is_negative() { 
                    return None
                }
                *powers.entry(o.label).or_insert(0) += 1;
            }
        }
        Some(powers)
    }

    /// Evaluates the diagram and turns the powers into a monomial of `ring`,
    /// with `var` naming the variable of each orange label.
    pub fn coefficient<F>(&self, rel: Relation, ring: &Z2Ring, var: F) -> Option<Z2Poly>
    where F: Fn(usize) -> String { 
        let powers = self.evaluate(rel)?;
        let c = powers.into_iter().fold(ring.one(), |c, (label, e)| 
            c * ring.var(&var(label)).pow(e)
        );
        Some(c)
    }

    /// Number of pairs of black strands crossing in segment `i`.
    pub fn black_crossings(&self, i: usize) -> usize { 
        self.blacks.iter().tuple_combinations().filter(|(a, b)| 
            crosses(Self::black_segment(a, i), Self::black_segment(b, i))
        ).count()
    }

    /// The orange strands crossed by some black strand in segment `i`, with multiplicity.
    pub fn orange_crossings(&self, i: usize) -> Vec<&Orange> { 
        self.blacks.iter().cartesian_product(self.oranges.iter()).filter(|(b, o)| 
            o.segment(i).is_some_and(|s| crosses(Self::black_segment(b, i), s))
        ).map(|(_, o)| o).collect()
    }
}
