use ahash::AHashMap;
use itertools::Itertools;
use ctm_alg::{AlgGen, TensorGen};
use ctm_core::{Z2Mono, Z2Poly};

use crate::{GenKey, Grading, TypeDA};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeView { 
    pub key: GenKey,
    pub left_idem: AlgGen,
    pub right_idem: AlgGen,
    pub grading: Grading,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeView { 
    pub source: GenKey,
    pub target: GenKey,
    pub left: AlgGen,
    pub right: TensorGen,
    pub coeff: Z2Poly,
}

const EDGE_COLORS: [&str; 5] = ["black", "blue", "red", "green", "purple"];

// chunk size of the differential in M2 scripts
const M2_ARROWS_PER_DEF: usize = 50;

impl TypeDA { 
    /// Generators sorted by key.
    pub fn nodes(&self) -> Vec<NodeView> { 
        self.gens().map(|v| NodeView { 
            key: v.key().clone(),
            left_idem: v.left_idem().clone(),
            right_idem: v.right_idem().clone(),
            grading: v.grading(),
        }).sorted_by(|a, b| a.key.cmp(&b.key)).collect()
    }

    /// One entry per label, sorted by source, target and label.
    pub fn edges(&self) -> Vec<EdgeView> { 
        self.keys().flat_map(|x| 
            self.edges_from(x).map(move |(y, l, c)| EdgeView { 
                source: x.clone(),
                target: y.clone(),
                left: l.left.clone(),
                right: l.right.clone(),
                coeff: c.clone(),
            })
        ).sorted_by(|a, b| 
            (&a.source, &a.target, &a.left, &a.right).cmp(&(&b.source, &b.target, &b.left, &b.right))
        ).collect()
    }

    /// Graphviz source. The units `x -> x` are drawn only when `with_idempotents` is set.
    pub fn to_dot(&self, with_idempotents: bool) -> String { 
        let nodes = self.nodes();
        let index: AHashMap<_, _> = nodes.iter().enumerate().map(|(i, v)| (&v.key, i)).collect();

        let mut lines = vec![
            "digraph {".to_string(),
            "  node [shape=box, fontname=\"Arial\"];".to_string(),
            "  edge [fontname=\"Arial\"];".to_string(),
        ];

        for (i, v) in nodes.iter().enumerate() { 
            lines.push(format!("  n{i} [label=\"{}[{}, {}]\"];", v.key, v.grading.0, v.grading.1));
        }

        for e in self.edges() { 
            let unit = e.source == e.target && e.left.is_idempotent() && 
                e.right.len() == 1 && e.right.factors()[0].is_idempotent();
            if unit && !with_idempotents { 
                continue
            }
            let color = EDGE_COLORS[e.right.len().min(EDGE_COLORS.len() - 1)];
            lines.push(format!(
                "  n{} -> n{} [label=\" {} · {} ⊗ {} \", color={color}];", 
                index[&e.source], index[&e.target], e.coeff, e.left, e.right
            ));
        }

        lines.push("}".to_string());
        lines.join("\n")
    }

    /// A Macaulay2 script computing the homology of the underlying complex.
    pub fn to_m2(&self) -> String { 
        let c = self.to_chain_complex();
        let gens = c.gens().collect_vec();
        let index: AHashMap<_, _> = gens.iter().enumerate().map(|(i, k)| (*k, i)).collect();

        let arrows = gens.iter().enumerate().flat_map(|(i, x)| { 
            let index = &index;
            c.d(x).into_iter().filter(move |(y, _)| 
                y != *x
            ).map(move |(y, coeff)| 
                (index[&y], i, coeff)
            )
        }).sorted_by_key(|(j, i, _)| (*i, *j)).map(|(j, i, coeff)| 
            format!("({j},{i}) => {}", m2_poly(&coeff))
        ).collect_vec();

        let vars = c.ring().vars().join(",");
        let mut lines = vec![
            format!("R = ZZ/2[{vars}]"),
            format!("M = R^{}", gens.len()),
            "d = map(M, M, 0)".to_string(),
        ];
        for chunk in arrows.chunks(M2_ARROWS_PER_DEF) { 
            lines.push(format!("d = d + map(M, M, {{{}}})", chunk.join(", ")));
        }
        lines.push("trim' = Q -> image(generators Q)/intersect(image generators Q, image relations Q)".to_string());
        lines.push("H = trim' trim ((ker d) / (image d))".to_string());
        lines.join("\n")
    }
}

fn m2_mono(m: &Z2Mono) -> String { 
    if m.is_one() { 
        return "1".to_string()
    }
    m.iter().map(|(v, &e)| 
        if e == 1 { v.clone() } else { format!("{v}^{e}") }
    ).join("*")
}

fn m2_poly(p: &Z2Poly) -> String { 
    if p.is_zero() { 
        return "0".to_string()
    }
    p.terms().map(m2_mono).join(" + ")
}

#[cfg(test)]
mod tests { 
    use ctm_core::strands;
    use crate::module::tests::sample;
    use crate::EdgeKey;
    use super::*;

    fn with_edges() -> TypeDA { 
        let mut m = sample();
        let r = m.ring().clone();
        let (x, y, z) = (GenKey::from("x"), GenKey::from("y"), GenKey::from("z"));
        let e0 = AlgGen::idempotent([0]);
        let e1 = AlgGen::idempotent([1]);

        m.add_edge(&x, &y, EdgeKey::new(e0.clone(), TensorGen::empty()), r.var("U1") * r.var("V")).unwrap();
        m.add_edge(&x, &x, EdgeKey::new(e0.clone(), TensorGen::from(e1)), r.one()).unwrap();
        m.add_edge(&x, &z, EdgeKey::new(AlgGen::new(strands!{ 0 => 1 }), TensorGen::empty()), r.one()).unwrap();
        m
    }

    #[test]
    fn views() { 
        let m = with_edges();
        let nodes = m.nodes();
        let edges = m.edges();

        assert_eq!(nodes.iter().map(|v| v.key.to_string()).collect_vec(), vec!["x", "y", "z"]);
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|e| e.source == GenKey::from("x")));
    }

    #[test]
    fn dot() { 
        let m = with_edges();
        let dot = m.to_dot(true);
        assert!(dot.starts_with("digraph {"));
        assert_eq!(dot.matches("->").count(), 3);
        assert!(dot.contains("color=blue"));

        let dot = m.to_dot(false);
        assert_eq!(dot.matches("->").count(), 2);
    }

    #[test]
    fn m2() { 
        let m = with_edges();
        let s = m.to_m2();
        let lines = s.lines().collect_vec();

        assert_eq!(lines[0], "R = ZZ/2[U1,V]");
        assert_eq!(lines[1], "M = R^3");
        assert_eq!(lines[3], "d = d + map(M, M, {(1,0) => U1*V})");
        assert_eq!(lines.len(), 6);
    }
}
