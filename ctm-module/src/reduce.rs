use cartesian::cartesian;
use itertools::Itertools;
use log::{debug, info, trace};
use ctm_core::{Error, Result};

use crate::par::map_vec;
use crate::{EdgeKey, GenKey, TypeDA};

impl TypeDA { 
    /// Whether `x -> y` can be cancelled: `x != y` and the edge is the single 
    /// label `1·(e_L(x), ())`.
    pub fn is_reducible(&self, x: &GenKey, y: &GenKey) -> bool { 
        if x == y { 
            return false
        }
        let Some(e) = self.edge(x, y) else { 
            return false
        };
        e.nterms() == 1 && e.iter().all(|(l, c)| 
            l.is_differential() && c.is_one()
        )
    }

    pub fn reducible_edges(&self) -> Vec<(GenKey, GenKey)> { 
        self.gens.iter().flat_map(|(x, v)| 
            v.out_edges().filter(move |y| self.is_reducible(x, y)).map(move |y| (x.clone(), y.clone()))
        ).sorted().collect()
    }

    // prefer edges with fewer zig-zags
    fn choose_reducible(&self) -> Option<(GenKey, GenKey)> { 
        self.gens.iter().flat_map(|(x, v)| 
            v.out_edges().filter(move |y| self.is_reducible(x, y)).map(move |y| (x, y))
        ).min_by_key(|(x, y)| { 
            let cost = self.gens[*y].in_degree() * self.gens[*x].out_degree();
            (cost, *x, *y)
        }).map(|(x, y)| 
            (x.clone(), y.clone())
        )
    }

    //  Cancellation 
    //
    //        1
    //   x - - - -> y          .             .
    //     \      / a
    //        /           ==>  
    //     /      \ b              a·b
    //   w          z          w ---------> z
    //
    // For every w -> y labeled (a, r) and x -> z labeled (b, s), 
    // add w -> z labeled (a·b, r ⊗ s).

    pub(crate) fn cancel(&mut self, x: &GenKey, y: &GenKey) -> Result<()> { 
        if !self.is_reducible(x, y) { 
            return Err(Error::IdempotentMismatch(format!("{x} -> {y} is not reducible")))
        }

        trace!("cancel {x} -> {y}");

        let alg = self.left_alg();
        let action = self.left_action();

        let keys = cartesian!(
            self.keys_into(y).filter(|&w| w != x && w != y),
            self.keys_out_from(x).filter(|&z| z != x && z != y)
        ).collect_vec();

        let labels = |k: &GenKey, l: &GenKey| self.edge(k, l).map(|e| 
            e.iter().map(|(l, c)| (&l.left, &l.right, c)).collect_vec()
        ).unwrap_or_default();

        let mut new_edges = vec![];
        for (w, z) in keys { 
            let (wy, xz) = (labels(w, y), labels(x, z));
            for ((a, r, c), (b, s, d)) in wy.iter().cartesian_product(xz.iter()) { 
                let Some((ab, u)) = alg.mul_gens(a, b) else { 
                    continue
                };
                let label = EdgeKey::new(ab, *r * *s);
                let coeff = *c * *d * &action.apply(&u);
                new_edges.push((w.clone(), z.clone(), label, coeff));
            }
        }

        self.remove_generator(x);
        self.remove_generator(y);

        for (w, z, label, coeff) in new_edges { 
            trace!("  {w} -> {z}: {coeff}·{label}");
            self.add_edge(&w, &z, label, coeff)?;
        }

        Ok(())
    }

    fn reduce_component(mut self) -> Result<Self> { 
        while let Some((x, y)) = self.choose_reducible() { 
            self.cancel(&x, &y)?;
        }
        Ok(self)
    }

    /// Cancels reducible edges until none is left, one weakly connected component 
    /// at a time.
    pub fn reduce(&self) -> Result<TypeDA> { 
        info!("reduce: {}", self.stat());

        let comps = self.components();
        let reduced = map_vec(comps, |c| c.reduce_component());
        let reduced = reduced.into_iter().collect::<Result<Vec<_>>>()?;

        debug!("reduce: {} components", reduced.len());

        let res = self.direct_sum_all(reduced)?;

        info!("reduce: {}", res.stat());

        Ok(res)
    }
}
