use std::fmt::Display;
use ahash::{AHashMap, AHashSet};
use ctm_alg::AlgGen;
use ctm_core::Lc;

use crate::{EdgeKey, GenKey};

/// `(maslov, 2 * alexander)`.
pub type Grading = (isize, isize);

/// A generator of a type-DA module, together with its incident edges.
#[derive(Clone, Debug)]
pub struct DAGen { 
    pub(crate) key: GenKey,
    pub(crate) left_idem: AlgGen,
    pub(crate) right_idem: AlgGen,
    pub(crate) grading: Grading,
    pub(crate) in_edges: AHashSet<GenKey>,
    pub(crate) out_edges: AHashMap<GenKey, Lc<EdgeKey>>
}

impl DAGen { 
    pub fn new(key: GenKey, left_idem: AlgGen, right_idem: AlgGen, grading: Grading) -> Self { 
        debug_assert!(left_idem.is_idempotent());
        debug_assert!(right_idem.is_idempotent());
        Self { 
            key, left_idem, right_idem, grading, 
            in_edges: AHashSet::new(), 
            out_edges: AHashMap::new() 
        }
    }

    pub fn key(&self) -> &GenKey { 
        &self.key
    }

    pub fn left_idem(&self) -> &AlgGen { 
        &self.left_idem
    }

    pub fn right_idem(&self) -> &AlgGen { 
        &self.right_idem
    }

    pub fn grading(&self) -> Grading { 
        self.grading
    }

    pub fn in_edges(&self) -> impl Iterator<Item = &GenKey> {
        self.in_edges.iter()
    }

    pub fn out_edges(&self) -> impl Iterator<Item = &GenKey> {
        self.out_edges.keys()
    }

    pub fn in_degree(&self) -> usize { 
        self.in_edges.len()
    }

    pub fn out_degree(&self) -> usize { 
        self.out_edges.len()
    }

    /// A copy without edges.
    pub(crate) fn detached(&self) -> Self { 
        Self::new(self.key.clone(), self.left_idem.clone(), self.right_idem.clone(), self.grading)
    }
}

impl Display for DAGen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{} | {}] ({}, {})", self.key, self.left_idem, self.right_idem, self.grading.0, self.grading.1)
    }
}
