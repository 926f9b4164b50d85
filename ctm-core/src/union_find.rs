use std::hash::Hash;
use ahash::AHashMap;
use itertools::Itertools;

/// Disjoint sets over arbitrary hashable keys, with union by size.
pub struct KeyedUnionFind<X> where X: Eq + Hash + Clone { 
    keys: Vec<X>,
    index: AHashMap<X, usize>,
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl<X> KeyedUnionFind<X> where X: Eq + Hash + Clone { 
    pub fn new() -> Self { 
        Self { keys: vec![], index: AHashMap::new(), parent: vec![], size: vec![] }
    }

    /// Inserts `x` as a singleton if absent, returning its index.
    pub fn insert(&mut self, x: X) -> usize { 
        if let Some(&i) = self.index.get(&x) { 
            return i
        }
        let i = self.keys.len();
        self.keys.push(x.clone());
        self.index.insert(x, i);
        self.parent.push(i);
        self.size.push(1);
        i
    }

    pub fn len(&self) -> usize { 
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool { 
        self.keys.is_empty()
    }

    pub fn contains(&self, x: &X) -> bool { 
        self.index.contains_key(x)
    }

    fn root_of(&self, mut i: usize) -> usize { 
        while self.parent[i] != i { 
            i = self.parent[i];
        }
        i
    }

    pub fn root(&self, x: &X) -> &X { 
        let i = self.root_of(self.index[x]);
        &self.keys[i]
    }

    pub fn is_same(&self, x: &X, y: &X) -> bool { 
        self.root_of(self.index[x]) == self.root_of(self.index[y])
    }

    /// Merges the classes of `x` and `y`, inserting them if needed.
    pub fn union(&mut self, x: &X, y: &X) { 
        let i = self.insert(x.clone());
        let j = self.insert(y.clone());
        let (ri, rj) = (self.root_of(i), self.root_of(j));

        if ri == rj { 
            return
        }

        let (big, small) = if self.size[ri] >= self.size[rj] { (ri, rj) } else { (rj, ri) };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }

    /// The classes, each in insertion order, ordered by their first element.
    pub fn groups(&self) -> Vec<Vec<&X>> { 
        (0..self.len())
            .into_group_map_by(|&i| self.root_of(i))
            .into_values()
            .sorted_by_key(|l| l[0])
            .map(|l| l.into_iter().map(|i| &self.keys[i]).collect())
            .collect()
    }

    pub fn into_groups(self) -> Vec<Vec<X>> { 
        self.groups().into_iter().map(|l| 
            l.into_iter().cloned().collect()
        ).collect()
    }
}

impl<X> Default for KeyedUnionFind<X> where X: Eq + Hash + Clone {
    fn default() -> Self {
        Self::new()
    }
}

impl<X> FromIterator<X> for KeyedUnionFind<X> where X: Eq + Hash + Clone {
    fn from_iter<T: IntoIterator<Item = X>>(keys: T) -> Self {
        let mut u = Self::new();
        for x in keys { 
            u.insert(x);
        }
        u
    }
}
