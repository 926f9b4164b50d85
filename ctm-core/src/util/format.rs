use std::collections::BTreeMap;
use itertools::Itertools;

/// Formats a partial map as `{0:4, 1:2}`.
pub fn fmt_strands(strands: &BTreeMap<usize, usize>) -> String { 
    let body = strands.iter().map(|(a, b)| format!("{a}:{b}")).join(", ");
    format!("{{{body}}}")
}

/// Formats a set of points as `{0, 2, 3}`.
pub fn fmt_points<'a, I>(points: I) -> String
where I: IntoIterator<Item = &'a usize> { 
    let body = points.into_iter().join(", ");
    format!("{{{body}}}")
}

#[cfg(test)]
mod tests { 
    use super::*;
    use crate::strands;

    #[test]
    fn format() { 
        assert_eq!(fmt_strands(&strands!{ 1 => 4, 0 => 2 }), "{0:2, 1:4}");
        assert_eq!(fmt_strands(&strands!{}), "{}");
        assert_eq!(fmt_points(&[0, 2, 3]), "{0, 2, 3}");
    }
}
