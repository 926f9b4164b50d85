cfg_if::cfg_if! { if #[cfg(feature = "multithread")] { 
    use rayon::prelude::*;
}}

/// Maps `f` over `items`, on the rayon pool when enabled.
pub(crate) fn map_vec<T, U, F>(items: Vec<T>, f: F) -> Vec<U>
where T: Send, U: Send, F: Fn(T) -> U + Send + Sync { 
    cfg_if::cfg_if! { 
        if #[cfg(feature = "multithread")] { 
            if crate::config::is_multithread_enabled() { 
                return items.into_par_iter().map(f).collect()
            }
        }
    }
    items.into_iter().map(f).collect()
}

pub(crate) fn flat_map_vec<T, U, F>(items: &[T], f: F) -> Vec<U>
where T: Sync, U: Send, F: Fn(&T) -> Vec<U> + Send + Sync { 
    cfg_if::cfg_if! { 
        if #[cfg(feature = "multithread")] { 
            if crate::config::is_multithread_enabled() { 
                return items.par_iter().flat_map_iter(f).collect()
            }
        }
    }
    items.iter().flat_map(f).collect()
}
