use ctm_tangle::{ETangle, Tangle};
use crate::app::err::*;

pub fn measure<F, Res>(proc: F) -> (Res, std::time::Duration) 
where F: FnOnce() -> Res { 
    let start = std::time::Instant::now();
    let res = proc();
    let time = start.elapsed();
    (res, time)
}

pub fn guard_panic<F, R>(f: F) -> AppResult<R>
where F: FnOnce() -> AppResult<R> + std::panic::UnwindSafe {
    std::panic::catch_unwind(|| {
        f()
    }).unwrap_or_else(|e| {
        let info = match e.downcast::<String>() {
            Ok(v) => *v,
            Err(e) => match e.downcast::<&str>() {
                Ok(v) => v.to_string(),
                _ => "Unknown Source of Error".to_owned()
            }
        };
        err!("panic: {info}")
    })
}

/// Reads a tangle either as a JSON list of elementary tangles, 
/// e.g. `[{"type":"cup","signs":[1,-1],"position":1}]`, 
/// or in the text form `cup(1,-1)@1 cap(1,-1)@1`.
pub fn load_tangle(input: &str) -> AppResult<Tangle> { 
    if let Ok(pieces) = serde_json::from_str::<Vec<ETangle>>(input) { 
        ensure!(!pieces.is_empty(), "empty tangle: '{input}'");
        return Ok(Tangle::new(pieces)?)
    }
    match Tangle::parse(input) { 
        Ok(t) => Ok(t),
        Err(cause) => err!("invalid input tangle: '{input}' ({cause})")
    }
}

#[cfg(test)]
mod tests { 
    use super::*;

    #[test]
    fn load_text() { 
        let t = load_tangle("cup(1,-1)@1 cap(1,-1)@1").unwrap();
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn load_json() { 
        let t = load_tangle(r#"[{"type":"over","signs":[1,-1],"position":1}]"#).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.to_string(), "over(1,-1)@1");
    }

    #[test]
    fn load_invalid() { 
        assert!(load_tangle("foo").is_err());
        assert!(load_tangle("[]").is_err());
    }

    #[test]
    fn panic_is_caught() { 
        let res: AppResult<()> = guard_panic(|| panic!("boom"));
        assert_eq!(res.unwrap_err().to_string(), "panic: boom");
    }
}
