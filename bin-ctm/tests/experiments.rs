#![allow(unused)]
use log::*;
use ctm_core::Sign::*;
use ctm_module::TypeDA;
use ctm_tangle::{type_da, ETangle, ETangleType::*, Tangle};

fn init_logger() { 
    use ctm_core::util::log::init_simple_logger;
    init_simple_logger(log::LevelFilter::Info).unwrap();
}

fn run(t: &str) -> TypeDA { 
    let t = Tangle::parse(t).unwrap();
    let m = t.reduced_type_da().unwrap();
    info!("{t}: {}", m.stat());
    m
}

// run test by:
// cargo test -r -- --exact [NAME] --nocapture --include-ignored

#[test]
#[ignore]
fn unknot_twice() { 
    init_logger();
    let m = run("cup(1,-1)@1 cup(1,-1,1,-1)@3 cap(1,-1,1,-1)@3 cap(1,-1)@1");
    m.validate();
}

#[test]
#[ignore]
fn hopf() { 
    init_logger();
    let m = run("cup(1,-1)@1 cup(1,1,-1,-1)@2 over(1,1,-1,-1)@1 over(1,1,-1,-1)@1 cap(1,1,-1,-1)@2 cap(1,-1)@1");
    m.validate();
}

#[test]
#[ignore]
fn elementary_sizes() { 
    init_logger();
    for n in 2..=6 { 
        let signs = (0..n).map(|i| if i % 2 == 0 { Pos } else { Neg }).collect::<Vec<_>>();
        for p in 1..n { 
            let e = ETangle::new(Over, signs.clone(), p).unwrap();
            let m = type_da(&e).unwrap();
            info!("{e}: {}", m.stat());
        }
    }
}
