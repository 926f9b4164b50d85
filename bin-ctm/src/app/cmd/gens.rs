use ctm_tangle::enumerate_gens;
use crate::app::utils::*;
use crate::app::err::*;

pub fn dispatch(args: &Args) -> AppResult<String> {
    App::new(args.clone()).run()
}

#[derive(Clone, Default, Debug, clap::Args)]
pub struct Args { 
    pub tangle: String,

    #[arg(long, default_value = "0")]
    pub log: u8,
}

pub struct App {
    args: Args,
    buff: String,
}

impl App {
    pub fn new(args: Args) -> Self { 
        let buff = String::with_capacity(1024);
        App { args, buff }
    }

    pub fn run(&mut self) -> AppResult<String> { 
        let t = load_tangle(&self.args.tangle)?;
        let [e] = t.pieces() else { 
            return err!("expected a single elementary tangle: '{t}'")
        };

        let mut gens = enumerate_gens(e);
        gens.sort();

        self.out(&format!("{e}: {} generators", gens.len()));
        for (i, x) in gens.iter().enumerate() { 
            let (m, a) = x.grading(e);
            self.out(&format!(
                "  {i}: {x} [{} | {}] ({m}, {a})", 
                x.left_idempotent(e), x.right_idempotent()
            ));
        }

        Ok(self.flush())
    }

    fn out(&mut self, str: &str) { 
        self.buff.push_str(str);
        self.buff.push('\n');
    }

    fn flush(&mut self) -> String { 
        let res = std::mem::take(&mut self.buff);
        res.trim().to_string()
    }
}
