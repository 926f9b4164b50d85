use ctm_module::TypeDA;
use ctm_tangle::{type_da, Tangle};
use crate::app::utils::*;

pub fn dispatch(args: &Args) -> AppResult<String> {
    App::new(args.clone()).run()
}

#[derive(Clone, Default, Debug, clap::Args)]
pub struct Args { 
    pub tangle: String,

    #[arg(short, long)]
    pub reduce: bool,

    #[arg(short = 'd', long)]
    pub show_d: bool,

    #[arg(long)]
    pub dot: bool,

    #[arg(short = 'i', long)]
    pub show_idempotents: bool,

    #[arg(short = 's', long)]
    pub single_thread: bool,

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

        let m = match t.pieces() { 
            [e] if !self.args.reduce => type_da(e)?,
            _ => t.reduced_type_da()?,
        };

        if self.args.dot { 
            return Ok(m.to_dot(self.args.show_idempotents))
        }

        self.show_summary(&t, &m);

        if self.args.show_d { 
            self.out("");
            self.out(&m.desc_d());
        }

        Ok(self.flush())
    }

    fn show_summary(&mut self, t: &Tangle, m: &TypeDA) { 
        self.out(&format!("tangle: {t}"));
        self.out(&format!("algebras: {} ⊠ {}", m.left_alg(), m.right_alg()));
        self.out(&format!("ring: {}", m.ring()));
        self.out(&m.stat());

        if m.left_alg().signs().is_empty() && m.right_alg().signs().is_empty() { 
            let c = m.to_chain_complex();
            self.out(&format!("complex: rank {}, d² = 0: {}", c.rank(), c.d_squared_is_zero()));
        }
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
