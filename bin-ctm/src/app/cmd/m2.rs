use crate::app::utils::*;

pub fn dispatch(args: &Args) -> AppResult<String> {
    let t = load_tangle(&args.tangle)?;
    let m = t.reduced_type_da()?;
    Ok(m.to_m2())
}

#[derive(Clone, Default, Debug, clap::Args)]
pub struct Args { 
    pub tangle: String,

    #[arg(short = 's', long)]
    pub single_thread: bool,

    #[arg(long, default_value = "0")]
    pub log: u8,
}
