use log::info;
use clap::{Parser, Subcommand};

use super::cmd::{da, gens, m2};
use super::utils::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Cmd
}

#[derive(Subcommand, Debug)]
#[clap(rename_all="lower")]
pub enum Cmd {
    Da(da::Args),
    Gens(gens::Args),
    M2(m2::Args),
}

impl CliArgs { 
    fn log_level(&self) -> log::LevelFilter { 
        let level = match &self.command { 
            Cmd::Da(args)   => args.log,
            Cmd::Gens(args) => args.log,
            Cmd::M2(args)   => args.log,
        };
        ctm_core::util::log::level_filter(level)
    }

    fn single_thread(&self) -> bool { 
        match &self.command { 
            Cmd::Da(args)   => args.single_thread,
            Cmd::Gens(_)    => false,
            Cmd::M2(args)   => args.single_thread,
        }
    }
}

pub struct App {
    pub args: CliArgs
}

impl App { 
    pub fn new() -> Self { 
        let args = CliArgs::parse();
        App { args }
    }

    pub fn run(&self) -> AppResult<String> { 
        self.init_logger()?;

        info!("args: {:?}", self.args);

        if self.args.single_thread() { 
            ctm_module::config::set_multithread_enabled(false);
        }
        info!("multithread: {}", ctm_module::config::is_multithread_enabled());

        let (res, time) = measure(||
            self.dispatch()
        );

        info!("time: {:?}", time);

        res
    }

    fn init_logger(&self) -> AppResult<()> {
        let l = self.args.log_level();
        ctm_core::util::log::init_simple_logger(l)?;
        Ok(())
    }

    fn dispatch(&self) -> AppResult<String> { 
        guard_panic(||
            match &self.args.command { 
                Cmd::Da(args)   => da::dispatch(args),
                Cmd::Gens(args) => gens::dispatch(args),
                Cmd::M2(args)   => m2::dispatch(args),
            }
        )
    }
}
