use std::env;
use std::process;

use symhuff::cli::{self, Invocation};

fn init_logging(verbosity: u64) {
  let level = match verbosity {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
  let opts = match cli::parse_args(env::args_os()) {
    Ok(Invocation::Run(opts)) => opts,
    Ok(Invocation::Info(text)) => {
      println!("{}", text);
      return;
    }
    Err(e) => {
      eprintln!("{}", e);
      eprintln!("Use -h for help");
      process::exit(cli::exit_code(&e));
    }
  };

  init_logging(opts.verbosity);

  match cli::run(&opts) {
    Ok(path) => log::info!("Output written to {}", path.display()),
    Err(e) => {
      eprintln!("error: {}", e);
      process::exit(cli::exit_code(&e));
    }
  }
}
