use std::{env, fs, process};

use symhuff::codec::inspect;

fn main() -> Result<(), std::io::Error> {
  env_logger::init();
  let args: Vec<String> = env::args().collect();

  if args.len() != 3 {
    println!("Usage: {} <compressed-in> <json-out>", &args[0]);
    println!("\tDumps the header, code table and sizes of a compressed file as JSON");
    process::exit(1);
  }

  let infile = fs::File::open(&args[1])?;
  let info = match inspect(infile) {
    Ok(info) => info,
    Err(e) => {
      eprintln!("Could not read {}: {}", args[1], e);
      process::exit(1);
    }
  };
  print!("{}", info);

  let json_string = serde_json::to_string_pretty(&info)?;
  fs::write(&args[2], json_string)?;
  println!("Output written to {}", args[2]);

  Ok(())
}
