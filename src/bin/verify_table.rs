use csv2parquet::{fixture::FIXTURE_PATH, init_logging, verify::verify_table};
use std::{env, io, path::Path, process::exit};

fn main() {
    init_logging("warn");

    // Optional arguments: the Parquet file (or directory) and a file holding the expected table.
    let args: Vec<String> = env::args().collect();
    if args.len() > 3 {
        eprintln!(
            "Usage: {} [PARQUET_PATH] [EXPECTED_FILE]",
            args.first().map_or("verify_table", String::as_str)
        );
        exit(1);
    }
    let path = args.get(1).map(String::as_str).unwrap_or(FIXTURE_PATH);

    match verify_table(Path::new(path), args.get(2).map(Path::new), &mut io::stdout().lock()) {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit(1);
        }
    }
}
