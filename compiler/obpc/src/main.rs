//! obp: query JSON with obpath expressions.

use std::path::PathBuf;

use obpc::commands::{run_filter, run_golden, FilterOptions, GoldenConfig};

fn main() {
    obpc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "filter" => {
            let mut options = FilterOptions::default();
            let mut path = None;

            for arg in args.iter().skip(2) {
                if arg == "--batch" {
                    options.batch = true;
                } else if arg == "--stream" {
                    options.batch = false;
                } else if let Some(expression) = arg.strip_prefix("--path=") {
                    path = Some(expression.to_string());
                } else if !arg.starts_with('-') && path.is_none() {
                    path = Some(arg.clone());
                } else {
                    eprintln!("error: unexpected argument '{arg}'");
                    eprintln!("Usage: obp filter <path> [--batch]");
                    std::process::exit(1);
                }
            }

            if let Some(path) = path {
                options.path = path;
            }

            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            if let Err(e) = run_filter(&options, stdin.lock(), stdout.lock()) {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        "golden" => {
            let mut config = GoldenConfig::default();

            for arg in args.iter().skip(2) {
                if arg == "--generate" {
                    config.generate = true;
                } else if let Some(file) = arg.strip_prefix("--data=") {
                    config.data = PathBuf::from(file);
                } else if let Some(file) = arg.strip_prefix("--queries=") {
                    config.queries = PathBuf::from(file);
                } else if let Some(file) = arg.strip_prefix("--expected=") {
                    config.expected = PathBuf::from(file);
                } else if let Some(file) = arg.strip_prefix("--errors=") {
                    config.errors = PathBuf::from(file);
                } else {
                    eprintln!("error: unexpected argument '{arg}'");
                    print_golden_usage();
                    std::process::exit(1);
                }
            }

            match run_golden(&config) {
                Ok(report) if config.generate => {
                    println!(
                        "Wrote {} expected results to {}",
                        report.generated,
                        config.expected.display()
                    );
                }
                Ok(report) => {
                    println!(
                        "{} queries passed, {} malformed expressions rejected",
                        report.verified, report.rejected
                    );
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("obp - query JSON documents with path expressions");
    println!();
    println!("Usage: obp <command> [options]");
    println!();
    println!("Commands:");
    println!("  filter <path> [--batch]   Evaluate <path> against each JSON document on stdin");
    println!("  golden [options]          Verify (or regenerate) expected query results");
    println!("  help                      Show this message");
    println!();
    println!("Filter options:");
    println!("  --batch      Print one JSON array of all matches after the input ends");
    println!("  --stream     Print each match as a JSON line as soon as it is found (default)");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=obpath=debug) to log to stderr.");
}

fn print_golden_usage() {
    eprintln!("Usage: obp golden [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --generate          Regenerate the expected results instead of verifying");
    eprintln!("  --data=<file>       Data document (default: testdata/data.json)");
    eprintln!("  --queries=<file>    [name, path] pairs (default: testdata/queries.json)");
    eprintln!("  --expected=<file>   Expected results (default: testdata/expect.jsonstream)");
    eprintln!("  --errors=<file>     Malformed paths (default: testdata/syntax_errors.json)");
}
