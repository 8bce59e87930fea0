use std::env;
use std::io;
use std::process::ExitCode;

use inventory_cli::{parse_args, run};

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

fn run_cli() -> Result<(), String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        println!("{}", usage_text());
        return Ok(());
    }
    let options = parse_args(&args).map_err(|err| format!("{err}\n\n{}", usage_text()))?;
    run(&options, &mut io::stdout())
}

fn usage_text() -> String {
    [
        "inventory_cli - recover inventory items from a host payload",
        "",
        "Usage:",
        "  inventory_cli [--pretty] <path>",
        "  inventory_cli [--pretty] -        (read from stdin)",
    ]
    .join("\n")
}
