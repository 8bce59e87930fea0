use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use vrv_core::parse_inventory_response;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub pretty: bool,
    pub input: InputSource,
}

pub fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut pretty = false;
    let mut input = None;

    for arg in args {
        match arg.as_str() {
            "--pretty" => pretty = true,
            "-" => input = Some(set_input(input, InputSource::Stdin)?),
            flag if flag.starts_with("--") => {
                return Err(format!("unknown option '{flag}' (expected --pretty)"));
            }
            path => input = Some(set_input(input, InputSource::File(PathBuf::from(path)))?),
        }
    }

    let input = input.ok_or_else(|| "missing input path (use '-' for stdin)".to_string())?;
    Ok(CliOptions { pretty, input })
}

fn set_input(current: Option<InputSource>, next: InputSource) -> Result<InputSource, String> {
    match current {
        Some(_) => Err("expected a single input path".to_string()),
        None => Ok(next),
    }
}

pub fn read_input(source: &InputSource) -> Result<String, String> {
    match source {
        InputSource::Stdin => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .map_err(|err| format!("failed to read stdin: {err}"))?;
            Ok(raw)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .map_err(|err| format!("failed to read '{}': {err}", path.display())),
    }
}

pub fn render(raw: &str, pretty: bool) -> Result<String, String> {
    let response = parse_inventory_response(raw);
    let rendered = if pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    };
    rendered.map_err(|err| format!("failed to encode inventory: {err}"))
}

pub fn run<W: Write>(options: &CliOptions, out: &mut W) -> Result<(), String> {
    let raw = read_input(&options.input)?;
    let rendered = render(&raw, options.pretty)?;
    writeln!(out, "{rendered}").map_err(|err| format!("failed to write output: {err}"))
}
