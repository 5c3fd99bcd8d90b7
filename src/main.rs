use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result, bail};
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut dump_globals = false;
    let mut input_path: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dump-globals" => dump_globals = true,
            flag if flag.starts_with("--") => bail!("Unknown option {flag}"),
            _ => {
                if input_path.is_some() {
                    bail!("Only one input file is supported");
                }
                input_path = Some(arg);
            }
        }
    }

    let source = if let Some(path) = &input_path {
        info!("reading program from {path}");
        fs::read_to_string(path).with_context(|| format!("Reading {path}"))?
    } else {
        info!("reading program from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Reading stdin")?;
        buffer
    };

    let stdout = io::stdout();
    let mut output = stdout.lock();
    let globals = mython::run_source(&source, &mut output)
        .with_context(|| format!("Running {}", input_path.as_deref().unwrap_or("<stdin>")))?;
    info!("program finished with {} global(s)", globals.iter().count());

    if dump_globals {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{globals}").context("Writing globals")?;
    }
    Ok(())
}
