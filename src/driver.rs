//! Driver for the HLS IR tools.
use crate::cmdline::Opts;
use crate::report::Report;
use hls_ir::{self as ir, def::ProgramDef};
use hls_opt::pass_manager::{PassManager, PassResult};
use hls_utils::{Error, HlsResult};
use std::io::{Read, Write};
use std::path::Path;

/// Load a program definition from `file`, or from stdin if there is none.
pub fn read_program(file: Option<&Path>) -> HlsResult<ProgramDef> {
    let (name, text) = match file {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                Error::invalid_file(format!("{}: {e}", path.display()))
            })?;
            (path.display().to_string(), text)
        }
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            ("<stdin>".to_string(), text)
        }
    };
    serde_json::from_str(&text)
        .map_err(|e| Error::invalid_file(format!("{name}: {e}")))
}

/// Run the driver from the command line.
pub fn run_driver() -> PassResult<()> {
    let opts = Opts::get_opts();

    // enable tracing
    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(opts.log_level)
        .target(env_logger::Target::Stderr)
        .init();

    let pm = PassManager::default_passes()?;

    // list all the avaliable pass options when flag --list-passes is enabled
    if opts.list_passes {
        println!("{}", pm.list());
        return Ok(());
    }
    if let Some(pass) = &opts.describe_pass {
        let help = pm.describe(pass).ok_or_else(|| {
            Error::misc(format!("Unknown pass or alias: {pass}"))
        })?;
        println!("{help}");
        return Ok(());
    }

    let def = read_program(opts.file.as_deref())?;
    let mut prog = ir::from_def::def_to_ir(def)?;
    log::info!(
        "loaded {} functions from {}",
        prog.num_functions(),
        opts.file
            .as_ref()
            .map_or("<stdin>".to_string(), |p| p.display().to_string())
    );

    // Run all passes specified by the command line
    pm.execute_plan(&mut prog, &opts.pass, &opts.disable_pass)?;

    let mut out = opts.output.get_write().map_err(|e| {
        Error::write_error(format!("{}: {e}", opts.output.as_path_string()))
    })?;
    if opts.emit_ir {
        serde_json::to_writer_pretty(&mut out, &ir::to_def::ir_to_def(&prog)?)?;
    } else {
        serde_json::to_writer_pretty(&mut out, &Report::new(&prog))?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
