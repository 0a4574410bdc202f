use std::io::{self, BufReader, BufWriter};
use std::process;

use bfcore::interpreter::{NoObserver, Tracer};
use bfcore::lower::listing;
use bfcore::{CellWidth, Settings, compile, run};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bfcore")]
#[command(about = "An optimizing brainfuck compiler and interpreter")]
struct Args {
    /// Path to the Brainfuck program file to execute
    #[arg(value_name = "FILE")]
    file: String,

    /// Initial number of cells in the memory tape
    #[arg(short, long, default_value_t = bfcore::settings::DEFAULT_TAPE_LEN)]
    length: usize,

    /// Cell width in bits (8, 16, 32 or 64)
    #[arg(short, long, default_value_t = CellWidth::I8)]
    width: CellWidth,

    /// Flush stdout after each . instruction
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    flush: bool,

    /// Skip the optimization passes
    #[arg(long = "no-opt", action = clap::ArgAction::SetTrue)]
    no_opt: bool,

    /// Use a fixed tape without bounds checks (out-of-range access is undefined)
    #[arg(long, action = clap::ArgAction::SetTrue)]
    unchecked: bool,

    /// Print the compiled instructions instead of running them
    #[arg(long, action = clap::ArgAction::SetTrue)]
    dump: bool,

    /// Log every executed instruction (needs RUST_LOG=trace)
    #[arg(long, action = clap::ArgAction::SetTrue)]
    trace: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let code = match std::fs::read_to_string(&args.file) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", args.file, e);
            process::exit(1);
        }
    };

    let mut settings = Settings::new(args.width)
        .with_tape_len(args.length)
        .with_optimize(!args.no_opt)
        .with_flush(args.flush);
    if args.unchecked {
        // SAFETY: the user opted out of bounds checks on the command line.
        settings = unsafe { settings.with_unchecked_tape() };
    }

    let program = match compile(&code, settings.optimize) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    if args.dump {
        print!("{}", listing(&program));
        return;
    }

    let mut input = BufReader::new(io::stdin().lock());
    let mut output = BufWriter::new(io::stdout().lock());
    let result = if args.trace {
        run(&program, &settings, &mut input, &mut output, &mut Tracer)
    } else {
        run(&program, &settings, &mut input, &mut output, &mut NoObserver)
    };
    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(1);
    }
}
