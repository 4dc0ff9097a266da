use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use anyhow::Context;
use clap::Parser;
use re_stream::{compile_to_postfix_with, Compiler, Config, Matcher};

/// Stream standard input through a regex automaton and print every match as
/// soon as it completes.
#[derive(Debug, Parser)]
#[command(name = "re-stream", version, about, long_about = None)]
struct Args {
    /// The pattern to match. Supports grouping, `|`, `*`, `+` and `?`.
    pattern: String,

    /// Print the pattern in postfix notation and exit.
    #[arg(long)]
    postfix: bool,

    /// Print the compiled NFA and exit.
    #[arg(long)]
    nfa: bool,

    /// Maximum depth of nested groups.
    #[arg(long, default_value_t = 250)]
    nest_limit: u32,

    /// Maximum number of NFA states.
    #[arg(long)]
    size_limit: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = Config::new()
        .nest_limit(args.nest_limit)
        .size_limit(args.size_limit);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.postfix {
        let postfix = compile_to_postfix_with(&args.pattern, &config)
            .with_context(|| format!("invalid pattern {:?}", args.pattern))?;
        writeln!(out, "{}", postfix)?;
        return Ok(());
    }
    let nfa = Compiler::new()
        .configure(config)
        .build(&args.pattern)
        .with_context(|| format!("invalid pattern {:?}", args.pattern))?;
    if args.nfa {
        write!(out, "{}", nfa)?;
        return Ok(());
    }

    let mut matcher = Matcher::new(Arc::new(nfa));
    let mut count = 0u64;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line).context("failed to read stdin")? == 0 {
            break;
        }
        let mut written: io::Result<()> = Ok(());
        matcher.push_str(&line, &mut |m: &str| {
            count += 1;
            if written.is_ok() {
                written = writeln!(out, "{}", m);
            }
        });
        written.context("failed to write match")?;
    }
    log::debug!("{} matches", count);
    Ok(())
}
