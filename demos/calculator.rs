use std::io::BufRead;
use std::path::PathBuf;

use clap::Parser as _;
use parsimony::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
#[command(author, version, about = "Evaluate arithmetic expressions", long_about = None)]
struct Cli {
    /// Expression to evaluate. Reads lines from stdin when omitted.
    expression: Option<String>,

    /// Path to a JSON options file
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Pattern skipped between tokens
    #[arg(short, long)]
    skip: Option<String>,
}

fn operator(x: f64, op: String, y: f64) -> f64 {
    match op.as_str() {
        "+" => x + y,
        "-" => x - y,
        "*" => x * y,
        _ => x / y,
    }
}

fn calculator() -> Parser<f64> {
    let expr = letrec2(
        |_, element: &Parser<f64>| {
            element
                .delimit(&regex(r"[\*/]"), operator)
                .delimit(&regex(r"[\+\-]"), operator)
        },
        |expr: &Parser<f64>, _| real().or(&string("(").concat(expr).concat_left(&string(")"))),
    );
    expr.concat_left(&end())
}

fn evaluate(parser: &Parser<f64>, line: &str, options: &ParseOptions) -> RunResult<()> {
    match parser.run_with(line, options)?.into_result() {
        Ok((_, value)) => println!("{}", value),
        Err(e) => eprintln!("Error: {}", e),
    }
    Ok(())
}

fn run(cli: &Cli) -> RunResult<()> {
    let mut options = match &cli.options {
        Some(path) => ParseOptions::from_file(path)?,
        None => ParseOptions::default().with_skip(r"\s+"),
    };
    if let Some(skip) = &cli.skip {
        options = options.with_skip(skip.as_str());
    }
    info!("options loaded.");
    debug!("options: {:?}", options);

    let parser = calculator();
    match &cli.expression {
        Some(expression) => evaluate(&parser, expression, &options)?,
        None => {
            for line in std::io::stdin().lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                evaluate(&parser, &line, &options)?;
            }
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
