use anyhow::{bail, Context, Result};
use csrkit::{add, load, multiply, subtract, transpose, SparseMatrixCSR};
use std::time::Instant;

const USAGE: &str = "Usage: csrkit <file1.mtx> [<file2.mtx> <operation> <print>]\n\
                     \x20      csrkit <file.mtx> transpose <print>\n\
                     \n\
                     Operations: addition, subtraction, multiplication, transpose\n\
                     print: 1 prints the matrices and the time, 0 only the time";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    match args {
        [file] => {
            let a = load(file).with_context(|| format!("loading {}", file))?;
            println!("{}\n", a);
        }
        [file, op, print] if op == "transpose" => {
            let print = parse_print(print)?;
            let a = load(file).with_context(|| format!("loading {}", file))?;

            let start = Instant::now();
            let at = transpose(&a);
            let elapsed = start.elapsed();

            if print {
                show("Matrix A", &a);
                show("Transpose of A", &at);
            }
            println!("CPU time: {:.6} seconds\n", elapsed.as_secs_f64());
        }
        [file1, file2, op, print] => {
            let print = parse_print(print)?;
            let a = load(file1).with_context(|| format!("loading {}", file1))?;
            let b = load(file2).with_context(|| format!("loading {}", file2))?;

            let start = Instant::now();
            let c = match op.as_str() {
                "addition" => add(&a, &b)?,
                "subtraction" => subtract(&a, &b)?,
                "multiplication" => multiply(&a, &b)?,
                other => bail!(
                    "unsupported operation {:?}; use addition, subtraction, multiplication or transpose",
                    other
                ),
            };
            let elapsed = start.elapsed();

            if print {
                show("Matrix A", &a);
                show("Matrix B", &b);
                show("Resultant Matrix C", &c);
            }
            println!("CPU time: {:.6} seconds\n", elapsed.as_secs_f64());
        }
        _ => bail!("incorrect number of arguments\n{}", USAGE),
    }
    Ok(())
}

fn parse_print(arg: &str) -> Result<bool> {
    match arg {
        "1" => Ok(true),
        "0" => Ok(false),
        other => bail!("print option must be 0 or 1, got {:?}", other),
    }
}

fn show(title: &str, matrix: &SparseMatrixCSR<f64>) {
    println!("{}:", title);
    println!("{}\n", matrix);
}
