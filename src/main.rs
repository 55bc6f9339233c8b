use std::{
    env,
    fs::read_to_string,
    io::{self, Write},
    path::Path,
    process,
    time::Instant,
};

use kaleidoscope::{
    ast::display::pretty_print,
    compiler::evaluator::{Evaluator, Lowered},
    config::Config,
    context::CompilationContext,
    display_error,
    driver::driver::{Driver, Outcome},
    lexer::{lexer::Lexer, source::ReaderSource},
    parser::parser::Parser,
};

const USAGE: &str = "usage: kaleidoscope [--strict-numbers] [--max-depth N] [--dump-ast] [FILE]";

fn main() {
    let config = match Config::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {}", error);
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    let succeeded = match &config.file {
        Some(path) => run_file(&config, path),
        None => run_repl(&config),
    };

    if !succeeded {
        process::exit(1);
    }
}

fn run_file(config: &Config, path: &Path) -> bool {
    let start = Instant::now();

    let source = match read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: failed to read {}: {}", path.display(), error);
            return false;
        }
    };

    // Natives write to stderr so their output interleaves with diagnostics
    let mut driver = Driver::for_source(&source, config.file_name(), config.parser, Evaluator::new(io::stderr()));
    let mut failed = 0;

    while let Some(result) = driver.step() {
        match result {
            Ok(outcome) => report(config, &outcome),
            Err(error) => {
                display_error(&error, Some(&source));
                failed += 1;
            }
        }
    }

    if failed > 0 {
        println!("{} item(s) failed", failed);
    }
    println!("Finished in {:?}", start.elapsed());

    failed == 0
}

fn run_repl(config: &Config) -> bool {
    prompt();

    let stdin = io::stdin();
    let lexer = Lexer::new(ReaderSource::new(stdin.lock(), None));
    let parser = Parser::new(lexer, CompilationContext::new(), config.parser);
    let mut driver = Driver::new(parser, Evaluator::new(io::stderr()));

    while let Some(result) = driver.step() {
        match result {
            Ok(outcome) => report(config, &outcome),
            Err(error) => display_error(&error, None),
        }

        prompt();
    }

    true
}

fn prompt() {
    eprint!("ready> ");
    let _ = io::stderr().flush();
}

fn report(config: &Config, outcome: &Outcome<Lowered>) {
    if config.dump_ast {
        println!("{}", pretty_print(&outcome.item.to_string()));
    }

    match &outcome.value {
        Lowered::Declared(name) => println!("Read extern: {}", name),
        Lowered::Defined(name) => println!("Read function definition: {}", name),
        Lowered::Evaluated(value) => println!("Evaluated to {:.6}", value),
    }
}
