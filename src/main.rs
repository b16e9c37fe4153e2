use std::{fs::read_to_string, path::PathBuf, process::ExitCode};

use clap::Parser;
use log::LevelFilter;
use vc::{
    compile,
    errors::errors::{Diagnostics, ErrorReporter},
    lexer::{
        lexer::{tokenize, Scanner},
        source::SourceFile,
    },
    parser::parser::parse,
    render_diagnostic,
    type_checker::type_checker::CheckerOptions,
};

#[derive(Parser, Debug)]
#[clap(name = "vc", version, about = "Front end for the VC language")]
struct Cli {
    /// VC source file
    file: PathBuf,

    /// Print every token as a JSON line
    #[clap(long)]
    tokens: bool,

    /// Print the AST as JSON once it has been built without errors
    #[clap(long)]
    dump_ast: bool,

    /// Stop after parsing
    #[clap(long)]
    parse_only: bool,

    /// Do not report unreachable statements or missing returns
    #[clap(long)]
    no_advisories: bool,

    /// Verbose output
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", cli.file.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let mut diagnostics = Diagnostics::new();
    if let Err(error) = run(&cli, &source, &mut diagnostics) {
        eprintln!("Failed to serialise output: {}", error);
        return ExitCode::FAILURE;
    }

    let file_name = cli.file.to_string_lossy();
    for diagnostic in diagnostics.entries() {
        eprint!("{}", render_diagnostic(diagnostic, &source, &file_name));
    }

    if diagnostics.num_errors() == 0 {
        println!("Compilation was successful.");
        ExitCode::SUCCESS
    } else {
        println!("Compilation was unsuccessful.");
        ExitCode::FAILURE
    }
}

fn run(cli: &Cli, source: &str, diagnostics: &mut Diagnostics) -> Result<(), serde_json::Error> {
    if cli.tokens {
        // Lexical errors are reported again by the real pass below.
        let mut scratch = Diagnostics::new();
        for token in tokenize(source, &mut scratch) {
            println!("{}", serde_json::to_string(&token)?);
        }
    }

    if cli.parse_only {
        let ast = parse(Scanner::new(SourceFile::new(source), diagnostics));
        if let (Ok(ast), true) = (ast, cli.dump_ast) {
            if diagnostics.num_errors() == 0 {
                println!("{}", serde_json::to_string_pretty(&ast)?);
            }
        }
        return Ok(());
    }

    let options = if cli.no_advisories {
        CheckerOptions {
            report_unreachable: false,
            report_missing_return: false,
        }
    } else {
        CheckerOptions::default()
    };

    if let (Some(ast), true) = (compile(source, diagnostics, options), cli.dump_ast) {
        println!("{}", serde_json::to_string_pretty(&ast)?);
    }
    Ok(())
}
