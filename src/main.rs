use clap::Parser;
use kavun_errors::{print_runtime_error, KavunError};
use kavun_interpreter::Runtime;
use std::path::PathBuf;
use std::process::ExitCode;

const BANNER: &str = r#"
 _  __
| |/ /__ ___ ___  __ _ ___
|   / _` \ V  V / || / _ \
|_|\_\__,_|\_/\_/ \__,_|_||_|
----- The Kavun Language Interpreter V0.6-------
"#;

/// The Kavun language interpreter: reads a `.kvn` source file and runs it.
#[derive(Parser, Debug)]
#[command(name = "kavun", about = "The Kavun Language Interpreter V0.6")]
struct Cli {
    /// Path to the .kvn program to run
    path: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let Some(path) = cli.path else {
        print!("{BANNER}");
        println!("Kullanım: kavun <dosya.kvn>");
        return ExitCode::from(1);
    };

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Dosya bulunamadı: {} ({e})", path.display());
            return ExitCode::from(1);
        }
    };

    let stdout = std::io::stdout();
    let mut rt = Runtime::new(Box::new(stdout));

    match kavun_interpreter::run_program(&mut rt, &contents) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let kavun_error = KavunError::new(error);
            let mut stderr = std::io::stderr();
            print_runtime_error(&mut stderr, &kavun_error, &rt.call_trace);
            ExitCode::SUCCESS
        }
    }
}
