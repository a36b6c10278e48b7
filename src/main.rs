//! pseudoc CLI - pseudocode to Python / C++ compiler

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use pseudoc::config::{DEFAULT_INDENT_WIDTH, DEFAULT_MAX_DEPTH};
use pseudoc::errors::{offset_to_line_col, print_error};
use pseudoc::{CompileError, CompileOptions, Lexer, Target, compile, compile_to};

#[derive(Parser, Debug)]
#[command(name = "pseudoc", version, about = "Structured pseudocode to Python / C++ compiler")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a source file to the target language
    Compile {
        /// Pseudocode source file
        file: PathBuf,

        #[command(flatten)]
        translate: TranslateArgs,

        /// Output path (default: <stem>.<ext> in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Translate a source file without writing any output
    Check {
        /// Pseudocode source file
        file: PathBuf,

        #[command(flatten)]
        translate: TranslateArgs,
    },
    /// Print the token stream of a source file
    Tokens {
        /// Pseudocode source file
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Target language: python (py) or cpp (c++)
    #[arg(short, long, default_value = "python")]
    target: String,

    /// Spaces per indentation level in the generated code
    #[arg(long, default_value_t = DEFAULT_INDENT_WIDTH)]
    indent: usize,

    /// Maximum block nesting depth accepted
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl TranslateArgs {
    fn resolve(&self) -> Result<(Target, CompileOptions), CompileError> {
        let target = self.target.parse::<Target>()?;
        let options = CompileOptions::new()
            .with_indent_width(self.indent)
            .with_max_depth(self.max_depth);
        Ok((target, options))
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Only fails if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Compile {
            file,
            translate,
            output,
        } => run_compile(&file, &translate, output),
        Command::Check { file, translate } => run_check(&file, &translate),
        Command::Tokens { file } => run_tokens(&file),
    }
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            None
        }
    }
}

fn default_output_path(file: &Path, target: Target) -> PathBuf {
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    PathBuf::from(format!("{}.{}", stem, target.file_extension()))
}

/// Translate into a temporary file next to `path` and move it into place
///
/// A failed compilation leaves `path` untouched.
fn write_output(
    path: &Path,
    source: &str,
    target: Target,
    options: &CompileOptions,
) -> Result<(), CompileError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    compile_to(source, target, options, &mut tmp)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn run_compile(file: &Path, args: &TranslateArgs, output: Option<PathBuf>) -> ExitCode {
    let (target, options) = match args.resolve() {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let output_path = output.unwrap_or_else(|| default_output_path(file, target));
    if output_path == file {
        eprintln!(
            "Error: output path '{}' would overwrite the source file",
            output_path.display()
        );
        return ExitCode::FAILURE;
    }

    let Some(source) = read_source(file) else {
        return ExitCode::FAILURE;
    };
    let filename = file.display().to_string();
    debug!(file = %filename, target_language = %target, ?options, "compiling");

    match write_output(&output_path, &source, target, &options) {
        Ok(()) => {
            info!(output = %output_path.display(), "compilation complete");
            println!("Generated: {}", output_path.display());
            ExitCode::SUCCESS
        }
        Err(CompileError::Io(e)) => {
            eprintln!("Error writing '{}': {}", output_path.display(), e);
            ExitCode::FAILURE
        }
        Err(e) => {
            print_error(&source, &filename, &e);
            ExitCode::FAILURE
        }
    }
}

fn run_check(file: &Path, args: &TranslateArgs) -> ExitCode {
    let (target, options) = match args.resolve() {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let Some(source) = read_source(file) else {
        return ExitCode::FAILURE;
    };
    let filename = file.display().to_string();

    match compile(&source, target, &options) {
        Ok(code) => {
            println!(
                "OK: {} translates to {} ({} lines)",
                filename,
                target,
                code.lines().count()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_error(&source, &filename, &e);
            ExitCode::FAILURE
        }
    }
}

fn run_tokens(file: &Path) -> ExitCode {
    let Some(source) = read_source(file) else {
        return ExitCode::FAILURE;
    };
    let filename = file.display().to_string();

    for token in Lexer::new(&source) {
        match token {
            Ok(token) => {
                let (line, col) = offset_to_line_col(&source, token.span.start);
                println!("{:>4}:{:<3} {:<20} {:?}", line, col, token.kind.to_string(), token.text);
            }
            Err(e) => {
                print_error(&source, &filename, &e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
