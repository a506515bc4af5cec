use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::Level;

use proto2rapidjson::{compile_to_cpp, schema_to_json, CompileOptions, ProtoError};

#[derive(Parser)]
#[command(name = "p2rj")]
#[command(about = "Convert .proto files to header-only RapidJSON based C++ code", long_about = None)]
struct Cli {
    /// Log debug output from every compiler stage
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct OptionArgs {
    /// JSON file with compile options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Let a later message definition replace an earlier one with the same name
    #[arg(long)]
    allow_redefinition: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a C++ header from a `.proto` schema
    Gen {
        /// Input `.proto` file
        #[arg(short, long)]
        input: PathBuf,

        /// Output `.h` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite the output file without asking
        #[arg(short = 'y', long = "yes")]
        yes: bool,

        /// Only emit the reading entry points
        #[arg(long)]
        no_serializers: bool,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Print the parsed schema as JSON
    Dump {
        /// Input `.proto` file
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        options: OptionArgs,
    },
}

impl OptionArgs {
    fn load(&self) -> Result<CompileOptions, ProtoError> {
        let mut options = match &self.config {
            Some(path) => CompileOptions::from_file(path)?,
            None => CompileOptions::default(),
        };
        if self.allow_redefinition {
            options.allow_redefinition = true;
        }
        Ok(options)
    }
}

/// Asks whether `path` may be overwritten. An empty answer counts as yes,
/// a closed input as no.
fn confirm_overwrite<R: BufRead, W: Write>(path: &Path, input: &mut R, prompt: &mut W) -> io::Result<bool> {
    write!(prompt, "File {} already exists, overwrite it? [Y/n] ", path.display())?;
    prompt.flush()?;
    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    let answer = answer.trim();
    Ok(answer.is_empty() || answer.eq_ignore_ascii_case("y"))
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), ProtoError> {
    let cli = Cli::parse();
    init_logging(&cli);

    match &cli.command {
        Commands::Gen { input, output, yes, no_serializers, options } => {
            let mut options = options.load()?;
            if *no_serializers {
                options.serializers = false;
            }

            if let Some(out_path) = output {
                if out_path.exists() && !*yes {
                    let stdin = io::stdin();
                    if !confirm_overwrite(out_path, &mut stdin.lock(), &mut io::stderr())? {
                        tracing::info!("Left {} untouched", out_path.display());
                        return Ok(());
                    }
                }
            }

            let text = fs::read_to_string(input)?;
            let header = compile_to_cpp(&text, &options)?;
            match output {
                Some(out_path) => {
                    fs::write(out_path, &header)?;
                    tracing::info!("Compiled {} → {}", input.display(), out_path.display());
                }
                None => print!("{}", header),
            }
            Ok(())
        }

        Commands::Dump { input, options } => {
            let options = options.load()?;
            let text = fs::read_to_string(input)?;
            println!("{}", schema_to_json(&text, &options)?);
            Ok(())
        }
    }
}
