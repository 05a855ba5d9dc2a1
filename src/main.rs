use clap::{Args, CommandFactory, Parser, Subcommand};
use leak_lines::{Gitleaks, LeakScanError, LeakScanner, ReportPattern, ScanConfig};
use std::io;
use std::process::ExitCode;

mod report;

#[derive(Parser)]
#[command(name = "leak-lines")]
#[command(version, about = "Scan staged git changes for secrets, ignoring reformatted lines")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    scan: ScanArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the staged changes of every file (the default)
    Scan,
    /// Print shell completions to stdout
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Print a man page to stdout
    Man,
}

#[derive(Args)]
struct ScanArgs {
    /// Repository to scan
    #[arg(short = 'C', long = "repo", default_value = ".", global = true)]
    repo: String,

    /// gitleaks executable to run
    #[arg(long, default_value = "gitleaks", global = true)]
    gitleaks: String,

    /// Naming pattern for temporary report files; `*` marks the random part
    #[arg(long, default_value = "gitleaks-*.json", global = true)]
    report_pattern: ReportPattern,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Exit with 0 even when secrets are found
    #[arg(long, global = true)]
    exit_zero: bool,
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.scan.verbose);

    match cli.command.unwrap_or(Commands::Scan) {
        Commands::Scan => match scan(&cli.scan) {
            Ok(has_secrets) if has_secrets && !cli.scan.exit_zero => {
                ExitCode::from(report::exit::FINDINGS)
            }
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}", report::error(&e.to_string()));
                ExitCode::from(report::exit::ERROR)
            }
        },
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "leak-lines", &mut io::stdout());
            ExitCode::SUCCESS
        }
        Commands::Man => {
            match clap_mangen::Man::new(Cli::command()).render(&mut io::stdout()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{}", report::error(&e.to_string()));
                    ExitCode::from(report::exit::ERROR)
                }
            }
        }
    }
}

/// Scan every staged file, printing results as they come in
fn scan(args: &ScanArgs) -> Result<bool, LeakScanError> {
    let config = ScanConfig {
        gitleaks: Gitleaks::new(&args.gitleaks),
        report_pattern: args.report_pattern.clone(),
    };
    let scanner = LeakScanner::new(&args.repo, config);

    let files = scanner.staged_files()?;
    println!("{}", report::file_list(&files));

    let mut has_secrets = false;
    for file in &files {
        println!("\n{}", report::verifying(file));

        let result = scanner.scan_file(file).inspect_err(|_| {
            eprintln!(
                "{} {}",
                report::error("Error scanning file:"),
                report::colors::file().apply_to(file)
            );
        })?;
        println!("{}", report::file_result(&result));
        has_secrets |= result.has_secrets();
    }

    println!("\n{}", report::summary(has_secrets));
    Ok(has_secrets)
}
