use std::io;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Logger, Root};
use task_tracker::cli::{self, Action, Cli, Command};
use task_tracker::repository::JsonTaskRepository;

const TASK_FILE: &str = "tasks.json";

fn main() -> ExitCode {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests land here too; they print to stdout
            // and exit 0, while real usage errors go to stderr and exit 1.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    // Operands are validated before the repository opens the task file, so
    // a malformed invocation never touches disk.
    let action = Action::try_from(command)?;
    let mut repo = JsonTaskRepository::load(TASK_FILE)?;
    cli::execute(action, &mut repo, &mut io::stdout().lock())
}

fn init_logging() {
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .logger(Logger::builder().build("task_tracker", LevelFilter::Info))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))
        .expect("logging configuration is well-formed");
    log4rs::init_config(config).expect("logging initializes once");
}
