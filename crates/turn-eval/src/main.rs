mod case;
mod cli;
mod engine;
mod fixture_io;

use cli::{CliError, CliOptions};
use engine::run_eval;

#[tokio::main]
async fn main() {
    let options = match CliOptions::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(CliError::HelpRequested) => {
            print_usage();
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    match run_eval(&options).await {
        Ok(summary) => {
            summary.print();
            if summary.has_failures() {
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("failed to run turn eval harness: {err}");
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    eprintln!(
        "Usage: cargo run -p turn-eval -- [--fixtures DIR] [--case ID]\n\
         \n\
         Replays recorded conversations through the Top_Intent handler with\n\
         scripted query results and checks each turn's response.\n\
         \n\
         Options:\n\
         - --fixtures DIR  Directory of conversation fixtures (default: crates/turn-eval/fixtures)\n\
         - --case ID       Only replay the conversation with this case_id\n\
         - --help          Show this help text"
    );
}
