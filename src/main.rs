use std::process::ExitCode;

use clap::Parser;
use weatherdigest::DigestError;
use weatherdigest::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli::execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(error) = e.downcast_ref::<DigestError>() {
                eprintln!("{}", error.user_message());
            }
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
