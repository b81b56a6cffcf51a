//! Voucher store standalone binary.

use std::process::ExitCode;

use clap::Parser;
use voucher_store::{VoucherArgs, cli};

#[tokio::main]
async fn main() -> ExitCode {
    let args = VoucherArgs::parse();

    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
