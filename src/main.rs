//! Unified voucher-rs CLI.
//!
//! Same commands as the standalone `voucher-store` binary:
//! - `voucher-rs create` - Create a voucher
//! - `voucher-rs get` - Show a voucher's fields
//! - `voucher-rs redeem` - Redeem one use
//! - `voucher-rs demo` - Create a voucher and redeem it repeatedly

use std::process::ExitCode;

use clap::Parser;
use voucher_store::{VoucherArgs, cli};

/// voucher-rs unified CLI.
#[derive(Parser)]
#[command(
    name = "voucher-rs",
    version,
    about = "Finite-use vouchers with atomic redemption",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    args: VoucherArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let Cli { args } = Cli::parse();

    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
