//! CLI module for voucher-store.
//!
//! Command-line interface for creating, inspecting and redeeming vouchers.
//! It can be used either as a standalone binary or as a subcommand of the
//! main voucher-rs CLI.
//!
//! # Usage
//!
//! ```bash
//! # Create a voucher with 4 uses and some metadata
//! voucher-store create -u 4 -m description="10% off on all items" -m expiry_date=2024-12-31T23:59:59
//!
//! # Show a voucher
//! voucher-store get 0b6f1c5e-3f0a-4d8e-9a51-2f4e8c0d7b13
//!
//! # Redeem one use
//! voucher-store redeem 0b6f1c5e-3f0a-4d8e-9a51-2f4e8c0d7b13
//!
//! # Create a voucher and redeem it five times against an in-process store
//! voucher-store --memory demo
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
#[cfg(feature = "redis")]
use std::time::Duration;

use clap::{Parser, Subcommand};
use tabled::{Table, Tabled};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use voucher_config::{CliOverrides, Config, ConfigError, apply_overrides, load_config};
use voucher_core::{FIELD_CREATED_AT, FIELD_USES, defaults};

use crate::config::{ReservedFieldPolicy, StoreConfig};
use crate::engine::{Redemption, RedemptionEngine};
use crate::error::VoucherError;
use crate::memory::MemoryBackend;
use crate::record::{Fields, Metadata};
use crate::store::VoucherStore;
use crate::traits::VoucherBackend;

/// Voucher management CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "voucher-store",
    version,
    about = "Create, inspect and redeem finite-use vouchers"
)]
pub struct VoucherArgs {
    /// Config file path (toml, json or yaml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: CliOverrides,

    #[command(subcommand)]
    pub command: VoucherCommands,
}

/// Voucher CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum VoucherCommands {
    /// Create a new voucher and print its code.
    Create {
        /// Number of redemptions the voucher allows.
        #[arg(short, long)]
        uses: u64,

        /// Metadata entry as key=value (repeatable).
        #[arg(short, long = "meta", value_parser = parse_key_val)]
        meta: Vec<(String, String)>,

        /// Fail instead of overwriting when metadata uses a reserved field.
        #[arg(long)]
        reject_reserved: bool,
    },

    /// Show every field of a voucher.
    Get {
        /// Voucher code.
        code: String,

        /// Output format (table, json).
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Redeem one use of a voucher.
    Redeem {
        /// Voucher code.
        code: String,
    },

    /// Create a voucher and attempt several sequential redemptions.
    Demo {
        /// Uses given to the demo voucher.
        #[arg(short, long, default_value_t = defaults::DEMO_USES)]
        uses: u64,

        /// Number of redemption attempts.
        #[arg(short, long, default_value_t = defaults::DEMO_ATTEMPTS)]
        attempts: u32,
    },
}

/// CLI failure, split by what the user should be told.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Config file could not be loaded or failed validation.
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    /// The backend could not serve the request.
    #[error("service unavailable: {0}")]
    Service(VoucherError),

    /// Redemption refused: the voucher is exhausted or never existed.
    #[error("voucher invalid or exhausted")]
    NotRedeemable,

    /// No voucher is stored under the code.
    #[error("voucher not found: {0}")]
    NotFound(String),

    /// The request itself was rejected (bad arguments or metadata).
    #[error("{0}")]
    Usage(String),

    /// Writing command output failed.
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

impl From<VoucherError> for CliError {
    fn from(err: VoucherError) -> Self {
        match err {
            VoucherError::ReservedField(_) | VoucherError::InvalidUses(_) => {
                Self::Usage(err.to_string())
            }
            other => Self::Service(other),
        }
    }
}

/// Field row for display.
#[derive(Tabled)]
struct FieldDisplay {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Parse a `key=value` metadata argument.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid metadata '{s}': expected key=value"))?;
    if key.trim().is_empty() {
        return Err(format!("invalid metadata '{s}': empty key"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

/// Order fields for display: reserved fields first, then metadata by name.
fn sorted_fields(fields: &Fields) -> Vec<(&str, &str)> {
    let mut rows: Vec<(&str, &str)> = fields
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    rows.sort_by_key(|(k, _)| (*k != FIELD_USES, *k != FIELD_CREATED_AT, *k));
    rows
}

fn init_tracing(level: Option<&str>) {
    let level = level.unwrap_or(defaults::DEFAULT_LOG_LEVEL);
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

/// Load the config file (if any) and apply command-line overrides.
fn resolve_config(args: &VoucherArgs) -> Result<Config, CliError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &args.overrides);
    voucher_config::validate_config(&config)?;
    Ok(config)
}

/// Build the store/engine configuration from the file configuration.
pub fn store_config(config: &Config) -> Result<StoreConfig, CliError> {
    let policy: ReservedFieldPolicy = config
        .store
        .reserved_fields
        .parse()
        .map_err(CliError::Usage)?;
    Ok(StoreConfig::default()
        .key_prefix(config.store.key_prefix.clone())
        .reserved_fields(policy))
}

/// Apply per-command settings on top of the file configuration.
fn command_store_config(base: StoreConfig, command: &VoucherCommands) -> StoreConfig {
    match command {
        VoucherCommands::Create {
            reject_reserved: true,
            ..
        } => base.reserved_fields(ReservedFieldPolicy::Reject),
        _ => base,
    }
}

/// Open the configured backend.
pub async fn connect_backend(config: &Config) -> Result<Arc<dyn VoucherBackend>, CliError> {
    if config.backend.is_memory() {
        return Ok(Arc::new(MemoryBackend::new()));
    }
    connect_redis(config).await
}

#[cfg(feature = "redis")]
async fn connect_redis(config: &Config) -> Result<Arc<dyn VoucherBackend>, CliError> {
    use crate::redis_backend::{RedisBackend, RedisConfig};

    let redis_config = RedisConfig::new(config.backend.redis_url.clone())
        .connection_timeout(Duration::from_millis(config.backend.connection_timeout_ms))
        .response_timeout(Duration::from_millis(config.backend.response_timeout_ms))
        .number_of_retries(config.backend.number_of_retries);
    let backend = RedisBackend::connect(redis_config).await?;
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(_config: &Config) -> Result<Arc<dyn VoucherBackend>, CliError> {
    Err(CliError::Usage(
        "built without redis support; use --memory".to_string(),
    ))
}

/// Create a voucher and print its code.
pub async fn create_voucher<B: VoucherBackend>(
    store: &VoucherStore<B>,
    uses: u64,
    meta: &[(String, String)],
    out: &mut impl Write,
) -> Result<(), CliError> {
    let metadata: Metadata = meta.iter().cloned().collect();
    let metadata = (!metadata.is_empty()).then_some(metadata);
    let code = store.create(uses, metadata.as_ref()).await?;
    writeln!(out, "{code}")?;
    Ok(())
}

/// Print every field of a voucher.
pub async fn show_voucher<B: VoucherBackend>(
    store: &VoucherStore<B>,
    code: &str,
    format: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let fields = store.get(code).await?;
    if fields.is_empty() {
        return Err(CliError::NotFound(code.to_string()));
    }

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&fields)
                .map_err(|e| CliError::Usage(e.to_string()))?;
            writeln!(out, "{json}")?;
        }
        _ => {
            let rows: Vec<FieldDisplay> = sorted_fields(&fields)
                .into_iter()
                .map(|(field, value)| FieldDisplay {
                    field: field.to_string(),
                    value: value.to_string(),
                })
                .collect();
            writeln!(out, "{}", Table::new(rows))?;
        }
    }
    Ok(())
}

/// Redeem one use and print the remaining count.
pub async fn redeem_voucher<B: VoucherBackend>(
    engine: &RedemptionEngine<B>,
    code: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match engine.try_redeem(code).await? {
        Redemption::Redeemed { remaining } => {
            writeln!(out, "Voucher redeemed. Remaining uses: {remaining}")?;
            Ok(())
        }
        Redemption::NotRedeemable => Err(CliError::NotRedeemable),
    }
}

/// Create a voucher with sample metadata and attempt `attempts` redemptions.
///
/// Returns the result of every attempt in order.
pub async fn run_demo<B: VoucherBackend>(
    store: &VoucherStore<B>,
    engine: &RedemptionEngine<B>,
    uses: u64,
    attempts: u32,
    out: &mut impl Write,
) -> Result<Vec<i64>, CliError> {
    let metadata: Metadata = [
        ("description", "10% off on all items"),
        ("expiry_date", "2024-12-31T23:59:59"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let code = store.create(uses, Some(&metadata)).await?;
    writeln!(out, "Voucher '{code}' generated with {uses} uses.")?;

    writeln!(out, "\nVoucher Metadata:")?;
    let fields = store.get(code.as_str()).await?;
    for (key, value) in sorted_fields(&fields) {
        writeln!(out, "{key}: {value}")?;
    }

    let mut results = Vec::with_capacity(attempts as usize);
    for attempt in 1..=attempts {
        writeln!(out, "\nAttempt {attempt} to redeem voucher:")?;
        let result = engine.redeem(code.as_str()).await?;
        if result >= 0 {
            writeln!(
                out,
                "Voucher '{code}' redeemed successfully. Remaining uses: {result}."
            )?;
        } else {
            writeln!(
                out,
                "Voucher '{code}' has been fully redeemed or does not exist."
            )?;
        }
        results.push(result);
    }

    Ok(results)
}

/// Run the voucher CLI with the given arguments.
///
/// This is the main entry point for the voucher CLI, used by both the
/// standalone binary and the unified voucher-rs CLI.
pub async fn run(args: VoucherArgs) -> Result<(), CliError> {
    let config = resolve_config(&args)?;
    init_tracing(config.logging.level.as_deref());

    let store_config = command_store_config(store_config(&config)?, &args.command);

    let backend = connect_backend(&config).await.inspect_err(|e| {
        if let CliError::Service(err) = e {
            warn!(error = %err, kind = err.kind(), "voucher backend connection failed");
        }
    })?;
    info!(
        version = voucher_core::VERSION,
        backend = %config.backend.kind,
        "voucher backend ready"
    );

    let store = VoucherStore::with_config(backend.clone(), store_config.clone());
    let engine = RedemptionEngine::with_config(backend, store_config);
    let mut out = io::stdout();

    match args.command {
        VoucherCommands::Create { uses, meta, .. } => {
            create_voucher(&store, uses, &meta, &mut out).await
        }
        VoucherCommands::Get { code, format } => {
            show_voucher(&store, &code, &format, &mut out).await
        }
        VoucherCommands::Redeem { code } => redeem_voucher(&engine, &code, &mut out).await,
        VoucherCommands::Demo { uses, attempts } => {
            run_demo(&store, &engine, uses, attempts, &mut out)
                .await
                .map(|_| ())
        }
    }
}
