//! RD VAT Proxy entry point.

use std::io::Read;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde_json::Value;

use rd_vat::KeyNormalizer;
use rd_vat_proxy::config::{self, ProxyConfig, DEFAULT_ENDPOINT, SOAP_CONTENT_TYPE};
use rd_vat_proxy::render::{boxed, format_records, records_from_json, truncate};
use rd_vat_proxy::rest::{self, AppState};
use rd_vat_proxy::types::{BatchLookupRequest, LookupRequest};
use rd_vat_proxy::{logging, SoapClient, VatService};

/// Longest raw XML preview printed by `lookup --verbose`.
const RAW_PREVIEW_LEN: usize = 4000;

#[derive(Parser)]
#[command(
    name = "rd-vat-proxy",
    about = "RD VAT Proxy: SOAP to REST for the Revenue Department VAT service",
    version
)]
struct Cli {
    /// SOAP endpoint URL (default: RD_VAT_ENDPOINT or the production service).
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Upstream timeout in seconds (default: RD_VAT_TIMEOUT_SECS or 60).
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API (default).
    Serve {
        /// Listen address (host:port). Also reads RD_VAT_LISTEN.
        #[arg(long)]
        addr: Option<String>,
    },

    /// Look up one or more taxpayers and print the records.
    ///
    /// More than one --tin runs a batch lookup.
    Lookup {
        /// 13-digit taxpayer ID (repeatable).
        #[arg(long = "tin", num_args = 1..)]
        tins: Vec<String>,

        /// Shop or company name (single lookup only).
        #[arg(long)]
        name: Option<String>,

        /// Province code (0 = unknown).
        #[arg(long, default_value = "0")]
        province: i64,

        /// Branch number (0 = unknown).
        #[arg(long, default_value = "0")]
        branch: i64,

        /// District (amphur) code (0 = unknown).
        #[arg(long, default_value = "0")]
        amphur: i64,

        /// Service username. Also reads RD_VAT_USERNAME.
        #[arg(long)]
        username: Option<String>,

        /// Service password. Also reads RD_VAT_PASSWORD.
        #[arg(long)]
        password: Option<String>,

        /// Also print the raw XML response (truncated).
        #[arg(long)]
        verbose: bool,

        /// Print records as JSON instead of labelled boxes.
        #[arg(long)]
        json: bool,
    },

    /// Read a `{"data": [...]}` document from stdin and print each record.
    Render,

    /// Print endpoint and version information as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   rd-vat-proxy completions bash > ~/.local/share/bash-completion/completions/rd-vat-proxy
    ///   rd-vat-proxy completions zsh > ~/.zfunc/_rd-vat-proxy
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_json);

    let proxy_config = ProxyConfig::resolve(cli.endpoint.as_deref(), cli.timeout);

    match cli.command.unwrap_or(Commands::Serve { addr: None }) {
        Commands::Serve { addr } => {
            let addr = config::resolve_listen(addr.as_deref());
            tracing::info!("RD VAT Proxy");
            tracing::info!("Endpoint: {}", proxy_config.endpoint);
            let service = VatService::new(SoapClient::new(&proxy_config));
            rest::start(&addr, Arc::new(AppState::new(service))).await?;
        }

        Commands::Lookup {
            tins,
            name,
            province,
            branch,
            amphur,
            username,
            password,
            verbose,
            json,
        } => {
            let username = config::resolve_credential(username.as_deref(), config::ENV_USERNAME);
            let password = config::resolve_credential(password.as_deref(), config::ENV_PASSWORD);
            let service = VatService::new(SoapClient::new(&proxy_config));

            let result = if tins.len() > 1 {
                service
                    .lookup_batch(&BatchLookupRequest {
                        username,
                        password,
                        tins,
                    })
                    .await
            } else {
                service
                    .lookup(&LookupRequest {
                        username,
                        password,
                        tin: tins.into_iter().next(),
                        name,
                        province_code: province,
                        branch_number: branch,
                        amphur_code: amphur,
                    })
                    .await
            };

            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    eprintln!("เกิดข้อผิดพลาดระหว่างเรียก RD: {e}");
                    std::process::exit(1);
                }
            };

            if verbose {
                let preview = if outcome.raw_xml.is_empty() {
                    "-".to_string()
                } else {
                    truncate(&outcome.raw_xml, RAW_PREVIEW_LEN)
                };
                println!("{}", boxed("RAW XML (Preview)", &preview));
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.into_response())?);
                return Ok(());
            }

            if outcome.records.is_empty() {
                println!("ไม่พบข้อมูล");
                return Ok(());
            }

            let total = outcome.records.len();
            if total > 1 {
                println!("\nพบทั้งหมด {total} รายการ\n");
            }
            for block in format_records("ผลลัพธ์", &outcome.records) {
                println!("{block}");
            }
        }

        Commands::Render => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            let doc: Value = serde_json::from_str(&raw)?;
            let data = doc
                .get("data")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            let records = records_from_json(&data, &KeyNormalizer::default());
            if records.is_empty() {
                println!("ไม่พบข้อมูลใน data");
                return Ok(());
            }
            for block in format_records("Record", &records) {
                println!("{block}");
            }
        }

        Commands::Info => {
            let info = serde_json::json!({
                "rd_endpoint": proxy_config.endpoint,
                "production_endpoint": DEFAULT_ENDPOINT,
                "default_headers": { "Content-Type": SOAP_CONTENT_TYPE },
                "timeout_seconds": proxy_config.timeout.as_secs(),
                "version": env!("CARGO_PKG_VERSION"),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "rd-vat-proxy", &mut std::io::stdout());
        }
    }

    Ok(())
}
