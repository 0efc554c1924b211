//! HARICA portal client - command line entry point
//!
//! Issues server certificates through the HARICA certificate manager using a
//! requester and a validator account, and exposes a few read-only listings.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use harica_client::{
    CertificateOperations, Credentials, IssuanceOrchestrator, IssuanceRequest, PortalConfig,
    SessionManager, DEFAULT_BASE_URL,
};

/// harica - automate certificate issuance on the HARICA portal
#[derive(Parser, Debug)]
#[command(name = "harica")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Portal base URL
    #[arg(long = "base-url", env = "HARICA_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Enable debug logging, including portal requests and responses
    #[arg(long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Request a certificate, approve it and print the PEM bundle
    GenCert(GenCertArgs),
    /// Print the domain validations on record for an account
    DomainValidations(AccountArgs),
    /// Print the revocation reasons offered by the portal
    RevocationReasons(AccountArgs),
}

#[derive(Args, Debug)]
struct GenCertArgs {
    /// Domains to certify, comma separated
    #[arg(short = 'd', long = "domains", value_delimiter = ',', required = true)]
    domains: Vec<String>,

    /// PEM encoded certificate signing request
    #[arg(long = "csr")]
    csr: String,

    /// Validation level of the request
    #[arg(short = 't', long = "transaction-type", default_value = "DV")]
    transaction_type: String,

    #[arg(long = "requester-email", env = "HARICA_REQUESTER_EMAIL")]
    requester_email: String,

    #[arg(long = "requester-password", env = "HARICA_REQUESTER_PASSWORD", hide_env_values = true)]
    requester_password: String,

    /// Base32 two-factor seed of the requester
    #[arg(long = "requester-totp-seed", env = "HARICA_REQUESTER_TOTP_SEED", hide_env_values = true)]
    requester_totp_seed: String,

    #[arg(long = "validator-email", env = "HARICA_VALIDATOR_EMAIL")]
    validator_email: String,

    #[arg(long = "validator-password", env = "HARICA_VALIDATOR_PASSWORD", hide_env_values = true)]
    validator_password: String,

    /// Base32 two-factor seed of the validator
    #[arg(long = "validator-totp-seed", env = "HARICA_VALIDATOR_TOTP_SEED", hide_env_values = true)]
    validator_totp_seed: String,
}

#[derive(Args, Debug)]
struct AccountArgs {
    #[arg(long = "email", env = "HARICA_EMAIL")]
    email: String,

    #[arg(long = "password", env = "HARICA_PASSWORD", hide_env_values = true)]
    password: String,

    /// Base32 two-factor seed, if the account uses two-factor login
    #[arg(long = "totp-seed", env = "HARICA_TOTP_SEED", hide_env_values = true)]
    totp_seed: Option<String>,
}

impl AccountArgs {
    fn credentials(&self) -> Credentials {
        let credentials = Credentials::new(&self.email, &self.password);
        match &self.totp_seed {
            Some(seed) => credentials.with_totp_seed(seed),
            None => credentials,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = PortalConfig::new(&cli.base_url)
        .with_context(|| format!("Invalid portal URL '{}'", cli.base_url))?
        .with_debug(cli.debug);

    match cli.command {
        Commands::GenCert(args) => gen_cert(config, args).await,
        Commands::DomainValidations(args) => {
            let operations = connect(config, args.credentials(), "account").await?;
            let result = operations
                .domain_validations()
                .await
                .context("Failed to list domain validations");
            finish(&[operations.session()]).await;
            print_json(&result?)
        }
        Commands::RevocationReasons(args) => {
            let operations = connect(config, args.credentials(), "account").await?;
            let result = operations
                .revocation_reasons()
                .await
                .context("Failed to list revocation reasons");
            finish(&[operations.session()]).await;
            print_json(&result?)
        }
    }
}

/// Initialize logging to stderr; stdout carries only results
fn init_logging(debug: bool) {
    let log_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn connect(config: PortalConfig, credentials: Credentials, role: &str) -> Result<CertificateOperations> {
    let email = credentials.email().to_string();
    let manager = SessionManager::connect(config, credentials)
        .await
        .with_context(|| format!("Failed to log in {role} {email}"))?;

    Ok(CertificateOperations::new(manager))
}

async fn gen_cert(config: PortalConfig, args: GenCertArgs) -> Result<()> {
    let requester_credentials = Credentials::new(&args.requester_email, &args.requester_password)
        .with_totp_seed(&args.requester_totp_seed);
    let validator_credentials = Credentials::new(&args.validator_email, &args.validator_password)
        .with_totp_seed(&args.validator_totp_seed);

    let requester = connect(config.clone(), requester_credentials, "requester").await?;
    let validator = match connect(config, validator_credentials, "validator").await {
        Ok(validator) => validator,
        Err(e) => {
            finish(&[requester.session()]).await;
            return Err(e);
        }
    };

    info!(
        domains = ?args.domains,
        transaction_type = %args.transaction_type,
        "Issuing certificate"
    );

    let orchestrator = IssuanceOrchestrator::new(requester, validator);
    let request = IssuanceRequest::new(args.domains, args.csr, args.transaction_type);
    let result = orchestrator
        .issue(&request)
        .await
        .context("Certificate issuance failed");

    finish(&[
        orchestrator.requester().session(),
        orchestrator.validator().session(),
    ])
    .await;

    let pem = result?;
    print!("{pem}");
    Ok(())
}

/// Stop background renewal for every session
async fn finish(sessions: &[&Arc<SessionManager>]) {
    for session in sessions {
        if let Err(e) = session.shutdown().await {
            warn!(error = %e, "Session shutdown failed");
        }
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render portal answer")?;
    println!("{rendered}");
    Ok(())
}
