//! CNAE Command Line Tool
//!
//! Provides commands for working with CNAE lookups:
//! - validar: Check CNAE codes offline
//! - consolidar: Consolidate a saved upstream payload from disk
//! - consultar: Perform a live lookup against the Casa dos Dados API

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cnae_core::{consolidate, parse_result_mode, validate_codes, CnaeInput};
use cnae_http::CasaDosDadosClient;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cnae")]
#[command(version)]
#[command(about = "CNAE Command Line Tool - Validate codes and query Casa dos Dados")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate CNAE codes offline
    #[command(about = "Check whether codes have the 7-digit CNAE shape")]
    Validar {
        /// Codes to check (formatted codes like 7112-0/00 are accepted)
        #[arg(value_name = "CODE", required = true)]
        codes: Vec<String>,
    },

    /// Consolidate a saved upstream payload
    #[command(about = "Consolidate a saved upstream payload into one report")]
    Consolidar {
        /// Path to the JSON payload file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Queried codes, comma separated, in query order
        #[arg(long, value_delimiter = ',', required = true)]
        cnaes: Vec<String>,

        /// Companies kept per code (0 = unbounded)
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(0..=1000))]
        limite: u32,
    },

    /// Perform a live lookup
    #[command(about = "Query the Casa dos Dados API for companies by CNAE")]
    Consultar {
        /// Casa dos Dados API key
        #[arg(long)]
        api_key: String,

        /// Single CNAE code
        #[arg(long, conflicts_with = "cnaes")]
        cnae: Option<String>,

        /// Multiple CNAE codes, comma separated
        #[arg(long, value_delimiter = ',')]
        cnaes: Option<Vec<String>>,

        /// Result detail level: simples, completo or simple
        #[arg(long)]
        tipo: Option<String>,

        /// Companies kept per code (0 = unbounded)
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(0..=1000))]
        limite: u32,

        /// Upstream URL override (tests, staging)
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validar { codes } => handle_validar(codes),
        Commands::Consolidar {
            file,
            cnaes,
            limite,
        } => handle_consolidar(&file, cnaes, limite),
        Commands::Consultar {
            api_key,
            cnae,
            cnaes,
            tipo,
            limite,
            url,
        } => handle_consultar(api_key, cnae, cnaes, tipo, limite, url).await,
    }
}

fn handle_validar(codes: Vec<String>) -> Result<()> {
    let outcome = validate_codes(&CnaeInput::Multiple(codes));

    for code in &outcome.validos {
        println!("válido: {}", code);
    }
    for code in &outcome.invalidos {
        println!("inválido: {}", code);
    }
    println!(
        "{} válido(s), {} inválido(s)",
        outcome.total_validos(),
        outcome.total_invalidos()
    );

    if !outcome.todos_validos() {
        bail!("um ou mais CNAEs são inválidos");
    }
    Ok(())
}

fn handle_consolidar(file: &PathBuf, cnaes: Vec<String>, limite: u32) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    let payload: serde_json::Value = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse {} as JSON", file.display()))?;

    let outcome = validate_codes(&CnaeInput::Multiple(cnaes));
    if !outcome.todos_validos() {
        bail!("CNAEs inválidos: {}", outcome.invalidos.join(", "));
    }

    let report = consolidate(&payload, &outcome.validos, limite);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

async fn handle_consultar(
    api_key: String,
    cnae: Option<String>,
    cnaes: Option<Vec<String>>,
    tipo: Option<String>,
    limite: u32,
    url: Option<String>,
) -> Result<()> {
    let input = match (cnae, cnaes) {
        (Some(code), None) => CnaeInput::Single(code),
        (None, Some(codes)) => CnaeInput::Multiple(codes),
        _ => bail!("informe --cnae ou --cnaes"),
    };
    let multi = matches!(input, CnaeInput::Multiple(_));

    let outcome = validate_codes(&input);
    if !outcome.todos_validos() {
        bail!("CNAEs inválidos: {}", outcome.invalidos.join(", "));
    }

    let mode = parse_result_mode(tipo.as_deref())?;

    let client = match url {
        Some(url) => CasaDosDadosClient::with_base_url(url),
        None => CasaDosDadosClient::new(),
    };

    match client.lookup(&api_key, &outcome.validos, mode, limite).await {
        Ok(success) if multi => {
            let report = consolidate(&success.payload, &outcome.validos, limite);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Ok(success) => {
            println!("{}", serde_json::to_string_pretty(&success.payload)?);
            Ok(())
        }
        Err(failure) => bail!("consulta falhou ({}): {}", failure.status, failure.erro),
    }
}
