#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Operator CLI for the observatory.
//!
//! Drives the spreadsheet import workflow (analyze → review → confirm →
//! submit), queries the backend analytics endpoints, exports located events
//! as GeoJSON for external tooling, and downloads the generated PDF
//! bulletin.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Password};
use observatorio_client::{ApiClient, DEFAULT_BASE_URL};
use observatorio_client_models::ProposalCreate;
use observatorio_incident_models::IncidentRecord;
use observatorio_ingest_models::{ImportOptions, ValidationStatus};

#[derive(Parser)]
#[command(name = "observatorio", about = "Observatorio de Seguridad de Jamundí")]
struct Cli {
    /// Backend base URL (falls back to OBSERVATORIO_API_URL, then
    /// http://localhost:8000)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a CSV export, review findings, and submit the corrected rows
    Import {
        /// Path to the CSV file
        file: PathBuf,
        /// Submit without the interactive confirmation
        #[arg(long)]
        yes: bool,
        /// Analyze and review only; never submit
        #[arg(long)]
        dry_run: bool,
        /// Authenticate as this user before submitting (password prompted)
        #[arg(long)]
        username: Option<String>,
    },
    /// Backend dashboard statistics (or a local summary with --local)
    Stats {
        /// Compute the summary locally from the resumen download
        #[arg(long)]
        local: bool,
        /// Lower date bound (YYYY-MM-DD), resumen/local only
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Upper date bound (YYYY-MM-DD), resumen/local only
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Export located events as GeoJSON
    Geojson {
        /// Lower date bound (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Upper date bound (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Category filters (substring match, may repeat)
        #[arg(long)]
        category: Vec<String>,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Delete every incident from the backend
    Clear {
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Download the generated PDF bulletin
    Boletin {
        /// Output path
        #[arg(long, default_value = "boletin.pdf")]
        output: PathBuf,
    },
    /// Verify backend credentials
    Login {
        /// Username (password prompted)
        username: String,
    },
    /// List community proposals
    Propuestas {
        /// Filter by review status
        #[arg(long)]
        status: Option<String>,
    },
    /// Submit a community proposal
    Proponer {
        /// Short title
        #[arg(long)]
        title: String,
        /// Full proposal text
        #[arg(long)]
        description: String,
        /// Thematic category
        #[arg(long)]
        category: String,
        /// Neighborhood the proposal concerns
        #[arg(long)]
        barrio: String,
        /// Author display name
        #[arg(long)]
        author: Option<String>,
    },
}

fn base_url(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("OBSERVATORIO_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

#[allow(clippy::too_many_lines)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let mut client = ApiClient::new(base_url(cli.base_url));

    match cli.command {
        Commands::Import {
            file,
            yes,
            dry_run,
            username,
        } => {
            let results = observatorio_ingest::analyze_file(&file, &ImportOptions::default())?;
            print_review(&results);

            let corrected: Vec<IncidentRecord> =
                results.iter().map(|r| r.corrected.clone()).collect();
            let preview = observatorio_analytics::summarize_records(&corrected);
            println!();
            println!("Distribución del lote:");
            for slice in &preview.distribution {
                println!("  {:<30} {}", slice.name, slice.count);
            }

            if dry_run {
                println!();
                println!("Revisión finalizada (--dry-run): no se envió nada.");
                return Ok(());
            }

            if !yes {
                let proceed = Confirm::new()
                    .with_prompt(format!("¿Enviar {} registros al backend?", corrected.len()))
                    .default(false)
                    .interact()?;
                if !proceed {
                    println!("Importación cancelada.");
                    return Ok(());
                }
            }

            if let Some(username) = username {
                let password = Password::new().with_prompt("Contraseña").interact()?;
                client.login(&username, &password).await?;
            }

            let response = client.bulk_ingest(&corrected).await?;
            println!();
            println!("{}", response.message);
            let report = &response.report;
            println!(
                "Total: {}  Éxitos: {}  Errores: {}",
                report.total, report.success_count, report.error_count
            );
            for error in &report.errors {
                println!("  fila {}: {}", error.fila, error.error);
            }
        }
        Commands::Stats { local, start, end } => {
            if local {
                let incidents = client.resumen(start, end).await?;
                let summary = observatorio_analytics::summarize(&incidents);
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let kpis = client.kpis().await?;
                println!("Total incidentes:  {}", kpis.total_incidentes);
                println!("Tasa homicidios:   {} por 100k", kpis.tasa_homicidios);
                println!("Zonas críticas:    {}", kpis.zonas_criticas);
                println!();

                println!("Tendencia mensual:");
                for point in client.tendencia().await? {
                    println!(
                        "  {:<6} homicidios: {:<4} hurtos: {}",
                        point.name, point.homicidios, point.hurtos
                    );
                }
                println!();

                println!("Distribución por tipo:");
                for slice in client.distribucion().await? {
                    println!("  {:<30} {}", slice.name, slice.value);
                }
                println!();

                println!("Barrios con más delitos:");
                for barrio in client.top_barrios().await? {
                    println!("  {:<30} {}", barrio.name, barrio.delitos);
                }
            }
        }
        Commands::Geojson {
            start,
            end,
            category,
            output,
        } => {
            let collection = client.eventos_geojson(start, end, &category).await?;
            log::info!("received {} located events", collection.features.len());
            match output {
                Some(path) => {
                    std::fs::write(&path, collection.to_string())?;
                    println!("GeoJSON escrito en {}", path.display());
                }
                None => println!("{collection}"),
            }
        }
        Commands::Clear { yes } => {
            if !yes {
                let proceed = Confirm::new()
                    .with_prompt("¿Eliminar TODOS los incidentes del backend?")
                    .default(false)
                    .interact()?;
                if !proceed {
                    println!("Operación cancelada.");
                    return Ok(());
                }
            }
            let ack = client.clear_incidents().await?;
            println!("{}", ack.message);
        }
        Commands::Boletin { output } => {
            let bytes = client.generar_boletin().await?;
            std::fs::write(&output, &bytes)?;
            println!("Boletín guardado en {} ({} bytes)", output.display(), bytes.len());
        }
        Commands::Login { username } => {
            let password = Password::new().with_prompt("Contraseña").interact()?;
            client.login(&username, &password).await?;
            println!("Credenciales válidas para {username}.");
        }
        Commands::Propuestas { status } => {
            for proposal in client.propuestas(status.as_deref()).await? {
                println!(
                    "[{}] {} — {} ({}, {})",
                    proposal.status,
                    proposal.title,
                    proposal.barrio,
                    proposal.category,
                    proposal.created_at.format("%Y-%m-%d")
                );
            }
        }
        Commands::Proponer {
            title,
            description,
            category,
            barrio,
            author,
        } => {
            let created = client
                .crear_propuesta(&ProposalCreate {
                    title,
                    description,
                    category,
                    barrio,
                    author_name: author,
                })
                .await?;
            println!("Propuesta registrada con id {} ({}).", created.id, created.status);
        }
    }

    Ok(())
}

/// Prints the per-row review table and the per-status totals.
fn print_review(results: &[observatorio_ingest_models::ValidationResult]) {
    for (index, result) in results.iter().enumerate() {
        if result.status == ValidationStatus::Ok {
            continue;
        }
        println!("fila {:<5} [{}] {}", index + 1, result.status, result.message);
    }

    let count = |status: ValidationStatus| results.iter().filter(|r| r.status == status).count();
    println!();
    println!(
        "{} filas analizadas: {} ok, {} con advertencias, {} con errores",
        results.len(),
        count(ValidationStatus::Ok),
        count(ValidationStatus::Warning),
        count(ValidationStatus::Error),
    );
}
