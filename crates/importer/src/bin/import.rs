use clap::{Parser, Subcommand};
use importer::{
    CatalogLoader, CatalogValidator, FieldSource, ImportSummary, JsonFileSource,
    sources::json_file::discover_json_files,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "field-import")]
#[command(about = "Loads curated soccer field lists into the field database", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Not needed with --validate-only
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a single catalog file
    File {
        file: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
    /// Import every catalog file under a directory
    Bulk {
        #[arg(long, default_value = "./imports")]
        directory: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("field_import={},importer={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::File {
            file,
            validate_only,
        } => {
            let pool = connect(validate_only, cli.database_url.as_deref()).await?;
            let summary = process_file(&JsonFileSource::new(file), pool.as_ref()).await?;
            log_summary(summary, validate_only);
        }
        Commands::Bulk {
            directory,
            validate_only,
        } => {
            handle_bulk_import(directory, validate_only, cli.database_url.as_deref()).await?;
        }
    }

    Ok(())
}

async fn connect(
    validate_only: bool,
    database_url: Option<&str>,
) -> Result<Option<PgPool>, Box<dyn std::error::Error>> {
    if validate_only {
        return Ok(None);
    }

    let database_url = database_url.ok_or("DATABASE_URL is required unless --validate-only")?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(Some(pool))
}

async fn handle_bulk_import(
    directory: PathBuf,
    validate_only: bool,
    database_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Scanning directory for field catalogs: {}", directory.display());

    let json_files = discover_json_files(&directory).await?;
    if json_files.is_empty() {
        tracing::warn!("No JSON files found in {}", directory.display());
        return Ok(());
    }
    tracing::info!("Found {} catalog file(s)", json_files.len());

    let pool = connect(validate_only, database_url).await?;

    let mut total = ImportSummary::default();
    let mut error_count = 0;

    for (idx, file_path) in json_files.iter().enumerate() {
        tracing::info!(
            "[{}/{}] Processing: {}",
            idx + 1,
            json_files.len(),
            file_path.display()
        );

        match process_file(&JsonFileSource::new(file_path), pool.as_ref()).await {
            Ok(summary) => total.merge(summary),
            Err(e) => {
                error_count += 1;
                tracing::error!("  Failed: {}", e);
            }
        }
    }

    log_summary(total, validate_only);

    if error_count > 0 {
        return Err(format!("{} file(s) failed to import", error_count).into());
    }

    Ok(())
}

async fn process_file(
    source: &dyn FieldSource,
    pool: Option<&PgPool>,
) -> Result<ImportSummary, Box<dyn std::error::Error>> {
    tracing::info!("Loading field catalog from: {}", source.describe());
    let catalog = source.load().await?;

    let report = CatalogValidator::validate(&catalog)?;
    report.log_warnings();
    tracing::info!("Validated {} field(s)", catalog.fields.len());

    match pool {
        Some(pool) => Ok(CatalogLoader::new(pool).import(&catalog).await?),
        None => Ok(ImportSummary::default()),
    }
}

fn log_summary(summary: ImportSummary, validate_only: bool) {
    if validate_only {
        tracing::info!("Validation finished, nothing was written");
    } else {
        tracing::info!(
            "Import finished: {} inserted, {} already present",
            summary.inserted,
            summary.skipped
        );
    }
}
