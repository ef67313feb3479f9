use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use project_estimator::api::{self, SecurityConfig, SharedStore};
use project_estimator::catalog;
use project_estimator::client::EstimatorClient;
use project_estimator::db::{Database, MemoryStore};
use project_estimator::estimation::{self, Calculation};
use project_estimator::models::*;

#[derive(Parser)]
#[command(name = "estimator", version)]
#[command(about = "Project hours and cost estimation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Where saved estimates live
        #[arg(long, value_enum, default_value_t = StorageKind::Sqlite)]
        storage: StorageKind,

        /// SQLite file (defaults to the platform data directory)
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
    /// Compute an estimate
    Estimate(EstimateArgs),
    /// List estimates saved on a running server
    List,
    /// Show one saved estimate
    Show { id: i64 },
    /// Print the feature catalog and tech multipliers
    Catalog,
}

#[derive(Clone, Copy, ValueEnum)]
enum StorageKind {
    Memory,
    Sqlite,
}

#[derive(clap::Args)]
struct EstimateArgs {
    /// Project name (required with --save)
    #[arg(long)]
    name: Option<String>,

    /// Project type (web-app, mobile-app, api, ecommerce, cms, saas, other)
    #[arg(long = "type", default_value = "")]
    project_type: String,

    /// Feature ids, repeatable or comma-separated
    #[arg(short, long = "feature", value_delimiter = ',')]
    features: Vec<String>,

    #[arg(short, long, value_enum, default_value_t = Complexity::Medium)]
    complexity: Complexity,

    #[arg(long, default_value = "react")]
    frontend: String,

    #[arg(long, default_value = "nodejs")]
    backend: String,

    #[arg(long, default_value = "postgresql")]
    database: String,

    #[arg(long, default_value = "cloud")]
    deployment: String,

    /// Hourly rate in currency units
    #[arg(short, long, default_value_t = DEFAULT_HOURLY_RATE)]
    rate: u64,

    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,

    /// Ask a running server to compute instead of computing locally
    #[arg(long)]
    remote: bool,

    /// Save the estimate to a running server
    #[arg(long, requires = "name")]
    save: bool,
}

impl EstimateArgs {
    fn into_project_data(self) -> ProjectData {
        ProjectData {
            project_name: self.name.unwrap_or_default(),
            project_type: self.project_type,
            selected_features: self.features,
            tech_stack: TechStack::new(
                self.frontend,
                self.backend,
                self.database,
                self.deployment,
            ),
            complexity: self.complexity,
            hourly_rate: self.rate,
        }
    }
}

/// Initialize tracing to stderr (client commands) or stdout (server)
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "project_estimator=debug,tower_http=debug".into()),
    );

    if use_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Client commands print results on stdout
    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    match cli.command {
        Some(Commands::Serve {
            port,
            storage,
            db_path,
        }) => serve(port, storage, db_path).await?,
        None => serve(3000, StorageKind::Sqlite, None).await?,
        Some(Commands::Estimate(args)) => {
            let json = args.json;
            let remote = args.remote;
            let save = args.save;
            let data = args.into_project_data();
            let calculation = if remote {
                EstimatorClient::from_env().calculate(&data).await?
            } else {
                estimation::calculate(&data)
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&calculation)?);
            } else {
                print_calculation(&data, &calculation);
            }

            if save {
                let client = EstimatorClient::from_env();
                let saved = client
                    .create_estimate(&estimation::to_new_estimate(data)?)
                    .await?;
                println!("Saved estimate #{}", saved.id);
            }
        }
        Some(Commands::List) => {
            let estimates = EstimatorClient::from_env().list_estimates().await?;
            if estimates.is_empty() {
                println!("No saved estimates.");
            }
            for e in estimates {
                println!(
                    "#{:<5} {:<30} {:>6} h {:>10}  {}",
                    e.id,
                    e.data.project_name,
                    e.data.total_hours,
                    e.data.total_cost,
                    e.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Some(Commands::Show { id }) => {
            let estimate = EstimatorClient::from_env().get_estimate(id).await?;
            println!("{}", serde_json::to_string_pretty(&estimate)?);
        }
        Some(Commands::Catalog) => {
            for category in FeatureCategory::ALL {
                println!("{}", category.as_str());
                for f in catalog::features_in(category) {
                    println!(
                        "  {:<14} {:<28} {:>4} h  ({} / {} / {})",
                        f.id,
                        f.name,
                        f.base_hours,
                        f.complexity_multiplier.simple,
                        f.complexity_multiplier.medium,
                        f.complexity_multiplier.complex
                    );
                }
            }
            println!();
            for axis in TechAxis::ALL {
                let options: Vec<String> = catalog::multiplier_table(axis)
                    .iter()
                    .map(|(key, m)| format!("{}={}", key, m))
                    .collect();
                println!("{:<11} {}", axis.as_str(), options.join(", "));
            }
        }
    }

    Ok(())
}

async fn serve(port: u16, storage: StorageKind, db_path: Option<PathBuf>) -> anyhow::Result<()> {
    let store: SharedStore = match storage {
        StorageKind::Memory => {
            tracing::info!("Using in-memory estimate storage");
            Arc::new(MemoryStore::new())
        }
        StorageKind::Sqlite => {
            let path = match db_path {
                Some(path) => path,
                None => Database::default_path()?,
            };
            tracing::info!("Using SQLite estimate storage at {}", path.display());
            let db = Database::open(path)?;
            db.migrate()?;
            Arc::new(db)
        }
    };

    let app = api::create_router_with_config(store, SecurityConfig::from_env());

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Estimator server listening on http://127.0.0.1:{}", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

fn print_calculation(data: &ProjectData, calc: &Calculation) {
    if !data.project_name.is_empty() {
        println!("Project:     {}", data.project_name);
    }
    println!(
        "Features:    {} matched of {} selected",
        calc.matched_features.len(),
        data.selected_features.len()
    );
    println!("Complexity:  {}", data.complexity.as_str());
    println!(
        "Stack:       {} / {} / {} / {} (x{:.3})",
        data.tech_stack.frontend,
        data.tech_stack.backend,
        data.tech_stack.database,
        data.tech_stack.deployment,
        calc.average_multiplier
    );
    println!();
    println!(
        "Total:       {} h ({} weeks) = {}",
        calc.total_hours, calc.estimated_weeks, calc.total_cost
    );
    println!(
        "             {} h development + {} h testing",
        calc.hour_split.development_hours, calc.hour_split.testing_hours
    );
    println!();
    println!("Breakdown at {}/h:", data.hourly_rate);
    for category in FeatureCategory::ALL {
        println!(
            "  {:<15} {:>10}",
            category.as_str(),
            calc.breakdown.category(category)
        );
    }
    println!("  {:<15} {:>10}", "testing", calc.breakdown.testing);
    println!("  {:<15} {:>10}", "total", calc.breakdown.total);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("estimator").chain(args.iter().copied()))
    }

    #[test]
    fn save_requires_a_project_name() {
        let err = parse(&["estimate", "--save", "-f", "crud"])
            .err()
            .expect("--save without --name should be rejected");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn save_with_name_parses() {
        let cli = parse(&["estimate", "--save", "--name", "Shop", "-f", "crud,payment"]).unwrap();
        let Some(Commands::Estimate(args)) = cli.command else {
            panic!("expected estimate command");
        };
        let data = args.into_project_data();
        assert_eq!(data.project_name, "Shop");
        assert_eq!(data.selected_features, vec!["crud", "payment"]);
    }

    #[test]
    fn local_estimate_needs_no_name() {
        let cli = parse(&["estimate", "-f", "crud"]).unwrap();
        let Some(Commands::Estimate(args)) = cli.command else {
            panic!("expected estimate command");
        };
        assert_eq!(args.into_project_data().project_name, "");
    }
}
