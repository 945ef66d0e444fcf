//! artist-rec CLI: top-N artist recommendations from a listening log.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use artist_rec::catalog::load_catalog;
use artist_rec::config::RecConfig;
use artist_rec::interaction::load_interactions;
use artist_rec::model::AlsModel;
use artist_rec::recommender::Recommender;

#[derive(Parser)]
#[command(name = "artist-rec", version, about = "ALS artist recommendations")]
struct Cli {
    /// TOML config file with [data] and [model] sections.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tab-separated user/artist/weight log (overrides config).
    #[arg(long, global = true)]
    interactions: Option<PathBuf>,

    /// Tab-separated artist catalog (overrides config).
    #[arg(long, global = true)]
    artists: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the model and print recommendations for a user.
    Recommend {
        /// User id (row of the interaction matrix).
        #[arg(long)]
        user: usize,

        /// Number of artists to return.
        #[arg(long, default_value = "10")]
        count: usize,

        /// Print JSON instead of `name: score` lines.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        model: ModelOverrides,
    },

    /// Print the catalog name of an artist id.
    Artist {
        /// Artist id.
        id: usize,
    },

    /// Show matrix and catalog statistics.
    Stats,

    /// Write the default configuration as TOML.
    InitConfig {
        /// Destination path.
        path: PathBuf,
    },
}

#[derive(Args)]
struct ModelOverrides {
    /// Number of latent factors.
    #[arg(long)]
    factors: Option<u32>,

    /// Number of ALS iterations.
    #[arg(long)]
    iterations: Option<u32>,

    /// L2 regularization.
    #[arg(long)]
    regularization: Option<f32>,

    /// RNG seed for reproducible factors.
    #[arg(long)]
    seed: Option<u64>,
}

impl ModelOverrides {
    fn apply(&self, config: &mut RecConfig) {
        if let Some(factors) = self.factors {
            config.model.factors = factors;
        }
        if let Some(iterations) = self.iterations {
            config.model.iterations = iterations;
        }
        if let Some(regularization) = self.regularization {
            config.model.regularization = regularization;
        }
        if let Some(seed) = self.seed {
            config.model.seed = Some(seed);
        }
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RecConfig::load(path)?,
        None => RecConfig::default(),
    };
    if let Some(path) = cli.interactions {
        config.data.interactions = path;
    }
    if let Some(path) = cli.artists {
        config.data.artists = path;
    }

    match cli.command {
        Commands::Recommend {
            user,
            count,
            json,
            model,
        } => {
            model.apply(&mut config);

            let matrix = load_interactions(&config.data.interactions)?;
            let catalog = load_catalog(&config.data.artists)?;

            let mut recommender = Recommender::new(catalog, AlsModel::new(config.model.clone()));
            recommender.fit(&matrix)?;
            let recs = recommender.recommend(user, &matrix, count)?;

            if json {
                let out = serde_json::to_string_pretty(&recs).into_diagnostic()?;
                println!("{out}");
            } else if recs.is_empty() {
                println!("No recommendations for user {user}.");
            } else {
                for rec in &recs {
                    println!("{}: {}", rec.name, rec.score);
                }
            }
        }

        Commands::Artist { id } => {
            let catalog = load_catalog(&config.data.artists)?;
            println!("{}", catalog.name_of(id)?);
        }

        Commands::Stats => {
            let matrix = load_interactions(&config.data.interactions)?;
            let catalog = load_catalog(&config.data.artists)?;
            let (users, items) = matrix.shape();
            let cells = (users * items).max(1) as f64;
            println!("Interactions: {}", config.data.interactions.display());
            println!("  shape:    {users} users x {items} artists");
            println!("  stored:   {}", matrix.nnz());
            println!("  density:  {:.4}%", 100.0 * matrix.nnz() as f64 / cells);
            println!("Catalog:    {}", config.data.artists.display());
            println!("  artists:  {}", catalog.len());
        }

        Commands::InitConfig { path } => {
            config.save(&path)?;
            println!("Wrote config to {}", path.display());
        }
    }

    Ok(())
}
