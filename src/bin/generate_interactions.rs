use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songrec_api::{
    data::read_catalogue,
    synthetic::{self, GeneratorSettings},
};

/// Generate synthetic user-song interactions and co-occurrence counts
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Song catalogue CSV
    #[arg(short, long, default_value = "top50MusicFrom2010-2019.csv", env = "CATALOGUE_PATH")]
    catalogue: PathBuf,

    /// Directory the JSON files are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Number of simulated users
    #[arg(short, long, default_value_t = GeneratorSettings::default().users)]
    users: usize,

    /// Average share of the catalogue each user likes
    #[arg(short, long, default_value_t = GeneratorSettings::default().density)]
    density: f64,

    /// Seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "songrec_api=info,generate_interactions=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    if !(args.density > 0.0 && args.density <= 1.0) {
        anyhow::bail!("density must be in (0, 1], got {}", args.density);
    }

    let file = File::open(&args.catalogue)
        .with_context(|| format!("Failed to open {}", args.catalogue.display()))?;
    let songs = read_catalogue(file)
        .with_context(|| format!("Failed to read {}", args.catalogue.display()))?;
    tracing::info!(songs = songs.len(), path = %args.catalogue.display(), "Catalogue loaded");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let settings = GeneratorSettings {
        users: args.users,
        density: args.density,
    };
    let dataset = synthetic::generate(&songs, settings, &mut rng);

    let written = dataset
        .write_to(&args.output_dir)
        .with_context(|| format!("Failed to write to {}", args.output_dir.display()))?;

    let per_user: Vec<usize> = dataset.interactions.values().map(Vec::len).collect();
    tracing::info!(
        users = dataset.profiles.len(),
        total_interactions = dataset.total_interactions(),
        mean_per_user = dataset.total_interactions() as f64 / per_user.len().max(1) as f64,
        max_per_user = per_user.iter().max().copied().unwrap_or(0),
        min_per_user = per_user.iter().min().copied().unwrap_or(0),
        "Generation complete"
    );
    for path in written {
        tracing::info!(path = %path.display(), "Wrote");
    }

    Ok(())
}
