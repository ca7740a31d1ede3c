use anyhow::Context;
use clap::Parser;
use fx_wifi_ga::bootstrap::{Configuration, bootstrap_optimizer, default_coverage_radius};
use fx_wifi_ga::models::{
    DEFAULT_AREA_SIZE, DEFAULT_ELITISM_COUNT, DEFAULT_GENERATIONS, DEFAULT_MUTATION_RATE,
    DEFAULT_POPULATION_SIZE, Request, Schedule,
};
use fx_wifi_ga::service::{DEFAULT_LOG_INTERVAL, NoopPublisher};
use rand::{SeedableRng, rngs::StdRng};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Places wireless access points over an area of users with a genetic algorithm.
///
/// The best placement found is printed to stdout as JSON, progress goes to stderr.
#[derive(Parser, Debug)]
#[command(name = "fx-wifi-ga", version)]
struct Args {
    /// Number of access points to place
    #[arg(short, long)]
    ap_count: usize,

    /// Users file with one `x,y,demand` record per line
    #[arg(short, long)]
    users: Option<PathBuf>,

    /// Synthetic users appended after those read from the users file
    #[arg(short, long, default_value_t = 0)]
    synthetic_users: usize,

    /// Side length of the square area
    #[arg(long, default_value_t = DEFAULT_AREA_SIZE)]
    area_size: i32,

    /// Coverage radius, derived from users per access point when omitted
    #[arg(long)]
    coverage_radius: Option<f64>,

    #[arg(long, default_value_t = DEFAULT_POPULATION_SIZE)]
    population: usize,

    #[arg(long, default_value_t = DEFAULT_GENERATIONS)]
    generations: u32,

    /// Individuals carried over into the next generation
    #[arg(long, default_value_t = DEFAULT_ELITISM_COUNT)]
    elitism: usize,

    #[arg(long, default_value_t = DEFAULT_MUTATION_RATE)]
    mutation_rate: f64,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many generations without improvement
    #[arg(long)]
    stagnation: Option<u32>,

    /// Generations between progress log lines, 0 disables them
    #[arg(long, default_value_t = DEFAULT_LOG_INTERVAL)]
    log_interval: u32,

    /// Seconds between status lines while a run is in progress, 0 disables them
    #[arg(long, default_value_t = 5)]
    status_interval: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let config = Configuration {
        users_file: args.users.clone(),
        synthetic_users: args.synthetic_users,
        area_size: args.area_size,
    };
    let service = bootstrap_optimizer(&config, &mut rng)?
        .with_log_interval(args.log_interval)
        .build();

    let coverage_radius = args
        .coverage_radius
        .unwrap_or_else(|| default_coverage_radius(service.users().len(), args.ap_count));

    let mut schedule = Schedule::generational(args.generations);
    if let Some(limit) = args.stagnation {
        schedule = schedule.with_stagnation_limit(limit);
    }
    let request = Request::new(args.ap_count, coverage_radius)
        .with_area_size(args.area_size)
        .with_population(args.population, args.elitism)
        .with_mutation_rate(args.mutation_rate)
        .with_schedule(schedule);

    let reader = service.best_result();
    let status_every = Duration::from_secs(args.status_interval);
    let status = (!status_every.is_zero()).then(move || {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(status_every);
            interval.tick().await;
            loop {
                interval.tick().await;
                match reader.snapshot() {
                    Some(best) => tracing::info!(
                        generation = best.generation(),
                        score = best.score(),
                        "Current best placement"
                    ),
                    None => tracing::info!("No placement evaluated yet"),
                }
            }
        })
    });

    // The run continues the stream that synthesized the users
    let outcome = tokio::task::spawn_blocking(move || {
        service.optimize_with(&request, &mut rng, &mut NoopPublisher)
    })
        .await
        .context("optimization task failed")?;

    if let Some(status) = status {
        status.abort();
    }

    let best = outcome?;
    println!("{}", serde_json::to_string_pretty(best.as_ref())?);

    Ok(())
}
