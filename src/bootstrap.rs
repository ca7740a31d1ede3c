use crate::models::{self, DEFAULT_AREA_SIZE};
use crate::service::{Service, ServiceBuilder};
use rand::Rng;
use std::path::PathBuf;
use tracing::instrument;

/// Smallest coverage radius picked by [`default_coverage_radius`].
pub const MIN_DEFAULT_COVERAGE_RADIUS: f64 = 20.0;

/// Where the users of an optimization come from.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub users_file: Option<PathBuf>,
    pub synthetic_users: usize,
    pub area_size: i32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            users_file: None,
            synthetic_users: 0,
            area_size: DEFAULT_AREA_SIZE,
        }
    }
}

/// Loads users from the configured file, appends synthetic users and
/// returns a builder over all of them.
#[instrument(level = "info", skip(config, rng), fields(users_file = ?config.users_file, synthetic_users = config.synthetic_users))]
pub fn bootstrap_optimizer<R: Rng>(
    config: &Configuration,
    rng: &mut R,
) -> anyhow::Result<ServiceBuilder> {
    let loaded = match &config.users_file {
        Some(path) => models::load_users(path)?,
        None => Vec::new(),
    };
    let synthesized = models::synthesize_users(rng, config.synthetic_users, config.area_size);

    let builder = Service::builder(loaded).with_users(synthesized);
    tracing::info!(
        users_count = builder.users().len(),
        mean_demand = models::mean_demand(builder.users()),
        "Users ready"
    );

    Ok(builder)
}

/// Radius scaled to the expected share of users per access point:
/// `max(20, floor(30 * sqrt(users / (5 * aps))))`.
pub fn default_coverage_radius(user_count: usize, ap_count: usize) -> f64 {
    if ap_count == 0 {
        return MIN_DEFAULT_COVERAGE_RADIUS;
    }

    let per_ap = user_count as f64 / (5 * ap_count) as f64;
    (30.0 * per_ap.sqrt()).floor().max(MIN_DEFAULT_COVERAGE_RADIUS)
}
