//! Served users and the ways they enter an optimization run.
//!
//! Users are either read from a text file (one `x,y,demand` record per line)
//! or synthesized with positions drawn uniformly over the area and demand drawn
//! from a fixed discrete distribution.

use super::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::instrument;

/// Bandwidth levels a synthesized user may request.
pub const DEMAND_LEVELS: [f64; 4] = [0.5, 1.0, 2.0, 3.0];

/// Probability of each entry in [`DEMAND_LEVELS`].
pub const DEMAND_WEIGHTS: [f64; 4] = [0.3, 0.3, 0.2, 0.2];

/// One served client with a fixed position and bandwidth demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub position: Point,
    pub demand: f64,
}

impl User {
    pub const fn new(position: Point, demand: f64) -> Self {
        Self { position, demand }
    }

    /// Synthesizes a user: position first, then demand.
    pub fn random<R: Rng>(rng: &mut R, area_size: i32) -> Self {
        let position = Point::random(rng, area_size);
        let demand = sample_demand(rng);
        Self { position, demand }
    }
}

/// Draws a demand level by walking the cumulative weights.
fn sample_demand<R: Rng>(rng: &mut R) -> f64 {
    let spin = rng.random_range(0.0..1.0);
    let mut cumulative = 0.0;

    for (level, weight) in DEMAND_LEVELS.iter().zip(DEMAND_WEIGHTS.iter()) {
        cumulative += weight;
        if spin <= cumulative {
            return *level;
        }
    }

    // Rounding can leave the final cumulative sum a hair below 1.0
    DEMAND_LEVELS[DEMAND_LEVELS.len() - 1]
}

/// Synthesizes `count` users spread uniformly over the area.
#[instrument(level = "debug", skip(rng))]
pub fn synthesize_users<R: Rng>(rng: &mut R, count: usize, area_size: i32) -> Vec<User> {
    (0..count).map(|_| User::random(rng, area_size)).collect()
}

/// Average demand over all users, `0.0` when there are none.
pub fn mean_demand(users: &[User]) -> f64 {
    if users.is_empty() {
        return 0.0;
    }

    users.iter().map(|user| user.demand).sum::<f64>() / users.len() as f64
}

#[derive(Debug, thiserror::Error)]
pub enum UserParseError {
    #[error("MissingField: line {line} has no {field}")]
    MissingField { line: usize, field: &'static str },
    #[error("InvalidCoordinate: line {line}, {field}={value:?}")]
    InvalidCoordinate {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("InvalidDemand: line {line}, demand={value:?} must be a positive number")]
    InvalidDemand { line: usize, value: String },
    #[error("UnexpectedField: line {line} has more than three fields")]
    UnexpectedField { line: usize },
    #[error("Io: {0}")]
    Io(#[from] std::io::Error),
}

fn parse_coordinate(
    line: usize,
    field: &'static str,
    raw: Option<&str>,
) -> Result<i32, UserParseError> {
    let raw = raw.ok_or(UserParseError::MissingField { line, field })?.trim();
    raw.parse().map_err(|_| UserParseError::InvalidCoordinate {
        line,
        field,
        value: raw.to_string(),
    })
}

fn parse_demand(line: usize, raw: Option<&str>) -> Result<f64, UserParseError> {
    let raw = raw
        .ok_or(UserParseError::MissingField {
            line,
            field: "demand",
        })?
        .trim();

    match raw.parse::<f64>() {
        Ok(demand) if demand.is_finite() && demand > 0.0 => Ok(demand),
        _ => Err(UserParseError::InvalidDemand {
            line,
            value: raw.to_string(),
        }),
    }
}

/// Parses `x,y,demand` records. Blank lines and `#` comments are skipped.
pub fn parse_users(input: &str) -> Result<Vec<User>, UserParseError> {
    let mut users = Vec::new();

    for (index, record) in input.lines().enumerate() {
        let line = index + 1;
        let record = record.trim();
        if record.is_empty() || record.starts_with('#') {
            continue;
        }

        let mut fields = record.split(',');
        let x = parse_coordinate(line, "x", fields.next())?;
        let y = parse_coordinate(line, "y", fields.next())?;
        let demand = parse_demand(line, fields.next())?;
        if fields.next().is_some() {
            return Err(UserParseError::UnexpectedField { line });
        }

        users.push(User::new(Point::new(x, y), demand));
    }

    Ok(users)
}

/// Reads and parses a users file.
#[instrument(level = "info", skip(path), fields(path = %path.display()))]
pub fn load_users(path: &Path) -> Result<Vec<User>, UserParseError> {
    let contents = std::fs::read_to_string(path)?;
    let users = parse_users(&contents)?;
    tracing::info!(count = users.len(), "Loaded users from file");
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn it_parses_user_records() {
        let input = "10,20,2.5\n# comment\n\n 0 , 99 , 1\n";
        let users = parse_users(input).unwrap();

        assert_eq!(
            users,
            vec![
                User::new(Point::new(10, 20), 2.5),
                User::new(Point::new(0, 99), 1.0),
            ]
        );
    }

    #[test]
    fn it_reports_the_line_of_a_malformed_record() {
        let err = parse_users("1,2,3\n4,five,1\n").unwrap_err();
        assert!(matches!(
            err,
            UserParseError::InvalidCoordinate { line: 2, field: "y", .. }
        ));

        let err = parse_users("1,2\n").unwrap_err();
        assert!(matches!(
            err,
            UserParseError::MissingField {
                line: 1,
                field: "demand"
            }
        ));

        let err = parse_users("1,2,3,4\n").unwrap_err();
        assert!(matches!(err, UserParseError::UnexpectedField { line: 1 }));
    }

    #[test]
    fn it_rejects_non_positive_demand() {
        assert!(matches!(
            parse_users("1,2,0").unwrap_err(),
            UserParseError::InvalidDemand { line: 1, .. }
        ));
        assert!(matches!(
            parse_users("1,2,-1.5").unwrap_err(),
            UserParseError::InvalidDemand { line: 1, .. }
        ));
        assert!(matches!(
            parse_users("1,2,NaN").unwrap_err(),
            UserParseError::InvalidDemand { line: 1, .. }
        ));
    }

    #[test]
    fn it_synthesizes_users_from_the_demand_distribution() {
        let mut rng = StdRng::seed_from_u64(7);
        let users = synthesize_users(&mut rng, 10_000, 100);

        assert_eq!(users.len(), 10_000);
        assert!(users.iter().all(|u| DEMAND_LEVELS.contains(&u.demand)));
        assert!(
            users
                .iter()
                .all(|u| (0..100).contains(&u.position.x) && (0..100).contains(&u.position.y))
        );

        for (level, weight) in DEMAND_LEVELS.iter().zip(DEMAND_WEIGHTS.iter()) {
            let share = users.iter().filter(|u| u.demand == *level).count() as f64 / 10_000.0;
            assert!((share - weight).abs() < 0.03, "level {level}: {share}");
        }
    }

    #[test]
    fn it_synthesizes_the_same_users_from_the_same_seed() {
        let a = synthesize_users(&mut StdRng::seed_from_u64(3), 50, 100);
        let b = synthesize_users(&mut StdRng::seed_from_u64(3), 50, 100);
        assert_eq!(a, b);
    }

    #[test]
    fn it_averages_demand() {
        assert_eq!(mean_demand(&[]), 0.0);

        let users = [
            User::new(Point::new(0, 0), 1.0),
            User::new(Point::new(0, 0), 3.0),
        ];
        assert_eq!(mean_demand(&users), 2.0);
    }
}
