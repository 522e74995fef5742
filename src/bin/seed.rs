use std::env;
use std::io;

use anyhow::{Context, Result};
use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use hollacrm::{
    config::AppConfig,
    db,
    seed::{AttendancePolicy, SeedOptions, Seeder},
};

const USAGE: &str = "Usage: seed [--all-attendance] [--seed <u64>]";

struct SeedArgs {
    attendance_policy: AttendancePolicy,
    rng_seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            std::process::exit(1);
        }
    };

    dotenv::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "seed",
        database_url = %config.redacted_database_url(),
        pool_size = 1,
        attendance_policy = ?args.attendance_policy,
        "loaded backend configuration"
    );

    let pool = db::init_pool_with_size(&config.database_url, 1)?;
    let mut conn = pool.get().context("failed to get database connection")?;
    let applied = db::run_migrations(&mut conn).context("failed to run migrations")?;
    tracing::info!(component = "seed", applied, "database schema is up to date");

    let rng = match args.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let options = SeedOptions {
        attendance_policy: args.attendance_policy,
        admin_url: config.admin_url(),
    };
    let today = Local::now().date_naive();

    Seeder::new(&mut conn, rng, io::stdout().lock(), today, options)
        .run()
        .context("failed to seed demo data")?;

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<SeedArgs, String> {
    let mut parsed = SeedArgs {
        attendance_policy: AttendancePolicy::PresentAndAbsent,
        rng_seed: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--all-attendance" => parsed.attendance_policy = AttendancePolicy::AllStatuses,
            "--seed" => {
                let value = args.next().ok_or("--seed requires a value")?;
                let seed = value
                    .parse()
                    .map_err(|_| format!("--seed must be an unsigned integer, got {value}"))?;
                parsed.rng_seed = Some(seed);
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
    }

    Ok(parsed)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn defaults_to_parity_attendance() {
        let parsed = parse_args(args(&[])).unwrap();
        assert_eq!(parsed.attendance_policy, AttendancePolicy::PresentAndAbsent);
        assert!(parsed.rng_seed.is_none());
    }

    #[test]
    fn parses_flags() {
        let parsed = parse_args(args(&["--all-attendance", "--seed", "42"])).unwrap();
        assert_eq!(parsed.attendance_policy, AttendancePolicy::AllStatuses);
        assert_eq!(parsed.rng_seed, Some(42));
    }

    #[test]
    fn rejects_unknown_and_incomplete_arguments() {
        assert!(parse_args(args(&["--verbose"])).is_err());
        assert!(parse_args(args(&["--seed"])).is_err());
        assert!(parse_args(args(&["--seed", "abc"])).is_err());
    }
}
