use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

mod config;

use config::Config;
use hoops_winprob::adjust::{adjust_for_upset_trends, apply_experience_bonus, apply_home_court};
use hoops_winprob::model::Predictor;
use hoops_winprob::report::Report;
use hoops_winprob::stats::load_team_stats;

fn main() -> Result<()> {
    // Logs go to stderr so --json output stays clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;

    // Artifacts first: without them no prediction is meaningful
    let predictor = Predictor::from_dir(&config.artifacts_dir).with_context(|| {
        format!(
            "Cannot load model artifacts from {}",
            config.artifacts_dir.display()
        )
    })?;

    let stats_path = config.stats_path();
    let teams = load_team_stats(&stats_path).with_context(|| {
        format!(
            "Cannot load team stats from {}. Add a cached summary CSV at that path or pass --stats-csv.",
            stats_path.display()
        )
    })?;

    let team_a = teams.find(&config.team_a)?;
    let team_b = teams.find(&config.team_b)?;
    let location = config.location();
    let round = config.round()?;

    let (team_a, team_b) = if config.home_court_nudge {
        apply_home_court(team_a, team_b, location)
    } else {
        (team_a.clone(), team_b.clone())
    };

    let prediction = predictor.predict(&team_a, &team_b, location)?;
    if !prediction.unmatched.is_empty() {
        warn!(
            "{} of {} model features could not be derived from team stats and were zero-filled",
            prediction.unmatched.len(),
            predictor.bundle().len()
        );
    }
    info!(
        "{} vs {} ({}): model {:.3} / {:.3}",
        config.team_a, config.team_b, location, prediction.prob_a, prediction.prob_b
    );

    let mut report = Report::new(&config.team_a, &config.team_b, prediction);
    if config.experience_bonus {
        let probs = apply_experience_bonus(&team_a, &team_b, report.adjusted);
        report.apply("experience", probs);
    }
    let probs = adjust_for_upset_trends(&team_a, &team_b, report.adjusted, round);
    report.apply("upset", probs);

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    Ok(())
}
