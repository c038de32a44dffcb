use clap::Parser;
use std::path::PathBuf;

use hoops_winprob::adjust::TournamentRound;
use hoops_winprob::model::Location;

/// College basketball matchup win probabilities from a pre-trained logistic model
#[derive(Parser, Debug, Clone)]
#[command(name = "hoops-winprob", version, about)]
pub struct Config {
    /// Team A; its win probability is reported first
    #[arg(long, env = "HOOPS_TEAM_A")]
    pub team_a: String,

    /// Team B
    #[arg(long, env = "HOOPS_TEAM_B")]
    pub team_b: String,

    /// Game location from team A's side: home, away or neutral
    #[arg(long, env = "HOOPS_LOCATION", default_value = "neutral")]
    pub location: String,

    /// Tournament round (round1, round2, sweet16, elite8, final4, championship);
    /// enables seed-based upset priors
    #[arg(long, env = "HOOPS_ROUND")]
    pub round: Option<String>,

    /// Directory holding the exported logistic model artifacts
    #[arg(long, env = "HOOPS_ARTIFACTS_DIR", default_value = "models")]
    pub artifacts_dir: PathBuf,

    /// Directory holding cached team summary CSVs
    #[arg(long, env = "HOOPS_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Season of the cached summary to use (latest when omitted)
    #[arg(long, env = "HOOPS_SEASON")]
    pub season: Option<u16>,

    /// Explicit team summary CSV; overrides --data-dir/--season
    #[arg(long, env = "HOOPS_STATS_CSV")]
    pub stats_csv: Option<PathBuf>,

    /// Nudge efficiencies for home court before running the model
    #[arg(long, env = "HOOPS_HOME_COURT_NUDGE", default_value = "false")]
    pub home_court_nudge: bool,

    /// Apply the roster experience bonus to the model's probabilities
    #[arg(long, env = "HOOPS_EXPERIENCE_BONUS", default_value = "false")]
    pub experience_bonus: bool,

    /// Print the full report as JSON instead of text
    #[arg(long, env = "HOOPS_JSON", default_value = "false")]
    pub json: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.team_a.trim().is_empty() || self.team_b.trim().is_empty() {
            anyhow::bail!("team_a and team_b must both be named");
        }
        if self.team_a.trim().eq_ignore_ascii_case(self.team_b.trim()) {
            anyhow::bail!("team_a and team_b must be different teams");
        }
        if !self.artifacts_dir.is_dir() {
            anyhow::bail!(
                "artifacts_dir {} does not exist. Export the logistic model artifacts there first.",
                self.artifacts_dir.display()
            );
        }
        self.round()?;
        Ok(())
    }

    pub fn location(&self) -> Location {
        Location::parse(&self.location)
    }

    pub fn round(&self) -> anyhow::Result<Option<TournamentRound>> {
        self.round
            .as_deref()
            .map(|r| r.parse::<TournamentRound>().map_err(anyhow::Error::msg))
            .transpose()
    }

    /// Team summary CSV to read: the explicit path, else the season cache file.
    pub fn stats_path(&self) -> PathBuf {
        if let Some(path) = &self.stats_csv {
            return path.clone();
        }
        let file = match self.season {
            Some(season) => format!("kenpom_team_summaries_{}.csv", season),
            None => "kenpom_team_summaries.csv".to_string(),
        };
        self.data_dir.join(file)
    }
}
