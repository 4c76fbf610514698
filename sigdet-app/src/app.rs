use std::fs::{self, File};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sigdet_audio::{AudioSink, CpalSink, NullSink};
use sigdet_core::StandardPhase;
use sigdet_experiment::export::{self, RunRecord};
use sigdet_experiment::{ExperimentConfig, ExperimentRunner};
use sigdet_timing::MonotonicClock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::collector::ConsoleCollector;

#[derive(Parser, Debug)]
#[command(author, version, about = "Auditory signal-detection experiment")]
struct Args {
    /// Participant identifier; prompted for when omitted.
    #[arg(long)]
    participant: Option<String>,

    /// Seed for the trial-order permutation and noise, for reproducible
    /// re-analysis. Defaults to OS entropy (fresh order every session).
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config overriding the reference constants.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the CSV and JSON result files go.
    #[arg(long, default_value = "results")]
    out_dir: PathBuf,

    /// Dry run without an audio device (discards all stimuli).
    #[arg(long)]
    silent: bool,
}

pub struct App {
    args: Args,
    config: ExperimentConfig,
}

impl App {
    pub fn new() -> Result<Self> {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
            .init();

        let args = Args::parse();
        let config = match &args.config {
            Some(path) => ExperimentConfig::load(path)?,
            None => ExperimentConfig::default(),
        };
        config.validate()?;

        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        let participant = match self.args.participant.clone() {
            Some(p) => p,
            None => prompt_participant()?,
        };
        // The --participant flag bypasses the interactive prompt, so the id
        // is validated here regardless of where it came from.
        validate_participant(&participant)?;

        let rng = match self.args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let sink: Box<dyn AudioSink> = if self.args.silent {
            info!("silent mode: stimuli are synthesized but not played");
            Box::new(NullSink::new())
        } else {
            Box::new(CpalSink::new(self.config.sample_rate_hz)?)
        };

        let mut runner: ExperimentRunner<StandardPhase, _, _, _> =
            ExperimentRunner::new(self.config.clone(), MonotonicClock::new(), sink, rng)?;

        let cancel = runner.cancel_handle();
        ctrlc::set_handler(move || {
            cancel.store(true, Ordering::Relaxed);
        })
        .context("cannot install Ctrl-C handler")?;

        let mut collector = ConsoleCollector::new();
        runner.run(&mut collector)?;

        if runner.was_aborted() {
            info!("aborted; partial results are still exported");
        }
        self.export(&participant, &runner)?;
        Ok(())
    }

    fn export(
        &self,
        participant: &str,
        runner: &ExperimentRunner<StandardPhase, MonotonicClock, Box<dyn AudioSink>, StdRng>,
    ) -> Result<()> {
        fs::create_dir_all(&self.args.out_dir)
            .with_context(|| format!("cannot create {}", self.args.out_dir.display()))?;

        let csv_path = self.args.out_dir.join(format!("{participant}.csv"));
        let csv = File::create(&csv_path)
            .with_context(|| format!("cannot create {}", csv_path.display()))?;
        export::write_csv(csv, participant, runner.outcomes())?;

        let json_path = self.args.out_dir.join(format!("{participant}.json"));
        let json = File::create(&json_path)
            .with_context(|| format!("cannot create {}", json_path.display()))?;
        export::write_json(
            json,
            &RunRecord {
                participant,
                seed: self.args.seed,
                config: &self.config,
                outcomes: runner.outcomes(),
            },
        )?;

        info!(
            "results written to {} and {}",
            csv_path.display(),
            json_path.display()
        );
        Ok(())
    }
}

fn validate_participant(id: &str) -> Result<()> {
    if id.is_empty() || id.contains([',', '\n', '\r']) {
        anyhow::bail!(
            "participant id {id:?} must be non-empty and contain no commas or line breaks"
        );
    }
    Ok(())
}

fn prompt_participant() -> Result<String> {
    loop {
        print!("Enter participant number: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let id = line.trim();
        if validate_participant(id).is_ok() {
            return Ok(id.to_string());
        }
        println!("Participant id must be non-empty and contain no commas.");
    }
}
