use std::io::{self, BufRead, Write};

use sigdet_core::{ResponseValue, TrialOutcome};
use sigdet_experiment::{ExperimentConfig, ResponseCollector};

/// Console response collaborator: yes/no detection prompts in practice,
/// integer slider prompts in main. Re-prompts on unparseable input and
/// clamps slider values to [-100, 100]; the engine records what we return.
pub struct ConsoleCollector {
    stdin: io::Stdin,
}

impl ConsoleCollector {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }

    fn read_line(&mut self) -> String {
        let mut line = String::new();
        // EOF is treated as an empty answer and re-prompted upstream.
        let _ = self.stdin.lock().read_line(&mut line);
        line.trim().to_string()
    }

    fn ask_yes_no(&mut self, prompt: &str) -> bool {
        loop {
            print!("{prompt} [y/n]: ");
            let _ = io::stdout().flush();
            match self.read_line().to_ascii_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                other => println!("Please answer y or n (got {other:?})."),
            }
        }
    }

    fn ask_slider(&mut self, prompt: &str) -> i32 {
        loop {
            print!("{prompt} [-100..100]: ");
            let _ = io::stdout().flush();
            match self.read_line().parse::<i32>() {
                Ok(value) => return value.clamp(-100, 100),
                Err(_) => println!("Please enter a whole number."),
            }
        }
    }
}

impl Default for ConsoleCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCollector for ConsoleCollector {
    fn welcome(&mut self, config: &ExperimentConfig) {
        println!("=== Signal Detection Task ===");
        println!(
            "You'll hear noise on every trial, sometimes with a tone. \
             {} practice trials, then {} main trials.",
            config.practice_trials, config.main_trials
        );
        print!("Press Enter when ready to start.");
        let _ = io::stdout().flush();
        self.read_line();
    }

    fn detection(&mut self, _trial_index: usize) -> ResponseValue {
        let heard = self.ask_yes_no("Did you hear the tone?");
        ResponseValue::Detection { heard }
    }

    fn ratings(&mut self, _trial_index: usize) -> ResponseValue {
        let confidence = self.ask_slider("Confidence level");
        let reliance = self.ask_slider("Perceptual reliance");
        ResponseValue::Ratings {
            confidence,
            reliance,
        }
    }

    fn debrief(&mut self, outcomes: &[TrialOutcome]) {
        println!("\nExperiment completed: {} trials recorded. Thank you!", outcomes.len());
    }
}
