//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::application::{Language, DEFAULT_FILE_NAME};

/// Backpack calculator: track packed weight and volume against a budget
#[derive(Parser, Debug)]
#[command(name = "bpcalc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Report language: en or ru (overrides config)
    #[arg(long, global = true, value_parser = parse_language)]
    pub lang: Option<Language>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty pack file
    New {
        /// Pack file (.bpc appended when missing)
        #[arg(value_hint = ValueHint::FilePath, default_value = DEFAULT_FILE_NAME)]
        file: PathBuf,
        /// Weight budget in kg
        #[arg(short = 'w', long, value_parser = clap::value_parser!(u32).range(5..=25))]
        max_weight: Option<u32>,
        /// Volume budget in liters
        #[arg(short = 'v', long, value_parser = parse_budget_volume)]
        max_volume: Option<f64>,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show packed items, totals and fill gauges
    Show {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Exit with code 1 if over the weight or volume limit (for scripting)
        #[arg(long)]
        check: bool,
    },

    /// Add a custom item
    Add {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Item name
        name: String,
        /// Weight in grams
        #[arg(short, long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=10000))]
        weight: u32,
        /// Volume in liters
        #[arg(short, long, default_value_t = 0.5, value_parser = parse_item_volume)]
        volume: f64,
    },

    /// Add a preset item from the catalog
    Pick {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Catalog category
        category: String,
        /// Item name within the category
        item: String,
    },

    /// Rename an item or change its weight/volume
    Edit {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Current item name
        name: String,
        /// New name
        #[arg(short, long)]
        rename: Option<String>,
        /// New weight in grams
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=10000))]
        weight: Option<u32>,
        /// New volume in liters
        #[arg(short, long, value_parser = parse_item_volume)]
        volume: Option<f64>,
    },

    /// Remove an item
    Remove {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Item name
        name: String,
    },

    /// Remove all items
    Clear {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Change the weight and/or volume budget
    Budget {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Weight budget in kg
        #[arg(short = 'w', long, value_parser = clap::value_parser!(u32).range(5..=25))]
        max_weight: Option<u32>,
        /// Volume budget in liters
        #[arg(short = 'v', long, value_parser = parse_budget_volume)]
        max_volume: Option<f64>,
    },

    /// Save a pack under a new name
    SaveAs {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Target file (.bpc appended when missing)
        #[arg(value_hint = ValueHint::FilePath)]
        target: PathBuf,
    },

    /// Browse the preset catalog
    Catalog {
        /// Only this category
        category: Option<String>,
    },

    /// Greedy heaviest-first fit of a catalog into a weight budget
    Fit {
        /// Weight budget in kg
        kg: u32,
        /// Fit items of this catalog category instead of the trail kit
        #[arg(short, long)]
        category: Option<String>,
        /// Catalog file (fit catalog, or gear catalog with --category)
        #[arg(long, value_hint = ValueHint::FilePath)]
        catalog: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show program information
    About,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective config
    Show,

    /// Show config path
    Path,

    /// Create config template
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_language(s: &str) -> Result<Language, String> {
    s.parse()
}

fn parse_ranged_f64(s: &str, min: f64, max: f64) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("`{s}` is not a number"))?;
    if !(min..=max).contains(&value) {
        return Err(format!("{value} is not in {min}..={max}"));
    }
    Ok(value)
}

fn parse_item_volume(s: &str) -> Result<f64, String> {
    parse_ranged_f64(s, 0.0, 100.0)
}

fn parse_budget_volume(s: &str) -> Result<f64, String> {
    parse_ranged_f64(s, 20.0, 80.0)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0", true)]
    #[case("0.5", true)]
    #[case("100", true)]
    #[case("100.1", false)]
    #[case("-0.1", false)]
    #[case("NaN", false)]
    #[case("lots", false)]
    fn given_volume_input_when_parsing_item_volume_then_clamps_to_range(
        #[case] input: &str,
        #[case] ok: bool,
    ) {
        assert_eq!(parse_item_volume(input).is_ok(), ok);
    }

    #[test]
    fn given_add_without_values_when_parsing_then_uses_form_defaults() {
        let cli = Cli::try_parse_from(["bpcalc", "add", "trip.bpc", "Фонарик"]).unwrap();
        match cli.command {
            Some(Commands::Add { weight, volume, .. }) => {
                assert_eq!(weight, 100);
                assert_eq!(volume, 0.5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_weight_out_of_range_when_parsing_then_rejects() {
        assert!(Cli::try_parse_from(["bpcalc", "add", "t.bpc", "x", "-w", "0"]).is_err());
        assert!(Cli::try_parse_from(["bpcalc", "add", "t.bpc", "x", "-w", "10001"]).is_err());
        assert!(Cli::try_parse_from(["bpcalc", "budget", "t.bpc", "-w", "30"]).is_err());
    }

    #[test]
    fn given_new_without_file_when_parsing_then_uses_default_file_name() {
        let cli = Cli::try_parse_from(["bpcalc", "new"]).unwrap();
        match cli.command {
            Some(Commands::New { file, .. }) => {
                assert_eq!(file, PathBuf::from("Backpack_calculation.bpc"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_debug_flags_when_parsing_then_counts() {
        let cli = Cli::try_parse_from(["bpcalc", "-dd", "--lang", "ru", "about"]).unwrap();
        assert_eq!(cli.debug, 2);
        assert_eq!(cli.lang, Some(Language::Ru));
    }
}
