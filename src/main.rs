use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use kite_resale::config::{self, Config};
use kite_resale::listing::{Condition, EquipmentType, ScoreInput};
use kite_resale::output;
use kite_resale::rank::{self, ListingFilter, ScoredListing};
use kite_resale::scoring::calculate_score;
use kite_resale::stats::{brand_potential, ResaleStats};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List listings sorted by resale score (default if no subcommand)
    List {
        /// Hide listings scoring below this (overrides config)
        #[arg(long)]
        min_score: Option<f64>,
        /// Tab-separated output for scripting
        #[arg(long, conflicts_with = "json")]
        tsv: bool,
        /// JSON output with full score breakdown
        #[arg(long)]
        json: bool,
    },
    /// Show the score breakdown of a listing by its index number
    Show {
        /// Index number of the listing (1-based, as shown in list)
        index: usize,
    },
    /// Open a listing's post in browser by its index number
    Open {
        /// Index number of the listing (1-based, as shown in list)
        index: usize,
    },
    /// High-scoring listings at an affordable price
    Deals {
        #[arg(long)]
        min_score: Option<f64>,
        /// Highest asking price in BRL
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        limit: Option<usize>,
        /// Only this equipment type
        #[arg(long = "type")]
        equipment_type: Option<String>,
    },
    /// Find listings by attributes
    Search {
        /// Equipment type (kite, board, bar, ...)
        #[arg(long = "type")]
        equipment_type: Option<String>,
        /// Brand substring, case-insensitive
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        /// State code, e.g. CE
        #[arg(long)]
        state: Option<String>,
        /// Only repaired items
        #[arg(long, conflicts_with = "no_repair")]
        repair: bool,
        /// Only items without repairs
        #[arg(long)]
        no_repair: bool,
        #[arg(long)]
        min_score: Option<f64>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Good listings analyzed recently
    Recent {
        /// Look-back window, e.g. "48h" or "3days"
        #[arg(long, value_parser = humantime::parse_duration)]
        since: Option<std::time::Duration>,
        #[arg(long)]
        min_score: Option<f64>,
    },
    /// Score distribution and per-brand potential
    Stats {
        /// Number of brands to show
        #[arg(long, default_value_t = 10)]
        brands: usize,
    },
    /// Write ranked listings with scores to a JSON file
    Export {
        path: PathBuf,
    },
    /// Score a single listing described on the command line
    Score {
        /// Equipment type (kite, board, bar, harness, wetsuit, pump, accessories, complete_set, other)
        #[arg(long = "type", default_value = "other")]
        equipment_type: String,
        #[arg(long, default_value = "")]
        brand: String,
        #[arg(long)]
        year: Option<i32>,
        /// Asking price in BRL
        #[arg(long)]
        price: Option<f64>,
        /// Condition tag (novo, seminovo, bom_estado, usado, precisa_reparo)
        #[arg(long, default_value = "desconhecido")]
        condition: String,
        /// The item has been repaired
        #[arg(long)]
        repair: bool,
        /// Comment text (repeatable)
        #[arg(long = "comment")]
        comments: Vec<String>,
        #[arg(long, default_value_t = 0)]
        comments_count: u32,
        #[arg(long, default_value_t = 0)]
        likes: u32,
        #[arg(long)]
        json: bool,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "kite-resale")]
#[command(about = "Resale potential ranking for kitesurf marketplace listings", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/kite-resale/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Listing file or glob pattern (repeatable, overrides config inputs)
    #[arg(short, long, global = true)]
    input: Vec<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::List {
        min_score: None,
        tsv: false,
        json: false,
    });
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    // Init doesn't need an existing config
    if let Commands::Init { force } = command {
        let path = config_path.unwrap_or_else(config::get_config_path);
        if let Err(e) = config::write_default_config(&path, force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote default config to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    let command = match command {
        Commands::Score {
            equipment_type,
            brand,
            year,
            price,
            condition,
            repair,
            comments,
            comments_count,
            likes,
            json,
        } => {
            // Scoring a single item needs no config or inputs
            if let Err(e) = kite_resale::telemetry::init(cli.verbose, None) {
                eprintln!("Logging setup failed: {:#}", e);
            }
            let input = ScoreInput {
                equipment_type: EquipmentType::from_tag(&equipment_type),
                brand,
                year,
                price,
                condition: Condition::from_tag(&condition),
                has_repair: repair,
                comments,
                comments_count,
                likes_count: likes,
            };
            score_one(&input, json);
            std::process::exit(EXIT_SUCCESS);
        }
        other => other,
    };

    let config = match config::load_config_or_default(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(e) = kite_resale::telemetry::init(cli.verbose, config.log_level.as_deref()) {
        eprintln!("Logging setup failed: {:#}", e);
    }

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let inputs = if cli.input.is_empty() {
        config.inputs.clone()
    } else {
        cli.input
    };

    if inputs.is_empty() {
        eprintln!("No inputs configured.");
        eprintln!("Pass --input <file-or-glob> or add inputs to ~/.config/kite-resale/config.yaml:");
        eprintln!("  inputs:");
        eprintln!("    - \"~/kite-data/analyzed/*.jsonl\"");
        std::process::exit(EXIT_CONFIG);
    }

    let listings = match kite_resale::listing::load_listings(&inputs) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    let scored = rank::score_listings(listings);
    info!(
        listings = scored.len(),
        elapsed = ?start_time.elapsed(),
        "loaded and scored listings"
    );

    run_command(command, &config, scored);

    debug!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}

fn run_command(command: Commands, config: &Config, scored: Vec<ScoredListing>) {
    let use_colors = output::should_use_colors();
    let default_min = config.min_score.unwrap_or(0.0);

    match command {
        Commands::List { min_score, tsv, json } => {
            let ranked = rank::filter_min_score(scored, min_score.unwrap_or(default_min));
            let refs: Vec<&ScoredListing> = ranked.iter().collect();
            if json {
                print_json(&ranked);
            } else if tsv {
                println!("{}", output::format_tsv(&refs));
            } else {
                println!("{}", output::format_scored_table(&refs, use_colors));
            }
        }
        Commands::Show { index } => {
            let ranked = rank::filter_min_score(scored, default_min);
            let listing = pick(&ranked, index);
            println!("{}", output::format_listing_detail(listing, use_colors));
        }
        Commands::Open { index } => {
            let ranked = rank::filter_min_score(scored, default_min);
            let listing = pick(&ranked, index);
            match kite_resale::browser::open_listing(&listing.listing) {
                Ok(url) => println!("Opening listing {} in browser: {}", listing.listing.post_id, url),
                Err(e) => {
                    eprintln!("Failed to open browser: {:#}", e);
                    std::process::exit(EXIT_FAILURE);
                }
            }
        }
        Commands::Deals {
            min_score,
            max_price,
            limit,
            equipment_type,
        } => {
            let scored = match equipment_type {
                Some(tag) => {
                    let kind = EquipmentType::from_tag(&tag);
                    scored
                        .into_iter()
                        .filter(|s| s.listing.equipment_type == kind)
                        .collect()
                }
                None => scored,
            };
            let deals = rank::hot_deals(
                &scored,
                min_score.unwrap_or(config.deals.min_score),
                max_price.unwrap_or(config.deals.max_price),
                limit.unwrap_or(config.deals.limit),
            );
            if deals.is_empty() {
                println!("No hot deals right now.");
            } else {
                println!("{}", output::format_scored_table(&deals, use_colors));
            }
        }
        Commands::Search {
            equipment_type,
            brand,
            min_price,
            max_price,
            state,
            repair,
            no_repair,
            min_score,
            limit,
            json,
        } => {
            let filter = ListingFilter {
                equipment_type: equipment_type.as_deref().map(EquipmentType::from_tag),
                brand,
                min_price,
                max_price,
                state,
                has_repair: repair_flag(repair, no_repair),
                min_score,
            };
            let found = rank::search(&scored, &filter, limit);
            if json {
                print_json(&found);
            } else if found.is_empty() {
                println!("No listings match.");
            } else {
                println!("{}", output::format_scored_table(&found, use_colors));
            }
        }
        Commands::Recent { since, min_score } => {
            let window = match since {
                Some(w) => w,
                // Validated at startup
                None => humantime::parse_duration(&config.recent.window)
                    .unwrap_or(std::time::Duration::from_secs(48 * 3600)),
            };
            let now = chrono::Utc::now();
            let recent = rank::recent_opportunities(
                &scored,
                now,
                window,
                min_score.unwrap_or(config.recent.min_score),
                config.recent.limit,
            );
            if recent.is_empty() {
                println!(
                    "No opportunities in the last {}.",
                    humantime::format_duration(window)
                );
            } else {
                println!("{}", output::format_scored_table(&recent, use_colors));
                for (i, s) in recent.iter().enumerate() {
                    if let Some(at) = s.listing.analyzed_at {
                        debug!(rank = i + 1, age = %output::format_age(now - at), "recent listing");
                    }
                }
            }
        }
        Commands::Stats { brands } => match ResaleStats::from_scored(&scored) {
            Some(stats) => {
                println!("{}", output::format_stats(&stats));
                println!();
                println!("{}", output::format_brand_table(&brand_potential(&scored, brands)));
            }
            None => println!("No listings found."),
        },
        Commands::Export { path } => {
            if let Err(e) = kite_resale::export::save_scored(&path, &scored) {
                eprintln!("Export failed: {:#}", e);
                std::process::exit(EXIT_FAILURE);
            }
            println!("Exported {} listings to {}", scored.len(), path.display());
        }
        Commands::Score { .. } | Commands::Init { .. } => unreachable!("handled before loading inputs"),
    }
}

/// Score one listing given on the command line and print the result
fn score_one(input: &ScoreInput, json: bool) {
    let result = calculate_score(input);
    if json {
        print_json(&result);
        return;
    }
    println!(
        "{}/100  {}",
        output::format_score(result.total_score),
        result.classification.label()
    );
    println!("{}", result.breakdown);
    println!();
    println!("{}", result.recommendation);
}

/// `--repair` / `--no-repair` as a tri-state predicate
fn repair_flag(repair: bool, no_repair: bool) -> Option<bool> {
    match (repair, no_repair) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Listing at a 1-based index, or exit with a message
fn pick(ranked: &[ScoredListing], index: usize) -> &ScoredListing {
    if index < 1 || index > ranked.len() {
        eprintln!(
            "Invalid index {}. Must be between 1 and {}.",
            index,
            ranked.len()
        );
        std::process::exit(EXIT_INPUT);
    }
    &ranked[index - 1]
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}
