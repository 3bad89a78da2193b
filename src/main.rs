use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use volare::budget::{BudgetClient, BudgetRequest, BudgetResult, HousingMode};
use volare::config::{setup_api_key_interactive, Config};
use volare::corrections::{CorrectionStore, UserCorrection};
use volare::error::ServiceError;
use volare::gemini::GeminiClient;
use volare::suggest::{GeoPoint, PopulationBucket, SearchFilters, SuggestionClient};

#[derive(Parser, Debug)]
#[command(
    name = "volare",
    about = "AI-grounded minimum cost-of-living estimates for any city",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch a minimum monthly budget estimate for a city
    Budget {
        city: String,

        /// Budget categories to include (comma-separated)
        #[arg(
            short = 'c',
            long,
            value_delimiter = ',',
            default_value = "housing,groceries,transport,utilities,healthcare,entertainment"
        )]
        categories: Vec<String>,

        /// Currency to price in (ISO code)
        #[arg(long, default_value = "USD")]
        currency: String,

        /// Display language code (defaults to the configured preference)
        #[arg(short, long)]
        language: Option<String>,

        /// Price a whole house/apartment instead of a shared room
        #[arg(long)]
        whole_house: bool,
    },

    /// Suggest city names for a partial input
    Suggest {
        input: String,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        region: Option<String>,

        /// City-size filter: small, medium, or large
        #[arg(long, default_value = "any")]
        population: PopulationBucket,

        /// Bias toward a location, as "lat,lng"
        #[arg(long)]
        near: Option<String>,

        /// Display language code
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Report an inaccurate budget line; fed back into future estimates
    Correct {
        /// Budget category the report is about
        category: String,

        /// City the report applies to (omit for all cities)
        #[arg(long)]
        city: Option<String>,

        /// Why the number looks wrong
        #[arg(short, long)]
        reason: String,

        #[arg(long, default_value = "")]
        comment: String,

        /// Better wording in the report's language
        #[arg(long)]
        translation: Option<String>,

        #[arg(short, long)]
        language: Option<String>,
    },

    /// Add, remove, or list favorite cities
    Favorite {
        city: Option<String>,

        #[arg(long)]
        remove: bool,
    },

    /// Configure the Gemini API key
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = Config::load();

    match args.command {
        Command::Budget { city, categories, currency, language, whole_house } => {
            let client = BudgetClient::new(gemini_client(&config)?, CorrectionStore::open_default()?);
            let request = BudgetRequest {
                city,
                categories,
                currency_code: currency,
                language_code: language.unwrap_or_else(|| config.preferred_language().to_string()),
                housing: if whole_house { HousingMode::Whole } else { HousingMode::Shared },
            };
            eprintln!("  Searching live market data for {}...", request.city);
            match client.fetch_budget(&request).await {
                Ok(result) => print_budget(&result),
                Err(err) => {
                    print_error(&err);
                    std::process::exit(1);
                }
            }
        }

        Command::Suggest { input, country, region, population, near, language } => {
            let client = SuggestionClient::new(gemini_client(&config)?);
            let filters = SearchFilters { country, region, population };
            let location = near.as_deref().map(parse_geo_point).transpose()?;
            let language = language.unwrap_or_else(|| config.preferred_language().to_string());
            let names = client.suggest(&input, &filters, &language, location).await;
            if names.is_empty() {
                println!("  No suggestions.");
            }
            for name in names {
                println!("  {}", name);
            }
        }

        Command::Correct { category, city, reason, comment, translation, language } => {
            let language = language.unwrap_or_else(|| config.preferred_language().to_string());
            let mut correction = UserCorrection::new(city, &category, &language, &reason)
                .with_comment(&comment);
            if let Some(translation) = translation {
                correction = correction.with_suggested_translation(&translation);
            }
            CorrectionStore::open_default()?.record(correction)?;
            println!("  Correction recorded. Future estimates will take it into account.");
        }

        Command::Favorite { city, remove } => {
            let mut config = config;
            match city {
                Some(city) if remove => {
                    config.remove_favorite(&city).map_err(|e| anyhow!(e))?;
                    println!("  Removed {} from favorites.", city);
                }
                Some(city) => {
                    config.add_favorite(&city).map_err(|e| anyhow!(e))?;
                    println!("  Added {} to favorites.", city);
                }
                None => {
                    if config.favorite_cities.is_empty() {
                        println!("  No favorite cities yet.");
                    }
                    for city in &config.favorite_cities {
                        println!("  {}", city);
                    }
                }
            }
        }

        Command::Setup => {
            setup_api_key_interactive().map_err(|e| anyhow!(e))?;
        }
    }

    Ok(())
}

fn gemini_client(config: &Config) -> Result<GeminiClient> {
    let key = config
        .get_api_key()
        .ok_or_else(|| anyhow!("No API key configured. Run `volare setup` to get started."))?;
    Ok(GeminiClient::new(key))
}

fn parse_geo_point(s: &str) -> Result<GeoPoint> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected \"lat,lng\", got {:?}", s))?;
    Ok(GeoPoint {
        lat: lat.trim().parse()?,
        lng: lng.trim().parse()?,
    })
}

fn print_budget(result: &BudgetResult) {
    let symbol = &result.currency_symbol;
    println!();
    println!("  {} - minimum monthly budget", result.city);
    println!("  {}", result.summary);
    println!();
    for item in &result.items {
        println!("  {:<16} {}{:.0}  {}", item.category, symbol, item.amount, item.description);
        for sub in &item.sub_items {
            println!("      {:<14} {}{:.0}", sub.name, symbol, sub.amount);
        }
    }
    println!("  {:<16} {}{:.0}", "TOTAL", symbol, result.total_monthly);
    println!();
    if !result.saving_tips.is_empty() {
        println!("  Saving tips:");
        for tip in &result.saving_tips {
            println!("  {} {}: {}", tip.icon, tip.category, tip.tip);
        }
        println!();
    }
    if !result.sources.is_empty() {
        println!("  Sources:");
        for source in &result.sources {
            println!("  - {} ({})", source.title, source.uri);
            println!("    {}", source.snippet);
        }
        println!();
    }
    println!(
        "  Map: https://www.openstreetmap.org/?mlat={}&mlon={}#map=12/{}/{}",
        result.coordinates.lat, result.coordinates.lng,
        result.coordinates.lat, result.coordinates.lng
    );
    // Sanity note when the model's arithmetic drifts; the stated total is
    // displayed as returned, never recomputed.
    let item_sum: f64 = result.items.iter().map(|i| i.amount).sum();
    if (item_sum - result.total_monthly).abs() > 0.5 {
        eprintln!(
            "  Note: item amounts sum to {}{:.0}, the model stated {}{:.0}.",
            symbol, item_sum, symbol, result.total_monthly
        );
    }
}

fn print_error(err: &ServiceError) {
    eprintln!();
    eprintln!("  Search failed ({}).", err.kind.as_str());
    eprintln!("  {}", err.kind.guidance());
    log::debug!("underlying failure: {}", err.message);
}
