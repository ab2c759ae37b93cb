//! ForexCalc CLI
//!
//! Fetches the CNB daily fixing, prints the rate table, and converts
//! amounts between CZK and a listed currency.

use anyhow::Result;
use clap::{Parser, Subcommand};

use cnb_feed::{ConversionError, Direction, FeedSnapshot, filter_rates};
use forex_client::FeedClient;
use forex_types::{CNB_DAILY_URL, CurrencyOption, FeedSource, RatesResponse};

#[derive(Parser)]
#[command(name = "forex")]
#[command(author, version, about = "CNB exchange rates and CZK converter", long_about = None)]
struct Cli {
    /// URL of the fixing text: the bank directly or a ForexCalc relay (`/api/cnb`)
    #[arg(long, global = true, env = "FOREX_FEED_URL", default_value = CNB_DAILY_URL)]
    feed_url: String,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the rate table
    Rates {
        /// Filter by currency name, code, or country
        #[arg(long, short)]
        search: Option<String>,
    },
    /// List currencies available for conversion
    Currencies {
        /// Filter by currency name, code, or country
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Convert an amount (CZK to the currency unless --reverse)
    Convert {
        /// Amount; `,` or `.` as decimal separator
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Currency code, e.g. EUR
        code: String,
        /// Convert from the currency to CZK
        #[arg(long, short)]
        reverse: bool,
    },
}

async fn load_snapshot(feed_url: &str) -> Result<FeedSnapshot> {
    let client = FeedClient::new(feed_url)?;
    let text = client.fetch_feed().await?;
    Ok(cnb_feed::parse(&text)?)
}

fn print_table(table: &RatesResponse) {
    println!("Exchange rates, {} (base {})", table.date, table.base);
    if table.rates.is_empty() {
        println!("No exchange rates available.");
        return;
    }
    println!(
        "{:<20} {:<12} {:<5} {:>12} {:>12}",
        "Country", "Currency", "Code", "Rate (CZK)", "Per 1 CZK"
    );
    for row in &table.rates {
        println!(
            "{:<20} {:<12} {:<5} {:>12} {:>12}",
            row.country, row.currency, row.code, row.rate_per_unit, row.units_per_base
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Skipped feed lines are reported as warnings on stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let snapshot = load_snapshot(&cli.feed_url).await?;

    match cli.command {
        Commands::Rates { search } => {
            let rates = filter_rates(&snapshot.rates, search.as_deref().unwrap_or_default());
            let table = RatesResponse::new(&snapshot, rates);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                print_table(&table);
            }
        }

        Commands::Currencies { search } => {
            let options: Vec<CurrencyOption> =
                filter_rates(&snapshot.rates, search.as_deref().unwrap_or_default())
                    .into_iter()
                    .map(CurrencyOption::from)
                    .collect();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                for option in &options {
                    println!("{}  {} ({})", option.code, option.currency, option.country);
                }
            }
        }

        Commands::Convert {
            amount,
            code,
            reverse,
        } => {
            let direction = if reverse {
                Direction::ForeignToBase
            } else {
                Direction::BaseToForeign
            };
            let code = code.trim().to_uppercase();

            match cnb_feed::convert(&snapshot, &code, &amount, direction) {
                Ok(Some(converted)) => {
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&converted)?);
                    } else {
                        println!(
                            "{} {} = {}",
                            amount.trim(),
                            direction.input_currency(&code),
                            converted
                        );
                    }
                }
                Ok(None) => println!("Nothing to convert."),
                Err(err) => {
                    report_conversion_error(&err, cli.json);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn report_conversion_error(err: &ConversionError, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({ "error": err.to_string(), "kind": err.kind() })
        );
    } else {
        eprintln!("✗ {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_feed_url_after_subcommand() {
        let cli = Cli::try_parse_from([
            "forex",
            "rates",
            "--feed-url",
            "http://localhost:3000/api/cnb",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.feed_url, "http://localhost:3000/api/cnb");
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Rates { search: None }));
    }

    #[test]
    fn test_convert_accepts_negative_amount() {
        let cli = Cli::try_parse_from(["forex", "convert", "-10", "EUR", "--reverse"]).unwrap();

        let Commands::Convert {
            amount,
            code,
            reverse,
        } = cli.command
        else {
            panic!("expected convert");
        };
        assert_eq!(amount, "-10");
        assert_eq!(code, "EUR");
        assert!(reverse);
    }
}
