use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use linksnap::analytics::{compute_site_stats, compute_url_stats};
use linksnap::seed::{seed_demo_data, DEMO_URLS};
use linksnap::storage::{MemoryStore, Storage};

#[derive(Parser)]
#[command(name = "linksnap-demo")]
#[command(about = "Inspect demo analytics without running the servers", long_about = None)]
struct Cli {
    /// RNG seed for the generated click history
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Limit how many demo URLs are seeded
    #[arg(long)]
    urls: Option<usize>,

    /// Print reports as JSON instead of tables
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Site-wide rollup across every demo URL
    Site,
    /// Full analytics report for one short code
    Url {
        /// Short code of a seeded demo URL
        short_code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = MemoryStore::new();
    let now = Utc::now();
    seed_demo_data(&store, now, cli.seed, cli.urls)?;

    match cli.command {
        Commands::Site => {
            let entries = store.list().await?;
            let stats = compute_site_stats(&entries);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!(
                    "{} URLs, {} total clicks",
                    stats.total_urls, stats.total_clicks
                );
                println!();
                println!("{:<8} {:>7}  {}", "code", "clicks", "original URL");
                println!("{}", "-".repeat(64));
                for url in &stats.popular_urls {
                    println!("{:<8} {:>7}  {}", url.short_code, url.clicks, url.original_url);
                }
            }
        }
        Commands::Url { short_code } => {
            let Some(entry) = store.get(&short_code).await? else {
                let codes: Vec<&str> = DEMO_URLS.iter().map(|(code, _)| *code).collect();
                bail!(
                    "unknown short code '{short_code}' (seeded codes: {})",
                    codes.join(", ")
                );
            };
            let stats = compute_url_stats(&entry, now);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{} -> {}", entry.short_code, entry.original_url);
                println!(
                    "total {}, today {}, yesterday {}",
                    stats.total_clicks, stats.today_clicks, stats.yesterday_clicks
                );
                println!();
                println!("clicks by day:");
                for bucket in &stats.daily_clicks {
                    println!(
                        "  {:>5} {:>5}  {}",
                        bucket.date,
                        bucket.clicks,
                        "#".repeat((bucket.clicks / 2) as usize)
                    );
                }
                println!();
                println!("devices:");
                for device in &stats.device_stats {
                    println!("  {:<10} {}", device.name, device.value);
                }
                println!();
                println!("top referrers:");
                for referrer in &stats.referrer_stats {
                    println!("  {:<14} {}", referrer.name, referrer.value);
                }
            }
        }
    }

    Ok(())
}
