mod config;
mod dashboard;
mod error;
mod models;
mod pipeline;
mod prompt;
mod scraper;
mod server;
mod storage;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;
use crate::pipeline::Pipeline;
use crate::server::{create_router, DashboardState};
use crate::storage::OutputFormat;

#[derive(Parser)]
#[command(name = "tcas-tuition", about = "mytcas tuition scraper and dashboard", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Search course.mytcas.com and save program tuition fees
    Scrape {
        /// Search keyword (repeatable); omit to pick from a menu
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        /// Output file (default from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format; defaults to the output file's extension
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Show the browser window
        #[arg(long)]
        headful: bool,
    },

    /// Serve the dashboard over HTTP
    Serve {
        /// Data file to read on every request
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Address to bind, e.g. 127.0.0.1:5000
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "tcas_tuition=info,warn",
        1 => "tcas_tuition=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let mut config = AppConfig::load()?;

    match cli.command {
        Command::Scrape {
            keywords,
            output,
            format,
            headful,
        } => {
            if let Some(path) = output {
                config.scraper.output_format = OutputFormat::from_path(&path);
                config.scraper.output_path = path;
            }
            if let Some(f) = format {
                config.scraper.output_format = f;
            }
            if headful {
                config.scraper.headless = false;
            }

            let keywords = if keywords.is_empty() {
                match prompt::prompt_keywords().await? {
                    Some(k) => k,
                    None => {
                        println!("ยกเลิกการค้นหา");
                        // the stdin reader thread may still be blocked
                        std::process::exit(0);
                    }
                }
            } else {
                keywords
            };

            let _t = utils::Timer::start("Scrape run");
            let stats = Pipeline::new(config.clone()).run(&keywords).await?;
            println!(
                "บันทึกข้อมูลทั้งหมด {} รายการลงใน {} แล้ว",
                stats.kept,
                config.scraper.output_path.display()
            );
        }

        Command::Serve { data, bind } => {
            if let Some(path) = data {
                config.dashboard.data_path = path;
            }
            if let Some(addr) = bind {
                config.dashboard.bind = addr;
            }

            let addr = config.dashboard.bind.clone();
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            info!(
                "Dashboard on http://{} (data: {:?})",
                addr, config.dashboard.data_path
            );

            let state = Arc::new(DashboardState {
                config: config.dashboard,
            });
            axum::serve(listener, create_router(state))
                .with_graceful_shutdown(async {
                    tokio::signal::ctrl_c().await.ok();
                })
                .await
                .context("Server error")?;
        }
    }

    Ok(())
}
