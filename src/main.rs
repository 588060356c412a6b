use clap::{Parser, Subcommand};
use cro_auditor::reporter::{report_basename, ReportFormat, ReportMetadata};
use cro_auditor::{Analyst, Auditor, Config, PageLoader, PageSnapshot, Reporter};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cro-auditor")]
#[command(about = "Audit a landing page against a conversion-rate-optimization checklist")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a landing page
    Audit {
        /// Page to audit; https:// is assumed when no scheme is given
        url: String,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory for reports (overrides the config file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report formats to write
        #[arg(long, value_enum, default_value = "all")]
        format: ReportFormat,

        /// Log every LLM request and response
        #[arg(long)]
        debug_llm: bool,
    },
    /// Generate a default configuration file
    Config {
        /// Output path for the config file (defaults to ~/.cro-auditor.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let debug_llm = matches!(cli.command, Commands::Audit { debug_llm: true, .. });
    let directive = if debug_llm {
        "cro_auditor=debug"
    } else {
        "cro_auditor=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    match cli.command {
        Commands::Audit {
            url,
            config,
            output,
            format,
            debug_llm: _,
        } => {
            audit_page(url, config, output, format).await?;
        }
        Commands::Config { output } => {
            generate_config(output)?;
        }
    }

    Ok(())
}

async fn audit_page(
    raw_url: String,
    config_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    format: ReportFormat,
) -> anyhow::Result<()> {
    println!("🚀 Starting CRO Audit");
    println!("=====================");

    let start_time = Instant::now();

    let mut config = if let Some(config_path) = config_path {
        let mut config = Config::from_file(&config_path)?;
        config.apply_env();
        config
    } else {
        Config::load()?
    };
    if let Some(output_path) = output_path {
        config.output_directory = output_path;
    }

    let url = PageLoader::normalize_url(&raw_url)?;
    println!("🎯 Target page: {}", url);
    println!("📤 Output directory: {}", config.output_directory.display());

    let loader = PageLoader::new(config.loader.clone())?;
    let mode = if loader.uses_browser() {
        "headless browser"
    } else {
        "HTTP"
    };
    println!("\n🌐 Loading page ({})...", mode);
    let markup = loader.fetch(&url).await?;
    let page = PageSnapshot::from_html(&markup);
    info!(title = %page.title, h1 = %page.primary_heading, "page snapshot extracted");
    println!("  ✓ {} ({})", page.title, page.primary_heading);

    let analyst = Analyst::from_config(&config.llm)?;
    let auditor = Auditor::new(analyst);

    if auditor.analyst().is_available() {
        println!(
            "\n🤖 Running checklist with {} (up to {} AI calls)...",
            config.llm.model,
            auditor.catalog().max_service_calls()
        );
    } else {
        println!("\n🤖 Running checklist without analysis (no API key)...");
    }
    let report = auditor.run(&page).await;

    let generated_at = chrono::Local::now();
    let metadata = ReportMetadata::new(&url, generated_at, auditor.calls())
        .with_model(format!("{:?}", config.llm.provider), config.llm.model.clone());

    println!("\n📊 Generating reports...");
    let reporter = Reporter::new();
    let rendered = reporter.render(&report, &metadata, format)?;
    let basename = report_basename(&url, &generated_at);
    let exported_files = reporter.export_report(&rendered, &config.output_directory, &basename)?;

    let counts = report.tier_counts();
    println!(
        "\n✅ Audit completed in {:.2}s: {} findings ({} good, {} need work, {} critical)",
        start_time.elapsed().as_secs_f64(),
        report.total_findings(),
        counts.good,
        counts.needs_work,
        counts.critical
    );
    println!("🤖 {} API calls", auditor.calls());
    println!("📁 Reports exported to:");
    for file in exported_files {
        println!("   - {}", file.display());
    }

    Ok(())
}

fn generate_config(output_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_path = output_path.unwrap_or_else(|| {
        Config::default_config_path().unwrap_or_else(|_| PathBuf::from("cro-auditor.toml"))
    });

    println!("📝 Generating configuration file: {}", config_path.display());

    let documented_config = Config::create_documented_config();
    std::fs::write(&config_path, documented_config)?;

    println!("✅ Configuration file created successfully!");
    println!("💡 Edit the file to customize your audit settings.");
    println!();
    println!("🔧 Key configuration areas:");
    println!("  • LLM provider settings (OpenAI, Anthropic, Ollama)");
    println!("  • Page loading (direct HTTP or Browserless rendering)");
    println!("  • Output directory for reports");
    println!("  • API keys (or use environment variables)");

    Ok(())
}
