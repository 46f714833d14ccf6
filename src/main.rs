use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use inkshot::api;
use inkshot::models::{
    AppConfig, Crop, DisplaySpec, OutputFormat, ResampleKernel, SourceMode, Viewport,
};
use inkshot::rendering::watermark::Watermark;
use inkshot::server;
use inkshot::services::{ChromeCapture, ConvertPipeline, RenderParams};

#[derive(Parser)]
#[command(name = "inkshot")]
#[command(about = "Web page screenshot server for black/white/red e-paper displays")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Convert an image file directly (no browser needed)
    Convert {
        /// Input image file (PNG, JPEG, BMP)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format: bmp, png or bwr
        #[arg(short, long, default_value = "bwr")]
        format: String,

        /// Floyd-Steinberg dithering for bwr output
        #[arg(short, long)]
        dither: bool,

        /// Resampling kernel (nearest/cubic/mitchell/lanczos2/lanczos3)
        #[arg(short, long, default_value = "lanczos3")]
        kernel: String,

        /// Unsharp-mask amount after resize; 0 disables
        #[arg(short, long, default_value_t = 0.0)]
        sharpen: f32,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inkshot API",
        description = "Web page screenshot server for black/white/red e-paper displays",
        version = "0.3.0",
        license(name = "MIT")
    ),
    paths(
        api::render::handle_render,
        api::preview::handle_preview,
        api::config::handle_get_config,
        api::config::handle_set_config,
    ),
    components(schemas(AppConfig, Viewport, Crop, OutputFormat, ResampleKernel, SourceMode)),
    tags(
        (name = "Render", description = "Page capture and panel conversion"),
        (name = "Config", description = "Persisted render configuration")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Convert {
            input,
            output,
            format,
            dither,
            kernel,
            sharpen,
        }) => run_convert_command(&input, &output, &format, dither, &kernel, sharpen),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkshot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3123".to_string());
    let config_file = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.json".to_string());

    tracing::info!(
        config = %config_file,
        chrome = ?std::env::var("CHROME_PATH").ok(),
        font = ?std::env::var("FONT_FILE").ok(),
        "Inkshot starting"
    );

    let capture = Arc::new(ChromeCapture::from_env());
    let state = server::create_app_state(config_file, capture);

    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Inkshot server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Convert an image file without going through a browser
fn run_convert_command(
    input: &PathBuf,
    output: &PathBuf,
    format: &str,
    dither: bool,
    kernel: &str,
    sharpen: f32,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkshot=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let format = match format {
        "bmp" => OutputFormat::Bmp,
        "png" => OutputFormat::Png,
        "bwr" => OutputFormat::Bwr,
        other => anyhow::bail!("unknown format '{other}' (expected bmp, png or bwr)"),
    };

    let params = RenderParams {
        format,
        kernel: ResampleKernel::parse_or_default(kernel),
        sharpen,
        bwr_dither: dither,
        timestamp_watermark: false,
    };

    let bytes = std::fs::read(input)?;
    let pipeline = ConvertPipeline::new(Watermark::from_env());
    let converted = pipeline
        .convert(&bytes, DisplaySpec::BWR_750, &params)
        .map_err(|e| anyhow::anyhow!("Conversion error: {e}"))?;

    std::fs::write(output, &converted)?;
    println!("Converted {} ({} bytes)", output.display(), converted.len());

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Inkshot v{VERSION}");
    println!("Web page screenshot server for black/white/red e-paper displays\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        std::env::var("BIND_ADDR")
            .as_deref()
            .unwrap_or("0.0.0.0:3123 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        std::env::var("CONFIG_FILE")
            .as_deref()
            .unwrap_or("config.json (default)")
    );
    println!(
        "  CHROME_PATH = {}",
        std::env::var("CHROME_PATH")
            .as_deref()
            .unwrap_or("(auto-detect)")
    );
    println!(
        "  FONT_FILE   = {}",
        std::env::var("FONT_FILE")
            .as_deref()
            .unwrap_or("(not set, watermark disabled)")
    );

    println!("\nCommands:");
    println!("  inkshot serve      Start the HTTP server");
    println!("  inkshot convert    Convert an image file to panel format");
    println!("\nRun 'inkshot --help' for more details.");
}
