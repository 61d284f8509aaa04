use clap::{ArgGroup, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use blockswatch::api::{self, BlockImageQuery};
use blockswatch::assets::{AssetLoader, ConfigSource};
use blockswatch::models::AppConfig;
use blockswatch::rendering::LabelPainter;
use blockswatch::server;

#[derive(Parser)]
#[command(name = "blockswatch")]
#[command(about = "Find the Minecraft blocks closest to a color and render them as a strip")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Render a strip directly to an image file
    #[command(group(ArgGroup::new("color").required(true).args(["rgb", "hex"])))]
    Render {
        /// Target color as comma-separated RGB (e.g. "250,10,10")
        #[arg(long)]
        rgb: Option<String>,

        /// Target color as hex (e.g. "FA0A0A" or "#FA0A0A")
        #[arg(long)]
        hex: Option<String>,

        /// Game version, must be listed in allowed_versions
        #[arg(long)]
        version: String,

        /// Number of blocks (1-9)
        #[arg(short, long, default_value_t = 3)]
        count: u32,

        /// Page of the ranking (1-100)
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Tile height in pixels (16-4096, multiple of 16)
        #[arg(long, default_value_t = 64)]
        height: u32,

        /// Omit block name labels
        #[arg(long)]
        no_text: bool,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "blockswatch API",
        description = "Ranks Minecraft blocks by perceptual color distance and renders them",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_block_image),
    tags(
        (name = "Blocks", description = "Block palette rendering")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            rgb,
            hex,
            version,
            count,
            page,
            height,
            no_text,
            output,
        }) => run_render_command(
            rgb.as_deref(),
            hex.as_deref(),
            version,
            count,
            page,
            height,
            no_text,
            &output,
        ),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Render a strip directly to a file (no server needed)
#[allow(clippy::too_many_arguments)]
fn run_render_command(
    rgb: Option<&str>,
    hex: Option<&str>,
    version: String,
    count: u32,
    page: u32,
    height: u32,
    no_text: bool,
    output: &Path,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blockswatch=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let asset_loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&asset_loader);

    let rgb = match (rgb, hex) {
        (Some(rgb), _) => rgb.to_string(),
        (None, Some(hex)) => {
            let color = swatch_match::hex_to_rgb(hex)?;
            format!("{},{},{}", color.r, color.g, color.b)
        }
        (None, None) => anyhow::bail!("Either --rgb or --hex is required"),
    };

    // Same checks as the HTTP endpoint
    let query = BlockImageQuery {
        version: Some(version),
        rgb: Some(rgb),
        count: Some(count.to_string()),
        height: Some(height.to_string()),
        page: Some(page.to_string()),
        no_text: no_text.then(|| "1".to_string()),
    };
    let (context, pipeline) = server::create_render_services(&config, &asset_loader)?;
    let request = query
        .validate(&context)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let rendered = pipeline
        .render(&context, &request)
        .map_err(|e| anyhow::anyhow!("Render failed: {e}"))?;

    let expected = rendered.image.format.extension();
    let actual = output.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !actual.eq_ignore_ascii_case(expected)
        && !(expected == "jpg" && actual.eq_ignore_ascii_case("jpeg"))
    {
        tracing::warn!(
            output = %output.display(),
            format = expected,
            "Output extension does not match the configured image format"
        );
    }

    std::fs::write(output, &rendered.image.bytes)?;

    println!(
        "Rendered {} block{} ({}x{}) to {}",
        rendered.tiles,
        if rendered.tiles == 1 { "" } else { "s" },
        rendered.image.width,
        rendered.image.height,
        output.display()
    );

    Ok(())
}

fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Read environment variables
    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let fonts_dir = std::env::var("FONTS_DIR").ok();

    // Header
    println!("blockswatch v{VERSION}");
    println!("Minecraft block palettes for a color\n");

    let loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&loader);

    // Environment variables section
    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.unwrap_or_else(|| format!("{} (from config)", config.default_bind_addr()))
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  FONTS_DIR   = {}",
        fonts_dir.as_deref().unwrap_or("(not set)")
    );

    // Sources section
    println!("\nSources:");
    let config_source = match loader.config_source() {
        ConfigSource::File(path) => path.display().to_string(),
        ConfigSource::Embedded if config_file.is_some() => "embedded (file not found)".to_string(),
        ConfigSource::Embedded => "embedded".to_string(),
    };
    println!("  Config:   {config_source}");

    match swatch_match::Catalog::load(&config.catalog) {
        Ok(catalog) => println!(
            "  Catalog:  {} ({} blocks)",
            config.catalog.display(),
            catalog.len()
        ),
        Err(e) => println!("  Catalog:  {} (unavailable: {e})", config.catalog.display()),
    }
    println!("  Images:   {}", config.images_dir.display());

    let fonts = loader.get_fonts();
    let fonts_count = fonts.len();
    let painter = LabelPainter::with_fonts(fonts, config.label_font.clone());
    println!(
        "  Fonts:    {fonts_count} file{} + system fonts (label font: {}, drawn with {})",
        if fonts_count == 1 { "" } else { "s" },
        config.label_font,
        painter.resolved_family().unwrap_or("nothing, no fonts found")
    );
    println!("  Versions: {}", config.allowed_versions.join(", "));

    // Commands section
    println!("\nCommands:");
    println!("  blockswatch serve    Start the HTTP server");
    println!("  blockswatch render   Render a strip to an image file");
    println!("\nRun 'blockswatch --help' for more details.");
}

async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blockswatch=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let asset_loader = AssetLoader::from_env();

    tracing::info!(
        config = ?asset_loader.config_source(),
        fonts = ?std::env::var("FONTS_DIR").unwrap_or_else(|_| "system".to_string()),
        "Asset sources configured"
    );

    let config = AppConfig::load_from_assets(&asset_loader);
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| config.default_bind_addr());

    // Create application state using shared server module
    let state = server::create_app_state(&config, &asset_loader)?;

    // Build router: start with shared API routes, add production-only routes
    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "blockswatch server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
