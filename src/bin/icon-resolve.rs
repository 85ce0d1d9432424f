//! Resolves a single icon and writes its bytes to a file or stdout.
//!
//! ```text
//! icon-resolve iconify:mdi:home --color white -o home.svg
//! RUST_LOG=icon_resolver=debug icon-resolve https://example.com/logo.png --renderer-url http://127.0.0.1:7070
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use icon_resolver::{IconDescriptor, IconResolver, ResolverConfig};
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "icon-resolve", version, about = "Resolve an icon specifier to PNG or SVG bytes")]
struct Args {
    /// Icon specifier, e.g. `iconify:mdi:home`, `https://…/a.svg`, `symbol:star` or an emoji.
    specifier: String,

    /// Tint color (`#rgb`, `#rrggbb`, `black` or `white`).
    #[arg(long)]
    color: Option<String>,

    #[arg(long)]
    flip_horizontal: bool,

    #[arg(long)]
    flip_vertical: bool,

    /// Scale factor, clamped to 0.1..=9.9.
    #[arg(long)]
    scale: Option<f32>,

    /// Keep the icon's own colors instead of tinting it.
    #[arg(long)]
    preserve_color: bool,

    #[arg(long)]
    preserve_aspect: bool,

    /// Base address of the native renderer helper.
    #[arg(long, env = "ICON_RENDERER_URL")]
    renderer_url: Option<String>,

    /// Resolver configuration as a JSON file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn descriptor(&self) -> IconDescriptor {
        let mut descriptor = IconDescriptor::new(self.specifier.clone())
            .with_flip_horizontal(self.flip_horizontal)
            .with_flip_vertical(self.flip_vertical)
            .with_preserve_color(self.preserve_color)
            .with_preserve_aspect(self.preserve_aspect);
        if let Some(color) = &self.color {
            descriptor = descriptor.with_color(color.clone());
        }
        if let Some(scale) = self.scale {
            descriptor = descriptor.with_scale(scale);
        }
        descriptor
    }

    async fn config(&self) -> icon_resolver::Result<ResolverConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = tokio::fs::read_to_string(path).await.map_err(|e| {
                    icon_resolver::ResolveError::InvalidInput(format!(
                        "cannot read {}: {e}",
                        path.display()
                    ))
                })?;
                ResolverConfig::from_json(&json)?
            }
            None => ResolverConfig::default(),
        };
        if let Some(url) = &self.renderer_url {
            config = config.with_native_renderer_url(url.clone());
        }
        Ok(config)
    }
}

async fn run(args: Args) -> icon_resolver::Result<()> {
    let resolver = IconResolver::new(&args.config().await?)?;
    let descriptor = args.descriptor();
    let icon = resolver.resolve(&descriptor).await?;

    tracing::info!(
        key = %IconResolver::cache_key(&descriptor),
        content_type = %icon.content_type,
        size = icon.len(),
        "resolved"
    );

    let written = match &args.output {
        Some(path) => tokio::fs::write(path, &icon.data).await,
        None => {
            let mut stdout = tokio::io::stdout();
            match stdout.write_all(&icon.data).await {
                Ok(()) => stdout.flush().await,
                Err(e) => Err(e),
            }
        }
    };
    written.map_err(|e| icon_resolver::ResolveError::InvalidInput(format!("cannot write icon: {e}")))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error ({}): {e}", e.status());
            ExitCode::FAILURE
        }
    }
}
