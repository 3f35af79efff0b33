use std::path::PathBuf;

use clap::Parser;
use cover_renderer::{
    Composer, CompositionConfig, EditOutcome, EngineConfig, Field, UploadedImage,
};
use tracing_subscriber::EnvFilter;

/// Compose a blog cover image and export it as PNG.
#[derive(Debug, Parser)]
#[command(name = "cover-renderer", version)]
struct Cli {
    /// Engine settings (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from a saved composition instead of the defaults.
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Write the final composition to this file.
    #[arg(long)]
    save_profile: Option<PathBuf>,

    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    /// Catalog value of the icon, e.g. `rust`.
    #[arg(long)]
    icon: Option<String>,
    #[arg(long)]
    icon_style: Option<String>,
    /// Image file used as the icon.
    #[arg(long)]
    custom_icon: Option<PathBuf>,
    /// Font id, e.g. `font-Virgil`.
    #[arg(long)]
    font: Option<String>,
    #[arg(long)]
    theme: Option<String>,
    #[arg(long)]
    bg_color: Option<String>,
    #[arg(long)]
    pattern: Option<String>,
    /// Platform preset, e.g. `hashnode` or `size-16:9`.
    #[arg(long)]
    platform: Option<String>,
    #[arg(long)]
    width: Option<String>,
    #[arg(long)]
    ratio_x: Option<String>,
    #[arg(long)]
    ratio_y: Option<String>,

    /// Pick a random background, border and pattern.
    #[arg(long)]
    random: bool,

    /// Also write the preview SVG to this file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Output directory; overrides the configured one.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl Cli {
    /// Field edits that do not depend on the catalog, in application order.
    fn plain_edits(&self) -> Vec<(Field, &str)> {
        [
            (Field::Title, &self.title),
            (Field::Author, &self.author),
            (Field::Font, &self.font),
            (Field::Theme, &self.theme),
            (Field::BgColor, &self.bg_color),
            (Field::Pattern, &self.pattern),
            (Field::Platform, &self.platform),
            (Field::CustomPlatformWidth, &self.width),
            (Field::CustomPlatformX, &self.ratio_x),
            (Field::CustomPlatformY, &self.ratio_y),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|value| (field, value)))
        .collect()
    }
}

fn report(field: &str, outcome: EditOutcome) {
    if let EditOutcome::Ignored(reason) = outcome {
        tracing::warn!(field, %reason, "option ignored");
    }
}

#[tokio::main]
async fn main() -> cover_renderer::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let engine = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    let initial = match &cli.profile {
        Some(path) => CompositionConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => engine.initial_composition(),
    };

    let loader = engine.catalog_loader()?;
    let mut composer = Composer::with_defaults(initial, loader.optimistic());
    let pending = loader.spawn();

    for (field, value) in cli.plain_edits() {
        report(field.as_str(), composer.set_field(field.as_str(), value));
    }

    match pending.await {
        Ok(load) => composer.deliver_catalog(load),
        Err(err) => tracing::warn!(error = %err, "catalog load did not finish"),
    }

    if let Some(icon) = &cli.icon {
        report("icon", composer.set_field(Field::Icon.as_str(), icon));
    }
    if let Some(style) = &cli.icon_style {
        report("iconStyle", composer.set_field(Field::IconStyle.as_str(), style));
    }
    if let Some(path) = &cli.custom_icon {
        let image = UploadedImage::from_path(path)?;
        report("customIcon", composer.upload_custom_icon(image));
    }
    if cli.random {
        report("random", composer.randomize_theme(&mut rand::thread_rng()));
    }

    if let Some(path) = &cli.save_profile {
        std::fs::write(path, composer.config().to_json_pretty()?)?;
    }

    let tree = composer.render();
    if let Some(path) = &cli.svg {
        std::fs::write(path, tree.to_svg())?;
    }

    let out = cli.out.as_ref().unwrap_or(&engine.output_dir);
    let path = engine.exporter().export(&tree, out).await?;
    println!("{}", path.display());
    Ok(())
}
