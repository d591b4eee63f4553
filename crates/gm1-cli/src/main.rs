use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use gm1_core::export::header_to_json;
use gm1_core::palette::palette_image;
use gm1_core::prelude::*;
use image::ImageFormat;
use serde::Deserialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "gm1",
    about = "Decode GM1 sprite containers into PNG images and metadata",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a .gm1 container into PNG images (or one atlas) plus metadata
    Convert(ConvertArgs),
    /// Convert a standalone .tgx file into one PNG
    Tgx(TgxArgs),
    /// Dump the container header as JSON and the palettes as a swatch PNG
    Inspect(InspectArgs),
}

#[derive(Parser, Debug, Clone)]
struct ConvertArgs {
    // Input/Output
    /// Input .gm1 file
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Atlas base name (files will be name.png/.json); defaults to the input file stem
    #[arg(short, long, help_heading = "Input/Output")]
    name: Option<String>,
    /// YAML config file path (present keys override the flags)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Decoding
    /// Palette used for animation containers (0..10)
    #[arg(long, default_value_t = 1, help_heading = "Decoding")]
    palette: u8,
    /// Compose tile parts into one image per tile object
    #[arg(long, default_value_t = false, help_heading = "Decoding")]
    assemble: bool,
    /// Pixel arena capacity in bytes (atlas mode)
    #[arg(long, default_value_t = 100 * 1024 * 1024, help_heading = "Decoding")]
    arena_bytes: usize,

    // Layout
    /// Pack every image into one atlas
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    pack: bool,
    /// Order atlas entries by ascending height (ignored for animations)
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    sort: bool,
    /// Atlas width limit
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    max_width: u32,
    /// Draw red outlines (debug)
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    outlines: bool,

    // Export
    /// Metadata format: json | data
    #[arg(long, default_value = "json", value_parser = ["json", "data"], help_heading = "Export")]
    metadata: String,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
}

#[derive(Parser, Debug, Clone)]
struct TgxArgs {
    /// Input .tgx file
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug, Clone)]
struct InspectArgs {
    /// Input .gm1 file
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,
    /// Edge length of one palette swatch
    #[arg(long, default_value_t = 8)]
    swatch: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Convert(args) => run_convert(args, cli.progress && !cli.quiet),
        Commands::Tgx(args) => run_tgx(args),
        Commands::Inspect(args) => run_inspect(args),
    }
}

fn run_convert(cli: &ConvertArgs, show_progress: bool) -> anyhow::Result<()> {
    let mut cfg = ConvertConfig::builder()
        .palette(cli.palette)
        .assemble(cli.assemble)
        .pack(cli.pack)
        .sort(cli.sort)
        .max_width(cli.max_width)
        .arena_bytes(cli.arena_bytes)
        .outlines(cli.outlines)
        .build();
    let mut metadata: MetadataFormat = cli
        .metadata
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown metadata format {}", cli.metadata))?;

    // Config file keys override the flags one by one
    if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        if let Some(m) = y.metadata.as_deref() {
            metadata = m.parse().map_err(|_| {
                anyhow::anyhow!("unknown metadata format {m} in {}", path.display())
            })?;
        }
        cfg = y.apply(cfg);
    }

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;

    let bytes =
        fs::read(&cli.input).with_context(|| format!("read {}", cli.input.display()))?;
    let out = convert_gm1(&bytes, &cfg)
        .with_context(|| format!("convert {}", cli.input.display()))?;
    info!(
        images = out.list.images.len(),
        kind = out.list.type_tag(),
        "decoded container"
    );

    let name = match &cli.name {
        Some(n) => n.clone(),
        None => file_stem(&cli.input),
    };
    let meta = render_metadata(&out.list, metadata)?;

    match &out.atlas {
        Some(atlas) => {
            let png_path = cli.out_dir.join(format!("{name}.png"));
            atlas
                .rgba
                .save_with_format(&png_path, ImageFormat::Png)
                .with_context(|| format!("write {}", png_path.display()))?;
            let meta_path = cli.out_dir.join(format!("{name}.{}", metadata.extension()));
            fs::write(&meta_path, meta)
                .with_context(|| format!("write {}", meta_path.display()))?;
            info!(
                ?png_path,
                ?meta_path,
                width = atlas.layout.width,
                height = atlas.layout.height,
                "atlas written"
            );
        }
        None => {
            save_images_with_progress(&out.list, &cli.out_dir, show_progress)?;
            let meta_path = cli.out_dir.join(format!("data.{}", metadata.extension()));
            fs::write(&meta_path, meta)
                .with_context(|| format!("write {}", meta_path.display()))?;
            info!(
                ?meta_path,
                images = out.list.images.len(),
                "images written"
            );
        }
    }
    Ok(())
}

fn run_tgx(args: &TgxArgs) -> anyhow::Result<()> {
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create out_dir {}", args.out_dir.display()))?;
    let tgx = Tgx::open(&args.input).with_context(|| format!("read {}", args.input.display()))?;
    let image = tgx
        .decode()
        .with_context(|| format!("decode {}", args.input.display()))?;
    let png_path = args.out_dir.join("0.png");
    image
        .pixels
        .save_with_format(&png_path, ImageFormat::Png)
        .with_context(|| format!("write {}", png_path.display()))?;
    info!(?png_path, width = tgx.width, height = tgx.height, "tgx written");
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> anyhow::Result<()> {
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create out_dir {}", args.out_dir.display()))?;
    let container =
        Container::open(&args.input).with_context(|| format!("read {}", args.input.display()))?;

    let json_path = args.out_dir.join("gm1_header.json");
    fs::write(
        &json_path,
        serde_json::to_vec_pretty(&header_to_json(&container.header))?,
    )
    .with_context(|| format!("write {}", json_path.display()))?;
    info!(?json_path, "header written");

    let png_path = args.out_dir.join("palette.png");
    palette_image(&container.palette, args.swatch)?
        .save_with_format(&png_path, ImageFormat::Png)
        .with_context(|| format!("write {}", png_path.display()))?;
    info!(?png_path, "palette written");
    Ok(())
}

fn render_metadata(list: &ImageList, format: MetadataFormat) -> anyhow::Result<Vec<u8>> {
    Ok(match format {
        MetadataFormat::Json => serde_json::to_vec_pretty(&to_json(list))?,
        MetadataFormat::Data => to_data_text(list).into_bytes(),
    })
}

fn save_images_with_progress(list: &ImageList, out_dir: &Path, progress: bool) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(list.images.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} saving {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    for (i, image) in list.images.iter().enumerate() {
        let png_path = out_dir.join(format!("{i}.png"));
        if let Some(b) = &bar {
            b.set_message(format!("{i}.png"));
        }
        // zero-sized images cannot be encoded
        if image.width() > 0 && image.height() > 0 {
            image
                .pixels
                .save_with_format(&png_path, ImageFormat::Png)
                .with_context(|| format!("write {}", png_path.display()))?;
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(())
}

fn file_stem(p: &Path) -> String {
    p.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("atlas")
        .to_string()
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    palette: Option<u8>,
    assemble: Option<bool>,
    pack: Option<bool>,
    sort: Option<bool>,
    max_width: Option<u32>,
    arena_bytes: Option<usize>,
    outlines: Option<bool>,
    metadata: Option<String>,
}

impl YamlConfig {
    fn apply(self, mut cfg: ConvertConfig) -> ConvertConfig {
        if let Some(v) = self.palette {
            cfg.palette = v;
        }
        if let Some(v) = self.assemble {
            cfg.assemble = v;
        }
        if let Some(v) = self.pack {
            cfg.pack = v;
        }
        if let Some(v) = self.sort {
            cfg.sort = v;
        }
        if let Some(v) = self.max_width {
            cfg.max_width = v;
        }
        if let Some(v) = self.arena_bytes {
            cfg.arena_bytes = v;
        }
        if let Some(v) = self.outlines {
            cfg.outlines = v;
        }
        cfg
    }
}
