use clap::Parser;
use std::fs;
use std::num::NonZeroU8;
use std::path::PathBuf;
use image_to_palette_wasm::{ImageStore, Palette, ProfileOptions, profile_from_bytes};
use anyhow::Context;
use anyhow::Result;

/// Extract color palettes and OKLCH style variants from images.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of colors in the extracted palette
    #[arg(short = 'k', long, value_parser = clap::value_parser!(u8).range(2..=20))]
    colors: Option<u8>,

    /// Seed for k-means++ initialization (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Quantization bucket width per channel
    #[arg(short, long)]
    bucket_size: Option<NonZeroU8>,

    /// JSON file with profile options; command-line flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also print the 256-color micro palette
    #[arg(short, long)]
    micro: bool,

    /// Print the results as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn load_options(args: &Args) -> Result<ProfileOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ProfileOptions::default(),
    };

    if let Some(k) = args.colors {
        options = options.colors(usize::from(k));
    }
    if let Some(seed) = args.seed {
        options = options.seed(seed);
    }
    if let Some(size) = args.bucket_size {
        options = options.bucket_size(size);
    }
    Ok(options)
}

fn print_palette(palette: &Palette) {
    println!("{} ({} colors)", palette.name, palette.len());
    for (i, entry) in palette.colors.iter().enumerate() {
        let [r, g, b] = entry.rgb;
        println!(
            "  {:>3}. {}  rgb({r}, {g}, {b})  {}",
            i + 1,
            entry.hex,
            entry.oklch
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = load_options(&args)?;
    log::debug!("profile options: {options:?}");

    let mut store = ImageStore::new();
    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let profile = profile_from_bytes(&bytes, &options)
            .with_context(|| format!("extracting palettes from {}", input.display()))?;

        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string());
        log::info!("processed {name}: {} colors", profile.primary.len());
        store.add(name, bytes.len() as u64, profile);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&store)?);
        return Ok(());
    }

    for image in store.iter() {
        println!("== {} ({})", image.name, image.size_text());
        if image.profile.primary.is_empty() {
            println!("no colors available (image is empty or fully transparent)\n");
            continue;
        }
        for palette in image.profile.palettes() {
            print_palette(palette);
        }
        if args.micro {
            print_palette(&image.profile.micro);
        }
        println!();
    }

    Ok(())
}
