//! Txpk CLI - Command-line tool for packing DDS textures into TPK containers.
//!
//! This is the main entry point for the txpk command-line application.

use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use txpk::prelude::*;

/// Txpk - DDS to TPK texture container packer
#[derive(Parser)]
#[command(name = "txpk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log per-texture detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack the textures listed in a manifest into a TPK container
    Pack {
        /// Manifest file, one texture or cubemap per line
        manifest: PathBuf,

        /// Output container (defaults to the manifest path with a .tpk extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep only the top mip level of every texture
        #[arg(long)]
        no_mipmaps: bool,

        /// Prefix prepended to every texture name
        #[arg(short, long, env = "TXPK_PREFIX", default_value = "")]
        prefix: String,

        /// Omit the texture name block
        #[arg(long)]
        no_ext_info: bool,

        /// Directory that relative manifest paths resolve against
        #[arg(short, long)]
        base_dir: Option<PathBuf>,
    },

    /// Show the header and directory of a TPK container
    Inspect {
        /// Path to the TPK file
        container: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write every texture of a TPK container back out as DDS
    Extract {
        /// Path to the TPK file
        container: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Pack {
            manifest,
            output,
            no_mipmaps,
            prefix,
            no_ext_info,
            base_dir,
        } => {
            let options = PackOptions {
                no_mipmaps,
                name_prefix: prefix,
                ext_info: !no_ext_info,
                base_dir,
            };
            let output = output.unwrap_or_else(|| default_output(&manifest));
            cmd_pack(&manifest, &output, &options)?;
        }
        Commands::Inspect { container, json } => {
            cmd_inspect(&container, json)?;
        }
        Commands::Extract { container, output } => {
            cmd_extract(&container, &output)?;
        }
    }

    Ok(())
}

fn cmd_pack(manifest_path: &Path, output: &Path, options: &PackOptions) -> Result<()> {
    println!("Reading manifest: {}", manifest_path.display());

    let manifest = Manifest::load(manifest_path).context("Failed to read manifest")?;
    println!("Loading {} entries...", manifest.len());

    let pb = ProgressBar::new(manifest.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    // Every source is read before the output file is touched.
    let start = Instant::now();
    let mut builder = CatalogBuilder::new(options);
    for entry in manifest.entries() {
        builder
            .add(entry)
            .with_context(|| format!("Failed to load {}", entry.name()))?;
        pb.inc(1);
    }
    let catalog = builder.finish();
    pb.finish_with_message("Done");

    let stats = pack_to_file(&catalog, options, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        textures = stats.textures,
        slots = stats.slots,
        bytes = stats.total_size,
        "packed container"
    );
    println!(
        "Packed {} textures ({} empty) into {} in {:?}",
        stats.textures,
        stats.placeholders,
        output.display(),
        start.elapsed()
    );
    println!("{} level slots, {} bytes", stats.slots, stats.total_size);
    if stats.zero_length_levels > 0 {
        println!("{} zero-length levels", stats.zero_length_levels);
    }
    if stats.offset_mismatches > 0 {
        println!("{} offsets patched", stats.offset_mismatches);
    }

    Ok(())
}

fn cmd_inspect(path: &Path, json: bool) -> Result<()> {
    let data = fs::read(path).context("Failed to read container")?;
    let container = PackedContainer::parse(&data).context("Failed to parse container")?;
    let summary = container.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Textures:  {}", summary.texture_count);
    println!("Size:      {:#x}", summary.total_size);
    println!("Ext info:  {:#x}", summary.ext_info_offset);
    println!();

    for texture in &summary.textures {
        let format = texture
            .format
            .map(|f| f.to_string())
            .unwrap_or_else(|| format!("#{}", texture.format_code));
        let kind = match texture.kind {
            TextureKind::Flat => "",
            TextureKind::Cube => " cube",
        };
        println!(
            "{:>4} {:<5} {:>5}x{:<5} {:>2} mips{} {:>8} @{:#x}  {}",
            texture.index,
            format,
            texture.width,
            texture.height,
            texture.mip_count,
            kind,
            texture.top_level_size,
            texture.offset_table_offset,
            texture.name.as_deref().unwrap_or("")
        );
        if !texture.level_offsets.is_empty() {
            let offsets: Vec<String> = texture
                .level_offsets
                .iter()
                .map(|o| format!("{o:#x}"))
                .collect();
            println!("       {}", offsets.join(" "));
        }
    }

    Ok(())
}

fn cmd_extract(path: &Path, output: &Path) -> Result<()> {
    println!("Extracting: {} -> {}", path.display(), output.display());

    let data = fs::read(path).context("Failed to read container")?;
    let container = PackedContainer::parse(&data).context("Failed to parse container")?;

    fs::create_dir_all(output)?;

    let start = Instant::now();
    let mut written = 0;
    for texture in container.textures() {
        let name = texture
            .name
            .clone()
            .unwrap_or_else(|| format!("texture_{}", texture.index));

        let Some(format) = texture.format.filter(|_| texture.mip_count > 0) else {
            tracing::warn!(name = %name, "empty entry, skipped");
            continue;
        };

        for face in 0..texture.face_count() {
            let levels = container
                .face_levels(texture, face)
                .with_context(|| format!("Failed to read levels of {name}"))?;
            let dds = encode_dds(format, texture.width as u32, texture.height as u32, &levels);

            let file_name = match texture.kind {
                TextureKind::Flat => format!("{name}.dds"),
                TextureKind::Cube => format!("{name}_face{face}.dds"),
            };
            let output_path = output.join(sanitize(&file_name));
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, dds)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            written += 1;
        }
    }

    println!("Wrote {} files in {:?}", written, start.elapsed());

    Ok(())
}

/// `textures.txt` -> `textures.tpk`, anything else gets `.tpk` appended.
fn default_output(manifest: &Path) -> PathBuf {
    if manifest.extension().and_then(|e| e.to_str()) == Some("txt") {
        manifest.with_extension("tpk")
    } else {
        let mut path = OsString::from(manifest.as_os_str());
        path.push(".tpk");
        PathBuf::from(path)
    }
}

/// Keep a texture name inside the output directory.
fn sanitize(name: &str) -> PathBuf {
    Path::new(&name.replace('\\', "/"))
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}
