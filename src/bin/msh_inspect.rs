//! # msh-inspect
//!
//! Print a summary of a msh file and optionally write it back out in another encoding.
//!
//! ```bash
//! msh-inspect mesh.msh
//! msh-inspect -v mesh.msh --nodes --elements
//! msh-inspect mesh.msh --rewrite mesh_binary.msh --binary --int-size 4
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use msh::{Document, Encoding, IntSize, WriteOptions};

/// Summarize the contents of a msh mesh file
#[derive(Parser)]
#[command(name = "msh-inspect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Input msh file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// List every node with its coordinates
    #[arg(long)]
    nodes: bool,

    /// List every element with its node tags
    #[arg(long)]
    elements: bool,

    /// Write the parsed document to this path
    #[arg(long, value_name = "OUTPUT")]
    rewrite: Option<PathBuf>,

    /// Use the binary encoding for --rewrite
    #[arg(long, conflicts_with = "ascii")]
    binary: bool,

    /// Use the text encoding for --rewrite
    #[arg(long)]
    ascii: bool,

    /// Width in bytes of size fields for --rewrite (4 or 8)
    #[arg(long, value_parser = ["4", "8"])]
    int_size: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("reading {}", cli.file.display());
    let doc = msh::read_msh(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    print_summary(&doc, &cli);

    if let Some(output) = &cli.rewrite {
        let mut options = WriteOptions::default();
        if cli.binary {
            options = options.encoding(Encoding::Binary);
        }
        if cli.ascii {
            options = options.encoding(Encoding::Ascii);
        }
        match cli.int_size.as_deref() {
            Some("4") => options = options.int_size(IntSize::Four),
            Some("8") => options = options.int_size(IntSize::Eight),
            _ => (),
        }

        let file = std::fs::File::create(output)
            .with_context(|| format!("failed to create {}", output.display()))?;
        msh::write_msh_with(std::io::BufWriter::new(file), &doc, &options)
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!("wrote {}", output.display());
    }

    Ok(())
}

fn print_summary(doc: &Document, cli: &Cli) {
    let format = &doc.format;
    println!(
        "format: {} {:?}, {} byte sizes, {:?} endian",
        format.version,
        format.encoding,
        format.int_size.bytes(),
        format.byte_order
    );

    if !doc.physical_names.is_empty() {
        println!("physical names: {}", doc.physical_names.len());
        for name in &doc.physical_names {
            println!("  ({}, {}) {}", name.dim, name.tag, name.name);
        }
    }

    if !doc.entities.is_empty() {
        let counts: Vec<_> = (0..4).map(|dim| doc.entities_of_dim(dim).count()).collect();
        println!(
            "entities: {} points, {} curves, {} surfaces, {} volumes",
            counts[0], counts[1], counts[2], counts[3]
        );
    }

    let (min, max) = doc.node_tag_range();
    println!(
        "nodes: {} in {} blocks, tags {}..={}",
        doc.num_nodes(),
        doc.node_blocks.len(),
        min,
        max
    );
    for block in &doc.node_blocks {
        println!(
            "  entity ({}, {}){}: {} nodes",
            block.entity_dim,
            block.entity_tag,
            if block.parametric { " parametric" } else { "" },
            block.num_nodes()
        );
        if cli.nodes {
            for (tag, coordinates) in block.iter() {
                println!("    {}: {:?}", tag, coordinates);
            }
        }
    }

    let (min, max) = doc.element_tag_range();
    println!(
        "elements: {} in {} blocks, tags {}..={}",
        doc.num_elements(),
        doc.element_blocks.len(),
        min,
        max
    );
    for block in &doc.element_blocks {
        println!(
            "  entity ({}, {}): {} x {}",
            block.entity_dim,
            block.entity_tag,
            block.num_elements(),
            block.element_type
        );
        if cli.elements {
            for (tag, nodes) in block.iter() {
                println!("    {}: {:?}", tag, nodes);
            }
        }
    }

    if !doc.periodic_links.is_empty() {
        println!("periodic links: {}", doc.periodic_links.len());
    }

    for section in &doc.data_sections {
        println!(
            "{} `{}`: {} entries x {} components, time {}",
            section.kind,
            section.name().unwrap_or(""),
            section.num_entries(),
            section.num_components(),
            section.time().unwrap_or(0.0)
        );
    }

    if let Some(version) = &doc.nanospline_version {
        println!(
            "nanospline {}: {} curves, {} patches",
            version,
            doc.curves.len(),
            doc.patches.len()
        );
    }
}
