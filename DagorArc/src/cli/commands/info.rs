//! CLI command for archive header/directory information

use std::path::Path;

use super::list::format_size;
use crate::archive::{Addressing, DagorArchive, read_primary_header};
use crate::utils::hex_dump;

/// Show header and directory facts about an archive
pub fn execute(source: &Path, dump: bool, addressing: Addressing) -> anyhow::Result<()> {
    let archive = DagorArchive::open_with_addressing(source, addressing)?;

    let total: u64 = archive.entries().iter().map(|e| u64::from(e.length)).sum();
    let contiguous = archive.entries().iter().filter(|e| e.is_contiguous()).count();

    println!("Archive: {}", archive.path().display());
    println!();
    println!("Payload encoding: {}", archive.encoding().as_str());
    println!("Entries: {}", archive.len());
    println!("  continuing the previous entry: {contiguous}");
    println!("Directory size: {} bytes", archive.descriptor_len());
    println!(
        "Payload base: {} (locations count from {})",
        archive.payload_base(),
        addressing.as_str()
    );
    println!("Total entry size: {} ({total} bytes)", format_size(total));

    let mut largest: Vec<_> = archive.entries().iter().collect();
    largest.sort_by_key(|e| std::cmp::Reverse(e.length));
    if !largest.is_empty() {
        println!();
        println!("Largest entries:");
        for entry in largest.iter().take(10) {
            println!("  {:>10}  {}", format_size(u64::from(entry.length)), entry.name);
        }
    }

    if dump {
        println!();
        println!("Primary header:");
        print!("{}", hex_dump(&read_primary_header(archive.path())?));
    }

    Ok(())
}
