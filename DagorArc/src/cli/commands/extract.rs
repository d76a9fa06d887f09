//! CLI command for archive extraction

use std::path::Path;
use std::time::Instant;

use crate::archive::{Addressing, DagorArchive, ExtractOptions, ExtractPhase};
use crate::cli::progress::{LOOKING_GLASS, PACKAGE, entry_bar, print_done, print_step};
use crate::error::Error;
use crate::utils::normalize_path;

pub fn execute(
    source: &Path,
    destination: &Path,
    filter: Option<&str>,
    file: Option<&str>,
    keep_existing: bool,
    progress: bool,
    addressing: Addressing,
) -> anyhow::Result<()> {
    let started = Instant::now();

    if progress {
        print_step(1, 2, LOOKING_GLASS, "Reading archive directory...");
    }
    let archive = DagorArchive::open_with_addressing(source, addressing)?;

    // Single entry extraction
    if let Some(name) = file {
        let name = normalize_path(name);
        if progress {
            print_step(2, 2, PACKAGE, &format!("Extracting {name}..."));
        }
        let Some(path) = archive.extract(&name, destination)? else {
            return Err(Error::EntryNotFound(name).into());
        };
        println!("Extracted {}", path.display());
        if progress {
            print_done(started.elapsed());
        }
        return Ok(());
    }

    let options = ExtractOptions::new()
        .with_filter(filter.map(str::to_string))
        .with_keep_existing(keep_existing);

    let summary = if progress {
        print_step(
            2,
            2,
            PACKAGE,
            &format!("Extracting {} entries ({})...", archive.len(), archive.encoding().as_str()),
        );
        let pb = entry_bar(archive.len() as u64, "Extracting");
        let summary = archive.extract_all_with_options(destination, &options, &|p| {
            match p.phase {
                ExtractPhase::WritingFiles | ExtractPhase::SkippingFiles => {
                    pb.set_position(p.current as u64);
                }
                ExtractPhase::Complete => pb.finish_and_clear(),
                ExtractPhase::OpeningStream => {}
            }
        });
        pb.finish_and_clear();
        summary?
    } else {
        archive.extract_all_with_options(destination, &options, &|_| {})?
    };

    println!(
        "{} file(s) extracted to {}",
        summary.files_written(),
        destination.display()
    );
    if summary.skipped > 0 {
        println!("{} file(s) skipped", summary.skipped);
    }
    if progress {
        print_done(started.elapsed());
    }

    Ok(())
}
