//! CLI command for listing archive contents

use std::path::Path;

use crate::archive::{Addressing, DagorArchive, ExtractOptions, OffsetChain};

/// Format byte size for human-readable output
pub(crate) fn format_size(bytes: u64) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1}M", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1}K", bytes as f64 / 1024.0)
    } else {
        format!("{bytes}")
    }
}

pub fn execute(
    source: &Path,
    detailed: bool,
    filter: Option<&str>,
    count: bool,
    addressing: Addressing,
) -> anyhow::Result<()> {
    let archive = DagorArchive::open_with_addressing(source, addressing)?;

    let options = ExtractOptions::new().with_filter(filter.map(str::to_string));
    let selected = |name: &str| options.selects(name);

    if count {
        let n = archive.list_names().into_iter().filter(|n| selected(*n)).count();
        println!("{n}");
        return Ok(());
    }

    if !detailed {
        for name in archive.list_names().into_iter().filter(|n| selected(*n)) {
            println!("{name}");
        }
        return Ok(());
    }

    println!("{:>10}  {:>10}  {:>8}  NAME", "OFFSET", "SIZE", "LOCATION");

    let mut chain = OffsetChain::default();
    let mut listed = 0usize;
    let mut total: u64 = 0;
    for entry in archive.entries() {
        let placement = chain.place(entry, archive.path())?;
        if !selected(&entry.name) {
            continue;
        }

        let location = if entry.is_contiguous() {
            "follows".to_string()
        } else {
            format!("{}", entry.location)
        };
        println!(
            "{:>10}  {:>10}  {:>8}  {}",
            archive.payload_base() + placement.offset,
            format_size(u64::from(entry.length)),
            location,
            entry.name
        );

        listed += 1;
        total += u64::from(entry.length);
    }

    println!();
    println!(
        "{listed} files, {} total ({})",
        format_size(total),
        archive.encoding().as_str()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512");
        assert_eq!(format_size(2048), "2.0K");
        assert_eq!(format_size(3 * 1_048_576), "3.0M");
    }
}
