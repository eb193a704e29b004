use std::path::Path;
use std::time::Instant;

use crate::active::classifier::find_active_elements;
use crate::dom::loader::load_capture;
use crate::obstruct::resolver::suppress_for_selectors;
use crate::page::session::PageSession;
use crate::snapshot::record::ElementRecord;
use crate::snapshot::walker::snapshot;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceEvent;

// ============================================================================
// snapshot subcommand
// ============================================================================

pub fn cmd_snapshot(
    page_path: &str,
    output: Option<&str>,
    pretty: bool,
    digest: bool,
    verbose: u8,
    tracer: &TraceLogger,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = load_capture(Path::new(page_path))?;
    let mut session = PageSession::new();

    if verbose > 0 {
        eprintln!("Snapshotting {}...", page_path);
    }

    let start = Instant::now();
    let records = snapshot(&mut page.dom, &mut session)?;
    let duration = start.elapsed().as_millis();

    tracer.log(
        &TraceEvent::now("snapshot")
            .with_url(page.url.as_deref())
            .with_element_count(records.len())
            .with_duration(duration),
    );

    let content = if digest {
        let fingerprint = records_digest(&records)?;
        let wrapped = serde_json::json!({
            "records": records,
            "digest": fingerprint,
        });
        serialize(&wrapped, pretty)?
    } else {
        serialize(&records, pretty)?
    };

    write_or_print(output, &content)?;

    if verbose > 0 {
        eprintln!("  {} records in {}ms", records.len(), duration);
    }
    Ok(())
}

// ============================================================================
// active subcommand
// ============================================================================

pub fn cmd_active(
    page_path: &str,
    output: Option<&str>,
    verbose: u8,
    tracer: &TraceLogger,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = load_capture(Path::new(page_path))?;
    let mut session = PageSession::new();

    // Classification runs over the identified tree, so snapshot first
    let start = Instant::now();
    let records = snapshot(&mut page.dom, &mut session)?;
    let active = find_active_elements(&page.dom, &page.registry);
    let duration = start.elapsed().as_millis();

    tracer.log(
        &TraceEvent::now("active")
            .with_url(page.url.as_deref())
            .with_element_count(records.len())
            .with_active_count(active.len())
            .with_duration(duration),
    );

    write_or_print(output, &serde_json::to_string(&active)?)?;

    if verbose > 0 {
        eprintln!(
            "  {} of {} elements active in {}ms",
            active.len(),
            records.len(),
            duration
        );
    }
    Ok(())
}

// ============================================================================
// suppress subcommand
// ============================================================================

pub fn cmd_suppress(
    page_path: &str,
    selectors: &[String],
    output: Option<&str>,
    verbose: u8,
    tracer: &TraceLogger,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = load_capture(Path::new(page_path))?;
    let mut session = PageSession::new();

    let start = Instant::now();
    let ledger = suppress_for_selectors(&mut page.dom, &mut session, selectors)?;
    let duration = start.elapsed().as_millis();

    tracer.log(
        &TraceEvent::now("suppress")
            .with_url(page.url.as_deref())
            .with_suppressed_count(ledger.len())
            .with_duration(duration),
    );

    write_or_print(output, &serde_json::to_string(&ledger)?)?;

    if verbose > 0 {
        eprintln!("  {} elements suppressed in {}ms", ledger.len(), duration);
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn serialize<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

fn write_or_print(output: Option<&str>, content: &str) -> std::io::Result<()> {
    match output {
        Some(path) => std::fs::write(path, content),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

/// SHA-1 fingerprint of the serialized record sequence, for cheap change
/// detection between successive snapshots of the same page.
fn records_digest(records: &[ElementRecord]) -> Result<String, serde_json::Error> {
    use sha1::{Digest, Sha1};

    let serialized = serde_json::to_string(records)?;
    let mut hasher = Sha1::new();
    hasher.update(serialized.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
