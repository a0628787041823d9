//! Herb batch output formatting helpers.

use std::io::{self, Write};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use herbtrace_core::herb::describe_entry;
use herbtrace_core::{HerbBatch, HerbRecord, UserProfile};

/// Label/value rows describing a batch, shared by the CLI and the TUI.
pub fn batch_detail_rows(herb: &HerbBatch) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Batch", herb.batch_id.clone()),
        ("Herb", herb.herb_name.clone()),
        ("Quantity", format!("{} kg", herb.quantity)),
        ("Harvested", herb.harvest_date.clone()),
        (
            "Location",
            herb.location
                .as_ref()
                .map_or_else(|| "unknown".to_string(), ToString::to_string),
        ),
        ("Farmer", format!("{} ({})", herb.farmer_name, herb.farmer_id)),
        ("Grade", herb.quality_grade.clone()),
        (
            "Organic",
            if herb.organic_certified { "yes" } else { "no" }.to_string(),
        ),
    ];
    if !herb.photo.is_empty() {
        rows.push(("Photo", herb.photo.clone()));
    }
    if !herb.processing.is_empty() {
        rows.push(("Process", join_entries(&herb.processing)));
    }
    if !herb.testing.is_empty() {
        rows.push(("Testing", join_entries(&herb.testing)));
    }
    rows.push(("Hash", herb.blockchain_hash.clone()));
    rows
}

fn join_entries(entries: &[serde_json::Value]) -> String {
    entries
        .iter()
        .map(describe_entry)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn write_batch_detail(w: &mut impl Write, herb: &HerbBatch) -> io::Result<()> {
    for (label, value) in batch_detail_rows(herb) {
        writeln!(w, "  {:<10}{value}", format!("{label}:"))?;
    }
    Ok(())
}

pub fn write_record_table(w: &mut impl Write, records: &[HerbRecord]) -> io::Result<()> {
    writeln!(
        w,
        "{:<20} {:<20} {:>9} {:<11} {:<10} {:<16}",
        "BATCH", "HERB", "QTY (KG)", "HARVESTED", "GRADE", "FARMER"
    )?;
    for r in records {
        writeln!(
            w,
            "{:<20} {:<20} {:>9} {:<11} {:<10} {:<16}",
            r.batch_id,
            truncate(&r.herb_name, 20),
            r.quantity,
            r.harvest_date,
            truncate(&r.quality_grade, 10),
            truncate(&r.farmer_name, 16),
        )?;
    }
    writeln!(w, "\n{} batch(es)", records.len())?;
    Ok(())
}

pub fn write_profile(w: &mut impl Write, user: &UserProfile) -> io::Result<()> {
    writeln!(w, "  User ID:  {}", user.user_id)?;
    writeln!(w, "  Name:     {}", user.full_name)?;
    writeln!(w, "  Email:    {}", user.email)?;
    writeln!(w, "  Role:     {}", user.user_type)?;
    writeln!(w, "  Phone:    {}", user.phone)?;
    writeln!(w, "  Address:  {}", user.address)?;
    Ok(())
}

/// Cut `s` to at most `max` terminal columns, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}
