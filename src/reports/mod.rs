use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use keyrace::error::KrResult;
use keyrace::metrics::{SessionResult, Severity, WordResult};
use serde::Serialize;
use std::path::Path;

pub struct AuditRow {
    pub name: String,
    pub result: SessionResult,
}

fn severity_color(s: Severity) -> Color {
    match s.0 {
        0 => Color::Green,
        1 | 2 => Color::Yellow,
        _ => Color::Red,
    }
}

pub fn print_result(r: &SessionResult) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("WPM").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Raw"),
        Cell::new("Acc %").fg(Color::Green),
        Cell::new("Cons %"),
        Cell::new("Time (s)"),
        Cell::new("Chars c/i/e/m"),
        Cell::new("Keys c/i"),
        Cell::new("End"),
    ]);
    table.add_row(vec![
        Cell::new(format!("{:.1}", r.wpm)).add_attribute(Attribute::Bold),
        Cell::new(format!("{:.1}", r.raw_wpm)),
        Cell::new(format!("{:.1}", r.accuracy)),
        Cell::new(format!("{:.1}", r.consistency)),
        Cell::new(format!("{:.2}", r.elapsed_ms as f64 / 1000.0)),
        Cell::new(format!(
            "{}/{}/{}/{}",
            r.chars.correct, r.chars.incorrect, r.chars.extra, r.chars.missed
        )),
        Cell::new(format!("{}/{}", r.keypresses.correct, r.keypresses.incorrect)),
        Cell::new(r.reason.to_string()),
    ]);
    for i in 0..7 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    println!("\n📊 Result ({} mode)", r.mode);
    println!("{}", table);
}

/// Only words with at least one mistake are listed.
pub fn print_word_table(words: &[WordResult]) {
    let flawed: Vec<&WordResult> = words.iter().filter(|w| w.mistakes() > 0).collect();
    if flawed.is_empty() {
        println!("✨ No word-level mistakes.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["#", "Expected", "Typed", "Inc", "Ext", "Miss", "Sev"]);

    for (i, w) in words.iter().enumerate().filter(|(_, w)| w.mistakes() > 0) {
        let color = severity_color(w.severity);
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&w.expected),
            Cell::new(&w.typed).fg(color),
            Cell::new(w.incorrect),
            Cell::new(w.extra),
            Cell::new(w.missed),
            Cell::new(w.severity.0).fg(color),
        ]);
    }

    println!("\n🔥 Problem words ({} of {})", flawed.len(), words.len());
    println!("{}", table);
}

pub fn print_audit(rows: &[AuditRow]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Replay").add_attribute(Attribute::Bold),
        Cell::new("WPM").fg(Color::Cyan),
        Cell::new("Raw"),
        Cell::new("Acc %").fg(Color::Green),
        Cell::new("Cons %"),
        Cell::new("Words"),
        Cell::new("Worst").fg(Color::Red),
    ]);

    for row in rows {
        let r = &row.result;
        let worst = r.words.iter().map(|w| w.severity).max().unwrap_or_default();
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(format!("{:.1}", r.wpm)),
            Cell::new(format!("{:.1}", r.raw_wpm)),
            Cell::new(format!("{:.1}", r.accuracy)),
            Cell::new(format!("{:.1}", r.consistency)),
            Cell::new(r.words.len()),
            Cell::new(worst.0).fg(severity_color(worst)),
        ]);
    }
    for i in 1..=6 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{}", table);
}

#[derive(Serialize)]
struct SampleRow {
    sample: usize,
    wpm: f64,
    raw_wpm: f64,
}

pub fn write_samples_csv<P: AsRef<Path>>(path: P, r: &SessionResult) -> KrResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for (i, (wpm, raw)) in r.wpm_samples.iter().zip(&r.raw_samples).enumerate() {
        wtr.serialize(SampleRow {
            sample: i + 1,
            wpm: *wpm,
            raw_wpm: *raw,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
