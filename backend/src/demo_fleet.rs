//! A small, fixed fleet used to bring the service up with something to
//! schedule against when no external fleet definition is supplied. Mirrors
//! the six-printer baseline fleet the engine's own seed scenarios are
//! written against.

use corelib::{InkChannel, PaperKind, Printer, PrinterMetadata, PrintType};

fn printer(id: &str, types: &[&str], paper: &[(&str, u32)], ink: &[(&str, f64)], speed: f64) -> Printer {
    Printer {
        id: id.to_string(),
        supported: types.iter().map(|t| PrintType::new(*t)).collect(),
        paper_count: paper.iter().map(|(k, v)| (PaperKind::new(*k), *v)).collect(),
        ink: ink.iter().map(|(k, v)| (InkChannel::new(*k), *v)).collect(),
        speed,
        online: true,
        metadata: PrinterMetadata::default(),
    }
}

pub fn baseline_fleet() -> Vec<Printer> {
    vec![
        printer("P1", &["bw", "color"], &[("A4", 180), ("A3", 50)], &[("black", 70.0), ("C", 60.0), ("M", 55.0), ("Y", 50.0)], 35.0),
        printer("P2", &["bw", "thick"], &[("A4", 90), ("Thick", 40)], &[("black", 80.0)], 25.0),
        printer("P3", &["color", "glossy"], &[("Glossy", 30), ("A4", 70)], &[("black", 50.0), ("C", 45.0), ("M", 46.0), ("Y", 42.0)], 20.0),
        printer("P4", &["postersize"], &[("Poster", 15)], &[("black", 40.0), ("C", 30.0), ("M", 32.0), ("Y", 28.0)], 15.0),
        printer("P5", &["bw", "color", "glossy"], &[("A4", 200), ("Glossy", 60)], &[("black", 85.0), ("C", 80.0), ("M", 79.0), ("Y", 78.0)], 50.0),
        printer(
            "P6",
            &["bw", "color", "thick", "glossy", "postersize"],
            &[("A4", 300), ("Thick", 80), ("Glossy", 100), ("Poster", 40)],
            &[("black", 95.0), ("C", 92.0), ("M", 93.0), ("Y", 94.0)],
            65.0,
        ),
    ]
}
