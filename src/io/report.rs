// Copyright @yucwang 2026

use std::io::{self, Write};

use console::style;

use crate::core::reducer::VolumeEstimate;

/// Writes the four-line summary. `styled` enables terminal emphasis on the labels.
pub fn write_report<W: Write>(out: &mut W, estimate: &VolumeEstimate, styled: bool) -> io::Result<()> {
    let label = |text: &'static str| style(text).bold().force_styling(styled);
    writeln!(out, "{} {}", label("Points inside:"), estimate.total_hits)?;
    writeln!(out, "{} {}", label("Total points:"), estimate.total_samples)?;
    writeln!(out, "{} {:.3}", label("Boundary box volume:"), estimate.box_volume)?;
    writeln!(out, "{} {}", label("Estimated volume:"), estimate.volume)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lines() {
        let estimate = VolumeEstimate {
            total_hits: 187_500,
            total_samples: 1_500_000,
            box_volume: 8.0,
            volume: 1.0,
            prism_count: 1,
            deg_acc: 0.01,
        };
        let mut out = Vec::new();
        write_report(&mut out, &estimate, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            "Points inside: 187500",
            "Total points: 1500000",
            "Boundary box volume: 8.000",
            "Estimated volume: 1",
        ]);
    }
}
