use console::Style;
use roverview_core::collab::PathMetrics;
use roverview_core::overlay::{DetectionBox, PathPolyline, Priority};
use roverview_core::rover::{RoverReport, RoverVerdict};

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    high: Style,
    medium: Style,
    low: Style,
    selected: Style,
    dim: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            high: Style::new().red().bold(),
            medium: Style::new().yellow(),
            low: Style::new().green(),
            selected: Style::new().reverse(),
            dim: Style::new().dim(),
        }
    }

    fn priority(&self, p: Priority) -> &Style {
        match p {
            Priority::High => &self.high,
            Priority::Medium => &self.medium,
            Priority::Low => &self.low,
        }
    }

    fn verdict(&self, v: RoverVerdict) -> &Style {
        match v {
            RoverVerdict::High => &self.low,
            RoverVerdict::Medium => &self.medium,
            RoverVerdict::Low => &self.high,
        }
    }
}

fn title(s: &Styles, text: &str) {
    println!();
    println!("  {}", s.title.apply_to(text));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(text.chars().count())));
    println!();
}

/// Ten-cell bar for a 0-100 score.
fn meter(score: u8) -> String {
    let filled = (score.min(100) as usize + 5) / 10;
    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(10 - filled))
}

pub fn print_route_summary(path: &PathPolyline, metrics: &PathMetrics) {
    let s = Styles::new();
    title(&s, "Route");

    let rows = [
        ("Distance", metrics.distance_label.as_str()),
        ("Est. time", metrics.eta_label.as_str()),
        ("Weather", metrics.weather.as_str()),
        ("Temperature", metrics.temperature.as_str()),
        ("Wind", metrics.wind_speed.as_str()),
        ("Visibility", metrics.visibility.as_str()),
    ];
    for (label, value) in rows {
        println!("  {:<14}{}", s.label.apply_to(label), s.value.apply_to(value));
    }
    for (label, score) in [
        ("Terrain", metrics.terrain_difficulty),
        ("Risk", metrics.environmental_risk),
    ] {
        println!(
            "  {:<14}{} {}",
            s.label.apply_to(label),
            meter(score),
            s.value.apply_to(format!("{score}%"))
        );
    }

    println!();
    println!(
        "  {:<14}{} ({} segments)",
        s.label.apply_to("Waypoints"),
        s.value.apply_to(path.points().len()),
        path.segment_count()
    );
    for (i, p) in path.points().iter().enumerate() {
        println!("    {:>2}  ({:.1}, {:.1})", s.dim.apply_to(i), p.x, p.y);
    }
    println!();
}

pub fn print_detections(boxes: &[DetectionBox], selected: Option<&str>) {
    let s = Styles::new();
    title(&s, &format!("{} objects detected", boxes.len()));

    for b in boxes {
        let chip = b.chip_text();
        let chip = if selected == Some(b.id.as_str()) {
            s.selected.apply_to(chip).to_string()
        } else {
            s.value.apply_to(chip).to_string()
        };
        println!(
            "  {:<8}{:<34}{}",
            s.dim.apply_to(&b.id),
            chip,
            s.priority(b.priority).apply_to(b.priority)
        );
        println!(
            "  {:<8}{}",
            "",
            s.label.apply_to(format!(
                "at ({:.0}, {:.0}) size {:.0}x{:.0}",
                b.bounds.x, b.bounds.y, b.bounds.width, b.bounds.height
            ))
        );
        if !b.description.is_empty() {
            println!("  {:<8}{}", "", b.description);
        }
    }
    println!();
}

pub fn print_rover_report(report: &RoverReport) {
    let s = Styles::new();
    title(&s, "Rover Search");

    let verdict = report.verdict();
    println!(
        "  {:<14}{} {}",
        s.label.apply_to("Probability"),
        meter(report.probability.round().clamp(0.0, 100.0) as u8),
        s.value.apply_to(format!("{:.1}%", report.probability))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Verdict"),
        s.verdict(verdict).apply_to(verdict)
    );
    println!();

    let c = &report.conditions;
    let confidence = format!("{:.1}%", c.confidence);
    let rows = [
        ("Latitude", report.latitude.as_str()),
        ("Longitude", report.longitude.as_str()),
        ("Surface temp", c.surface_temp.as_str()),
        ("Light", c.light_level.as_str()),
        ("Terrain", c.terrain_type.as_str()),
        ("Confidence", confidence.as_str()),
    ];
    for (label, value) in rows {
        println!("  {:<14}{}", s.label.apply_to(label), s.value.apply_to(value));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_bounds() {
        assert_eq!(meter(0).chars().filter(|c| *c == '\u{2588}').count(), 0);
        assert_eq!(meter(100).chars().filter(|c| *c == '\u{2588}').count(), 10);
        assert_eq!(meter(47).chars().count(), 10);
    }
}
