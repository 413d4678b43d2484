use crate::core::rates::TrendSeries;

const COLUMN_WIDTH: usize = 5;
const AXIS_WIDTH: usize = 8;

/// Draws the trend as a text line chart with a value legend.
pub fn render_trend(series: &TrendSeries, height: usize) -> String {
    let height = height.max(2);
    let mut out = format!("value of 1 {}\n", series.base);
    if series.rates.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let max = series.rates.iter().copied().fold(f64::MIN, f64::max);
    let min = series.rates.iter().copied().fold(f64::MAX, f64::min);
    let (min, span) = if max - min < 1e-12 {
        (min - 0.5, 1.0)
    } else {
        (min, max - min)
    };
    let steps = (height - 1) as f64;
    let levels: Vec<usize> = series
        .rates
        .iter()
        .map(|rate| (((rate - min) / span) * steps).round() as usize)
        .collect();

    for row in (0..height).rev() {
        let label = if row == 0 || row == height - 1 {
            format!("{:>w$.4}", min + span * row as f64 / steps, w = AXIS_WIDTH)
        } else {
            " ".repeat(AXIS_WIDTH)
        };
        let mut line = format!("{label} │");
        for level in &levels {
            let mark = if *level == row { "●" } else { " " };
            line.push_str(&format!("{:^w$}", mark, w = COLUMN_WIDTH));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&format!(
        "{} └{}\n",
        " ".repeat(AXIS_WIDTH),
        "─".repeat(COLUMN_WIDTH * levels.len())
    ));
    let labels: String = series
        .labels
        .iter()
        .map(|label| format!("{:^w$}", label, w = COLUMN_WIDTH))
        .collect();
    out.push_str(&format!("{}  {}\n", " ".repeat(AXIS_WIDTH), labels.trim_end()));

    let legend: Vec<String> = series
        .labels
        .iter()
        .zip(&series.rates)
        .map(|(label, rate)| format!("{label}: {rate:.4}"))
        .collect();
    out.push_str(&legend.join("  "));
    out
}
