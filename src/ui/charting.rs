use ratatui::{
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType},
};

use crate::ui::bold;

/// X (session index) and Y (WPM) upper bounds for the history chart
pub fn compute_chart_params(points: &[(f64, f64)], max_wpm: f64) -> (f64, f64) {
    let last_index = points.last().map(|(x, _)| *x).unwrap_or(1.0).max(1.0);
    (last_index, max_wpm.ceil())
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

/// WPM line over the most recent sessions, oldest on the left
pub fn history_chart(points: &[(f64, f64)], max_wpm: f64) -> Chart<'_> {
    let (x_max, y_max) = compute_chart_params(points, max_wpm);

    let datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(points)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("sessions")
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::styled("1", bold()),
                    Span::styled(format_label(x_max + 1.0), bold()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(format_label(y_max), bold()),
                ]),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_chart_params() {
        let points = vec![(0.0, 40.0), (1.0, 55.0), (2.0, 61.0)];
        assert_eq!(compute_chart_params(&points, 80.0), (2.0, 80.0));
        assert_eq!(compute_chart_params(&points, 101.5), (2.0, 102.0));
    }

    #[test]
    fn test_compute_chart_params_empty() {
        assert_eq!(compute_chart_params(&[], 80.0), (1.0, 80.0));
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(1.0), "1");
        assert_eq!(format_label(1.2345), "1.23");
    }
}
