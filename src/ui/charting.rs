use learneng::time_series::WpmHistory;

/// WPM history as chart points, x being seconds since the oldest kept sample.
pub fn history_points(history: &WpmHistory, tick_secs: f64) -> Vec<(f64, f64)> {
    history
        .iter()
        .enumerate()
        .map(|(i, wpm)| (i as f64 * tick_secs, f64::from(wpm)))
        .collect()
}

/// Compute X (seconds) and Y (WPM) bounds for the live chart
pub fn compute_chart_params(points: &[(f64, f64)]) -> (f64, f64) {
    let highest_wpm = points.iter().map(|&(_, wpm)| wpm).fold(0.0, f64::max);

    let overall_duration = points.last().map_or(1.0, |p| p.0).max(1.0);

    // leave some headroom above the fastest sample
    (overall_duration, (highest_wpm * 1.2).max(10.0).round())
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
