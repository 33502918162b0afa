//! Small numeric helpers shared by the tracker and the progress report.

/// Round to `places` decimal places, ties to even (0.125 -> 0.12, 0.375 -> 0.38).
pub fn round_to(value: f64, places: i32) -> f64 {
  let factor = 10f64.powi(places);
  (value * factor).round_ties_even() / factor
}

/// Arithmetic mean, or 0 for an empty input.
pub fn mean_or_zero<I>(values: I) -> f64
where
  I: IntoIterator<Item = f64>,
{
  let (sum, n) = values.into_iter().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
  if n == 0 { 0.0 } else { sum / n as f64 }
}

/// A probability mean expressed as a percentage with two decimals.
pub fn as_percent(mean: f64) -> f64 {
  round_to(mean * 100.0, 2)
}
