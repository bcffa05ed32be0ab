/// Drops a trailing parenthetical note from a variant name, "impl_a (fast)" -> "impl_a"
pub fn strip_parenthetical(name: &str) -> &str {
    name.split(" (").next().unwrap_or(name)
}

pub fn legend_label(source_label: &str, name: &str) -> String {
    format!("{source_label}: {}", strip_parenthetical(name))
}

/// Log axis bound `pad` decades away from `value`
pub fn log_bound(value: f64, pad: f64) -> f64 {
    10f64.powf(value.log10() + pad)
}

pub fn min_positive(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .min_by(f64::total_cmp)
}

pub fn max_positive(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .max_by(f64::total_cmp)
}
