/// Scales a raw integer token amount by `10^decimals`.
///
/// `format_units(1_500_000, 6) == 1.5`
pub fn format_units(raw: u128, decimals: u8) -> f64 {
    raw as f64 / 10f64.powi(decimals as i32)
}
