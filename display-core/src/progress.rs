//! Progress percentage math for uploads.

/// Integer percentage of `loaded` out of `total` bytes, rounded up.
///
/// Always in `0..=100`; counts past the total clamp to 100, and an empty
/// transfer counts as complete. Callers with an unknown total emit no
/// update at all instead of calling this.
pub fn upload_percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let loaded = loaded.min(total) as u128;
    ((loaded * 100).div_ceil(total as u128)) as u8
}
