//! Postal code normalization.

/// Length of a normalized zipcode.
pub const ZIPCODE_LEN: usize = 5;

/// Pads `raw` on the left with `'0'` up to five characters, then keeps the
/// first five.
///
/// Inputs longer than five characters (ZIP+4, typos) are truncated, never
/// re-padded. An empty input becomes `"00000"`.
pub fn clean_zipcode(raw: &str) -> String {
    let len = raw.chars().count();
    let padding = ZIPCODE_LEN.saturating_sub(len);
    std::iter::repeat_n('0', padding)
        .chain(raw.chars())
        .take(ZIPCODE_LEN)
        .collect()
}
