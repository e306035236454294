//! Author identity normalization

/// Case-fold a raw author name and collapse every run of whitespace to one space.
///
/// This is the only identity resolution performed: two spellings of the same
/// person that differ in anything but case or spacing remain distinct authors.
pub fn normalize_author_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
