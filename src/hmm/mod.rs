pub mod counts;
pub mod model;
pub mod tagger;
pub mod trainer;

/// Sentinel tag preceding the first word of every sentence.
pub const START_TAG: &str = "<s>";
/// Sentinel tag following the last word of every sentence.
pub const END_TAG: &str = "<e>";

/// Score substituted for any log-probability whose argument is zero.
pub const LOG_ZERO: f64 = -1e10;

pub(crate) fn is_sentinel(tag: &str) -> bool {
    tag == START_TAG || tag == END_TAG
}
