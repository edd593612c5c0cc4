/// Formats a duration in milliseconds as zero-padded `mm:ss`.
///
/// Sub-second precision is floored away and minutes are not wrapped at 60,
/// so one hour renders as `60:00`.
pub fn format_time(ms: u64) -> String {
    let total_secs = ms / 1000;
    let m = total_secs / 60;
    let s = total_secs % 60;
    format!("{m:02}:{s:02}")
}
