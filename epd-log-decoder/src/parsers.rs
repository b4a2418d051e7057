//! Log line extractors
//!
//! Pattern matching for the three start-event styles plus the shared,
//! mode-independent extractors (markers, update heights/waveforms, end
//! times). Every extractor returns `Option` - a line that does not match is
//! simply not that kind of event, never an error.
//!
//! Timestamps come out of the device logs in inconsistent shapes (absolute
//! epoch seconds with fractions for start events, long integer microsecond
//! counters for end events). Both are projected into the same 6-digit
//! "millisecond ring" so they can be subtracted: start events keep the last
//! 3 digits of the integer part plus the first 3 fractional digits, end
//! events keep their last 6 digits.

use crate::types::Mode;
use regex::Regex;
use std::sync::LazyLock;

static BUTTON_UP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"button 1 up (\d+\.\d+)").unwrap());

static BUTTON_DOWN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Sending button 1 down (\d+\.\d+)").unwrap());

static POWER_PRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"def:pbpress:time=(\d+\.\d+):Power button pressed").unwrap());

static EPDC_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"EPDC\]\[(\d+)\]").unwrap());

static MXC_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"mxc_epdc_fb: \[(\d+)\]").unwrap());

static HEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"height=(\d+)").unwrap());

static WIDTH_HEIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"width=\d+, height=(\d+)").unwrap());

/// Waveform name patterns observed across driver versions, tried in order;
/// the first match wins. The order is load-bearing for lines that happen to
/// match more than one form.
static WAVEFORM_RES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"new waveform = (?:0x)?[\da-f]+ \(([\w_() ]+)\)").unwrap(),
        Regex::new(r"waveform:(?:0x)?[\da-f]+ \(([\w_() ]+)\)").unwrap(),
        Regex::new(r"waveform=(?:0x)?[\da-f]+ \(([\w_() ]+)\)").unwrap(),
        Regex::new(r"Sending update\. waveform:(?:0x)?[\da-f]+ \(([\w_() ]+)\)").unwrap(),
    ]
});

static END_TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"end time=(\d+)").unwrap());

static END_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"update end marker=(\d+)").unwrap());

/// Waveform name used when no pattern matched or the capture was empty
pub const UNKNOWN_WAVEFORM: &str = "unknown";

/// Extract the start timestamp for `mode` from a log line.
///
/// Returns the timestamp projected into the 6-digit ring, or `None` if the
/// line is not this mode's trigger event.
pub fn extract_start_timestamp(mode: Mode, line: &str) -> Option<u32> {
    let re: &Regex = match mode {
        Mode::Default => &BUTTON_UP_RE,
        Mode::Swipe => &BUTTON_DOWN_RE,
        Mode::Suspend => &POWER_PRESS_RE,
    };
    let captures = re.captures(line)?;
    normalize_start_timestamp(captures.get(1)?.as_str())
}

/// Project a captured `seconds.fraction` string into the 6-digit ring: last
/// 3 digits of the integer part concatenated with the first 3 fractional
/// digits.
fn normalize_start_timestamp(raw: &str) -> Option<u32> {
    let (secs, frac) = raw.split_once('.')?;
    // Exactly two dot-separated components; a second dot is malformed.
    if frac.contains('.') {
        return None;
    }
    let secs_tail = &secs[secs.len().saturating_sub(3)..];
    let frac_head = &frac[..frac.len().min(3)];
    format!("{secs_tail}{frac_head}").parse().ok()
}

/// Extract a display-update marker id from a log line.
///
/// Two driver styles are recognized: the `EPDC][n]` framebuffer form and the
/// `mxc_epdc_fb: [n]` form.
pub fn extract_marker(line: &str) -> Option<String> {
    EPDC_MARKER_RE
        .captures(line)
        .or_else(|| MXC_MARKER_RE.captures(line))
        .map(|c| c[1].to_string())
}

/// Extract the update height and waveform name from a "Sending update" line.
///
/// Returns `None` when no height field is present. The waveform name falls
/// back to [`UNKNOWN_WAVEFORM`] when no waveform pattern matches or the
/// captured name is empty.
pub fn extract_height_and_waveform(line: &str) -> Option<(u32, String)> {
    let height_caps = HEIGHT_RE
        .captures(line)
        .or_else(|| WIDTH_HEIGHT_RE.captures(line))?;
    let height: u32 = height_caps[1].parse().ok()?;

    let waveform = WAVEFORM_RES
        .iter()
        .find_map(|re| re.captures(line))
        .map(|c| c[1].trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_WAVEFORM.to_string());

    Some((height, waveform))
}

/// Extract the end timestamp from an "update end" line.
///
/// The raw `end time=` field is an arbitrarily long absolute counter; only
/// its last 6 digits land in the ring.
pub fn extract_end_timestamp(line: &str) -> Option<u32> {
    let captures = END_TIME_RE.captures(line)?;
    let digits = captures.get(1)?.as_str();
    let last_6 = &digits[digits.len().saturating_sub(6)..];
    last_6.parse().ok()
}

/// Extract the marker id from an "update end marker=" line
pub fn extract_end_marker(line: &str) -> Option<String> {
    END_MARKER_RE.captures(line).map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_start_timestamp() {
        let line = "2023-10-27 10:00:00.123 [INFO] button 1 up 12345.678";
        assert_eq!(extract_start_timestamp(Mode::Default, line), Some(345678));
    }

    #[test]
    fn test_swipe_mode_start_timestamp() {
        let line = "2023-10-27 10:01:00.200 [INFO] Sending button 1 down 54321.987";
        assert_eq!(extract_start_timestamp(Mode::Swipe, line), Some(321987));
        // Swipe pattern requires the "Sending" prefix
        assert_eq!(
            extract_start_timestamp(Mode::Swipe, "button 1 down 54321.987"),
            None
        );
    }

    #[test]
    fn test_suspend_mode_start_timestamp() {
        let line = "def:pbpress:time=1751099650.205:Power button pressed";
        assert_eq!(extract_start_timestamp(Mode::Suspend, line), Some(650205));
    }

    #[test]
    fn test_start_timestamp_long_epoch_truncation() {
        // Only the last 3 integer digits and first 3 fractional digits count
        let line = "button 1 up 1699999123.456789";
        assert_eq!(extract_start_timestamp(Mode::Default, line), Some(123456));
    }

    #[test]
    fn test_start_timestamp_short_fraction() {
        let line = "button 1 up 12345.67";
        assert_eq!(extract_start_timestamp(Mode::Default, line), Some(34567));
    }

    #[test]
    fn test_non_matching_line_is_absent() {
        assert_eq!(extract_start_timestamp(Mode::Default, "nothing here"), None);
        assert_eq!(extract_marker("nothing here"), None);
        assert_eq!(extract_end_timestamp("nothing here"), None);
    }

    #[test]
    fn test_marker_both_driver_styles() {
        assert_eq!(
            extract_marker("[DEBUG][EPDC][42] submitting update"),
            Some("42".to_string())
        );
        assert_eq!(
            extract_marker("mxc_epdc_fb: [7] update queued"),
            Some("7".to_string())
        );
    }

    #[test]
    fn test_marker_epdc_style_takes_priority() {
        let line = "EPDC][3] then mxc_epdc_fb: [9]";
        assert_eq!(extract_marker(line), Some("3".to_string()));
    }

    #[test]
    fn test_height_with_named_waveform() {
        let line = "Sending update. height=1200, waveform:0x3f1a (GC16)";
        assert_eq!(
            extract_height_and_waveform(line),
            Some((1200, "GC16".to_string()))
        );
    }

    #[test]
    fn test_height_without_waveform_pattern() {
        // "waveform=DU" has no hex id + parenthesized name, so the name is
        // unresolvable and defaults to unknown
        let line = "Sending update. height=800, waveform=DU";
        assert_eq!(
            extract_height_and_waveform(line),
            Some((800, UNKNOWN_WAVEFORM.to_string()))
        );
    }

    #[test]
    fn test_new_waveform_form() {
        let line = "new waveform = 0x2b (DU_fast) height=600";
        assert_eq!(
            extract_height_and_waveform(line),
            Some((600, "DU_fast".to_string()))
        );
    }

    #[test]
    fn test_no_height_is_absent() {
        let line = "Sending update. waveform:0x3f1a (GC16)";
        assert_eq!(extract_height_and_waveform(line), None);
    }

    #[test]
    fn test_end_timestamp_last_six_digits() {
        let line = "update end marker=2 end time=12346000";
        assert_eq!(extract_end_timestamp(line), Some(346000));

        let line = "update end marker=123 end time=1751099651234";
        assert_eq!(extract_end_timestamp(line), Some(651234));
    }

    #[test]
    fn test_end_timestamp_short_value() {
        assert_eq!(extract_end_timestamp("end time=900"), Some(900));
    }

    #[test]
    fn test_end_marker() {
        let line = "update end marker=42 end time=12346000";
        assert_eq!(extract_end_marker(line), Some("42".to_string()));
    }
}
