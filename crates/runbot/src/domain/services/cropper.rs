//! Output Cropper
//!
//! Fits execution output into a single message by dropping its tail and
//! noting how many characters were dropped.

/// Length of the crop notice without the digits of the count
pub const CROP_NOTICE_BASE_LEN: usize = 22;

/// Upper bound on fixed-point passes; the count's digit width only grows,
/// so this is never reached for realistic lengths.
const MAX_FIT_PASSES: usize = 8;

/// Notice appended to a cropped response
pub fn crop_notice(dropped: usize) -> String {
    format!("(cropped {} characters)\n", dropped)
}

/// Result of [`crop_to_fit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cropped {
    /// Prefix of the original output that is shown
    pub text: String,
    /// Characters of the original output that were dropped
    pub dropped: usize,
}

impl Cropped {
    pub fn is_cropped(&self) -> bool {
        self.dropped > 0
    }
}

/// Single-message cropping with an optional path-separator heuristic.
#[derive(Debug, Clone, Copy)]
pub struct Cropper {
    avoid_separator_split: bool,
}

impl Default for Cropper {
    fn default() -> Self {
        Self {
            avoid_separator_split: true,
        }
    }
}

impl Cropper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable pulling the cut back from a trailing `/`
    pub fn with_separator_avoidance(mut self, enable: bool) -> Self {
        self.avoid_separator_split = enable;
        self
    }

    /// Crop `output` so that, together with `template_overhead` characters of
    /// surrounding template and the crop notice, the response stays strictly
    /// below `limit` characters.
    ///
    /// Output that already fits (`len + template_overhead < limit`) is
    /// returned unchanged. The notice width depends on the number of dropped
    /// characters, so the cut is iterated to a fixed point rather than
    /// estimated once.
    pub fn crop_to_fit(&self, output: &str, template_overhead: usize, limit: usize) -> Cropped {
        let total = output.chars().count();
        if total + template_overhead < limit {
            return Cropped {
                text: output.to_string(),
                dropped: 0,
            };
        }

        // end + overhead + notice(total - end) <= limit - 1
        let budget = limit.saturating_sub(1 + template_overhead + CROP_NOTICE_BASE_LEN);
        let mut end = budget.min(total);
        for _ in 0..MAX_FIT_PASSES {
            let next = budget.saturating_sub(digit_count(total - end)).min(total);
            if next == end {
                break;
            }
            end = next;
        }

        let chars: Vec<char> = output.chars().collect();
        if self.avoid_separator_split {
            end = retreat_from_separator(&chars, end);
        }

        Cropped {
            text: chars[..end].iter().collect(),
            dropped: total - end,
        }
    }
}

/// [`Cropper::crop_to_fit`] with the default settings.
pub fn crop_to_fit(output: &str, template_overhead: usize, limit: usize) -> Cropped {
    Cropper::default().crop_to_fit(output, template_overhead, limit)
}

/// Move a cut point off a path-like separator.
///
/// `x/|` moves back two (the lone separator and what follows the cut stay
/// together in the dropped part), `//|` moves back one. Both checks read
/// `chars[end - 1]` and `chars[end - 2]`, the two characters right before
/// the cut, not any earlier pair.
pub fn retreat_from_separator(chars: &[char], end: usize) -> usize {
    let end = end.min(chars.len());
    if end >= 2 && chars[end - 1] == '/' && chars[end - 2] != '/' {
        end - 2
    } else if end >= 1 && chars[end - 1] == '/' {
        end - 1
    } else {
        end
    }
}

/// Base-10 digit count, 1 for zero
fn digit_count(n: usize) -> usize {
    n.checked_ilog10().map_or(1, |log| log as usize + 1)
}
