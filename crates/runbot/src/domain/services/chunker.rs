//! Output Chunker
//!
//! Lossless, fixed-width splitting of execution output into fenced
//! fragments.

use crate::domain::entities::{OutputFragment, FRAGMENT_OVERHEAD};
use crate::domain::errors::DomainError;

/// Split `output` into fenced fragments of at most `limit` characters each.
///
/// Every payload except the last holds exactly `limit - FRAGMENT_OVERHEAD`
/// characters. Splits ignore words and lines. Concatenating the payloads
/// gives back `output`. Lengths are counted in `char`s.
pub fn chunk(output: &str, limit: usize) -> Result<Vec<OutputFragment>, DomainError> {
    if limit <= FRAGMENT_OVERHEAD {
        return Err(DomainError::Validation(format!(
            "message limit {} leaves no room for output (fence overhead is {})",
            limit, FRAGMENT_OVERHEAD
        )));
    }
    let width = limit - FRAGMENT_OVERHEAD;

    let mut fragments = Vec::new();
    let mut start = 0;
    let mut taken = 0;
    for (index, _) in output.char_indices() {
        if taken == width {
            fragments.push(OutputFragment::new(&output[start..index]));
            start = index;
            taken = 0;
        }
        taken += 1;
    }
    fragments.push(OutputFragment::new(&output[start..]));

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads(fragments: &[OutputFragment]) -> Vec<usize> {
        fragments.iter().map(|f| f.payload().chars().count()).collect()
    }

    #[test]
    fn test_chunk_1200_by_500() {
        let output = "A".repeat(1200);
        let fragments = chunk(&output, 500).unwrap();
        assert_eq!(payloads(&fragments), vec![492, 492, 216]);
        for fragment in &fragments {
            assert!(fragment.text().chars().count() <= 500);
        }
    }

    #[test]
    fn test_chunk_is_lossless_and_ordered() {
        let output: String = (0..2000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        for limit in [9, 10, 57, 500, 2000, 5000] {
            let fragments = chunk(&output, limit).unwrap();
            let joined: String = fragments.iter().map(|f| f.payload()).collect();
            assert_eq!(joined, output, "limit {}", limit);

            let width = limit - FRAGMENT_OVERHEAD;
            assert_eq!(fragments.len(), output.len().div_ceil(width), "limit {}", limit);
            let (last, rest) = fragments.split_last().unwrap();
            assert!(rest.iter().all(|f| f.payload().len() == width));
            assert!(last.payload().len() <= width);
        }
    }

    #[test]
    fn test_short_output_is_one_fragment() {
        let fragments = chunk("hello\nworld", 500).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text(), "```\nhello\nworld\n```");

        // exactly one payload wide
        let fragments = chunk(&"x".repeat(492), 500).unwrap();
        assert_eq!(fragments.len(), 1);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_tail() {
        let fragments = chunk(&"x".repeat(984), 500).unwrap();
        assert_eq!(payloads(&fragments), vec![492, 492]);
    }

    #[test]
    fn test_empty_output() {
        let fragments = chunk("", 500).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].payload(), "");
    }

    #[test]
    fn test_multibyte_output_splits_on_chars() {
        let output = "é".repeat(30);
        let fragments = chunk(&output, 18).unwrap();
        assert_eq!(payloads(&fragments), vec![10, 10, 10]);
        let joined: String = fragments.iter().map(|f| f.payload()).collect();
        assert_eq!(joined, output);
    }

    #[test]
    fn test_limit_must_exceed_overhead() {
        assert!(chunk("abc", FRAGMENT_OVERHEAD).is_err());
        assert!(chunk("abc", 0).is_err());
        assert!(chunk("abc", FRAGMENT_OVERHEAD + 1).is_ok());
    }
}
