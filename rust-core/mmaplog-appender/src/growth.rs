// SPDX-License-Identifier: PMPL-1.0-or-later
//
// MmapLog appender - Region sizing policy
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// All mapped-region lengths are powers of two. The initial length is the
// smallest power of two covering both the configured region length and the
// first record; subsequent growth targets the smallest power of two covering
// the bytes already written plus the incoming record. The region length
// never shrinks while the appender is open.

use crate::error::{AppenderError, AppenderResult};

/// Returns the smallest power of two greater than or equal to `n`.
///
/// `0` rounds up to `1`. A value above `2^63` cannot be rounded up within
/// `u64` and is reported as [`AppenderError::RegionOverflow`] instead of
/// wrapping.
pub fn ceiling_power_of_two(n: u64) -> AppenderResult<u64> {
    n.checked_next_power_of_two()
        .ok_or(AppenderError::RegionOverflow { requested: n })
}

/// Compute the initial region length for a mapping that must hold
/// `first_write_end` bytes (existing file contents plus the first record).
///
/// The configured region length, when present, is a lower bound; it is
/// itself rounded up, so a configured 32000 yields a 32768-byte file.
pub fn initial_region_length(
    configured: Option<u64>,
    first_write_end: u64,
) -> AppenderResult<u64> {
    ceiling_power_of_two(first_write_end.max(configured.unwrap_or(0)))
}

/// Compute the region length needed to hold `required` bytes when the
/// current region is full.
///
/// `required` exceeds the current power-of-two length whenever growth is
/// triggered, so the result is always strictly larger than the current
/// region.
pub fn next_region_length(required: u64) -> AppenderResult<u64> {
    ceiling_power_of_two(required)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ceiling_reference_values() {
        assert_eq!(ceiling_power_of_two(32000).unwrap(), 32768);
        assert_eq!(ceiling_power_of_two(0).unwrap(), 1);
        assert_eq!(ceiling_power_of_two(1).unwrap(), 1);
        assert_eq!(ceiling_power_of_two(2).unwrap(), 2);
        assert_eq!(ceiling_power_of_two(3).unwrap(), 4);
        assert_eq!(ceiling_power_of_two(32768).unwrap(), 32768);
        assert_eq!(ceiling_power_of_two(32769).unwrap(), 65536);
    }

    #[test]
    fn test_ceiling_largest_power() {
        assert_eq!(ceiling_power_of_two(1 << 63).unwrap(), 1 << 63);
    }

    #[test]
    fn test_ceiling_overflow_is_an_error() {
        let result = ceiling_power_of_two((1 << 63) + 1);
        assert!(matches!(
            result,
            Err(AppenderError::RegionOverflow { requested }) if requested == (1 << 63) + 1
        ));
        assert!(ceiling_power_of_two(u64::MAX).is_err());
    }

    #[test]
    fn test_initial_length_uses_configured_lower_bound() {
        // A small first record does not shrink the configured region.
        assert_eq!(initial_region_length(Some(32000), 40).unwrap(), 32768);
        // A large first record wins over the configured length.
        assert_eq!(initial_region_length(Some(32000), 40000).unwrap(), 65536);
    }

    #[test]
    fn test_initial_length_unconfigured_sizes_from_first_write() {
        assert_eq!(initial_region_length(None, 478).unwrap(), 512);
        assert_eq!(initial_region_length(None, 16385).unwrap(), 32768);
    }

    #[test]
    fn test_next_region_length_strictly_grows() {
        // 64-byte region full at cursor 60, incoming 10 bytes.
        let grown = next_region_length(70).unwrap();
        assert_eq!(grown, 128);
        assert!(grown > 64);
    }

    proptest! {
        #[test]
        fn prop_ceiling_is_minimal_power_of_two(n in 0u64..=(1 << 63)) {
            let p = ceiling_power_of_two(n).unwrap();
            prop_assert!(p.is_power_of_two());
            prop_assert!(p >= n);
            // Minimality: the next power down (if any) is below n.
            if p > 1 {
                prop_assert!(p / 2 < n.max(1));
            }
        }
    }
}
