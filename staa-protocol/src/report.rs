//! Adjust report parsing
//!
//! The bed-tilt routine prints one line per screw. Screws that need a
//! correction carry an `adjust` clause with a clock-style reading:
//!
//! ```text
//! front left screw (base) : x=25.0, y=25.0, z=2.55000
//! front right screw : x=225.0, y=25.0, z=2.48750 : adjust CW 00:18
//! rear right screw : x=225.0, y=225.0, z=2.60250 : adjust CCW 00:04
//! ```
//!
//! A full hour is one full turn of the screw. The base screw line has no
//! `adjust` clause and is never captured.

/// Screw turn direction as printed by the measurement routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// `CW`
    Clockwise,
    /// `CCW`
    CounterClockwise,
}

impl Direction {
    /// Sign applied to the turn magnitude
    pub fn sign(self) -> f64 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::CounterClockwise => -1.0,
        }
    }

    /// Token as it appears in the report
    pub fn token(self) -> &'static str {
        match self {
            Direction::Clockwise => "CW",
            Direction::CounterClockwise => "CCW",
        }
    }
}

/// One parsed `adjust` clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdjustReport {
    pub direction: Direction,
    pub hours: u32,
    pub minutes: u32,
}

const ADJUST_CLAUSE: &[u8] = b": adjust ";

/// Search a line for `:<label>: adjust <CW|CCW> <hours>:<minutes>`
///
/// The label is one or more characters, none of them a colon. The first
/// (leftmost) occurrence wins; anything after the minute digits is ignored.
/// Returns `None` for lines without a well-formed clause, including values
/// too large for a `u32`.
pub fn parse_adjust(line: &str) -> Option<AdjustReport> {
    let bytes = line.as_bytes();
    let mut start = 0;

    while let Some(offset) = bytes[start..].iter().position(|&b| b == b':') {
        let colon = start + offset;
        if let Some(report) = match_from(&bytes[colon + 1..]) {
            return Some(report);
        }
        start = colon + 1;
    }

    None
}

/// Try to match the remainder of the pattern right after a leading colon
fn match_from(rest: &[u8]) -> Option<AdjustReport> {
    // Label runs up to the next colon and must not be empty
    let label_len = rest.iter().position(|&b| b == b':')?;
    if label_len == 0 {
        return None;
    }

    let rest = rest[label_len..].strip_prefix(ADJUST_CLAUSE)?;

    let (direction, rest) = if let Some(r) = rest.strip_prefix(b"CCW ") {
        (Direction::CounterClockwise, r)
    } else if let Some(r) = rest.strip_prefix(b"CW ") {
        (Direction::Clockwise, r)
    } else {
        return None;
    };

    let (hours, rest) = take_number(rest)?;
    let rest = rest.strip_prefix(b":")?;
    let (minutes, _) = take_number(rest)?;

    Some(AdjustReport {
        direction,
        hours,
        minutes,
    })
}

/// Consume one or more ASCII digits
fn take_number(input: &[u8]) -> Option<(u32, &[u8])> {
    let len = input.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }

    let mut value: u32 = 0;
    for &digit in &input[..len] {
        value = value.checked_mul(10)?.checked_add(u32::from(digit - b'0'))?;
    }

    Some((value, &input[len..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clockwise() {
        let line = "front right screw : x=225.0, y=25.0, z=2.48750 : adjust CW 00:18";
        assert_eq!(
            parse_adjust(line),
            Some(AdjustReport {
                direction: Direction::Clockwise,
                hours: 0,
                minutes: 18,
            })
        );
    }

    #[test]
    fn test_parse_counter_clockwise() {
        let line = "// rear left screw : x=25.0, y=225.0, z=2.60250 : adjust CCW 01:04";
        assert_eq!(
            parse_adjust(line),
            Some(AdjustReport {
                direction: Direction::CounterClockwise,
                hours: 1,
                minutes: 4,
            })
        );
    }

    #[test]
    fn test_base_screw_line_ignored() {
        assert_eq!(
            parse_adjust("front left screw (base) : x=25.0, y=25.0, z=2.55000"),
            None
        );
    }

    #[test]
    fn test_unrelated_lines_ignored() {
        assert_eq!(parse_adjust(""), None);
        assert_eq!(parse_adjust("probe at 25.000,25.000 is z=2.550000"), None);
        assert_eq!(parse_adjust("adjust CW 1:00"), None);
        assert_eq!(parse_adjust("screw : adjust XW 1:00"), None);
        assert_eq!(parse_adjust("screw : adjust CW :00"), None);
        assert_eq!(parse_adjust("screw : adjust CW 1:"), None);
    }

    #[test]
    fn test_label_must_not_be_empty() {
        // "::" leaves no label between the colons
        assert_eq!(parse_adjust("screw:: adjust CW 1:00"), None);
    }

    #[test]
    fn test_label_search_skips_to_later_colon() {
        let report = parse_adjust("x: y : adjust CW 2:30").unwrap();
        assert_eq!(report.hours, 2);
        assert_eq!(report.minutes, 30);
    }

    #[test]
    fn test_first_match_wins() {
        let line = "a : z=1 : adjust CW 1:15 b : z=2 : adjust CCW 3:45";
        let report = parse_adjust(line).unwrap();
        assert_eq!(report.direction, Direction::Clockwise);
        assert_eq!(report.hours, 1);
        assert_eq!(report.minutes, 15);
    }

    #[test]
    fn test_trailing_text_ignored() {
        let report = parse_adjust("s : z=2 : adjust CW 0:45 (approx)").unwrap();
        assert_eq!(report.minutes, 45);
    }

    #[test]
    fn test_values_not_bounded() {
        let report = parse_adjust("s : z=2 : adjust CW 14:75").unwrap();
        assert_eq!(report.hours, 14);
        assert_eq!(report.minutes, 75);
    }

    #[test]
    fn test_overflow_is_not_a_match() {
        assert_eq!(parse_adjust("s : z=2 : adjust CW 99999999999:00"), None);
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Clockwise.sign(), 1.0);
        assert_eq!(Direction::CounterClockwise.sign(), -1.0);
        assert_eq!(Direction::CounterClockwise.token(), "CCW");
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parses_any_well_formed_clause(
                label in "[a-z ()]{1,24}",
                ccw in any::<bool>(),
                hours in 0u32..100,
                minutes in 0u32..100,
            ) {
                let token = if ccw { "CCW" } else { "CW" };
                let line = format!("{label} : x=1.0, z=2.0 : adjust {token} {hours:02}:{minutes:02}");
                let report = parse_adjust(&line).unwrap();
                prop_assert_eq!(report.hours, hours);
                prop_assert_eq!(report.minutes, minutes);
                prop_assert_eq!(report.direction.token(), token);
            }

            #[test]
            fn never_matches_without_adjust(line in "[^a]*") {
                prop_assert_eq!(parse_adjust(&line), None);
            }
        }
    }
}
