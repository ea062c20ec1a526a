//! Wire format of the radar boards.
//!
//! A board frames one reading as `D<digits>f` (distance board) or
//! `S<digits>f` (speed board): a kind byte, ASCII decimal digits, and the
//! `f` terminator. Bytes arrive one at a time from the UART, so the parser
//! is incremental and tolerates frames split across reads. Any byte that
//! does not fit the grammar, or a value that does not fit in u16, discards
//! the frame in progress rather than guessing.

/// One decoded reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Distance(u16),
    Speed(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Distance,
    Speed,
}

/// Incremental frame parser; feed it one byte at a time.
#[derive(Debug, Default)]
pub struct FrameParser {
    kind: Option<Kind>,
    digits: String,
}

impl FrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one byte; returns a reading when it completes a valid frame.
    pub fn push(&mut self, byte: u8) -> Option<Reading> {
        match byte {
            b'D' => {
                self.kind = Some(Kind::Distance);
                self.digits.clear();
                None
            }
            b'S' => {
                self.kind = Some(Kind::Speed);
                self.digits.clear();
                None
            }
            b'f' => {
                let kind = self.kind.take()?;
                let parsed = self.digits.parse::<u16>().ok();
                self.digits.clear();
                match (kind, parsed) {
                    (Kind::Distance, Some(v)) => Some(Reading::Distance(v)),
                    (Kind::Speed, Some(v)) => Some(Reading::Speed(v)),
                    (_, None) => {
                        tracing::debug!("malformed radar frame discarded");
                        None
                    }
                }
            }
            b'0'..=b'9' if self.kind.is_some() => {
                self.digits.push(char::from(byte));
                None
            }
            _ => {
                // Noise byte: drop any frame in progress.
                if self.kind.take().is_some() {
                    tracing::debug!(byte, "unexpected byte inside radar frame");
                    self.digits.clear();
                }
                None
            }
        }
    }
}

/// Encode a distance reading the way the distance board sends it.
pub fn encode_distance(value: u16) -> String {
    format!("D{value}f")
}

/// Encode a speed reading the way the speed board sends it.
pub fn encode_speed(value: u16) -> String {
    format!("S{value}f")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("D150f", Some(Reading::Distance(150)))]
    #[case("S12f", Some(Reading::Speed(12)))]
    #[case("D0f", Some(Reading::Distance(0)))]
    #[case("D65535f", Some(Reading::Distance(65535)))]
    fn parses_complete_frames(#[case] input: &str, #[case] expected: Option<Reading>) {
        let mut p = FrameParser::new();
        let mut out = None;
        for b in input.bytes() {
            if let Some(r) = p.push(b) {
                out = Some(r);
            }
        }
        assert_eq!(out, expected);
    }

    #[test]
    fn split_delivery_produces_one_reading() {
        let mut p = FrameParser::new();
        assert_eq!(p.push(b'D'), None);
        assert_eq!(p.push(b'1'), None);
        assert_eq!(p.push(b'5'), None);
        assert_eq!(p.push(b'0'), None);
        assert_eq!(p.push(b'f'), Some(Reading::Distance(150)));
        // Parser is reusable for the next frame.
        for b in "S9f".bytes().take(2) {
            assert_eq!(p.push(b), None);
        }
        assert_eq!(p.push(b'f'), Some(Reading::Speed(9)));
    }

    #[rstest]
    #[case("Df")] // no digits
    #[case("D99999f")] // overflows u16
    #[case("D1x2f")] // noise inside the frame
    #[case("123f")] // terminator without a header
    fn invalid_frames_are_discarded(#[case] input: &str) {
        let mut p = FrameParser::new();
        assert!(input.bytes().all(|b| p.push(b).is_none()));
    }

    #[test]
    fn garbage_before_frame_is_ignored() {
        let mut p = FrameParser::new();
        let mut out = None;
        for b in "\x00\x7fzzD42f".bytes() {
            if let Some(r) = p.push(b) {
                out = Some(r);
            }
        }
        assert_eq!(out, Some(Reading::Distance(42)));
    }

    #[test]
    fn encode_round_trips_through_parser() {
        let mut p = FrameParser::new();
        let mut out = None;
        for b in encode_speed(1234).bytes() {
            if let Some(r) = p.push(b) {
                out = Some(r);
            }
        }
        assert_eq!(out, Some(Reading::Speed(1234)));
    }
}
