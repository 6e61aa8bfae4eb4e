//! 7-segment field codec.
//!
//! A field is exactly [`FIELD_LEN`] bytes, one per digit position, filled
//! left to right. The low nibble selects the glyph. The Radio panel lights a
//! digit's decimal point by setting the high nibble to `0xD`; the Multi panel
//! has no decimal points and uses `0xDE` for minus.
//!
//! ```
//! use flightpanel_protocol::segment::RADIO_CODEC;
//!
//! // The dot lights the decimal point of the digit it follows.
//! assert_eq!(RADIO_CODEC.encode("118.00"), [0x01, 0x01, 0xD8, 0x00, 0x00]);
//! assert_eq!(RADIO_CODEC.encode("25"), [0x02, 0x05, 0x0F, 0x0F, 0x0F]);
//! ```

/// Bytes per display field.
pub const FIELD_LEN: usize = 5;

/// One encoded display field.
pub type Field = [u8; FIELD_LEN];

/// Glyph for a blank position.
pub const GLYPH_SPACE: u8 = 0x0F;

/// High nibble marking a lit decimal point.
pub const DECIMAL_NIBBLE: u8 = 0xD0;

/// How a codec treats a literal `'.'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalPoint {
    /// Mark the most recently placed byte with [`DECIMAL_NIBBLE`].
    HighNibble,
    /// The display has no decimal points; `'.'` is an unknown glyph.
    Unsupported,
}

/// A segment codec for one panel's displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentCodec {
    minus: u8,
    decimal: DecimalPoint,
}

/// Codec for the Radio panel fields.
pub const RADIO_CODEC: SegmentCodec = SegmentCodec {
    minus: 0x0E,
    decimal: DecimalPoint::HighNibble,
};

/// Codec for the Multi panel rows.
pub const MULTI_CODEC: SegmentCodec = SegmentCodec {
    minus: 0xDE,
    decimal: DecimalPoint::Unsupported,
};

impl SegmentCodec {
    pub const fn new(minus: u8, decimal: DecimalPoint) -> Self {
        Self { minus, decimal }
    }

    pub fn minus(&self) -> u8 {
        self.minus
    }

    pub fn decimal_point(&self) -> DecimalPoint {
        self.decimal
    }

    fn glyph(&self, ch: char) -> u8 {
        match ch {
            '0'..='9' => ch as u8 - b'0',
            '-' => self.minus,
            _ => GLYPH_SPACE,
        }
    }

    /// Encode text into one field. Never fails: unknown characters become
    /// blanks and anything after the fifth position is dropped.
    pub fn encode(&self, text: &str) -> Field {
        let mut field = [GLYPH_SPACE; FIELD_LEN];
        let mut pos: usize = 0;

        for ch in text.chars() {
            if ch == '.' && self.decimal == DecimalPoint::HighNibble {
                // A leading dot has nothing to attach to.
                if let Some(prev) = pos.checked_sub(1).and_then(|i| field.get_mut(i)) {
                    *prev = DECIMAL_NIBBLE | (*prev & 0x0F);
                }
                continue;
            }
            if let Some(slot) = field.get_mut(pos) {
                *slot = self.glyph(ch);
                pos += 1;
            }
        }

        field
    }

    /// Debug decode: the inverse of [`encode`](Self::encode) for glyphs
    /// this codec produces. A lit decimal point decodes as a trailing `'.'`
    /// after its digit.
    pub fn decode(&self, field: &Field) -> String {
        let mut out = String::with_capacity(FIELD_LEN * 2);
        for &byte in field {
            if byte == self.minus {
                out.push('-');
                continue;
            }
            let low = byte & 0x0F;
            match low {
                0..=9 => out.push(char::from(b'0' + low)),
                0x0E if self.decimal == DecimalPoint::HighNibble => out.push('-'),
                _ => out.push(' '),
            }
            if self.decimal == DecimalPoint::HighNibble && byte & 0xF0 == DECIMAL_NIBBLE {
                out.push('.');
            }
        }
        out
    }
}
