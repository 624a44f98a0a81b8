//! Glyph advances for the builtin Helvetica faces, in 1/1000 em (AFM units).
//!
//! Only what WinAnsi can encode has a real width; anything else is measured
//! as a full em and counted by `unencodable_chars`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

pub const MM_PER_PT: f32 = 0.3528;

/// Advances for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for glyphs the builtin fonts cannot encode.
const UNKNOWN_WIDTH: u16 = 1000;

/// Characters outside ASCII that WinAnsi encodes in the 0x80..0x9F range.
const WINANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

/// True when `c` has a WinAnsi code and so prints with the builtin fonts.
pub fn is_winansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}') || WINANSI_EXTRAS.contains(c)
}

/// Number of characters in `text` the builtin fonts cannot print.
pub fn unencodable_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace() && !is_winansi(*c)).count()
}

/// Accented Latin letters share the advance of their base letter, except
/// lowercase i whose accented forms sit on a wider dotless base.
fn base_letter(c: char) -> char {
    match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' | 'Ÿ' => 'Y',
        'Š' => 'S',
        'Ž' => 'Z',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' => 's',
        'ž' => 'z',
        other => other,
    }
}

/// Advance of one character in 1/1000 em.
pub fn char_width(c: char, face: Face) -> u16 {
    let table = match face {
        Face::Regular => &HELVETICA_ASCII,
        Face::Bold => &HELVETICA_BOLD_ASCII,
    };
    let c = base_letter(c);
    if let ' '..='~' = c {
        return table[c as usize - 0x20];
    }
    let bold = face == Face::Bold;
    match c {
        '\u{A0}' | 'ì'..='ï' => 278,
        '¡' => 333,
        '¿' => 611,
        '°' => 400,
        '·' => 278,
        '•' => 350,
        'ª' => 370,
        'º' => 365,
        '«' | '»' => 556,
        '€' | '–' | '¢' | '£' | '¥' | '±' | 'µ' => 556,
        '—' | '…' | '‰' => 1000,
        '‘' | '’' | '‚' => if bold { 278 } else { 222 },
        '“' | '”' | '„' => if bold { 500 } else { 333 },
        'Æ' => 1000,
        'æ' => 889,
        'ß' => 611,
        'Œ' => 1000,
        'œ' => 944,
        '©' | '®' => 737,
        '×' | '÷' | '¬' => 584,
        c if is_winansi(c) => 556,
        _ => UNKNOWN_WIDTH,
    }
}

/// Printed width of `text` in millimetres.
pub fn text_width_mm(text: &str, size_pt: f32, face: Face) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c, face))).sum();
    units as f32 / 1000.0 * size_pt * MM_PER_PT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_widths_match_afm() {
        assert_eq!(char_width(' ', Face::Regular), 278);
        assert_eq!(char_width('A', Face::Regular), 667);
        assert_eq!(char_width('W', Face::Regular), 944);
        assert_eq!(char_width('i', Face::Regular), 222);
        assert_eq!(char_width('m', Face::Bold), 889);
        assert_eq!(char_width('~', Face::Bold), 584);
    }

    #[test]
    fn accents_use_base_letter_width() {
        assert_eq!(char_width('Ó', Face::Regular), char_width('O', Face::Regular));
        assert_eq!(char_width('ñ', Face::Bold), char_width('n', Face::Bold));
        // dotless base, wider than plain i
        assert_eq!(char_width('í', Face::Regular), 278);
    }

    #[test]
    fn uppercase_is_wider_than_lowercase() {
        let upper = text_width_mm("ZONA DE TRANSFORMACION", 10.0, Face::Regular);
        let lower = text_width_mm("zona de transformacion", 10.0, Face::Regular);
        assert!(upper > lower * 1.15, "upper {upper} lower {lower}");
    }

    #[test]
    fn bold_is_not_narrower() {
        let text = "Hallazgos colposcópicos:";
        assert!(
            text_width_mm(text, 12.0, Face::Bold) >= text_width_mm(text, 12.0, Face::Regular)
        );
    }

    #[test]
    fn spanish_text_is_encodable() {
        assert_eq!(unencodable_chars("Impresión diagnóstica: ¿Ñandú? «sí» – 91%"), 0);
    }

    #[test]
    fn cjk_emoji_and_greek_are_not() {
        assert_eq!(unencodable_chars("李小龙 😀 Ωμέγα"), 9);
    }
}
