//! Glyph advances for the built-in Helvetica faces, in 1/1000 em.
//!
//! Built-in PDF fonts are not embedded, so there is no font program to
//! measure. These are the standard metrics for printable ASCII; the
//! oblique face shares the regular advances.

use super::layout::FontStyle;

const FIRST: u32 = 32;
const FALLBACK_ADVANCE: u16 = 556;

const PT_TO_MM: f32 = 25.4 / 72.0;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

fn advance(style: FontStyle, ch: char) -> u16 {
    let table = match style {
        FontStyle::Bold => &HELVETICA_BOLD,
        FontStyle::Regular | FontStyle::Italic => &HELVETICA,
    };
    (ch as u32)
        .checked_sub(FIRST)
        .and_then(|i| table.get(i as usize))
        .copied()
        .unwrap_or(FALLBACK_ADVANCE)
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * PT_TO_MM
}

pub fn text_width_mm(style: FontStyle, font_size_pt: f32, text: &str) -> f32 {
    let units: u32 = text.chars().map(|ch| advance(style, ch) as u32).sum();
    pt_to_mm(units as f32 / 1000.0 * font_size_pt)
}

/// Greedy word wrap against a width in millimetres. Words wider than the
/// line are split by character. Explicit newlines start a new line; the
/// result always holds at least one (possibly empty) line.
pub fn wrap_text_by_width_mm(
    style: FontStyle,
    font_size: f32,
    input: &str,
    max_width_mm: f32,
) -> Vec<String> {
    let fits = |s: &str| text_width_mm(style, font_size, s) <= max_width_mm;
    let mut out: Vec<String> = Vec::new();

    for paragraph in input.split('\n') {
        let mut current = String::new();
        let mut produced = false;

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
                produced = true;
            }
            if fits(word) {
                current.push_str(word);
                continue;
            }

            // Split a single too-long word into chunks.
            for ch in word.chars() {
                current.push(ch);
                if !fits(&current) && current.chars().count() > 1 {
                    current.pop();
                    out.push(std::mem::take(&mut current));
                    produced = true;
                    current.push(ch);
                }
            }
        }

        if !current.is_empty() || !produced {
            out.push(current);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_share_one_advance() {
        let a = text_width_mm(FontStyle::Regular, 11.0, "100.0");
        let b = text_width_mm(FontStyle::Regular, 11.0, "999.9");
        assert!((a - b).abs() < f32::EPSILON);
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let regular = text_width_mm(FontStyle::Regular, 12.0, "Invoice #abc12345");
        let bold = text_width_mm(FontStyle::Bold, 12.0, "Invoice #abc12345");
        assert!(bold > regular);
        assert_eq!(
            text_width_mm(FontStyle::Italic, 9.0, "Thank you!"),
            text_width_mm(FontStyle::Regular, 9.0, "Thank you!")
        );
    }

    #[test]
    fn width_scales_with_size() {
        // "M" is 833/1000 em: at 72pt that is 0.833 inch.
        let w = text_width_mm(FontStyle::Regular, 72.0, "M");
        assert!((w - 0.833 * 25.4).abs() < 1e-3);
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(
            wrap_text_by_width_mm(FontStyle::Regular, 11.0, "Acme", 73.0),
            vec!["Acme".to_string()]
        );
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        assert_eq!(wrap_text_by_width_mm(FontStyle::Regular, 11.0, "", 73.0), vec![String::new()]);
    }

    #[test]
    fn long_text_wraps_within_width() {
        let text = "Brand identity refresh including logo, palette, typography and usage guide";
        let lines = wrap_text_by_width_mm(FontStyle::Regular, 11.0, text, 73.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(FontStyle::Regular, 11.0, line) <= 73.0, "{line:?}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn oversized_word_is_split_by_character() {
        let word = "x".repeat(200);
        let lines = wrap_text_by_width_mm(FontStyle::Regular, 11.0, &word, 20.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn newlines_start_new_lines() {
        let lines = wrap_text_by_width_mm(FontStyle::Regular, 11.0, "one\n\ntwo", 73.0);
        assert_eq!(lines, vec!["one", "", "two"]);
    }
}
