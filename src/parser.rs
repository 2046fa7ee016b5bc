//! Puzzle input parsing: a minimal clue-list text format, and an
//! optional TOML format when the `ini` feature is enabled.
//!
//! No HTTP/CGI surface and no third-party puzzle-site formats are part
//! of the core contract (spec.md Non-goals); this module stays a thin,
//! solving-logic-free outer layer over [`crate::board::Puzzle`].

use std::fs;
use std::io;

use crate::bitset::ColorId;
use crate::color::{ColorPalette, ColorValue, BACKGROUND};

#[derive(Debug)]
pub struct ParseError(pub String);

impl From<io::Error> for ParseError {
    fn from(err: io::Error) -> Self {
        Self(format!("{:?}", err))
    }
}

impl Default for ParseError {
    fn default() -> Self {
        Self("unknown parser error".to_string())
    }
}

pub fn read_local(file_name: &str) -> Result<String, ParseError> {
    Ok(fs::read_to_string(file_name)?)
}

/// One line's clue, as parsed (before a [`crate::board::Clue`] is built
/// with its slack computed against the line's actual length).
pub type ParsedClue = Vec<(usize, ColorId)>;

/// Parse a single block like `"3"` or `"3g"` into a (length, colour) run.
/// A bare number is the foreground colour (`1`) unless `palette` maps the
/// trailing letters to a different colour id.
fn parse_block(block: &str, palette: &ColorPalette) -> Result<(usize, ColorId), ParseError> {
    let split_at = block
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or_else(|| block.len());
    let (value, color_name) = block.split_at(split_at);

    let len: usize = value
        .parse()
        .map_err(|_| ParseError(format!("not a number: {:?}", value)))?;

    let color = if color_name.is_empty() {
        1
    } else {
        palette
            .id_by_name(color_name)
            .ok_or_else(|| ParseError(format!("unknown colour: {:?}", color_name)))?
    };

    Ok((len, color))
}

/// Parse one clue line: whitespace-separated blocks, `#`/`;` starting a
/// trailing comment, an empty line meaning "no runs" (an all-background
/// line).
fn parse_line(line: &str, palette: &ColorPalette) -> Result<ParsedClue, ParseError> {
    let line = line
        .split(|c| c == '#' || c == ';')
        .next()
        .unwrap_or("")
        .trim();
    line.split_whitespace()
        .map(|block| parse_block(block, palette))
        .collect()
}

/// Parse every non-blank line of `text` into one clue per line.
pub fn parse_clues(text: &str, palette: &ColorPalette) -> Result<Vec<ParsedClue>, ParseError> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with(';'))
        .map(|line| parse_line(line, palette))
        .collect()
}

/// The plain clue-list format: two clue blocks (rows, then columns)
/// separated by a blank line, optionally preceded by `colors:` lines of
/// the form `name=value symbol` (e.g. `g=0,204,0 %`).
pub struct ClueText {
    pub row_clues: Vec<ParsedClue>,
    pub col_clues: Vec<ParsedClue>,
    pub palette: ColorPalette,
}

impl ClueText {
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let mut palette = ColorPalette::with_background("white");
        let mut next_id: ColorId = 1;

        let mut sections = content.split("\n\n");
        let first = sections
            .next()
            .ok_or_else(|| ParseError("empty puzzle file".to_string()))?;

        let (colors_block, rows_block) = if let Some(rest) = first.strip_prefix("colors:") {
            (Some(rest), sections.next())
        } else {
            (None, Some(first))
        };

        if let Some(colors_block) = colors_block {
            for def in colors_block.lines().map(str::trim).filter(|l| !l.is_empty()) {
                let (name, rest) = def
                    .split_once('=')
                    .ok_or_else(|| ParseError(format!("bad colour def: {:?}", def)))?;
                let mut parts = rest.trim().rsplitn(2, char::is_whitespace);
                let symbol = parts
                    .next()
                    .and_then(|s| s.chars().next())
                    .ok_or_else(|| ParseError(format!("bad colour def: {:?}", def)))?;
                let value = parts.next().unwrap_or("").trim();
                palette.add(next_id, name.trim(), ColorValue::parse(value), symbol);
                next_id += 1;
            }
        }

        let rows_block = rows_block.ok_or_else(|| ParseError("missing row clues".to_string()))?;
        let cols_block = sections.next().ok_or_else(|| ParseError("missing column clues".to_string()))?;

        Ok(ClueText {
            row_clues: parse_clues(rows_block, &palette)?,
            col_clues: parse_clues(cols_block, &palette)?,
            palette,
        })
    }

    pub fn ncolors(&self) -> u32 {
        let max_used = self
            .row_clues
            .iter()
            .chain(self.col_clues.iter())
            .flat_map(|clue| clue.iter())
            .map(|&(_, color)| color)
            .max()
            .unwrap_or(BACKGROUND);
        max_used + 1
    }
}

#[cfg(feature = "ini")]
pub mod toml_format {
    use serde_derive::Deserialize;

    use super::{parse_clues, ColorPalette, ColorValue, ParseError, ParsedClue};

    #[derive(Debug, Deserialize)]
    struct Clues {
        rows: String,
        columns: String,
    }

    #[derive(Debug, Deserialize)]
    struct ColorDef {
        name: String,
        value: String,
        symbol: char,
    }

    #[derive(Debug, Deserialize)]
    struct Document {
        clues: Clues,
        #[serde(default)]
        colors: Vec<ColorDef>,
    }

    impl From<toml::de::Error> for ParseError {
        fn from(err: toml::de::Error) -> Self {
            Self(format!("{:?}", err))
        }
    }

    pub struct TomlPuzzle {
        pub row_clues: Vec<ParsedClue>,
        pub col_clues: Vec<ParsedClue>,
        pub palette: ColorPalette,
    }

    impl TomlPuzzle {
        pub fn parse(content: &str) -> Result<Self, ParseError> {
            let doc: Document = toml::from_str(content)?;

            let mut palette = ColorPalette::with_background("white");
            for (i, def) in doc.colors.iter().enumerate() {
                palette.add(
                    (i + 1) as u32,
                    &def.name,
                    ColorValue::parse(&def.value),
                    def.symbol,
                );
            }

            Ok(TomlPuzzle {
                row_clues: parse_clues(&doc.clues.rows, &palette)?,
                col_clues: parse_clues(&doc.clues.columns, &palette)?,
                palette,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> ColorPalette {
        let mut p = ColorPalette::with_background("white");
        p.add(1, "black", ColorValue::HexValue3(0x000), 'X');
        p
    }

    #[test]
    fn parse_single_run() {
        assert_eq!(parse_clues("1", &palette()).unwrap(), vec![vec![(1, 1)]]);
    }

    #[test]
    fn parse_multiple_lines() {
        assert_eq!(
            parse_clues("1\n2 1", &palette()).unwrap(),
            vec![vec![(1, 1)], vec![(2, 1), (1, 1)]]
        );
    }

    #[test]
    fn blank_line_is_empty_clue() {
        assert_eq!(parse_clues("1\n\n2", &palette()).unwrap(), vec![vec![(1, 1)], vec![(2, 1)]]);
    }

    #[test]
    fn trailing_comment_is_ignored() {
        assert_eq!(
            parse_clues("1 2 # a plus sign row", &palette()).unwrap(),
            vec![vec![(1, 1), (2, 1)]]
        );
    }

    #[test]
    fn unknown_colour_letter_errors() {
        assert!(parse_clues("1z", &palette()).is_err());
    }

    #[test]
    fn clue_text_parses_full_puzzle() {
        let doc = "1\n1\n\n1\n1";
        let parsed = ClueText::parse(doc).unwrap();
        assert_eq!(parsed.row_clues, vec![vec![(1, 1)], vec![(1, 1)]]);
        assert_eq!(parsed.col_clues, vec![vec![(1, 1)], vec![(1, 1)]]);
        assert_eq!(parsed.ncolors(), 2);
    }

    #[test]
    fn clue_text_with_colors_section() {
        let doc = "colors:\ng=0,128,0 %\n\n1g\n\n1g";
        let parsed = ClueText::parse(doc).unwrap();
        assert_eq!(parsed.row_clues, vec![vec![(1, 1)]]);
        assert_eq!(parsed.palette.symbol(1), '%');
    }
}
