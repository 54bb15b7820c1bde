// Color strings accepted from the data's Color field
//
// Only `#RGB`, `#RRGGBB` and `rgb(r,g,b)` are recognised. Anything else is
// rejected here and the caller falls back to the palette.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1, take_while_m_n},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map_res},
    error::{Error, ErrorKind},
    sequence::pair,
    IResult,
};

use crate::ir::Color;

/// Parse a hex color
/// Format: #RGB or #RRGGBB, any case
pub fn hex_color(input: &str) -> IResult<&str, Color> {
    let (rest, _) = char('#')(input)?;
    let (rest, digits) = take_while1(|c: char| c.is_ascii_hexdigit())(rest)?;

    let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).unwrap_or(0);
    let color = match digits.len() {
        3 => Color::rgb(nibble(0) * 17, nibble(1) * 17, nibble(2) * 17),
        6 => Color::rgb(
            nibble(0) * 16 + nibble(1),
            nibble(2) * 16 + nibble(3),
            nibble(4) * 16 + nibble(5),
        ),
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::LengthValue))),
    };

    Ok((rest, color))
}

/// One to three decimal digits; values above 255 saturate
fn component(input: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 3, |c: char| c.is_ascii_digit()), |digits: &str| {
        digits.parse::<u16>().map(|v| v.min(255) as u8)
    })(input)
}

/// Parse a functional rgb color
/// Format: rgb(r,g,b), whitespace allowed after the commas only
pub fn rgb_color(input: &str) -> IResult<&str, Color> {
    let (input, _) = tag_no_case("rgb(")(input)?;
    let (input, r) = component(input)?;
    let (input, _) = pair(char(','), multispace0)(input)?;
    let (input, g) = component(input)?;
    let (input, _) = pair(char(','), multispace0)(input)?;
    let (input, b) = component(input)?;
    let (input, _) = char(')')(input)?;

    Ok((input, Color::rgb(r, g, b)))
}

pub fn color(input: &str) -> IResult<&str, Color> {
    alt((hex_color, rgb_color))(input)
}

/// Validate a whole color string. `None` for anything malformed.
pub fn parse_color(input: &str) -> Option<Color> {
    all_consuming(color)(input).ok().map(|(_, c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_six_digits() {
        assert_eq!(parse_color("#119d9d"), Some(Color::rgb(0x11, 0x9d, 0x9d)));
        assert_eq!(parse_color("#ABCDEF"), Some(Color::rgb(0xab, 0xcd, 0xef)));
    }

    #[test]
    fn test_hex_three_digits_expand() {
        assert_eq!(parse_color("#fff"), Some(Color::WHITE));
        assert_eq!(parse_color("#1a6"), Some(Color::rgb(0x11, 0xaa, 0x66)));
    }

    #[test]
    fn test_hex_wrong_length() {
        assert_eq!(parse_color("#ffff"), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#1234567"), None);
        assert_eq!(parse_color("#"), None);
    }

    #[test]
    fn test_rgb() {
        assert_eq!(parse_color("rgb(1,2,3)"), Some(Color::rgb(1, 2, 3)));
        assert_eq!(parse_color("RGB(10, 20,  30)"), Some(Color::rgb(10, 20, 30)));
        assert_eq!(parse_color("rgb(999,0,0)"), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_rgb_malformed() {
        assert_eq!(parse_color("rgb( 1,2,3)"), None);
        assert_eq!(parse_color("rgb(1 ,2,3)"), None);
        assert_eq!(parse_color("rgb(1234,0,0)"), None);
        assert_eq!(parse_color("rgb(1,2)"), None);
        assert_eq!(parse_color("rgba(1,2,3,0.5)"), None);
    }

    #[test]
    fn test_named_and_padded_colors_rejected() {
        assert_eq!(parse_color("red"), None);
        assert_eq!(parse_color(" #fff"), None);
        assert_eq!(parse_color("#fff "), None);
        assert_eq!(parse_color(""), None);
    }
}
