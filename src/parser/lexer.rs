// Lexer utilities shared by the payload and command-line parsers

use nom::{
    character::complete::{multispace0, one_of},
    combinator::all_consuming,
    number::complete::double,
    sequence::{delimited, separated_pair},
    IResult,
};

use crate::ir::CanvasSize;

/// Parse and consume whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse a number literal (integer or float)
pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

/// Parse a canvas size
/// Format: WIDTHxHEIGHT (e.g. 900x350, 1280 X 720)
pub fn size(input: &str) -> IResult<&str, (f64, f64)> {
    separated_pair(ws(number_literal), one_of("xX"), ws(number_literal))(input)
}

/// Parse a whole `WIDTHxHEIGHT` string into a canvas size
pub fn parse_size(input: &str) -> Result<CanvasSize, String> {
    let (_, (width, height)) = all_consuming(size)(input)
        .map_err(|e| format!("Parse error: expected WIDTHxHEIGHT, got '{}' ({})", input, e))?;

    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(format!("Size must be positive, got {}x{}", width, height));
    }

    Ok(CanvasSize::new(width, height))
}
