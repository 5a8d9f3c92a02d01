//! Parsers for token values as they appear in flat token tables.
//!
//! Supported forms: `#RGB`/`#RRGGBB`/`#RRGGBBAA`, `rgb()`/`rgba()`, pixel
//! numbers (`16`, `16px`), CSS box shadows (`0 4px 6px -1px rgba(...)`) and
//! a font shorthand (`600 16px/24px Inter`).

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1, take_while_m_n},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map_opt, map_res, opt, recognize, rest},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use sprout_core::{Color, ShadowToken, TokenValueError, TypographyToken};

fn digits(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_digit())(input)
}

/// A decimal number, optionally negative, with or without a leading zero.
pub fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(pair(
            opt(char('-')),
            alt((
                recognize(pair(digits, opt(pair(char('.'), digits)))),
                recognize(pair(char('.'), digits)),
            )),
        )),
        |s: &str| s.parse::<f64>(),
    )(input)
}

/// A number with an optional `px` suffix.
pub fn px(input: &str) -> IResult<&str, f64> {
    terminated(number, opt(tag_no_case("px")))(input)
}

fn hex_color(input: &str) -> IResult<&str, Color> {
    map_opt(
        preceded(
            char('#'),
            take_while_m_n(3, 8, |c: char| c.is_ascii_hexdigit()),
        ),
        Color::from_hex,
    )(input)
}

fn argument_separator(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(tuple((multispace0, alt((char(','), char('/'))), multispace0))),
        multispace1,
    ))(input)
}

fn rgb_function(input: &str) -> IResult<&str, Color> {
    map_opt(
        preceded(
            pair(tag_no_case("rgb"), opt(tag_no_case("a"))),
            delimited(
                pair(char('('), multispace0),
                separated_list1(argument_separator, number),
                pair(multispace0, char(')')),
            ),
        ),
        |args: Vec<f64>| {
            let channel = |v: f64| v / 255.0;
            match args.as_slice() {
                [r, g, b] => Some(Color::from_unit(channel(*r), channel(*g), channel(*b), 1.0)),
                [r, g, b, a] => Some(Color::from_unit(channel(*r), channel(*g), channel(*b), *a)),
                _ => None,
            }
        },
    )(input)
}

/// A hex or `rgb()`/`rgba()` color.
pub fn color(input: &str) -> IResult<&str, Color> {
    alt((hex_color, rgb_function))(input)
}

fn shadow(input: &str) -> IResult<&str, ShadowToken> {
    let (input, _) = opt(terminated(tag_no_case("inset"), multispace1))(input)?;
    let (input, (offset_x, _, offset_y, _, blur)) =
        tuple((px, multispace1, px, multispace1, px))(input)?;
    let (input, spread) = opt(preceded(multispace1, px))(input)?;
    let (input, color) = preceded(multispace1, color)(input)?;
    Ok((
        input,
        ShadowToken {
            offset_x,
            offset_y,
            blur,
            spread: spread.unwrap_or(0.0),
            color: color.to_hex(),
        },
    ))
}

fn font(input: &str) -> IResult<&str, TypographyToken> {
    let weight = map_opt(number, |w| {
        (1.0..=1000.0).contains(&w).then_some(w.round() as u16)
    });
    let (input, (weight, _, size, line_height, _, family)) = tuple((
        weight,
        multispace1,
        px,
        opt(preceded(char('/'), px)),
        multispace1,
        rest,
    ))(input)?;
    let family = family.trim().trim_matches(|c| c == '"' || c == '\'');
    Ok((
        input,
        TypographyToken {
            family: family.to_string(),
            size,
            weight,
            line_height,
        },
    ))
}

fn parse_whole<'a, O>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    value: &'a str,
) -> Option<O> {
    all_consuming(delimited(multispace0, parser, multispace0))(value)
        .ok()
        .map(|(_, out)| out)
}

pub fn parse_color(value: &str) -> Result<Color, TokenValueError> {
    parse_whole(color, value).ok_or_else(|| TokenValueError::MalformedColor {
        value: value.to_string(),
    })
}

pub fn parse_px(value: &str) -> Result<f64, TokenValueError> {
    parse_whole(px, value).ok_or_else(|| TokenValueError::MalformedNumber {
        value: value.to_string(),
    })
}

pub fn parse_shadow(value: &str) -> Result<ShadowToken, TokenValueError> {
    parse_whole(shadow, value).ok_or_else(|| TokenValueError::MalformedShadow {
        value: value.to_string(),
    })
}

pub fn parse_font(value: &str) -> Result<TypographyToken, TokenValueError> {
    parse_whole(font, value)
        .filter(|t| !t.family.is_empty())
        .ok_or_else(|| TokenValueError::MalformedFont {
            value: value.to_string(),
        })
}
