//! Field lexing for bulk data cards
//!
//! Splits one logical card (primary line plus continuations) into typed
//! fields. All three bulk data formats are handled: 8-column small field,
//! 16-column large field (`*`-suffixed card name), and comma-separated free
//! field.

// crate modules
use crate::error::{Error, Result};

// external crates
use nom::branch::alt;
use nom::character::complete::{char, digit0, digit1, one_of};
use nom::combinator::{opt, recognize};
use nom::sequence::pair;
use nom::IResult;

/// One typed bulk data field
///
/// Numeric coercion follows the Fortran conventions of the format: reals
/// accept `D` exponent markers and marker-free signed exponents, so
/// `1.2-3`, `1.2E-3`, and `1.2D-3` all lex to the same value.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// An empty slot
    Blank,
    /// Signed integer field
    Int(i64),
    /// Real field in any accepted Fortran form
    Real(f64),
    /// Character field, stored upper-cased
    Str(String),
}

impl Field {
    /// Lex a single raw token into a typed field
    pub fn parse(token: &str) -> core::result::Result<Field, ()> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(Field::Blank);
        }

        let first = token.chars().next().unwrap();
        if first.is_ascii_alphabetic() {
            return Ok(Field::Str(token.to_uppercase()));
        }

        if let Ok(value) = token.parse::<i64>() {
            return Ok(Field::Int(value));
        }

        match fortran_real(token) {
            Ok(("", value)) => Ok(Field::Real(value)),
            _ => Err(()),
        }
    }

    /// Is this the blank field?
    pub fn is_blank(&self) -> bool {
        matches!(self, Field::Blank)
    }

    /// Integer value, if the field holds one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Field::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Real value, promoting an integer field where the deck was lax
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Field::Real(value) => Some(*value),
            Field::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Character value, if the field holds one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::Str(text) => Some(text),
            _ => None,
        }
    }
}

/// Full Fortran real form: mantissa with a decimal point, then an optional
/// exponent with `E`/`D` marker or the marker-free signed form
fn fortran_real(i: &str) -> IResult<&str, f64> {
    let (rest, text) = recognize(pair(mantissa, opt(exponent)))(i)?;
    let normalised: String = text
        .chars()
        .map(|c| match c {
            'd' | 'D' => 'e',
            'E' => 'e',
            c => c,
        })
        .collect();

    // Marker-free exponents ("1.2-3") need the 'e' restored
    let value = match normalised.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            let marked = insert_marker(&normalised);
            match marked.parse::<f64>() {
                Ok(value) => value,
                Err(_) => {
                    return Err(nom::Err::Error(nom::error::Error::new(
                        i,
                        nom::error::ErrorKind::Float,
                    )))
                }
            }
        }
    };
    Ok((rest, value))
}

/// `1.`, `.5`, `1.5`, with optional sign
fn mantissa(i: &str) -> IResult<&str, &str> {
    recognize(pair(
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, pair(char('.'), digit0))),
            recognize(pair(char('.'), digit1)),
        )),
    ))(i)
}

/// `e+3`, `E3`, `d-3`, or the marker-free `+3` / `-3`
fn exponent(i: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(one_of("eEdD"), pair(opt(one_of("+-")), digit1))),
        recognize(pair(one_of("+-"), digit1)),
    ))(i)
}

/// Put the implicit `e` back into a marker-free exponent form
fn insert_marker(text: &str) -> String {
    // Search from index 1 so a leading sign is never mistaken for the
    // exponent sign
    match text[1..].rfind(['+', '-']) {
        Some(pos) => {
            let split = pos + 1;
            format!("{}e{}", &text[..split], &text[split..])
        }
        None => text.to_string(),
    }
}

/// The typed fields of one logical card
///
/// Data fields are indexed from zero, i.e. index 0 is bulk data field 2,
/// the slot immediately after the card name.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields {
    /// Card name, upper-cased, trailing `*` stripped
    pub name: String,
    /// Card was written in 16-column large-field format
    pub large: bool,
    items: Vec<Field>,
}

static BLANK: Field = Field::Blank;

impl Fields {
    /// Build directly from a name and data fields
    pub fn new(name: &str, items: Vec<Field>) -> Self {
        Self {
            name: name.to_uppercase(),
            large: false,
            items,
        }
    }

    /// Number of data fields (trailing blanks excluded)
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True for a card with no data fields at all
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Field at `index`, blank when past the end
    pub fn get(&self, index: usize) -> &Field {
        self.items.get(index).unwrap_or(&BLANK)
    }

    /// Best-effort primary id for error context
    pub fn id(&self) -> u32 {
        self.get(0).as_int().map(|v| v.max(0) as u32).unwrap_or(0)
    }

    fn fail(&self, index: usize, expected: &'static str) -> Error {
        Error::UnexpectedField {
            card: self.name.clone(),
            id: self.id(),
            index,
            expected,
            found: format!("{:?}", self.get(index)),
        }
    }

    /// Required positive integer id
    pub fn uint(&self, index: usize) -> Result<u32> {
        match self.get(index).as_int() {
            Some(value) if value >= 0 => Ok(value as u32),
            _ => Err(self.fail(index, "positive integer")),
        }
    }

    /// Optional integer id; blank lexes to `None`
    pub fn uint_opt(&self, index: usize) -> Result<Option<u32>> {
        match self.get(index) {
            Field::Blank => Ok(None),
            Field::Int(value) if *value >= 0 => Ok(Some(*value as u32)),
            _ => Err(self.fail(index, "positive integer or blank")),
        }
    }

    /// Required signed integer
    pub fn int(&self, index: usize) -> Result<i64> {
        self.get(index)
            .as_int()
            .ok_or_else(|| self.fail(index, "integer"))
    }

    /// Optional signed integer; blank lexes to `None`
    ///
    /// For slots like the CONM2 coordinate id, where -1 selects a frame
    /// convention rather than a coordinate card.
    pub fn int_opt(&self, index: usize) -> Result<Option<i64>> {
        match self.get(index) {
            Field::Blank => Ok(None),
            Field::Int(value) => Ok(Some(*value)),
            _ => Err(self.fail(index, "integer or blank")),
        }
    }

    /// Required real; blank lexes to 0.0
    pub fn real(&self, index: usize) -> Result<f64> {
        match self.get(index) {
            Field::Blank => Ok(0.0),
            field => field.as_real().ok_or_else(|| self.fail(index, "real")),
        }
    }

    /// Real with a per-card default for the blank slot
    pub fn real_or(&self, index: usize, default: f64) -> Result<f64> {
        match self.get(index) {
            Field::Blank => Ok(default),
            field => field.as_real().ok_or_else(|| self.fail(index, "real")),
        }
    }

    /// Optional real; blank lexes to `None`
    pub fn real_opt(&self, index: usize) -> Result<Option<f64>> {
        match self.get(index) {
            Field::Blank => Ok(None),
            field => field
                .as_real()
                .map(Some)
                .ok_or_else(|| self.fail(index, "real or blank")),
        }
    }

    /// Optional character field
    pub fn string(&self, index: usize) -> Option<String> {
        self.get(index).as_str().map(str::to_string)
    }

    /// Character field with a default for the blank slot
    pub fn string_or(&self, index: usize, default: &str) -> String {
        self.string(index).unwrap_or_else(|| default.to_string())
    }

    /// Component (degree-of-freedom) mask, e.g. `123456`
    ///
    /// Stored as the digit string; a blank slot is the empty mask.
    pub fn dof(&self, index: usize) -> Result<String> {
        match self.get(index) {
            Field::Blank => Ok(String::new()),
            Field::Int(value) if *value >= 0 => Ok(value.to_string()),
            _ => Err(self.fail(index, "component digits")),
        }
    }

    /// Remaining fields from `index` onward, cloned verbatim
    pub fn rest(&self, index: usize) -> Vec<Field> {
        if index < self.items.len() {
            self.items[index..].to_vec()
        } else {
            Vec::new()
        }
    }

    /// Collect positive ids until the first blank or the end
    pub fn id_list(&self, start: usize) -> Result<Vec<u32>> {
        let mut ids = Vec::new();
        for index in start..self.len() {
            match self.get(index) {
                Field::Blank => continue,
                Field::Int(value) if *value > 0 => ids.push(*value as u32),
                _ => return Err(self.fail(index, "id list")),
            }
        }
        Ok(ids)
    }
}

/// Does this line continue the card above it?
///
/// Continuations either carry an explicit `+`/`*` label or are detected by
/// position (leading whitespace, or a leading comma in free field).
pub(crate) fn is_continuation(line: &str) -> bool {
    match line.chars().next() {
        None => false,
        Some('+') | Some('*') | Some(' ') | Some('\t') | Some(',') => true,
        _ => false,
    }
}

/// Assemble the typed fields of one logical card
///
/// `lines` holds `(line_number, text)` for the primary line and any
/// continuations, in order.
pub(crate) fn lex_card(lines: &[(usize, &str)]) -> Result<Fields> {
    let (_, first) = lines[0];
    let free = first.contains(',');
    let name_token = if free {
        first.split(',').next().unwrap_or("").trim()
    } else {
        first.get(..8).unwrap_or(first).trim()
    };
    let large = name_token.ends_with('*');
    let name = name_token.trim_end_matches('*').to_uppercase();

    let mut tokens: Vec<(usize, String)> = Vec::new();
    for (line_number, line) in lines {
        let raw = if line.contains(',') {
            split_free(line)
        } else if large {
            split_large(line)
        } else {
            split_short(line)
        };
        // Field 1 is the name or the continuation label; field 10 of a
        // short-format line is the continuation label
        let data = raw.into_iter().skip(1);
        let mut data: Vec<String> = if large || line.contains(',') {
            data.collect()
        } else {
            data.take(8).collect()
        };
        // A physical line is logically a full row; missing trailing
        // fields of a free-field line are blank
        let row = if large { 4 } else { 8 };
        while data.len() < row {
            data.push(String::new());
        }
        tokens.extend(data.into_iter().map(|t| (*line_number, t)));
    }

    let mut items = Vec::with_capacity(tokens.len());
    for (line_number, token) in tokens {
        let field = Field::parse(&token).map_err(|_| Error::MalformedField {
            line: line_number,
            text: token.clone(),
        })?;
        items.push(field);
    }

    // Trailing blanks carry no information
    while items.last().is_some_and(Field::is_blank) {
        items.pop();
    }

    Ok(Fields { name, large, items })
}

/// Split an 8-column small-field line into its 10 raw fields
fn split_short(line: &str) -> Vec<String> {
    fixed_columns(line, 8, 10)
}

/// Split a 16-column large-field line: 8-column name, then four 16-column
/// fields, then the trailing continuation column
fn split_large(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut fields = vec![slice(&chars, 0, 8)];
    for n in 0..4 {
        fields.push(slice(&chars, 8 + 16 * n, 8 + 16 * (n + 1)));
    }
    fields
}

/// Split a comma-separated free-field line
fn split_free(line: &str) -> Vec<String> {
    line.split(',').map(|t| t.trim().to_string()).collect()
}

fn fixed_columns(line: &str, width: usize, count: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    (0..count)
        .map(|n| slice(&chars, n * width, (n + 1) * width))
        .collect()
}

fn slice(chars: &[char], start: usize, end: usize) -> String {
    if start >= chars.len() {
        return String::new();
    }
    chars[start..end.min(chars.len())]
        .iter()
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fortran_reals() {
        assert_eq!(Field::parse("1.2-3"), Ok(Field::Real(1.2e-3)));
        assert_eq!(Field::parse("1.0D+3"), Ok(Field::Real(1.0e3)));
        assert_eq!(Field::parse("1.0+3"), Ok(Field::Real(1.0e3)));
        assert_eq!(Field::parse("-2.5E2"), Ok(Field::Real(-250.0)));
        assert_eq!(Field::parse(".5"), Ok(Field::Real(0.5)));
        assert_eq!(Field::parse("7850."), Ok(Field::Real(7850.0)));
    }

    #[test]
    fn malformed_numerics() {
        assert!(Field::parse("1.2.3").is_err());
        assert!(Field::parse("+-3.").is_err());
    }

    #[test]
    fn typed_variants() {
        assert_eq!(Field::parse(""), Ok(Field::Blank));
        assert_eq!(Field::parse("  -42 "), Ok(Field::Int(-42)));
        assert_eq!(Field::parse("thru"), Ok(Field::Str("THRU".to_string())));
    }

    #[test]
    fn short_and_free_agree() {
        let short = lex_card(&[(1, "GRID           1       0     1.5    -2.0     0.0")]).unwrap();
        let free = lex_card(&[(1, "GRID, 1, 0, 1.5, -2.0, 0.0")]).unwrap();
        assert_eq!(short, free);
        assert_eq!(short.name, "GRID");
        assert_eq!(short.get(0), &Field::Int(1));
        assert_eq!(short.get(2), &Field::Real(1.5));
    }

    #[test]
    fn large_field_pairs() {
        let first = format!("{:<8}{:>16}{:>16}{:>16}{:>16}", "GRID*", "1", "0", "1.5", "-2.0");
        let second = format!("{:<8}{:>16}", "*", "0.0");
        let card = lex_card(&[(1, first.as_str()), (2, second.as_str())]).unwrap();
        assert_eq!(card.name, "GRID");
        assert!(card.large);
        assert_eq!(card.get(0), &Field::Int(1));
        assert_eq!(card.get(3), &Field::Real(-2.0));
        assert_eq!(card.get(4), &Field::Real(0.0));
    }
}
