/// OFF (Object File Format) parser for triangle meshes
use nalgebra::Vector4;
use nom::{
    branch::alt,
    bytes::complete::take_till1,
    character::complete::{char, multispace1, not_line_ending, u32 as parse_u32},
    combinator::{all_consuming, value},
    multi::many0_count,
    number::complete::float,
    sequence::preceded,
    IResult,
};

use crate::error::{Field, LoadError};

/// Raw geometry read from an OFF document, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct OffData {
    /// Homogeneous points in file order, `w == 1`
    pub vertices: Vec<Vector4<f32>>,
    /// Triangle corners, three per face
    pub indices: Vec<u32>,
}

impl OffData {
    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Parse an OFF document.
///
/// The header tag is read but not validated. The edge count must be an
/// integer but is otherwise ignored. Anything after the last declared face
/// is ignored.
pub fn parse_off(input: &str) -> Result<OffData, LoadError> {
    let mut tokens = Tokens::new(input);

    tokens.next(Field::FormatTag)?;
    let vertex_count = tokens.count(Field::VertexCount)?;
    let face_count = tokens.count(Field::FaceCount)?;
    tokens.count(Field::EdgeCount)?;

    if vertex_count == 0 {
        return Err(LoadError::EmptyMesh);
    }

    // Declared counts are untrusted; never reserve more than the input could hold.
    let mut vertices = Vec::with_capacity(vertex_count.min(input.len()));
    for vertex in 0..vertex_count {
        let mut xyz = [0.0f32; 3];
        for (axis, slot) in xyz.iter_mut().enumerate() {
            *slot = tokens.coordinate(Field::Coordinate { vertex, axis })?;
        }
        vertices.push(Vector4::new(xyz[0], xyz[1], xyz[2], 1.0));
    }

    let mut indices = Vec::with_capacity(face_count.saturating_mul(3).min(input.len()));
    for face in 0..face_count {
        let arity = tokens.parse(Field::FaceArity { face }, parse_u32)?;
        if arity != 3 {
            return Err(LoadError::NonTriangularFace { face, arity });
        }

        for corner in 0..3 {
            let index = tokens.parse(Field::FaceIndex { face, corner }, parse_u32)?;
            if index as usize >= vertex_count {
                return Err(LoadError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
            indices.push(index);
        }
    }

    Ok(OffData { vertices, indices })
}

/// Whitespace and `#` comments running to the end of the line
fn skip_space(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0_count(alt((multispace1, preceded(char('#'), not_line_ending)))),
    )(input)
}

fn token(input: &str) -> IResult<&str, &str> {
    preceded(
        skip_space,
        take_till1(|c: char| c.is_whitespace() || c == '#'),
    )(input)
}

/// Cursor over the whitespace-delimited tokens of a document
struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn next(&mut self, field: Field) -> Result<&'a str, LoadError> {
        match token(self.rest) {
            Ok((rest, tok)) => {
                self.rest = rest;
                Ok(tok)
            }
            Err(_) => Err(LoadError::Truncated { expected: field }),
        }
    }

    /// Read the next token and require `parser` to consume all of it.
    /// Returns the token together with the parsed value.
    fn parse_token<T>(
        &mut self,
        field: Field,
        parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
    ) -> Result<(&'a str, T), LoadError> {
        let tok = self.next(field)?;
        all_consuming(parser)(tok)
            .map(|(_, value)| (tok, value))
            .map_err(|_| LoadError::Malformed {
                field,
                token: tok.to_string(),
            })
    }

    fn parse<T>(
        &mut self,
        field: Field,
        parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
    ) -> Result<T, LoadError> {
        self.parse_token(field, parser).map(|(_, value)| value)
    }

    fn count(&mut self, field: Field) -> Result<usize, LoadError> {
        self.parse(field, parse_u32).map(|n| n as usize)
    }

    fn coordinate(&mut self, field: Field) -> Result<f32, LoadError> {
        let (tok, value) = self.parse_token(field, float)?;
        if !value.is_finite() {
            return Err(LoadError::Malformed {
                field,
                token: tok.to_string(),
            });
        }
        Ok(value)
    }
}
