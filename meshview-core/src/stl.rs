//! STL file parser for binary and ASCII formats.
//!
//! Both encodings decode into the same flat [`VertexBuffer`]: three vertices per
//! facet, each carrying the facet normal exactly as stored in the file.
//!
//! The encoding is guessed from the first 80 bytes (see [`detect_encoding`]).
//! Binary files are streamed one 50-byte record at a time; ASCII files are
//! read line by line with a tolerant keyword tokenizer that ignores
//! indentation and the `outer loop` / `endloop` structure.
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::ops::ControlFlow;
use std::path::Path;

use log::{debug, info, warn};
use nalgebra::{Point3, Vector3};
use nom::{
    combinator::all_consuming,
    number::complete::{float, le_f32, le_u16},
    sequence::tuple,
    IResult,
};

use crate::error::{LoadError, Result};
use crate::geometry::{Vec3, VertexBuffer};

/// Size of the free-form binary header, also the window used for sniffing.
pub const HEADER_LEN: usize = 80;
/// Normal, three corners and the attribute word.
pub const TRIANGLE_RECORD_LEN: usize = 50;

// Cap on the reservation made from the declared triangle count.
const MAX_PREALLOCATED_TRIANGLES: u32 = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    Binary,
}

/// A decoded STL file together with what the loader had to say about it.
#[derive(Debug, Clone, PartialEq)]
pub struct StlMesh {
    pub encoding: Encoding,
    /// `solid <name>` text for ASCII files, printable header text for binary ones.
    pub name: String,
    pub vertices: VertexBuffer,
    /// ASCII facets skipped because they did not hold exactly three vertices.
    pub dropped_facets: usize,
}

/// Classify a file from its leading bytes.
///
/// A header is taken to be ASCII when it contains both `solid` and a newline.
/// Only the first [`HEADER_LEN`] bytes are inspected. Binary files whose
/// header happens to contain both are misclassified.
pub fn detect_encoding(header: &[u8]) -> Encoding {
    let header = &header[..header.len().min(HEADER_LEN)];
    let has_solid = header.windows(5).any(|window| window == b"solid");
    let has_newline = header.contains(&b'\n');

    if has_solid && has_newline {
        Encoding::Ascii
    } else {
        Encoding::Binary
    }
}

/// Load an STL file into an interleaved vertex buffer.
pub fn load<P: AsRef<Path>>(path: P) -> Result<VertexBuffer> {
    load_mesh(path).map(|mesh| mesh.vertices)
}

/// Load an STL file, keeping the encoding, name and dropped-facet count.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<StlMesh> {
    let path = path.as_ref();
    let cannot_open = |source| LoadError::CannotOpen {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(cannot_open)?;
    if !file.metadata().map_err(cannot_open)?.is_file() {
        return Err(cannot_open(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let mut reader = BufReader::new(file);
    let mut header = [0u8; HEADER_LEN];
    let header_len = fill(&mut reader, &mut header)?;
    let header = &header[..header_len];

    let encoding = detect_encoding(header);
    debug!("{}: detected {:?} STL", path.display(), encoding);

    let mesh = match encoding {
        Encoding::Ascii => {
            // The sniffed bytes belong to the `solid` line; start over.
            reader.seek(SeekFrom::Start(0))?;
            parse_ascii(reader)?
        }
        Encoding::Binary => decode_binary(header, reader)?,
    };

    info!(
        "{}: loaded {} triangles ({:?})",
        path.display(),
        mesh.vertices.triangle_count(),
        mesh.encoding
    );
    Ok(mesh)
}

/// Detect the encoding of an in-memory STL image and decode it.
pub fn parse_stl(data: &[u8]) -> Result<StlMesh> {
    match detect_encoding(data) {
        Encoding::Ascii => parse_ascii(data),
        Encoding::Binary => parse_binary(data),
    }
}

/// Parse a binary STL stream, starting at the header.
pub fn parse_binary<R: Read>(mut reader: R) -> Result<StlMesh> {
    let mut header = [0u8; HEADER_LEN];
    let header_len = fill(&mut reader, &mut header)?;
    decode_binary(&header[..header_len], reader)
}

fn decode_binary<R: Read>(header: &[u8], mut reader: R) -> Result<StlMesh> {
    let mut count = [0u8; 4];
    let count_len = fill(&mut reader, &mut count)?;
    if header.len() < HEADER_LEN || count_len < count.len() {
        return Err(LoadError::TruncatedHeader {
            len: header.len() + count_len,
        });
    }

    let expected = u32::from_le_bytes(count);
    let mut vertices =
        VertexBuffer::with_triangle_capacity(expected.min(MAX_PREALLOCATED_TRIANGLES) as usize);

    let mut record = [0u8; TRIANGLE_RECORD_LEN];
    for decoded in 0..expected {
        let truncated = LoadError::TruncatedFile { expected, decoded };
        if fill(&mut reader, &mut record)? < TRIANGLE_RECORD_LEN {
            return Err(truncated);
        }
        let (_, (normal, corners)) = triangle_record(&record).map_err(|_| truncated)?;
        vertices.push_facet(normal, &corners);
    }

    Ok(StlMesh {
        encoding: Encoding::Binary,
        name: header_name(header),
        vertices,
        dropped_facets: 0,
    })
}

fn vector3(input: &[u8]) -> IResult<&[u8], Vec3> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn triangle_record(input: &[u8]) -> IResult<&[u8], (Vec3, [Point3<f32>; 3])> {
    let (input, (normal, v1, v2, v3, _attribute)) =
        tuple((vector3, vector3, vector3, vector3, le_u16))(input)?;
    Ok((input, (normal, [v1.into(), v2.into(), v3.into()])))
}

/// Printable text of a binary header, up to the first NUL.
fn header_name(header: &[u8]) -> String {
    let end = header.iter().position(|&b| b == 0).unwrap_or(header.len());
    String::from_utf8_lossy(&header[..end]).trim().to_string()
}

/// Parse an ASCII STL stream, starting at the `solid` line.
///
/// The first line is skipped whatever it holds. Parsing stops at `endsolid`
/// or end of input. Facets that close with other than three vertices are
/// dropped and counted rather than treated as errors.
pub fn parse_ascii<R: BufRead>(mut reader: R) -> Result<StlMesh> {
    let mut raw = Vec::new();
    reader.read_until(b'\n', &mut raw)?;
    let name = solid_name(&String::from_utf8_lossy(&raw));

    let mut parser = AsciiParser::new();
    let mut line = 1;
    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        line += 1;
        if parser.feed(line, &String::from_utf8_lossy(&raw))?.is_break() {
            break;
        }
    }

    Ok(parser.finish(name))
}

fn solid_name(line: &str) -> String {
    let line = line.trim();
    line.strip_prefix("solid").unwrap_or(line).trim().to_string()
}

struct AsciiParser {
    vertices: VertexBuffer,
    normal: Vec3,
    corners: Vec<Point3<f32>>,
    facet_open: bool,
    dropped: usize,
}

impl AsciiParser {
    fn new() -> Self {
        Self {
            vertices: VertexBuffer::new(),
            normal: Vec3::zeros(),
            corners: Vec::with_capacity(3),
            facet_open: false,
            dropped: 0,
        }
    }

    fn feed(&mut self, line: usize, text: &str) -> Result<ControlFlow<()>> {
        let mut tokens = text.split_whitespace();
        match tokens.next() {
            Some("endsolid") => return Ok(ControlFlow::Break(())),
            Some("facet") => {
                // `normal` keyword, not checked
                tokens.next();
                let normal = parse_vector(line, &mut tokens)?;
                if self.facet_open {
                    self.drop_facet(line);
                }
                self.normal = normal;
                self.corners.clear();
                self.facet_open = true;
            }
            Some("vertex") => {
                let position = parse_vector(line, &mut tokens)?;
                self.corners.push(position.into());
            }
            Some("endfacet") => self.close_facet(line),
            _ => {}
        }
        Ok(ControlFlow::Continue(()))
    }

    fn close_facet(&mut self, line: usize) {
        let corners = <[Point3<f32>; 3]>::try_from(self.corners.as_slice());
        match corners {
            Ok(corners) => self.vertices.push_facet(self.normal, &corners),
            Err(_) if self.facet_open || !self.corners.is_empty() => self.drop_facet(line),
            Err(_) => {}
        }
        self.corners.clear();
        self.facet_open = false;
    }

    fn drop_facet(&mut self, line: usize) {
        warn!(
            "line {}: dropping facet with {} vertices",
            line,
            self.corners.len()
        );
        self.dropped += 1;
    }

    fn finish(mut self, name: String) -> StlMesh {
        if self.facet_open {
            warn!("input ended inside an unterminated facet");
            self.dropped += 1;
        }
        StlMesh {
            encoding: Encoding::Ascii,
            name,
            vertices: self.vertices,
            dropped_facets: self.dropped,
        }
    }
}

fn parse_vector<'a>(line: usize, tokens: &mut impl Iterator<Item = &'a str>) -> Result<Vec3> {
    let x = parse_number(line, tokens.next())?;
    let y = parse_number(line, tokens.next())?;
    let z = parse_number(line, tokens.next())?;
    Ok(Vector3::new(x, y, z))
}

fn parse_number(line: usize, token: Option<&str>) -> Result<f32> {
    let token = token.unwrap_or_default();
    decimal(token)
        .map(|(_, value)| value)
        .map_err(|_| LoadError::MalformedNumber {
            line,
            token: token.to_string(),
        })
}

fn decimal(input: &str) -> IResult<&str, f32> {
    all_consuming(float)(input)
}

/// Read until `buf` is full or the stream ends, returning the bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
