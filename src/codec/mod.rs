//! Binary serialization of shapes.
//!
//! # Format
//!
//! All integers and floats are little-endian.
//!
//! 1. **Magic bytes**: `BREP` (4 bytes)
//! 2. **Version**: `u32`, currently 1
//! 3. **Tables**, in order vertices, edges, wires, faces, shells, solids,
//!    compounds. Each is a `u32` record count followed by the records of the
//!    shape's canonical form; references between records are `u32`
//!    positions in the referenced table.
//! 4. **Root**: a `u8` kind tag, `0` for the null shape. A defined shape
//!    follows it with the `u32` position of the root in its table.
//!
//! Nothing may follow the root.

use tracing::debug;

use crate::error::{CodecError, Result};
use crate::math::{Point3, Vector3};
use crate::topology::canonical::{
    CanonicalCompound, CanonicalEdge, CanonicalFace, CanonicalForm, CanonicalRef, CanonicalShell,
    CanonicalSolid, CanonicalWire,
};
use crate::topology::{Shape, ShapeKind, TopologyStore};

/// Magic bytes opening every serialized shape.
pub const MAGIC: [u8; 4] = *b"BREP";

/// Current format version.
pub const VERSION: u32 = 1;

/// Tag written in place of a root kind for the null shape.
const NULL_TAG: u8 = 0;

/// Serializes a shape.
///
/// Only the structure reachable from the root is written, so equal shapes
/// produce identical bytes.
#[must_use]
pub fn encode(shape: &Shape) -> Vec<u8> {
    let form = shape.canonical();
    let mut w = ByteWriter::default();
    w.bytes(&MAGIC);
    w.u32(VERSION);

    w.len(form.vertices.len());
    for p in &form.vertices {
        w.point(p);
    }

    w.len(form.edges.len());
    for e in &form.edges {
        w.u32(e.start);
        w.u32(e.end);
        w.point(&e.origin);
        w.vector(&e.direction);
        w.f64(e.t_start);
        w.f64(e.t_end);
    }

    w.len(form.wires.len());
    for wire in &form.wires {
        w.bool(wire.is_closed);
        w.len(wire.edges.len());
        for &(edge, forward) in &wire.edges {
            w.u32(edge);
            w.bool(forward);
        }
    }

    w.len(form.faces.len());
    for f in &form.faces {
        w.point(&f.origin);
        w.vector(&f.u_dir);
        w.vector(&f.v_dir);
        w.bool(f.same_sense);
        w.u32(f.outer_wire);
        w.indices(&f.inner_wires);
    }

    w.len(form.shells.len());
    for s in &form.shells {
        w.bool(s.is_closed);
        w.indices(&s.faces);
    }

    w.len(form.solids.len());
    for s in &form.solids {
        w.u32(s.outer_shell);
        w.indices(&s.inner_shells);
    }

    w.len(form.compounds.len());
    for c in &form.compounds {
        w.len(c.children.len());
        for child in &c.children {
            w.reference(*child);
        }
    }

    match form.root {
        None => w.u8(NULL_TAG),
        Some(root) => w.reference(root),
    }

    debug!(bytes = w.buf.len(), kind = ?shape.kind(), "encoded shape");
    w.buf
}

/// Deserializes a shape written by [`encode`].
///
/// # Errors
///
/// Returns [`CodecError::CorruptData`] if the bytes do not follow the format:
/// wrong magic or version, truncation, unknown tags, references out of range,
/// self-containing compounds or trailing bytes.
pub fn decode(bytes: &[u8]) -> Result<Shape> {
    let mut r = ByteReader::new(bytes);
    if r.take(MAGIC.len())? != MAGIC.as_slice() {
        return Err(corrupt("bad magic bytes").into());
    }
    let version = r.u32()?;
    if version != VERSION {
        return Err(corrupt(format!("unsupported version {version}")).into());
    }

    let form = read_form(&mut r)?;
    if !r.is_at_end() {
        return Err(corrupt(format!("{} trailing bytes", r.remaining())).into());
    }
    if form.root.is_none() && ShapeKind::ALL.into_iter().any(|kind| form.count(kind) > 0) {
        return Err(corrupt("null shape carries entities").into());
    }

    let mut store = TopologyStore::new();
    let root = form
        .instantiate_into(&mut store)
        .map_err(|e| corrupt(e.to_string()))?;
    let shape = match root {
        None => Shape::null(),
        Some(root) => Shape::from_parts(store, root).map_err(|e| corrupt(e.to_string()))?,
    };
    debug!(bytes = bytes.len(), kind = ?shape.kind(), "decoded shape");
    Ok(shape)
}

fn corrupt(reason: impl Into<String>) -> CodecError {
    CodecError::CorruptData(reason.into())
}

fn read_form(r: &mut ByteReader<'_>) -> std::result::Result<CanonicalForm, CodecError> {
    let mut form = CanonicalForm::default();

    for _ in 0..r.u32()? {
        form.vertices.push(r.point()?);
    }

    for _ in 0..r.u32()? {
        form.edges.push(CanonicalEdge {
            start: r.u32()?,
            end: r.u32()?,
            origin: r.point()?,
            direction: r.vector()?,
            t_start: r.f64()?,
            t_end: r.f64()?,
        });
    }

    for _ in 0..r.u32()? {
        let is_closed = r.bool()?;
        let mut edges = Vec::new();
        for _ in 0..r.u32()? {
            edges.push((r.u32()?, r.bool()?));
        }
        form.wires.push(CanonicalWire { edges, is_closed });
    }

    for _ in 0..r.u32()? {
        form.faces.push(CanonicalFace {
            origin: r.point()?,
            u_dir: r.vector()?,
            v_dir: r.vector()?,
            same_sense: r.bool()?,
            outer_wire: r.u32()?,
            inner_wires: r.indices()?,
        });
    }

    for _ in 0..r.u32()? {
        let is_closed = r.bool()?;
        form.shells.push(CanonicalShell {
            faces: r.indices()?,
            is_closed,
        });
    }

    for _ in 0..r.u32()? {
        form.solids.push(CanonicalSolid {
            outer_shell: r.u32()?,
            inner_shells: r.indices()?,
        });
    }

    for _ in 0..r.u32()? {
        let mut children = Vec::new();
        for _ in 0..r.u32()? {
            children.push(r.reference()?);
        }
        form.compounds.push(CanonicalCompound { children });
    }

    form.root = match r.u8()? {
        NULL_TAG => None,
        tag => Some(CanonicalRef {
            kind: kind_from_tag(tag)?,
            index: r.u32()?,
        }),
    };
    Ok(form)
}

fn kind_from_tag(tag: u8) -> std::result::Result<ShapeKind, CodecError> {
    ShapeKind::from_tag(tag).ok_or_else(|| corrupt(format!("unknown kind tag {tag}")))
}

#[derive(Default)]
struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    fn bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    fn u32(&mut self, value: u32) {
        self.bytes(&value.to_le_bytes());
    }

    // Canonical tables are indexed by u32, so their lengths fit.
    #[allow(clippy::cast_possible_truncation)]
    fn len(&mut self, len: usize) {
        self.u32(len as u32);
    }

    fn f64(&mut self, value: f64) {
        self.bytes(&value.to_le_bytes());
    }

    fn bool(&mut self, value: bool) {
        self.u8(u8::from(value));
    }

    fn point(&mut self, p: &Point3) {
        self.f64(p.x);
        self.f64(p.y);
        self.f64(p.z);
    }

    fn vector(&mut self, v: &Vector3) {
        self.f64(v.x);
        self.f64(v.y);
        self.f64(v.z);
    }

    fn indices(&mut self, indices: &[u32]) {
        self.len(indices.len());
        for &i in indices {
            self.u32(i);
        }
    }

    fn reference(&mut self, r: CanonicalRef) {
        self.u8(r.kind.tag());
        self.u32(r.index);
    }
}

struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> std::result::Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(corrupt(format!(
                "unexpected end of data at byte {} (needed {n} more)",
                self.pos
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> std::result::Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> std::result::Result<u8, CodecError> {
        Ok(self.array::<1>()?[0])
    }

    fn u32(&mut self) -> std::result::Result<u32, CodecError> {
        self.array().map(u32::from_le_bytes)
    }

    fn f64(&mut self) -> std::result::Result<f64, CodecError> {
        self.array().map(f64::from_le_bytes)
    }

    fn bool(&mut self) -> std::result::Result<bool, CodecError> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(corrupt(format!("invalid flag byte {other}"))),
        }
    }

    fn point(&mut self) -> std::result::Result<Point3, CodecError> {
        Ok(Point3::new(self.f64()?, self.f64()?, self.f64()?))
    }

    fn vector(&mut self) -> std::result::Result<Vector3, CodecError> {
        Ok(Vector3::new(self.f64()?, self.f64()?, self.f64()?))
    }

    fn indices(&mut self) -> std::result::Result<Vec<u32>, CodecError> {
        let mut out = Vec::new();
        for _ in 0..self.u32()? {
            out.push(self.u32()?);
        }
        Ok(out)
    }

    fn reference(&mut self) -> std::result::Result<CanonicalRef, CodecError> {
        let kind = kind_from_tag(self.u8()?)?;
        Ok(CanonicalRef {
            kind,
            index: self.u32()?,
        })
    }
}
