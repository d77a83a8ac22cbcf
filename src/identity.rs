//! Structural hashing and equality.
//!
//! Shapes and points are identified by content, never by where they live in
//! memory. The hash is a BLAKE3 digest of the canonical content reduced into
//! `[0, HASH_UPPER_BOUND)`, so it is stable across calls, threads and
//! processes. Equal values always hash equal; unequal values that collide are
//! told apart by [`StructuralIdentity::structurally_equals`].

use std::hash::{Hash, Hasher};

use crate::geometry::Point;
use crate::math::{canonical_bits, Point3, Vector3};
use crate::topology::canonical::{CanonicalForm, CanonicalRef};
use crate::topology::Shape;

/// Exclusive upper bound of [`structural_hash`] values: `2^31 - 1`.
pub const HASH_UPPER_BOUND: u32 = i32::MAX as u32;

/// The hash/equality capability pair consumed by associative containers.
pub trait StructuralIdentity {
    /// Deterministic content hash in `[0, HASH_UPPER_BOUND)`.
    fn structural_hash(&self) -> u32;

    /// Returns `true` if both values have the same structural content.
    fn structurally_equals(&self, other: &Self) -> bool;

    /// The structural hash reduced into `[0, upper)`.
    ///
    /// `hash_code(HASH_UPPER_BOUND)` equals `structural_hash()`. An `upper`
    /// of zero is treated as one.
    fn hash_code(&self, upper: u32) -> u32 {
        self.structural_hash() % upper.max(1)
    }
}

/// Returns the structural hash of `value`.
#[must_use]
pub fn structural_hash<T: StructuralIdentity + ?Sized>(value: &T) -> u32 {
    value.structural_hash()
}

/// Returns an instance-identity value for `value`: its address.
///
/// Two structurally equal values at different places have different
/// surrogates, which is exactly what structural identity must ignore.
#[must_use]
pub fn address_surrogate<T: ?Sized>(value: &T) -> u64 {
    std::ptr::from_ref(value).cast::<()>() as usize as u64
}

fn reduce(hasher: &blake3::Hasher) -> u32 {
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    let wide = u64::from_le_bytes(head) % u64::from(HASH_UPPER_BOUND);
    // The modulus keeps the value below 2^31 - 1.
    u32::try_from(wide).unwrap_or(0)
}

struct DigestWriter {
    hasher: blake3::Hasher,
}

impl DigestWriter {
    fn new(domain: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain);
        Self { hasher }
    }

    fn u8(&mut self, value: u8) {
        self.hasher.update(&[value]);
    }

    fn u32(&mut self, value: u32) {
        self.hasher.update(&value.to_le_bytes());
    }

    fn len(&mut self, len: usize) {
        self.hasher.update(&(len as u64).to_le_bytes());
    }

    fn f64(&mut self, value: f64) {
        self.hasher.update(&canonical_bits(value).to_le_bytes());
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

    fn bool(&mut self, value: bool) {
        self.u8(u8::from(value));
    }

    fn reference(&mut self, r: CanonicalRef) {
        self.u8(r.kind.tag());
        self.u32(r.index);
    }
}

/// Hashes a canonical form into `[0, HASH_UPPER_BOUND)`.
#[must_use]
pub fn canonical_hash(form: &CanonicalForm) -> u32 {
    let mut w = DigestWriter::new(b"brepkit.shape");

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
        for &(e, forward) in &wire.edges {
            w.u32(e);
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
        w.len(f.inner_wires.len());
        for &inner in &f.inner_wires {
            w.u32(inner);
        }
    }

    w.len(form.shells.len());
    for s in &form.shells {
        w.bool(s.is_closed);
        w.len(s.faces.len());
        for &f in &s.faces {
            w.u32(f);
        }
    }

    w.len(form.solids.len());
    for s in &form.solids {
        w.u32(s.outer_shell);
        w.len(s.inner_shells.len());
        for &inner in &s.inner_shells {
            w.u32(inner);
        }
    }

    w.len(form.compounds.len());
    for c in &form.compounds {
        w.len(c.children.len());
        for &child in &c.children {
            w.reference(child);
        }
    }

    match form.root {
        None => w.u8(0),
        Some(root) => w.reference(root),
    }

    reduce(&w.hasher)
}

impl StructuralIdentity for Point {
    fn structural_hash(&self) -> u32 {
        let mut w = DigestWriter::new(b"brepkit.point");
        w.point(self.position());
        reduce(&w.hasher)
    }

    fn structurally_equals(&self, other: &Self) -> bool {
        self == other
    }
}

impl StructuralIdentity for Shape {
    fn structural_hash(&self) -> u32 {
        self.cached_hash()
    }

    fn structurally_equals(&self, other: &Self) -> bool {
        self.structural_hash() == other.structural_hash() && self.canonical() == other.canonical()
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_equals(other)
    }
}

impl Eq for Shape {}

impl Hash for Shape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.structural_hash());
    }
}
