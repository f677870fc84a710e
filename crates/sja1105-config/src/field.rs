//! Declarative field descriptors used to build a [crate::codec::RecordCodec].

use std::fmt;

/// One named field of a table entry: its bit position inside the packed record
/// and how to reach the matching slot of the entry struct.
pub struct FieldSpec<E> {
    name: &'static str,
    /// Scalar bit range or a fixed-length array of equally sized elements.
    pub kind: FieldKind,
    get: fn(&E, usize) -> u64,
    set: fn(&mut E, usize, u64),
}

/// Distinguishes scalar fields from fixed-length array fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Inclusive bit range `[msb:lsb]`.
    Scalar { msb: usize, lsb: usize },
    /// Repeated element with fixed count and stride.
    Array(ArraySpec),
}

/// Parameters for an array field. Element `i` occupies
/// `[offset_bits + i * stride_bits + width_bits - 1 : offset_bits + i * stride_bits]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArraySpec {
    /// Number of elements.
    pub count: usize,
    /// Width of one element.
    pub width_bits: usize,
    /// Lowest bit of element 0.
    pub offset_bits: usize,
    /// Distance in bits between the lowest bits of consecutive elements.
    pub stride_bits: usize,
}

impl<E> FieldSpec<E> {
    pub const fn scalar(
        name: &'static str,
        msb: usize,
        lsb: usize,
        get: fn(&E, usize) -> u64,
        set: fn(&mut E, usize, u64),
    ) -> Self {
        FieldSpec {
            name,
            kind: FieldKind::Scalar { msb, lsb },
            get,
            set,
        }
    }

    pub const fn array(
        name: &'static str,
        spec: ArraySpec,
        get: fn(&E, usize) -> u64,
        set: fn(&mut E, usize, u64),
    ) -> Self {
        FieldSpec {
            name,
            kind: FieldKind::Array(spec),
            get,
            set,
        }
    }

    /// Name used by the name-based edit operations (raw identifiers lose their `r#`).
    pub fn name(&self) -> &'static str {
        self.name.trim_start_matches("r#")
    }

    /// Number of bit ranges this descriptor expands to.
    pub fn element_count(&self) -> usize {
        match self.kind {
            FieldKind::Scalar { .. } => 1,
            FieldKind::Array(spec) => spec.count,
        }
    }

    /// `[msb, lsb]` of element `index` (always 0 for scalars).
    pub fn range(&self, index: usize) -> (usize, usize) {
        match self.kind {
            FieldKind::Scalar { msb, lsb } => (msb, lsb),
            FieldKind::Array(spec) => {
                let lsb = spec.offset_bits + index * spec.stride_bits;
                (lsb + spec.width_bits - 1, lsb)
            }
        }
    }

    pub fn get(&self, entry: &E, index: usize) -> u64 {
        (self.get)(entry, index)
    }

    pub fn set(&self, entry: &mut E, index: usize, value: u64) {
        (self.set)(entry, index, value)
    }
}

impl<E> fmt::Debug for FieldSpec<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name())
            .field("kind", &self.kind)
            .finish()
    }
}

/// `scalar!(Entry, field, msb, lsb)` declares a scalar field bound to `Entry::field`.
macro_rules! scalar {
    ($entry:ty, $field:ident, $msb:expr, $lsb:expr) => {
        $crate::field::FieldSpec::<$entry>::scalar(
            stringify!($field),
            $msb,
            $lsb,
            |e: &$entry, _| e.$field,
            |e: &mut $entry, _, v| e.$field = v,
        )
    };
}

/// `array!(Entry, field, count, width, offset, stride)` declares an array field
/// bound to `Entry::field[i]`.
macro_rules! array {
    ($entry:ty, $field:ident, $count:expr, $width:expr, $offset:expr, $stride:expr) => {
        $crate::field::FieldSpec::<$entry>::array(
            stringify!($field),
            $crate::field::ArraySpec {
                count: $count,
                width_bits: $width,
                offset_bits: $offset,
                stride_bits: $stride,
            },
            |e: &$entry, i| e.$field[i],
            |e: &mut $entry, i, v| e.$field[i] = v,
        )
    };
}

pub(crate) use array;
pub(crate) use scalar;
