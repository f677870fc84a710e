//! Record codec: a compiled field list that packs one entry struct into its
//! fixed-size record and back.

use crate::{
    bits,
    device::Family,
    errors::{Error, Result},
    field::{ArraySpec, FieldKind, FieldSpec},
    layout::LayoutMode,
    tables::Entry,
};

/// A compiled entry layout. Use [RecordCodec::compile] to build one for a
/// family and layout, then [RecordCodec::encode] / [RecordCodec::decode].
#[derive(Debug)]
pub struct RecordCodec<E> {
    size: usize,
    layout: LayoutMode,
    fields: Vec<FieldSpec<E>>,
}

impl<E: Entry> RecordCodec<E> {
    /// Compiles the field list of `E` for `family`. Fails if any element range
    /// falls outside the record or cannot be accessed under `layout`.
    pub fn compile(family: Family, layout: LayoutMode) -> Result<Self> {
        let size = E::KIND.entry_size(family);
        let fields = E::fields(family);

        for field in &fields {
            if let FieldKind::Array(spec) = field.kind {
                check_array(spec, size)?;
            }

            for i in 0..field.element_count() {
                let (msb, lsb) = field.range(i);
                bits::check_range(msb, lsb, size, layout)?;
            }
        }

        Ok(Self {
            size,
            layout,
            fields,
        })
    }

    /// Size in bytes of one packed entry.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Packs `entry` into the first [RecordCodec::size] bytes of `buf`.
    /// Bits not covered by any field are written as zero.
    pub fn encode(&self, entry: &E, buf: &mut [u8]) -> Result<()> {
        let available = buf.len();
        let record = buf.get_mut(..self.size).ok_or(Error::UnexpectedEnd {
            offset: available,
            needed: self.size - available,
        })?;
        record.fill(0);

        for field in &self.fields {
            for i in 0..field.element_count() {
                let (msb, lsb) = field.range(i);
                bits::pack(record, field.get(entry, i), msb, lsb, self.layout)?;
            }
        }

        Ok(())
    }

    /// Unpacks one entry from the first [RecordCodec::size] bytes of `buf`.
    pub fn decode(&self, buf: &[u8]) -> Result<E> {
        let record = buf.get(..self.size).ok_or(Error::UnexpectedEnd {
            offset: buf.len(),
            needed: self.size - buf.len(),
        })?;

        let mut entry = E::default();
        for field in &self.fields {
            for i in 0..field.element_count() {
                let (msb, lsb) = field.range(i);
                field.set(&mut entry, i, bits::unpack(record, msb, lsb, self.layout)?);
            }
        }

        Ok(entry)
    }
}

/// Array descriptors must have at least one element of non-zero width, and
/// elements must not overlap.
fn check_array(spec: ArraySpec, size: usize) -> Result<()> {
    if spec.count == 0 || spec.width_bits == 0 || spec.stride_bits < spec.width_bits {
        return Err(Error::InvalidFieldSpec {
            msb: (spec.offset_bits + spec.width_bits).saturating_sub(1),
            lsb: spec.offset_bits,
            len: size,
        });
    }
    Ok(())
}

/// Reads field `path` (`"name"` or `"name[i]"`) of `entry` as laid out on `family`.
pub fn get_field<E: Entry>(family: Family, entry: &E, path: &str) -> Result<u64> {
    let fields = E::fields(family);
    let (field, index) = lookup(&fields, path)?;
    Ok(field.get(entry, index))
}

/// Writes `value` into field `path` of `entry`. The value is stored as given;
/// it is masked to the field width only when packed.
pub fn set_field<E: Entry>(family: Family, entry: &mut E, path: &str, value: u64) -> Result<()> {
    let fields = E::fields(family);
    let (field, index) = lookup(&fields, path)?;
    field.set(entry, index, value);
    Ok(())
}

fn lookup<'a, E: Entry>(
    fields: &'a [FieldSpec<E>],
    path: &str,
) -> Result<(&'a FieldSpec<E>, usize)> {
    let unknown = || Error::UnknownField {
        table: E::KIND,
        name: path.to_string(),
    };

    let (name, index) = parse_path(path).ok_or_else(unknown)?;
    let field = fields
        .iter()
        .find(|field| field.name() == name)
        .ok_or_else(unknown)?;

    match (field.kind, index) {
        (FieldKind::Scalar { .. }, None) => Ok((field, 0)),
        (FieldKind::Array(spec), Some(i)) if i < spec.count => Ok((field, i)),
        _ => Err(unknown()),
    }
}

fn parse_path(path: &str) -> Option<(&str, Option<usize>)> {
    match path.split_once('[') {
        None => Some((path, None)),
        Some((name, rest)) => {
            let index = rest.strip_suffix(']')?.parse().ok()?;
            Some((name, Some(index)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{L2ForwardingParamsEntry, MacConfigEntry, VlPolicingEntry};

    fn compile<E: Entry>(family: Family) -> RecordCodec<E> {
        RecordCodec::compile(family, LayoutMode::SJA1105).unwrap()
    }

    #[test]
    fn test_encode_clears_unused_bits() {
        let codec = compile::<L2ForwardingParamsEntry>(Family::Et);
        let mut buf = [0xFFu8; 12];
        codec
            .encode(&L2ForwardingParamsEntry::default(), &mut buf)
            .unwrap();
        assert_eq!(buf, [0u8; 12]);
    }

    #[test]
    fn test_decode_round_trip() {
        let codec = compile::<MacConfigEntry>(Family::Pqrs);
        let mut entry = MacConfigEntry::default();
        entry.enabled[3] = 1;
        entry.base[3] = 0xC0;
        entry.top[3] = 0xFF;
        entry.vlanid = 1;
        entry.speed = 2;

        let mut buf = vec![0u8; codec.size()];
        codec.encode(&entry, &mut buf).unwrap();
        assert_eq!(codec.decode(&buf).unwrap(), entry);
    }

    #[test]
    fn test_short_buffer() {
        let codec = compile::<VlPolicingEntry>(Family::Et);
        let mut buf = [0u8; 4];
        assert!(matches!(
            codec.encode(&VlPolicingEntry::default(), &mut buf),
            Err(Error::UnexpectedEnd {
                offset: 4,
                needed: 4
            })
        ));
        assert!(matches!(
            codec.decode(&buf),
            Err(Error::UnexpectedEnd {
                offset: 4,
                needed: 4
            })
        ));
    }

    #[test]
    fn test_invalid_array_reports_first_element() {
        let overlapping = ArraySpec {
            count: 2,
            width_bits: 8,
            offset_bits: 16,
            stride_bits: 4,
        };
        assert!(matches!(
            check_array(overlapping, 8),
            Err(Error::InvalidFieldSpec {
                msb: 23,
                lsb: 16,
                len: 8
            })
        ));

        let empty = ArraySpec {
            width_bits: 0,
            ..overlapping
        };
        assert!(matches!(
            check_array(empty, 8),
            Err(Error::InvalidFieldSpec {
                msb: 15,
                lsb: 16,
                ..
            })
        ));

        let spaced = ArraySpec {
            stride_bits: 8,
            ..overlapping
        };
        assert!(check_array(spaced, 8).is_ok());
    }

    #[test]
    fn test_field_by_name() {
        let mut entry = L2ForwardingParamsEntry::default();

        set_field(Family::Et, &mut entry, "part_spc[2]", 100).unwrap();
        set_field(Family::Et, &mut entry, "max_dynp", 3).unwrap();
        assert_eq!(entry.part_spc[2], 100);
        assert_eq!(get_field(Family::Et, &entry, "max_dynp").unwrap(), 3);

        for bad in ["part_spc", "part_spc[8]", "max_dynp[0]", "nope", "part_spc[x]"] {
            assert!(matches!(
                get_field(Family::Et, &entry, bad),
                Err(Error::UnknownField { .. })
            ));
        }
    }

    #[test]
    fn test_raw_identifier_field_name() {
        let mut entry = VlPolicingEntry::default();
        set_field(Family::Et, &mut entry, "type", 1).unwrap();
        assert_eq!(entry.r#type, 1);
    }
}
