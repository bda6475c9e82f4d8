use core::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::IntervalIndex;

/// Parses a `LASV` record, reporting failures through the format's error type.
fn from_lasv<E: de::Error>(bytes: &[u8]) -> Result<IntervalIndex, E> {
    IntervalIndex::deserialize_from(bytes)
        .map_err(|error| E::custom(format_args!("invalid LASV interval index: {error}")))
}

struct LasvVisitor;

impl<'de> Visitor<'de> for LasvVisitor {
    type Value = IntervalIndex;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("the bytes of a LASV interval index")
    }

    fn visit_bytes<E: de::Error>(self, bytes: &[u8]) -> Result<IntervalIndex, E> {
        from_lasv(bytes)
    }

    fn visit_byte_buf<E: de::Error>(self, bytes: Vec<u8>) -> Result<IntervalIndex, E> {
        from_lasv(&bytes)
    }

    // json and other self-describing formats hand the record over as a sequence
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<IntervalIndex, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(byte) = seq.next_element::<u8>()? {
            bytes.push(byte);
        }
        from_lasv(&bytes)
    }
}

impl<'de> Deserialize<'de> for IntervalIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_bytes(LasvVisitor)
    }
}

/// An index is serialized as its `LASV` record, stored as one byte string.
impl Serialize for IntervalIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = Vec::with_capacity(self.serialized_size());
        self.serialize_into(&mut record).map_err(serde::ser::Error::custom)?;
        serializer.serialize_bytes(&record)
    }
}
