use crate::{db::predicate::Predicate, value::hash_value};
use sha2::{Digest, Sha256};

/// Hash predicate structure into a fingerprint stream.
pub(crate) fn hash_predicate(hasher: &mut Sha256, predicate: &Predicate) {
    match predicate {
        Predicate::True => write_tag(hasher, 0x21),
        Predicate::And(children) => {
            write_tag(hasher, 0x23);
            write_len_u32(hasher, children.len());
            for child in children {
                hash_predicate(hasher, child);
            }
        }
        Predicate::Or(children) => {
            write_tag(hasher, 0x24);
            write_len_u32(hasher, children.len());
            for child in children {
                hash_predicate(hasher, child);
            }
        }
        Predicate::Not(inner) => {
            write_tag(hasher, 0x25);
            hash_predicate(hasher, inner);
        }
        Predicate::Compare(compare) => {
            write_tag(hasher, 0x26);
            write_str(hasher, &compare.field);
            write_tag(hasher, compare.op.tag());
            hash_value(hasher, &compare.value);
        }
    }
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}

fn write_len_u32(hasher: &mut Sha256, len: usize) {
    hasher.update(u32::try_from(len).unwrap_or(u32::MAX).to_be_bytes());
}

pub(crate) fn write_str(hasher: &mut Sha256, value: &str) {
    write_len_u32(hasher, value.len());
    hasher.update(value.as_bytes());
}
