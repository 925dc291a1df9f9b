//! Host-independent argument shaping.
//!
//! The Python layer turns script values into BSON; these helpers hold the
//! value rules that do not depend on the host and build the driver arguments
//! the operation surface needs.

use bson::{doc, Bson, Document as BsonDocument};

/// Narrowest BSON integer for a script integer: Int32 when it fits
pub fn integer(value: i64) -> Bson {
    i32::try_from(value).map_or(Bson::Int64(value), Bson::Int32)
}

/// Wrap a patch as a field-set update. Fields not in the patch are untouched.
pub fn set_patch(patch: BsonDocument) -> BsonDocument {
    doc! { "$set": patch }
}

/// Maximum document count for a find, or `None` for no limit
pub fn find_limit(limit: i64) -> Option<i64> {
    (limit > 0).then_some(limit)
}

/// Primary-key ascending, used as FindOne sort and delete hint
pub fn id_ascending() -> BsonDocument {
    doc! { "_id": 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_narrows_to_int32() {
        assert_eq!(integer(5), Bson::Int32(5));
        assert_eq!(integer(-7), Bson::Int32(-7));
        assert_eq!(integer(i32::MAX as i64), Bson::Int32(i32::MAX));
        assert_eq!(integer(i32::MIN as i64), Bson::Int32(i32::MIN));
    }

    #[test]
    fn test_integer_widens_to_int64() {
        assert_eq!(integer(i32::MAX as i64 + 1), Bson::Int64(2_147_483_648));
        assert_eq!(integer(1 << 40), Bson::Int64(1 << 40));
        assert_eq!(integer(i64::MIN), Bson::Int64(i64::MIN));
    }

    #[test]
    fn test_set_patch_wraps_fields() {
        let update = set_patch(doc! { "b": "9" });
        assert_eq!(update, doc! { "$set": { "b": "9" } });
    }

    #[test]
    fn test_find_limit() {
        assert_eq!(find_limit(2), Some(2));
        assert_eq!(find_limit(0), None);
        assert_eq!(find_limit(-5), None);
    }

    #[test]
    fn test_id_ascending() {
        assert_eq!(id_ascending(), doc! { "_id": 1 });
    }
}
