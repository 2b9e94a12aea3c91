//! ID generation utilities.

use uuid::Uuid;

/// Identifier of a transient notification.
pub type NoticeId = Uuid;

/// Generates a new notice identifier.
///
/// UUID v7 embeds a timestamp, so notices sort in the order they were raised.
#[must_use]
pub fn generate_notice_id() -> NoticeId {
    Uuid::now_v7()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_notice_id_uniqueness() {
        let id1 = generate_notice_id();
        let id2 = generate_notice_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generate_notice_id_is_v7() {
        let id = generate_notice_id();
        assert_eq!(id.get_version_num(), 7);
    }

    #[test]
    fn test_generate_notice_id_sortable() {
        let first = generate_notice_id();
        let second = generate_notice_id();
        assert!(first < second);
    }
}
