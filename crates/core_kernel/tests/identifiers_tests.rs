//! Unit tests for the Identifiers module
//!
//! Tests cover the storage identifiers, their creation, parsing,
//! conversion, and display formatting, plus the human-facing policy number.

use core_kernel::{PolicyId, ComponentId, SubscriberId, PolicyNumber};
use proptest::prelude::*;
use uuid::Uuid;

mod storage_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = PolicyId::new();
        let id2 = PolicyId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = ComponentId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = ComponentId::new_v7();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = SubscriberId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(PolicyId::prefix(), "POL");
        assert_eq!(ComponentId::prefix(), "CMP");
        assert_eq!(SubscriberId::prefix(), "SUB");
    }

    #[test]
    fn test_parse_without_prefix() {
        let uuid = Uuid::new_v4();
        let parsed: PolicyId = uuid.to_string().parse().unwrap();
        assert_eq!(*parsed.as_uuid(), uuid);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("POL-not-a-uuid".parse::<PolicyId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let uuid = Uuid::new_v4();
        let id = PolicyId::from(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}

mod policy_number_tests {
    use super::*;

    #[test]
    fn test_parse_from_path_segment() {
        let number: PolicyNumber = "12345".parse().unwrap();
        assert_eq!(number.value(), 12345);
        assert_eq!(number.to_string(), "12345");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<PolicyNumber>().is_err());
        assert!("0".parse::<PolicyNumber>().is_err());
    }

    #[test]
    fn test_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<PolicyNumber>("0").is_err());
        let number: PolicyNumber = serde_json::from_str("3").unwrap();
        assert_eq!(i64::from(number), 3);
    }

    proptest! {
        #[test]
        fn positive_numbers_round_trip_through_display(value in 1i64..i64::MAX) {
            let number = PolicyNumber::new(value).unwrap();
            let parsed: PolicyNumber = number.to_string().parse().unwrap();
            prop_assert_eq!(number, parsed);
        }

        #[test]
        fn non_positive_numbers_are_rejected(value in i64::MIN..=0i64) {
            prop_assert!(PolicyNumber::new(value).is_err());
        }
    }
}
