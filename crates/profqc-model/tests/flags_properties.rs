//! Property tests for the composite flag codec and the total derivation rule.

use proptest::prelude::*;

use profqc_model::{AutomaticFlags, QcField, QcFlag, QcFlags};

fn flag() -> impl Strategy<Value = QcFlag> {
    (0u8..10).prop_map(|code| QcFlag::from_code(code).unwrap())
}

fn automatic() -> impl Strategy<Value = AutomaticFlags> {
    proptest::collection::vec(flag(), QcField::COUNT).prop_map(|slots| {
        let mut automatic = AutomaticFlags::new();
        for (field, slot) in QcField::ALL.into_iter().zip(slots) {
            automatic.set(field, slot);
        }
        automatic
    })
}

fn composite_string() -> impl Strategy<Value = String> {
    "[0-9]_[0-9]{10}_[0-9]_[0-9]"
}

proptest! {
    #[test]
    fn serialize_parse_round_trip(s in composite_string()) {
        let parsed = QcFlags::parse(&s).unwrap();
        prop_assert_eq!(parsed.to_string(), s);
    }

    #[test]
    fn total_follows_derivation_rule(
        incoming in flag(),
        automatic in automatic(),
        manual in flag(),
    ) {
        let flags = QcFlags::new(incoming, automatic, manual);
        if manual == QcFlag::NoQcPerformed {
            prop_assert_eq!(flags.total(), incoming.max(automatic.worst()));
        } else {
            prop_assert_eq!(flags.total(), manual);
        }
        prop_assert!(flags.is_consistent());
    }

    #[test]
    fn mutators_keep_total_consistent(
        start in composite_string(),
        incoming in flag(),
        automatic in automatic(),
        manual in flag(),
    ) {
        let mut flags = QcFlags::parse(&start).unwrap();
        flags.set_automatic(automatic);
        prop_assert!(flags.is_consistent());
        flags.set_incoming(incoming);
        prop_assert!(flags.is_consistent());
        flags.set_manual(manual);
        prop_assert!(flags.is_consistent());
        prop_assert_eq!(QcFlags::parse(&flags.to_string()).unwrap(), flags);
    }
}

#[test]
fn worst_automatic_flag_is_the_maximum_slot() {
    let mut automatic = AutomaticFlags::new();
    assert_eq!(automatic.worst(), QcFlag::NoQcPerformed);
    automatic.set(QcField::Spike, QcFlag::ProbablyGoodData);
    automatic.set(QcField::Range, QcFlag::GoodData);
    assert_eq!(automatic.worst(), QcFlag::ProbablyGoodData);
    let flags: Vec<(QcField, QcFlag)> = automatic
        .iter()
        .filter(|(_, flag)| !flag.is_no_qc())
        .collect();
    assert_eq!(
        flags,
        [
            (QcField::Range, QcFlag::GoodData),
            (QcField::Spike, QcFlag::ProbablyGoodData)
        ]
    );
}
