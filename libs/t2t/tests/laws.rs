use std::collections::HashMap;

use proptest::prelude::*;
use t2t::{Dynamic, Transfer, Transformer, transfer};

#[derive(Debug, Default, Clone, PartialEq, Transfer)]
struct Record {
    #[transfer(t2t = "id")]
    pub id: i64,
    pub name: String,
    pub active: bool,
    pub scores: Vec<i32>,
    pub parent: Option<u32>,
    pub ranks: HashMap<u32, i64>,
}

fn record() -> impl Strategy<Value = Record> {
    (
        any::<i64>(),
        ".*",
        any::<bool>(),
        prop::collection::vec(any::<i32>(), 0..8),
        any::<Option<u32>>(),
        prop::collection::hash_map(any::<u32>(), any::<i64>(), 0..8),
    )
        .prop_map(|(id, name, active, scores, parent, ranks)| Record {
            id,
            name,
            active,
            scores,
            parent,
            ranks,
        })
}

proptest! {
    #[test]
    fn integers_survive_dynamic(v in any::<i64>()) {
        let mut dynamic = Dynamic::Nil;
        transfer(&v, &mut dynamic).unwrap();
        prop_assert_eq!(&dynamic, &Dynamic::I64(v));

        let mut back = 0i64;
        transfer(&dynamic, &mut back).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn strings_survive_dynamic(v in ".*") {
        let mut dynamic = Dynamic::Nil;
        transfer(&v, &mut dynamic).unwrap();

        let mut back = String::new();
        transfer(&dynamic, &mut back).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn widening_then_narrowing_is_identity(v in any::<i32>()) {
        let mut wide = 0i64;
        transfer(&v, &mut wide).unwrap();
        let mut back = 0i32;
        transfer(&wide, &mut back).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn finite_floats_survive_text(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let t = Transformer::new().with_weak_type_transfer(true);
        let mut text = String::new();
        t.transfer(&v, &mut text).unwrap();
        let mut back = 0f64;
        t.transfer(&text, &mut back).unwrap();
        prop_assert_eq!(back, v);
    }

    #[test]
    fn record_survives_map(input in record()) {
        let mut map = HashMap::<String, Dynamic>::new();
        transfer(&input, &mut map).unwrap();
        prop_assert_eq!(map.len(), 6);

        let mut back = Record::default();
        transfer(&map, &mut back).unwrap();
        prop_assert_eq!(back, input);
    }

    #[test]
    fn record_survives_dynamic(input in record()) {
        let mut dynamic = Dynamic::Nil;
        transfer(&input, &mut dynamic).unwrap();

        let mut back = Record::default();
        transfer(&dynamic, &mut back).unwrap();
        prop_assert_eq!(back, input);
    }

    #[test]
    fn transfer_is_deterministic(input in record()) {
        let mut first = Dynamic::Nil;
        let mut second = Dynamic::Nil;
        transfer(&input, &mut first).unwrap();
        transfer(&input, &mut second).unwrap();
        prop_assert_eq!(first, second);
    }
}
