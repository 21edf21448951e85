use proptest::prelude::*;
use std::collections::HashMap;
use stockflow_analytics::{
    derive_columns, filter_rows, group_by, AggSpec, DerivedColumn, Predicate,
};
use stockflow_table::{Table, Value};

const GROUPS: [&str; 4] = ["WH1", "WH2", "WH3", "WH4"];

fn rows() -> impl Strategy<Value = Vec<(usize, i64, i64, i64)>> {
    prop::collection::vec((0usize..4, 0i64..400, 0i64..200, 0i64..200), 0..40)
}

fn build(rows: &[(usize, i64, i64, i64)]) -> Table {
    let mut t = Table::new(
        "Joined",
        vec!["Warehouse", "Stock", "QuantityShipped", "QuantityOrdered"],
    )
    .unwrap();
    for &(group, stock, shipped, ordered) in rows {
        t.push_row(vec![
            GROUPS[group].into(),
            stock.into(),
            shipped.into(),
            ordered.into(),
        ])
        .unwrap();
    }
    t
}

fn derived(table: &Table) -> Table {
    derive_columns(
        table,
        &[
            DerivedColumn::difference("StockAfterShipment", "Stock", "QuantityShipped"),
            DerivedColumn::difference("StockVsOrder", "StockAfterShipment", "QuantityOrdered"),
        ],
    )
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn derivation_is_deterministic(input in rows()) {
        let table = build(&input);
        prop_assert_eq!(derived(&table), derived(&table));
    }

    #[test]
    fn filter_selects_exactly_the_predicate_true_set(input in rows()) {
        let table = derived(&build(&input));
        let deficits = filter_rows(&table, &Predicate::lt("StockVsOrder", 0)).unwrap();

        let expected: Vec<Vec<Value>> = input
            .iter()
            .filter(|(_, stock, shipped, ordered)| stock - shipped - ordered < 0)
            .map(|&(group, stock, shipped, ordered)| {
                vec![
                    Value::from(GROUPS[group]),
                    Value::from(stock),
                    Value::from(shipped),
                    Value::from(ordered),
                    Value::from(stock - shipped),
                    Value::from(stock - shipped - ordered),
                ]
            })
            .collect();
        let actual: Vec<Vec<Value>> = deficits.rows().map(<[Value]>::to_vec).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn grouped_sums_match_per_group_totals(input in rows()) {
        let table = build(&input);
        let summary = group_by(&table, "Warehouse", &[AggSpec::sum("Stock")]).unwrap();

        let mut expected: HashMap<&str, i64> = HashMap::new();
        for &(group, stock, _, _) in &input {
            *expected.entry(GROUPS[group]).or_default() += stock;
        }
        prop_assert_eq!(summary.row_count(), expected.len());

        for row in summary.rows() {
            let key = row[0].as_str().unwrap();
            prop_assert_eq!(row[1].as_i64(), expected.get(key).copied());
        }
    }
}
