//! Property tests for the built-in rules

use proptest::prelude::*;
use rampart_validation::*;
use serde_json::{Value, json};

fn evaluator() -> RuleEvaluator {
    RuleEvaluator::with_defaults().unwrap()
}

fn non_blank_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        "[ \t]{0,3}[!-~][ -~]{0,20}".prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_filter("finite", |f| f.is_finite()).prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ];
    leaf.prop_recursive(2, 8, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn violation_kind(result: Result<(), RuleError>) -> Option<ViolationKind> {
    match result {
        Err(RuleError::Violation(v)) => Some(v.kind),
        _ => None,
    }
}

proptest! {
    #[test]
    fn password_length_outside_range_always_fails(len in prop_oneof![0usize..8, 19usize..40]) {
        let value = "a1@".chars().cycle().take(len).collect::<String>();
        let result = evaluator().check_password(&PasswordRule::default(), Some(&json!(value)));

        let is_length_error = matches!(
            violation_kind(result),
            Some(ViolationKind::LengthOutOfRange { actual, .. }) if actual == len
        );
        prop_assert!(is_length_error);
    }

    #[test]
    fn password_with_all_classes_passes(body in "[a-zA-Z0-9]{5,15}") {
        let value = format!("a1_{}", body);
        prop_assert!(evaluator().check_password(&PasswordRule::default(), Some(&json!(value))).is_ok());
    }

    #[test]
    fn age_accepts_exactly_one_to_one_twenty(n in 0u32..400) {
        let rule = NumberRule::new().pattern(PatternId::Age);
        let ok = evaluator().check_number(&rule, Some(&json!(n))).is_ok();
        prop_assert_eq!(ok, (1..=120).contains(&n));
    }

    #[test]
    fn number_accepts_any_unsigned(n in any::<u64>()) {
        prop_assert!(evaluator().check_number(&NumberRule::default(), Some(&json!(n))).is_ok());
        prop_assert!(evaluator().check_number(&NumberRule::default(), Some(&json!(n.to_string()))).is_ok());
    }

    #[test]
    fn whitespace_only_is_blank(spaces in "[ \t]{0,10}") {
        let result = evaluator().check_not_null(&NotNullRule::default(), Some(&json!(spaces)));
        prop_assert!(result.is_err());
        prop_assert!(evaluator().check_not_null(&NotNullRule::optional(), Some(&json!(spaces))).is_ok());
    }

    #[test]
    fn not_null_passes_any_non_blank_value(value in non_blank_value()) {
        let rule = RuleDescriptor::from(NotNullRule::new());
        prop_assert!(evaluator().check(&rule, Some(&value)).is_ok());
    }
}
