// tests/property_gate.rs

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::{Map, Value};

use shellevent::command::{CommandSpec, Program};
use shellevent::exec::ExecutionResult;
use shellevent::gate::should_emit;
use shellevent::payload::{BUILT_IN_OPTION_KEYS, RESERVED_KEYS, extra_fields, package};

fn result_strategy() -> impl Strategy<Value = ExecutionResult> {
    prop_oneof![
        (any::<i32>(), "[a-z ]{0,12}", "[a-z ]{0,12}").prop_map(|(code, out, err)| {
            ExecutionResult {
                stdout: out.trim().to_string(),
                stderr: err.trim().to_string(),
                exit_status: Some(code),
                spawn_error: None,
            }
        }),
        "[a-z ]{1,12}".prop_map(|reason| ExecutionResult::spawn_failure(reason)),
    ]
}

// Option keys drawn from both the built-in set and free-form names, so
// collisions with built-in and reserved keys are exercised.
fn options_strategy() -> impl Strategy<Value = Map<String, Value>> {
    let key = prop_oneof![
        proptest::sample::select(BUILT_IN_OPTION_KEYS.to_vec()).prop_map(str::to_string),
        proptest::sample::select(RESERVED_KEYS.to_vec()).prop_map(str::to_string),
        "[a-z_]{1,10}",
    ];
    proptest::collection::btree_map(key, any::<i64>().prop_map(Value::from), 0..12)
        .prop_map(|m| m.into_iter().collect())
}

fn spec() -> CommandSpec {
    CommandSpec::new(Program::from("true"), "/")
}

proptest! {
    #[test]
    fn failure_flag_only_suppresses_non_zero_exit(result in result_strategy(), empty_flag in any::<bool>()) {
        let payload = package(&spec(), &result, None);
        let emitted = should_emit(&payload, true, empty_flag);

        let failed = matches!(result.exit_status, Some(code) if code != 0);
        let empty = empty_flag && result.stdout.is_empty();
        prop_assert_eq!(emitted, !failed && !empty);
    }

    #[test]
    fn empty_output_flag_ignores_exit_status(result in result_strategy()) {
        let payload = package(&spec(), &result, None);
        prop_assert_eq!(should_emit(&payload, false, true), !result.stdout.is_empty());
        prop_assert!(should_emit(&payload, false, false));
    }

    #[test]
    fn zero_exit_means_no_errors_unless_stderr(out in "[a-z]{0,8}") {
        let result = ExecutionResult { stdout: out, exit_status: Some(0), ..Default::default() };
        let payload = package(&spec(), &result, None);
        prop_assert_eq!(payload.errors(), "");
        prop_assert_eq!(payload.exit_status(), Some(0));
    }

    #[test]
    fn merged_payload_is_union_of_reserved_and_extra_keys(
        result in result_strategy(),
        options in options_strategy(),
    ) {
        let extras = extra_fields(&options);
        let payload = package(&spec(), &result, Some(&extras));

        let keys: BTreeSet<&str> = payload.keys().collect();
        let mut expected: BTreeSet<&str> = RESERVED_KEYS.iter().copied().collect();
        expected.extend(
            options
                .keys()
                .map(String::as_str)
                .filter(|k| !BUILT_IN_OPTION_KEYS.contains(k)),
        );
        prop_assert_eq!(keys, expected);

        // Reserved values always come from the run, never from options.
        prop_assert_eq!(payload.output(), result.stdout.as_str());
        prop_assert_eq!(payload.exit_status(), result.exit_status.map(i64::from));
    }
}
