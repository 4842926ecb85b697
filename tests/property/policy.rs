use proptest::prelude::*;
use shell_relay::exec::{CommandOrigin, CommandPolicy};

fn policy() -> CommandPolicy {
    CommandPolicy::new(
        "oa;",
        vec![],
        vec!["rm".to_string()],
        vec![";".to_string(), "|".to_string()],
    )
}

proptest! {
    #[test]
    fn black_chars_are_rejected_unless_trusted(
        head in "[a-z ]{0,12}",
        bad in prop::sample::select(vec![";", "|"]),
        tail in "[a-z ]{0,12}",
    ) {
        let cmd = format!("echo {head}{bad}{tail}");
        let policy = policy();

        prop_assert!(policy.validate(&cmd, CommandOrigin::FreeText).is_err());
        prop_assert!(policy.validate(&cmd, CommandOrigin::Script).is_err());
        prop_assert!(policy.validate(&cmd, CommandOrigin::Trusted).is_ok());
    }

    #[test]
    fn out_all_prefix_is_stripped_once(body in "[a-z][a-z ]{0,20}") {
        let policy = policy();
        let validated = policy
            .validate(&format!("oa;{body}"), CommandOrigin::Trusted)
            .unwrap();

        prop_assert!(validated.out_all);
        prop_assert_eq!(validated.command, body);
    }
}
