// tests/policy.rs

use shell_relay::errors::RelayError;
use shell_relay::exec::{CommandOrigin, CommandPolicy};

fn policy() -> CommandPolicy {
    CommandPolicy::new(
        "oa;",
        vec![],
        vec!["rm".to_string(), "Shutdown".to_string()],
        vec![";".to_string(), "&&".to_string()],
    )
}

#[test]
fn plain_command_passes_through() {
    let v = policy().validate("ls -la", CommandOrigin::FreeText).unwrap();
    assert_eq!(v.command, "ls -la");
    assert!(!v.out_all);
}

#[test]
fn out_all_prefix_is_stripped() {
    let v = policy().validate("oa;tail -n 500 app.log", CommandOrigin::FreeText).unwrap();
    assert_eq!(v.command, "tail -n 500 app.log");
    assert!(v.out_all);
}

#[test]
fn black_chars_make_free_text_and_scripts_illegal() {
    let p = policy();
    assert!(matches!(
        p.validate("ls; rm -rf /", CommandOrigin::FreeText),
        Err(RelayError::IllegalCommand)
    ));
    assert!(matches!(
        p.validate("deploy.sh && reboot", CommandOrigin::Script),
        Err(RelayError::IllegalCommand)
    ));
}

#[test]
fn black_chars_are_checked_after_prefix_strip() {
    assert!(matches!(
        policy().validate("oa;echo a; echo b", CommandOrigin::FreeText),
        Err(RelayError::IllegalCommand)
    ));
}

#[test]
fn black_list_matches_first_word_case_insensitively_and_through_sudo() {
    let p = policy();
    assert!(matches!(
        p.validate("RM file.txt", CommandOrigin::FreeText),
        Err(RelayError::IllegalCommand)
    ));
    assert!(matches!(
        p.validate("sudo rm file.txt", CommandOrigin::FreeText),
        Err(RelayError::IllegalCommand)
    ));
    assert!(matches!(
        p.validate("shutdown now", CommandOrigin::FreeText),
        Err(RelayError::IllegalCommand)
    ));
    // Only the command name is matched.
    assert!(p.validate("ls rm", CommandOrigin::FreeText).is_ok());
    assert!(p.validate("rmdir old", CommandOrigin::FreeText).is_ok());
}

#[test]
fn name_lists_do_not_apply_to_scripts() {
    assert!(policy().validate("rm", CommandOrigin::Script).is_ok());
}

#[test]
fn white_list_restricts_free_text() {
    let p = CommandPolicy::new("oa;", vec!["uptime".to_string(), "df".to_string()], vec![], vec![]);
    assert!(p.validate("uptime", CommandOrigin::FreeText).is_ok());
    assert!(p.validate("sudo df -h", CommandOrigin::FreeText).is_ok());
    assert!(matches!(
        p.validate("cat /etc/shadow", CommandOrigin::FreeText),
        Err(RelayError::IllegalCommand)
    ));
}

#[test]
fn trusted_commands_skip_all_checks() {
    let v = policy()
        .validate("oa;rm -rf build; make", CommandOrigin::Trusted)
        .unwrap();
    assert_eq!(v.command, "rm -rf build; make");
    assert!(v.out_all);
}

#[test]
fn illegal_command_message_matches_operator_text() {
    assert_eq!(RelayError::IllegalCommand.to_string(), "This cmd is illegal.");
}
