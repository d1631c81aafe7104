use clap::Parser;
use form_submitter::cli::config::{
    AppConfig, Cli, Commands, load_config, parse_field_arg, parse_field_args, resolve_policy,
};
use form_submitter::runtime::timer::TimerPolicy;

use crate::common::utils::temp_path;

mod common;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_submit_minimal() {
    let cli = Cli::parse_from(["form-submitter", "submit", "--page", "contact.yaml"]);
    match cli.command {
        Commands::Submit {
            page,
            fields,
            form,
            message,
            hide_delay_ms,
            timer_policy,
            linger,
        } => {
            assert_eq!(page, "contact.yaml");
            assert!(fields.is_empty());
            assert_eq!(form, None);
            assert_eq!(message, None);
            assert_eq!(hide_delay_ms, None);
            assert_eq!(timer_policy, None);
            assert!(!linger);
        }
        _ => panic!("Expected Submit command"),
    }
    assert_eq!(cli.verbose, 0);
    assert_eq!(cli.config, None);
}

#[test]
fn cli_parse_submit_all_args() {
    let cli = Cli::parse_from([
        "form-submitter",
        "-vv",
        "--config",
        "custom.yaml",
        "submit",
        "--page",
        "page.json",
        "--field",
        "name=Jane Doe",
        "-f",
        "email=jane@example.com",
        "--form",
        "#signup",
        "--message",
        ".notice",
        "--hide-delay-ms",
        "2500",
        "--timer-policy",
        "reschedule",
        "--linger",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    match cli.command {
        Commands::Submit {
            page,
            fields,
            form,
            message,
            hide_delay_ms,
            timer_policy,
            linger,
        } => {
            assert_eq!(page, "page.json");
            assert_eq!(fields, vec!["name=Jane Doe", "email=jane@example.com"]);
            assert_eq!(form.as_deref(), Some("#signup"));
            assert_eq!(message.as_deref(), Some(".notice"));
            assert_eq!(hide_delay_ms, Some(2500));
            assert_eq!(timer_policy.as_deref(), Some("reschedule"));
            assert!(linger);
        }
        _ => panic!("Expected Submit command"),
    }
}

#[test]
fn cli_parse_serialize() {
    let cli = Cli::parse_from([
        "form-submitter",
        "serialize",
        "--page",
        "contact.yaml",
        "--field",
        "message=hi",
    ]);
    match cli.command {
        Commands::Serialize { page, fields, form } => {
            assert_eq!(page, "contact.yaml");
            assert_eq!(fields, vec!["message=hi"]);
            assert_eq!(form, None);
        }
        _ => panic!("Expected Serialize command"),
    }
}

#[test]
fn cli_submit_requires_page() {
    assert!(Cli::try_parse_from(["form-submitter", "submit"]).is_err());
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn missing_config_file_gives_defaults() {
    let config = load_config(Some("/nonexistent/form-submitter.yaml"));
    assert_eq!(config.form.form_selector, ".contact_form");
    assert_eq!(config.form.message_selector, ".contact_msg");
    assert_eq!(config.form.hide_delay_ms, 10_000);
    assert_eq!(config.form.timer_policy, TimerPolicy::Independent);
    assert_eq!(config.http.timeout_secs, 30);
    assert_eq!(config.http.user_agent, None);
    assert_eq!(config.trace_file, None);
}

#[test]
fn partial_config_file_fills_in_defaults() {
    let path = temp_path("partial-config.yaml");
    std::fs::write(
        &path,
        "form:\n  hide_delay_ms: 3000\n  timer_policy: reschedule\nhttp:\n  user_agent: contact-bot/1.0\ntrace_file: trace.jsonl\n",
    )
    .unwrap();

    let config = load_config(Some(&path));
    assert_eq!(config.form.hide_delay_ms, 3000);
    assert_eq!(config.form.timer_policy, TimerPolicy::Reschedule);
    assert_eq!(config.form.form_selector, ".contact_form");
    assert_eq!(config.http.user_agent.as_deref(), Some("contact-bot/1.0"));
    assert_eq!(config.http.timeout_secs, 30);
    assert_eq!(config.trace_file.as_deref(), Some("trace.jsonl"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn malformed_config_file_gives_defaults() {
    let path = temp_path("broken-config.yaml");
    std::fs::write(&path, "form: [unclosed").unwrap();

    let config = load_config(Some(&path));
    assert_eq!(config.form.hide_delay_ms, AppConfig::default().form.hide_delay_ms);

    let _ = std::fs::remove_file(&path);
}

// ============================================================================
// Argument Helpers
// ============================================================================

#[test]
fn field_arg_splits_on_first_equals() {
    assert_eq!(
        parse_field_arg("note=a=b").unwrap(),
        ("note".to_string(), "a=b".to_string())
    );
    assert_eq!(
        parse_field_arg("empty=").unwrap(),
        ("empty".to_string(), String::new())
    );
}

#[test]
fn field_arg_without_name_is_rejected() {
    assert!(parse_field_arg("novalue").is_err());
    assert!(parse_field_arg("=value").is_err());
    assert!(parse_field_args(&["a=1".to_string(), "bad".to_string()]).is_err());
}

#[test]
fn cli_policy_overrides_config() {
    assert_eq!(
        resolve_policy(Some("reschedule"), TimerPolicy::Independent),
        TimerPolicy::Reschedule
    );
    assert_eq!(resolve_policy(None, TimerPolicy::Reschedule), TimerPolicy::Reschedule);
    // Unknown names fall back to the config value
    assert_eq!(
        resolve_policy(Some("sometimes"), TimerPolicy::Independent),
        TimerPolicy::Independent
    );
}
