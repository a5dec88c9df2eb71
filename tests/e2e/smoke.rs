use super::*;

#[test]
fn help_lists_every_subcommand() {
    let ctx = TestContext::new();
    let result = ctx.run_aliscan(&["--help"]);

    assert_success(&result);
    assert_output_contains(&result, "agent");
    assert_output_contains(&result, "snapshot");
    assert_output_contains(&result, "backup");
}

#[test]
fn version_runs_without_error() {
    let ctx = TestContext::new();
    let result = ctx.run_aliscan(&["--version"]);

    assert_success(&result);
    assert_output_contains(&result, "aliscan");
}

#[test]
fn agent_help_documents_the_assistant_flag() {
    let ctx = TestContext::new();
    let result = ctx.run_aliscan(&["agent", "--help"]);

    assert_success(&result);
    assert_output_contains(&result, "--check-cloud-assistant");
    assert_output_contains(&result, "--instance-id");
}

#[test]
fn snapshot_help_documents_the_filter_flag() {
    let ctx = TestContext::new();
    let result = ctx.run_aliscan(&["snapshot", "--help"]);

    assert_success(&result);
    assert_output_contains(&result, "--only-without-policy");
    assert_output_contains(&result, "--debug");
}

#[test]
fn backup_help_documents_the_lookback_window() {
    let ctx = TestContext::new();
    let result = ctx.run_aliscan(&["backup", "--help"]);

    assert_success(&result);
    assert_output_contains(&result, "--lookback-hours");
    assert_output_contains(&result, "--output");
}
