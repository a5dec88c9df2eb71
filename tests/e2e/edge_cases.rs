use super::*;

#[test]
fn agent_fails_fast_without_credentials() {
    let ctx = TestContext::new();
    let result = ctx.run_aliscan(&["agent", "--region", "cn-hangzhou"]);

    assert!(
        !result.success(),
        "agent must fail without credentials.\n\nSTDOUT:\n{}",
        result.stdout
    );
    assert_stderr_contains(&result, "missing AccessKey credentials");
}

#[test]
fn agent_requires_a_region() {
    let ctx = TestContext::new();
    let result = ctx.run_aliscan(&["agent"]);

    assert!(!result.success(), "agent must require --region");
    assert_stderr_contains(&result, "--region");
}

#[test]
fn snapshot_fails_fast_without_credentials() {
    let ctx = TestContext::new();
    let result = ctx.run_aliscan(&["snapshot"]);

    assert!(
        !result.success(),
        "snapshot must fail without credentials.\n\nSTDOUT:\n{}",
        result.stdout
    );
    assert_stderr_contains(&result, "missing AccessKey credentials");
}

#[test]
fn backup_fails_fast_without_credentials_and_writes_nothing() {
    let ctx = TestContext::new();
    let result = ctx.run_aliscan(&["backup", "--lookback-hours", "12"]);

    assert!(
        !result.success(),
        "backup must fail without credentials.\n\nSTDOUT:\n{}",
        result.stdout
    );
    assert_stderr_contains(&result, "missing AccessKey credentials");
    ctx.assert_no_artifacts();
}

#[test]
fn flags_beat_the_scrubbed_environment_for_the_id_only() {
    // Passing only the id is still a credential failure: the secret is
    // resolved independently and is absent here.
    let ctx = TestContext::new();
    let result = ctx.run_aliscan(&[
        "agent",
        "--region",
        "cn-hangzhou",
        "--access-key-id",
        "LTAI4Fexample",
    ]);

    assert!(!result.success());
    assert_stderr_contains(&result, "missing AccessKey credentials");
}
