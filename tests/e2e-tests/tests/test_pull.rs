//! Source update failure
//!
//! The test directory is not a git checkout, so `pull` must fail with an
//! update error and a non-zero exit, whether or not git is even installed.
//! Git discovers its repository by walking upward from the working
//! directory, and the test directory sits inside this project's own tree;
//! the pull runs with `GIT_CEILING_DIRECTORIES` capping that walk so an
//! enclosing checkout can never satisfy it.

use e2e_tests::TestExecutor;

#[test]
fn test_pull_outside_checkout_fails() {
    println!("\n========================================");
    println!("TEST: Pull Outside a Checkout");
    println!("========================================\n");

    let executor = TestExecutor::new("pull-no-checkout");

    let result = executor.run_test(&[], |cli| {
        println!("Step 1: Running pull in a plain directory...");
        let ceiling = cli.test_dir.parent().expect("test dir has a parent");
        let pull = cli.run_with_env("pull", &[("GIT_CEILING_DIRECTORIES", ceiling.as_os_str())]);
        if pull.status != Some(2) {
            return Err(format!(
                "pull outside a checkout should exit 2, got {:?}\nstdout: {}",
                pull.status, pull.stdout
            ));
        }
        if !pull.stderr_contains("Source update failed") {
            return Err(format!("unexpected error output: {}", pull.stderr));
        }
        println!("✓ pull failed with an update error\n");

        // The verb never touches the process record
        if cli.pid_file().exists() {
            return Err("pull created a pid record".to_string());
        }

        Ok(())
    });

    match result {
        Ok(()) => {
            println!("\n========================================");
            println!("✓ TEST PASSED: Pull Outside a Checkout");
            println!("========================================\n");
        }
        Err(e) => {
            println!("\n========================================");
            println!("✗ TEST FAILED: Pull Outside a Checkout");
            println!("Error: {}", e);
            println!("========================================\n");
            panic!("Test failed: {}", e);
        }
    }
}
