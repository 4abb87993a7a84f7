//! Stop with nothing running
//!
//! `stop` against a directory with no pid record is informational, not an
//! error: it reports the missing record on stdout and exits zero.

use e2e_tests::assertions::assert_no_pid_file;
use e2e_tests::TestExecutor;

#[test]
fn test_stop_without_record_is_informational() {
    println!("\n========================================");
    println!("TEST: Stop Without Record");
    println!("========================================\n");

    let executor = TestExecutor::new("stop-idempotent");

    let result = executor.run_test(&[], |cli| {
        // Step 1: stop without ever starting
        println!("Step 1: Stopping with no record present...");
        let stop = cli.run("stop");
        if stop.status != Some(0) {
            return Err(format!(
                "stop without a record should exit 0, got {:?}\nstderr: {}",
                stop.status, stop.stderr
            ));
        }
        if !stop.stdout_contains("No managed process record for 'testexe'") {
            return Err(format!(
                "stop did not explain the missing record: {}",
                stop.stdout
            ));
        }
        println!("✓ stop exited 0 and explained itself\n");

        // Step 2: still no record, and a second stop behaves the same
        println!("Step 2: Repeating the stop...");
        assert_no_pid_file(&cli.pid_file())?;
        let again = cli.run("stop");
        if again.status != Some(0) {
            return Err(format!("second stop should also exit 0, got {:?}", again.status));
        }
        println!("✓ stop is idempotent\n");

        Ok(())
    });

    match result {
        Ok(()) => {
            println!("\n========================================");
            println!("✓ TEST PASSED: Stop Without Record");
            println!("========================================\n");
        }
        Err(e) => {
            println!("\n========================================");
            println!("✗ TEST FAILED: Stop Without Record");
            println!("Error: {}", e);
            println!("========================================\n");
            panic!("Test failed: {}", e);
        }
    }
}
