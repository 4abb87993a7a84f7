//! Double start
//!
//! A second `start` while the service is already running is allowed: it
//! spawns a fresh process, overwrites the record, and warns that the
//! previous process is now unmanaged.

#![cfg(unix)]

use e2e_tests::assertions::{assert_pid_file_exists, kill_out_of_band, pid_is_alive};
use e2e_tests::TestExecutor;

#[test]
fn test_double_start_orphans_previous_process() {
    println!("\n========================================");
    println!("TEST: Double Start");
    println!("========================================\n");

    let executor = TestExecutor::new("double-start");

    let result = executor.run_test(&[], |cli| {
        // Step 1: first start
        println!("Step 1: Starting testexe...");
        let first = cli.run("start");
        if first.status != Some(0) {
            return Err(format!("first start failed: {:?} {}", first.status, first.stderr));
        }
        let first_pid = assert_pid_file_exists(&cli.pid_file())?;
        println!("✓ first incarnation is pid {}\n", first_pid);

        // Step 2: second start while the first is still running
        println!("Step 2: Starting again...");
        let second = cli.run("start");
        if second.status != Some(0) {
            return Err(format!(
                "second start failed: {:?}\nstderr: {}",
                second.status, second.stderr
            ));
        }
        let warning = format!(
            "warning: previous process (pid {}) was still running and is now orphaned",
            first_pid
        );
        if !second.stdout_contains(&warning) {
            return Err(format!(
                "second start did not warn about the orphan:\n{}",
                second.stdout
            ));
        }
        println!("✓ second start warned about pid {}\n", first_pid);

        // Step 3: the record now points at the new process, and both exist
        println!("Step 3: Checking both processes...");
        let second_pid = assert_pid_file_exists(&cli.pid_file())?;
        if second_pid == first_pid {
            return Err(format!("record still holds the first pid {}", first_pid));
        }
        if !pid_is_alive(first_pid) {
            return Err(format!("orphan pid {} should still be running", first_pid));
        }
        if !pid_is_alive(second_pid) {
            return Err(format!("new pid {} is not alive", second_pid));
        }
        println!("✓ record holds {}, orphan {} still runs\n", second_pid, first_pid);

        // The orphan is outside the supervisor's reach, clean it up here
        kill_out_of_band(first_pid);

        Ok(())
    });

    match result {
        Ok(()) => {
            println!("\n========================================");
            println!("✓ TEST PASSED: Double Start");
            println!("========================================\n");
        }
        Err(e) => {
            println!("\n========================================");
            println!("✗ TEST FAILED: Double Start");
            println!("Error: {}", e);
            println!("========================================\n");
            panic!("Test failed: {}", e);
        }
    }
}
