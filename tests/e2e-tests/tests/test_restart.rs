//! Restart replaces the process
//!
//! `restart` must end with a different pid recorded and the service
//! running, whether or not something was running beforehand.

use e2e_tests::assertions::assert_pid_file_exists;
use e2e_tests::TestExecutor;

#[test]
fn test_restart_replaces_the_process() {
    println!("\n========================================");
    println!("TEST: Restart Replaces the Process");
    println!("========================================\n");

    let executor = TestExecutor::new("restart");

    let result = executor.run_test(&[], |cli| {
        // Step 1: start and note the original pid
        println!("Step 1: Starting testexe...");
        let start = cli.run("start");
        if start.status != Some(0) {
            return Err(format!("start failed: {:?} {}", start.status, start.stderr));
        }
        let first_pid = assert_pid_file_exists(&cli.pid_file())?;
        println!("✓ first incarnation is pid {}\n", first_pid);

        // Step 2: restart
        println!("Step 2: Restarting...");
        let restart = cli.run("restart");
        if restart.status != Some(0) {
            return Err(format!(
                "restart failed: {:?}\nstderr: {}",
                restart.status, restart.stderr
            ));
        }
        if !restart.stdout_contains("restarted 'testexe'") {
            return Err(format!("restart did not report success: {}", restart.stdout));
        }
        println!("✓ restart reported success\n");

        // Step 3: a fresh pid is recorded and running
        println!("Step 3: Checking the new incarnation...");
        let second_pid = assert_pid_file_exists(&cli.pid_file())?;
        if second_pid == first_pid {
            return Err(format!("restart kept the old pid {}", first_pid));
        }
        #[cfg(unix)]
        {
            use e2e_tests::assertions::{pid_is_alive, wait_for_pid_gone};
            use std::time::Duration;

            if !pid_is_alive(second_pid) {
                return Err(format!("new pid {} is not alive", second_pid));
            }
            if !wait_for_pid_gone(first_pid, Duration::from_secs(5)) {
                return Err(format!("old pid {} survived the restart", first_pid));
            }
        }
        let status = cli.run("status");
        if status.status != Some(0) {
            return Err(format!(
                "status after restart should exit 0, got {:?}",
                status.status
            ));
        }
        if !status.stdout_contains(&format!("running (pid {})", second_pid)) {
            return Err(format!("status disagrees with the record: {}", status.stdout));
        }
        println!("✓ pid {} replaced pid {}\n", second_pid, first_pid);

        Ok(())
    });

    match result {
        Ok(()) => {
            println!("\n========================================");
            println!("✓ TEST PASSED: Restart Replaces the Process");
            println!("========================================\n");
        }
        Err(e) => {
            println!("\n========================================");
            println!("✗ TEST FAILED: Restart Replaces the Process");
            println!("Error: {}", e);
            println!("========================================\n");
            panic!("Test failed: {}", e);
        }
    }
}

/// `restart` with nothing recorded degrades to a plain start.
#[test]
fn test_restart_without_record_starts() {
    println!("\n========================================");
    println!("TEST: Restart Without Record");
    println!("========================================\n");

    let executor = TestExecutor::new("restart-cold");

    let result = executor.run_test(&[], |cli| {
        println!("Step 1: Restarting with no record present...");
        let restart = cli.run("restart");
        if restart.status != Some(0) {
            return Err(format!(
                "cold restart failed: {:?}\nstderr: {}",
                restart.status, restart.stderr
            ));
        }
        let pid = assert_pid_file_exists(&cli.pid_file())?;
        if !restart.stdout_contains(&format!("restarted 'testexe' (pid {})", pid)) {
            return Err(format!("restart did not report the new pid: {}", restart.stdout));
        }
        println!("✓ cold restart started pid {}\n", pid);
        Ok(())
    });

    match result {
        Ok(()) => {
            println!("\n========================================");
            println!("✓ TEST PASSED: Restart Without Record");
            println!("========================================\n");
        }
        Err(e) => {
            println!("\n========================================");
            println!("✗ TEST FAILED: Restart Without Record");
            println!("Error: {}", e);
            println!("========================================\n");
            panic!("Test failed: {}", e);
        }
    }
}
