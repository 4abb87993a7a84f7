use std::path::PathBuf;

use crate::cli::StewardCli;
use crate::{cleanup_test_dir, create_test_dir, steward_path, testexe_path, write_config};

/// High-level test executor that manages the entire test lifecycle
pub struct TestExecutor {
    pub test_name: String,
    pub test_dir: PathBuf,
    pub steward_path: PathBuf,
    pub testexe_path: PathBuf,
}

impl TestExecutor {
    /// Create a new test executor
    pub fn new(test_name: &str) -> Self {
        let test_dir = create_test_dir(test_name);
        let steward = steward_path();
        let testexe = testexe_path();

        println!("=== Test Executor Setup ===");
        println!("Test: {}", test_name);
        println!("Test dir: {}", test_dir.display());
        println!("STEWARD: {}", steward.display());
        println!("TESTEXE: {}", testexe.display());
        println!("===========================\n");

        Self {
            test_name: test_name.to_string(),
            test_dir,
            steward_path: steward,
            testexe_path: testexe,
        }
    }

    /// Run a test scenario against a config that passes `extra_args` to testexe
    pub fn run_test<F>(&self, extra_args: &[&str], test_fn: F) -> Result<(), String>
    where
        F: FnOnce(&StewardCli) -> Result<(), String>,
    {
        let config_path = write_config(&self.test_dir, &self.testexe_path, extra_args);
        let cli = StewardCli::new(
            self.steward_path.clone(),
            config_path,
            self.test_dir.clone(),
        );

        let result = test_fn(&cli);

        // Whatever the scenario left running must not outlive the test.
        // `stop` with no record is a no-op, so this is safe unconditionally.
        let _ = cli.run("stop");

        result
    }

    /// Cleanup test directory
    pub fn cleanup(&self) {
        cleanup_test_dir(&self.test_dir);
    }
}

impl Drop for TestExecutor {
    fn drop(&mut self) {
        // Auto-cleanup in tests (but keep for debugging if test panics)
        if !std::thread::panicking() {
            self.cleanup();
        } else {
            println!(
                "Test panicked, keeping test directory for debugging: {}",
                self.test_dir.display()
            );
        }
    }
}
