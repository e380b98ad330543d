use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./demos/if_else.a";

#[test]
fn takes_the_true_branch_and_falls_through() -> Result<(), Box<dyn Error>> {
    check_run(
        "if_else",
        Path::new(SRC_PATH),
        "optimized",
        Expected {
            stdout: "yes\ndone\n",
        },
    )
}
