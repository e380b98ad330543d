use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./demos/int_sum.a";

#[test]
fn sums_two_ints_and_prints_result() -> Result<(), Box<dyn Error>> {
    check_run(
        "int_sum",
        Path::new(SRC_PATH),
        "optimized",
        Expected { stdout: "7\n" },
    )
}
