use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./demos/list_append.a";

#[test]
fn appends_to_a_list_and_indexes_it() -> Result<(), Box<dyn Error>> {
    check_run(
        "list_append",
        Path::new(SRC_PATH),
        "optimized",
        Expected { stdout: "20\n" },
    )
}
