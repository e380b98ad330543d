use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./demos/string_for_in.a";

#[test]
fn iterates_a_string_by_character_code() -> Result<(), Box<dyn Error>> {
    check_run(
        "string_for_in",
        Path::new(SRC_PATH),
        "optimized",
        Expected {
            stdout: "97\n98\n99\n",
        },
    )
}
