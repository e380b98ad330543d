use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./demos/dict_roundtrip.a";

#[test]
fn iterates_dict_keys_in_insertion_order() -> Result<(), Box<dyn Error>> {
    check_run(
        "dict_roundtrip",
        Path::new(SRC_PATH),
        "optimized",
        Expected { stdout: "a\nb\n" },
    )
}
