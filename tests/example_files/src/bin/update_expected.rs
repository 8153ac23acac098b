use std::fs::File;
use std::io::Write;

use example_files::{parse_expected_toml, summarized_examples_iter, ExpectedEntry, EXPECTED_TOML_PATH};

fn main() {
    let mut expected = parse_expected_toml();

    println!("iterating over example files");

    for (key, output_enum) in summarized_examples_iter() {
        println!("{key}");

        let comment = if let Some(existing_entry) = expected.get(&key) {
            if existing_entry.output_enum == output_enum {
                continue;
            }
            existing_entry.comment.clone()
        } else {
            "".to_string()
        };

        expected.insert(
            key,
            ExpectedEntry {
                comment,
                output_enum,
            },
        );
    }

    let serialized = toml::to_string_pretty(&expected).unwrap();
    let mut output_file = File::create(&*EXPECTED_TOML_PATH).unwrap();
    write!(output_file, "{}", &serialized).unwrap();
}
