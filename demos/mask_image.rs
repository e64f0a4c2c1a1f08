//! Mask one image against a single color rule.
//!
//! Usage:
//! ```sh
//! cargo run --example mask_image -- input.png output.png 255,0,0 10
//! ```

use std::env;
use std::process;

use color_key_masking::{masking, ColorRuleSet};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <input> <output> <r,g,b> [tolerance]", args[0]);
        process::exit(1);
    }

    let channels: Vec<u8> = args[3]
        .split(',')
        .map(|c| c.trim().parse().expect("color must be r,g,b"))
        .collect();
    if channels.len() != 3 {
        eprintln!("Error: color must have exactly three channels, e.g. 255,0,0");
        process::exit(1);
    }
    let tolerance = args
        .get(4)
        .map_or(0, |t| t.parse().expect("tolerance must be an integer"));

    let decoded = image::open(&args[1]).expect("failed to load image");
    let source = masking::normalize(decoded).expect("unsupported image layout");

    let mut rules = ColorRuleSet::new();
    rules.add([channels[0], channels[1], channels[2]], tolerance);

    let output = masking::mask_image(&source, &rules);
    output.save(&args[2]).expect("failed to save output");

    println!("Done: wrote {}", args[2]);
}
