//! Build script for ordinator-runtime
//!
//! Handles configuration merging:
//! 1. Start with library defaults
//! 2. If the `debug-logging` feature is on, flip DEBUG_LOGGING
//! 3. If ORD_CONFIG_RS env var is set, parse user's config file
//! 4. Merge user values over defaults (user wins)
//! 5. Generate OUT_DIR/ord_merged_config.rs
//!
//! User only needs to specify values they want to change.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration parameter definition
struct ConfigParam {
    name: &'static str,
    rust_type: &'static str,
    default_value: &'static str,
}

/// All configuration parameters with their defaults
const CONFIG_PARAMS: &[ConfigParam] = &[
    ConfigParam {
        name: "STACK_SIZE",
        rust_type: "usize",
        default_value: "1024 * 1024", // 1MB
    },
    ConfigParam {
        name: "DEBUG_LOGGING",
        rust_type: "bool",
        default_value: "false",
    },
    ConfigParam {
        name: "AWAIT_SPINS",
        rust_type: "u32",
        default_value: "32",
    },
];

fn main() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest_path = Path::new(&out_dir).join("ord_merged_config.rs");

    let mut config: HashMap<&str, String> = CONFIG_PARAMS
        .iter()
        .map(|p| (p.name, p.default_value.to_string()))
        .collect();

    if env::var_os("CARGO_FEATURE_DEBUG_LOGGING").is_some() {
        config.insert("DEBUG_LOGGING", "true".to_string());
    }

    let user_path = env::var("ORD_CONFIG_RS").ok();
    if let Some(user_path) = &user_path {
        println!("cargo:rerun-if-changed={}", user_path);

        match fs::read_to_string(user_path) {
            Ok(content) => {
                for unknown in parse_and_merge(&content, &mut config) {
                    println!("cargo:warning=Unknown config parameter: {}", unknown);
                }
                println!("cargo:warning=Using custom config: {}", user_path);
            }
            Err(e) => {
                println!(
                    "cargo:warning=Failed to read ORD_CONFIG_RS ({}): {}",
                    user_path, e
                );
            }
        }
    }

    println!("cargo:rerun-if-env-changed=ORD_CONFIG_RS");

    let output = generate_config(&config, user_path.is_some());
    fs::write(&dest_path, output).expect("Failed to write merged config");
}

/// Merge `pub const` lines from a user file into `config`
///
/// Returns the names that are not known parameters.
fn parse_and_merge(content: &str, config: &mut HashMap<&str, String>) -> Vec<String> {
    let mut unknown = Vec::new();

    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with("//") || !line.starts_with("pub const ") {
            continue;
        }

        let Some((name, value)) = parse_const_line(line) else {
            continue;
        };

        match CONFIG_PARAMS.iter().find(|p| p.name == name) {
            Some(param) => {
                config.insert(param.name, value);
            }
            None => unknown.push(name),
        }
    }

    unknown
}

/// Parse `pub const NAME: TYPE = VALUE;` into (name, value)
fn parse_const_line(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix("pub const ")?.trim();

    let colon_pos = rest.find(':')?;
    let name = rest[..colon_pos].trim().to_string();

    let eq_pos = rest.find('=')?;
    let semi_pos = rest.rfind(';').unwrap_or(rest.len());
    if semi_pos <= eq_pos {
        return None;
    }

    let value = rest[eq_pos + 1..semi_pos].trim().to_string();
    if value.is_empty() {
        return None;
    }

    Some((name, value))
}

fn generate_config(config: &HashMap<&str, String>, has_user_file: bool) -> String {
    let mut output = String::new();

    output.push_str("// Auto-generated by build.rs - do not edit\n");
    output.push_str("// Configuration merged from library defaults");
    if has_user_file {
        output.push_str(" and user's ord_config.rs");
    }
    output.push_str("\n\n");

    for param in CONFIG_PARAMS {
        let value = config
            .get(param.name)
            .map(String::as_str)
            .unwrap_or(param.default_value);
        output.push_str(&format!(
            "pub const {}: {} = {};\n",
            param.name, param.rust_type, value
        ));
    }

    output
}
