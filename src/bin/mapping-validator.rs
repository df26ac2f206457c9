//! # SCIM Mapping Validator
//!
//! A command-line utility for validating endpoint mapping configuration files
//! before they are deployed.
//!
//! ## Overview
//!
//! Every file is parsed as a `ScimEndpointDescription` and checked against
//! the standard evaluator registry:
//! - JSON syntax and structure
//! - Absolute base location and root group
//! - Mapping kind and attribute type agreement
//! - Data arrays on multi-valued attributes
//! - Selectors of data values and data arrays
//! - Sibling attribute name uniqueness and nesting depth
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin mapping-validator config/endpoint.json
//! cargo run --bin mapping-validator ./config/
//! ```
//!
//! ## Output Examples
//!
//! ```text
//! Validating mapping file: config/endpoint.json
//! ✓ Mapping configuration is valid!
//!
//! Endpoint Summary:
//!   Base location: https://localhost:2443/scim
//!   Root group: /scim
//!   Membership attributes: groups
//!   Schemas: 1
//!     - urn:ietf:params:scim:schemas:core:2.0:User (UserCore, enabled, 11 attributes)
//! ```
//!
//! ```text
//! Validating mapping file: broken.json
//! ❌ urn:example:ext:nicknames: Multi-valued attribute 'nicknames' has no data array in its mapping
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: All files are valid
//! - `1`: One or more files are invalid or could not be read

use scim_mapping::config::{MappingValidator, ScimEndpointDescription, ValidationIssue};
use scim_mapping::evaluation::{
    MappingEvaluatorRegistry, PathExpressionEvaluator, SyntaxValueConverter,
};
use std::env;
use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <mapping-file-or-directory>", args[0]);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} config/endpoint.json", args[0]);
        eprintln!("  {} ./config/", args[0]);
        process::exit(1);
    }

    let values = Arc::new(SyntaxValueConverter::new());
    let registry = MappingEvaluatorRegistry::standard(
        Arc::new(PathExpressionEvaluator::new(values.clone())),
        values,
    );
    let path = Path::new(&args[1]);

    let valid = if path.is_file() {
        validate_single_file(path, &registry)
    } else if path.is_dir() {
        validate_directory(path, &registry)
    } else {
        eprintln!("Error: '{}' is not a valid file or directory", path.display());
        false
    };

    if !valid {
        process::exit(1);
    }
}

fn validate_single_file(file_path: &Path, registry: &MappingEvaluatorRegistry) -> bool {
    println!("Validating mapping file: {}", file_path.display());

    match load_and_validate(file_path, registry) {
        Ok(endpoint) => {
            println!("✓ Mapping configuration is valid!");
            print_endpoint_summary(&endpoint);
            true
        }
        Err(problems) => {
            for problem in problems {
                eprintln!("❌ {}", problem);
            }
            false
        }
    }
}

fn validate_directory(dir_path: &Path, registry: &MappingEvaluatorRegistry) -> bool {
    println!("Validating mapping files in directory: {}", dir_path.display());

    let entries = match fs::read_dir(dir_path) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error reading directory: {}", e);
            return false;
        }
    };

    let mut files: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    files.sort();

    let mut valid_count = 0;
    let mut error_count = 0;

    for path in files {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("\nValidating: {}", file_name);

        match load_and_validate(&path, registry) {
            Ok(endpoint) => {
                println!(
                    "  ✓ Valid - {} ({} schema(s))",
                    endpoint.base_location(),
                    endpoint.schemas().len()
                );
                valid_count += 1;
            }
            Err(problems) => {
                for problem in problems {
                    eprintln!("  ❌ {}", problem);
                }
                error_count += 1;
            }
        }
    }

    println!("\nValidation Summary:");
    println!("  Valid files: {}", valid_count);
    println!("  Invalid files: {}", error_count);

    error_count == 0
}

fn load_and_validate(
    file_path: &Path,
    registry: &MappingEvaluatorRegistry,
) -> Result<ScimEndpointDescription, Vec<String>> {
    let endpoint =
        ScimEndpointDescription::from_json_file(file_path).map_err(|e| vec![e.to_string()])?;

    let issues: Vec<ValidationIssue> = MappingValidator::new(registry).validate_endpoint(&endpoint);
    if issues.is_empty() {
        Ok(endpoint)
    } else {
        Err(issues.iter().map(ToString::to_string).collect())
    }
}

fn print_endpoint_summary(endpoint: &ScimEndpointDescription) {
    println!();
    println!("Endpoint Summary:");
    println!("  Base location: {}", endpoint.base_location());
    println!("  Root group: {}", endpoint.root_group());
    if !endpoint.membership_groups().is_empty() {
        println!("  Membership groups: {}", endpoint.membership_groups().join(", "));
    }
    println!("  Membership attributes: {}", endpoint.membership_attributes().join(", "));
    println!("  Schemas: {}", endpoint.schemas().len());
    for schema in endpoint.schemas() {
        println!(
            "    - {} ({:?}, {}, {} attributes)",
            schema.id,
            schema.schema_type,
            if schema.enabled { "enabled" } else { "disabled" },
            schema.attributes.len()
        );
    }
}
