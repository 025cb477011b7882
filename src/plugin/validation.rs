//! Config validation against a schema.
//!
//! Validates a `serde_json::Value` configuration object against a
//! [`Schema`]: presence of required attributes, value types, declared
//! [`Validator`] constraints, and nested block shapes.

use serde_json::Value;

use crate::plugin::schema::{
    Attribute, AttributeType, Block, BlockNestingMode, Diagnostic, NestedBlock, Schema, Validator,
};

/// Validate a JSON config object against a schema.
///
/// Returns a diagnostic per problem found; an empty list means valid.
/// Computed-only attributes are skipped, optional attributes may be
/// absent or null.
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_block(&schema.block, value, "", &mut diagnostics);
    diagnostics
}

fn validate_block(block: &Block, value: &Value, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return,
        _ => {
            let mut diag = Diagnostic::error("Expected object")
                .with_detail(format!("Got {}", value_type_name(value)));
            if !path.is_empty() {
                diag = diag.with_attribute(path);
            }
            diagnostics.push(diag);
            return;
        }
    };

    for (name, attr) in &block.attributes {
        let attr_path = join_path(path, name);
        validate_attribute(attr, obj.get(name), &attr_path, diagnostics);
    }

    for (name, nested) in &block.blocks {
        let block_path = join_path(path, name);
        validate_nested_block(nested, obj.get(name), &block_path, diagnostics);
    }
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Computed-only attributes are the provider's to fill in.
    if attr.flags.computed && !attr.flags.optional && !attr.flags.required {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_attribute(path),
                );
            }
        }
        Some(v) => {
            let before = diagnostics.len();
            validate_attribute_type(&attr.attr_type, v, path, diagnostics);
            if diagnostics.len() == before {
                for validator in &attr.validators {
                    validate_value(validator, v, path, diagnostics);
                }
            }
        }
    }
}

fn validate_attribute_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        }
        AttributeType::Int64 => {
            if !value.is_i64() && !value.is_u64() {
                diagnostics.push(type_error(path, "int64", value));
            }
        }
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(type_error(path, "bool", value));
            }
        }
        AttributeType::Set(element_type) => {
            if let Some(arr) = value.as_array() {
                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}.{}", path, i);
                    validate_attribute_type(element_type, elem, &elem_path, diagnostics);
                }
            } else {
                diagnostics.push(type_error(path, "set", value));
            }
        }
    }
}

fn validate_value(validator: &Validator, value: &Value, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    match validator {
        Validator::IntOneOf(allowed) => {
            if let Some(i) = value.as_i64() {
                if !allowed.contains(&i) {
                    diagnostics.push(
                        Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                            .with_detail(format!("{} is not one of {:?}", i, allowed))
                            .with_attribute(path),
                    );
                }
            }
        }
        Validator::IntBetween { min, max } => {
            if let Some(i) = value.as_i64() {
                if i < *min || i > *max {
                    diagnostics.push(
                        Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                            .with_detail(format!("{} is not between {} and {}", i, min, max))
                            .with_attribute(path),
                    );
                }
            }
        }
        Validator::StringOneOf(allowed) => {
            if let Some(s) = value.as_str() {
                if !allowed.iter().any(|a| a == s) {
                    diagnostics.push(
                        Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                            .with_detail(format!("'{}' is not one of {:?}", s, allowed))
                            .with_attribute(path),
                    );
                }
            }
        }
    }
}

fn validate_nested_block(
    nested: &NestedBlock,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match nested.nesting_mode {
        BlockNestingMode::Single => match value {
            None | Some(Value::Null) => {
                if nested.min_items > 0 {
                    diagnostics.push(
                        Diagnostic::error(format!("Missing required block '{}'", path))
                            .with_attribute(path),
                    );
                }
            }
            Some(v) => validate_block(&nested.block, v, path, diagnostics),
        },
        BlockNestingMode::List | BlockNestingMode::Set => {
            validate_block_collection(nested, value, path, diagnostics)
        }
    }
}

fn validate_block_collection(
    nested: &NestedBlock,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match value {
        None | Some(Value::Null) => {
            if nested.min_items > 0 {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' requires at least {} item(s)",
                        path, nested.min_items
                    ))
                    .with_attribute(path),
                );
            }
        }
        Some(Value::Array(arr)) => {
            let len = arr.len() as u32;
            if len < nested.min_items {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' requires at least {} item(s), got {}",
                        path, nested.min_items, len
                    ))
                    .with_attribute(path),
                );
            }
            if nested.max_items > 0 && len > nested.max_items {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' allows at most {} item(s), got {}",
                        path, nested.max_items, len
                    ))
                    .with_attribute(path),
                );
            }
            for (i, item) in arr.iter().enumerate() {
                let item_path = format!("{}.{}", path, i);
                validate_block(&nested.block, item, &item_path, diagnostics);
            }
        }
        Some(v) => {
            diagnostics.push(
                Diagnostic::error(format!("Expected list for block '{}'", path))
                    .with_detail(format!("Got {}", value_type_name(v)))
                    .with_attribute(path),
            );
        }
    }
}

fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", base, name)
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic::error(format!("Invalid type for attribute '{}'", path))
        .with_detail(format!("Expected {}, got {}", expected, value_type_name(got)))
        .with_attribute(path)
}
