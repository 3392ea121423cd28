//! JSON Schema adjustments for the types exposed over MCP.

/// Strips non-standard numeric `format` annotations from JSON Schemas.
///
/// `schemars` emits format values like `"uint64"`, `"int32"` and `"double"` for Rust
/// numeric types. These are not defined by the JSON Schema specification and cause
/// warnings in strict validators such as `ajv`, which several MCP clients use.
pub fn strip_non_standard_format(schema: &mut schemars::Schema) {
    let non_standard = schema
        .get("format")
        .and_then(|v| v.as_str())
        .is_some_and(|f| {
            matches!(
                f,
                "uint8"
                    | "int8"
                    | "uint16"
                    | "int16"
                    | "uint32"
                    | "int32"
                    | "uint64"
                    | "int64"
                    | "uint"
                    | "int"
                    | "float"
                    | "double"
            )
        });
    if non_standard {
        schema.remove("format");
    }
}
