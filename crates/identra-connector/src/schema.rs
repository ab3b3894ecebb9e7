//! Workflow context schema descriptors
//!
//! JSON Schema documents the workflow engine uses to validate contexts
//! before they reach a connector. Connectors may therefore assume well-typed
//! input matching [`crate::types`].

use serde_json::{json, Value};

/// Schema for read-only workflow contexts (show, fetchBatch).
pub fn read_context_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "user": {
                "type": "object",
                "properties": {
                    "email": { "type": "string" }
                }
            },
            "status": {
                "type": "string",
                "enum": ["active", "disabled", "pending"],
                "default": "active"
            },
            "queryOptions": {
                "type": "object",
                "properties": {
                    "page": { "type": "integer", "minimum": 1, "default": 1 },
                    "pageSize": { "type": "integer", "minimum": 1, "default": 20 },
                    "order": { "type": "string", "default": "created_at" }
                }
            }
        }
    })
}

/// Schema for mutating workflow contexts (provision, revoke).
pub fn mutating_context_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "user": {
                "type": "object",
                "properties": {
                    "email": { "type": "string" },
                    // Name is required when creating an account.
                    "name": { "type": "string" },
                    "group": {
                        "type": "object",
                        "properties": {
                            "group_id": { "type": "integer" },
                            "group_name": { "type": "string" }
                        }
                    }
                },
                "required": ["email"]
            }
        },
        "required": ["user"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutating_schema_requires_email() {
        let schema = mutating_context_schema();
        assert_eq!(schema["properties"]["user"]["required"][0], "email");
        assert_eq!(schema["required"][0], "user");
    }

    #[test]
    fn test_read_schema_paging_defaults() {
        let schema = read_context_schema();
        let options = &schema["properties"]["queryOptions"]["properties"];
        assert_eq!(options["page"]["default"], 1);
        assert_eq!(options["pageSize"]["default"], 20);
        assert_eq!(options["order"]["default"], "created_at");
        assert_eq!(schema["properties"]["status"]["default"], "active");
    }
}
