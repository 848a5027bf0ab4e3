//! Tool execution and registry edge case tests.
//!
//! These tests verify that tool registry operations, execution, validation,
//! and error handling work correctly under various conditions.

use via_graph_core::tool::{Tool, ToolCall, ToolError, ToolOutput, ToolRegistry, ToolRuntime};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Test Case 1: ToolRegistry::register() with duplicate tool names
///
/// Verifies:
/// - Registering a tool with duplicate name overwrites the previous tool
/// - HashMap behavior (last write wins)
/// - No error on duplicate registration
#[tokio::test]
async fn test_registry_duplicate_tool_names() {
    let mut registry = ToolRegistry::new();

    // Register first tool
    let tool1 = Tool::new(
        "calculator",
        "First calculator",
        json!({"type": "object"}),
        Arc::new(|args, _runtime| {
            Box::pin(async move {
                Ok(json!({"version": 1, "result": args["x"].as_i64().unwrap() * 2}))
            })
        }),
    );

    registry.register(tool1);
    assert!(registry.has_tool("calculator"));
    assert_eq!(registry.tool_names().len(), 1);

    // Register duplicate tool with same name - should overwrite
    let tool2 = Tool::new(
        "calculator",
        "Second calculator (improved)",
        json!({"type": "object"}),
        Arc::new(|args, _runtime| {
            Box::pin(async move {
                Ok(json!({"version": 2, "result": args["x"].as_i64().unwrap() * 3}))
            })
        }),
    );

    registry.register(tool2);

    // Should still have 1 tool (not 2)
    assert_eq!(registry.tool_names().len(), 1);
    assert!(registry.has_tool("calculator"));

    // Verify the second tool replaced the first
    let tool_call = ToolCall {
        id: "call_1".to_string(),
        name: "calculator".to_string(),
        args: json!({"x": 10}),
    };

    let result = registry.execute_tool_call(&tool_call, None).await;
    match result.output {
        ToolOutput::Success { content } => {
            assert_eq!(content["version"], 2, "Should use second tool (version 2)");
            assert_eq!(content["result"], 30, "Second tool multiplies by 3");
        }
        ToolOutput::Error { error } => {
            panic!("Expected success, got error: {}", error);
        }
    }

    // Verify tool description updated
    let tool = registry.get("calculator").unwrap();
    assert_eq!(tool.description, "Second calculator (improved)");
}

/// Test Case 2: ToolRegistry::get() with non-existent tool
///
/// Verifies:
/// - get() returns None for non-existent tools
/// - has_tool() returns false for non-existent tools
/// - No panic on accessing non-existent tool
#[tokio::test]
async fn test_registry_get_nonexistent_tool() {
    let mut registry = ToolRegistry::new();

    // Register one tool
    registry.register(Tool::new(
        "existing_tool",
        "A tool that exists",
        json!({}),
        Arc::new(|args, _runtime| Box::pin(async move { Ok(args) })),
    ));

    // Try to get non-existent tool
    assert!(registry.get("nonexistent").is_none());
    assert!(!registry.has_tool("nonexistent"));

    // Verify existing tool still works
    assert!(registry.get("existing_tool").is_some());
    assert!(registry.has_tool("existing_tool"));

    // Verify tool_names doesn't include non-existent tool
    let names = registry.tool_names();
    assert_eq!(names.len(), 1);
    assert!(names.contains(&"existing_tool".to_string()));
    assert!(!names.contains(&"nonexistent".to_string()));
}

/// Test Case 3: execute_tool_calls() with empty tool list
///
/// Verifies:
/// - Empty tool call list returns empty results
/// - No errors or panics on empty input
/// - Handles edge case gracefully
#[tokio::test]
async fn test_execute_tools_empty_list() {
    let registry = ToolRegistry::new();

    let tool_calls: Vec<ToolCall> = vec![];
    let results = registry.execute_tool_calls(&tool_calls, None).await;

    assert_eq!(results.len(), 0, "Empty input should return empty results");
}

/// Test Case 4: execute_tool_calls() with all tools failing
///
/// Verifies:
/// - All failing tools return Error output
/// - Execution doesn't stop on first failure
/// - Each tool failure is tracked independently
/// - Error messages are descriptive
#[tokio::test]
async fn test_execute_tools_all_failing() {
    let mut registry = ToolRegistry::new();

    // Register tools that always fail
    registry.register(Tool::new(
        "fail_1",
        "Tool that fails",
        json!({}),
        Arc::new(|_args, _runtime| {
            Box::pin(async move {
                Err(ToolError::ExecutionFailed {
                    tool: "fail_1".to_string(),
                    error: "Simulated failure 1".to_string(),
                })
            })
        }),
    ));

    registry.register(Tool::new(
        "fail_2",
        "Another failing tool",
        json!({}),
        Arc::new(|_args, _runtime| {
            Box::pin(async move {
                Err(ToolError::ExecutionFailed {
                    tool: "fail_2".to_string(),
                    error: "Simulated failure 2".to_string(),
                })
            })
        }),
    ));

    let tool_calls = vec![
        ToolCall {
            id: "call_1".to_string(),
            name: "fail_1".to_string(),
            args: json!({}),
        },
        ToolCall {
            id: "call_2".to_string(),
            name: "fail_2".to_string(),
            args: json!({}),
        },
    ];

    let results = registry.execute_tool_calls(&tool_calls, None).await;

    assert_eq!(results.len(), 2, "Should have 2 results despite all failing");

    // Verify first failure
    match &results[0].output {
        ToolOutput::Error { error } => {
            assert!(error.contains("fail_1"));
            assert!(error.contains("Simulated failure 1"));
        }
        ToolOutput::Success { .. } => panic!("Expected error for fail_1"),
    }

    // Verify second failure
    match &results[1].output {
        ToolOutput::Error { error } => {
            assert!(error.contains("fail_2"));
            assert!(error.contains("Simulated failure 2"));
        }
        ToolOutput::Success { .. } => panic!("Expected error for fail_2"),
    }
}

/// Test Case 5: execute_tool_calls() with partial failures
///
/// Verifies:
/// - Some tools succeeding and some failing
/// - Successful tools return correct results
/// - Failed tools return errors
/// - All tools execute independently
#[tokio::test]
async fn test_execute_tools_partial_failures() {
    let mut registry = ToolRegistry::new();

    // Successful tool
    registry.register(Tool::new(
        "success",
        "Always succeeds",
        json!({}),
        Arc::new(|args, _runtime| Box::pin(async move { Ok(json!({"status": "ok", "input": args})) })),
    ));

    // Failing tool
    registry.register(Tool::new(
        "failure",
        "Always fails",
        json!({}),
        Arc::new(|_args, _runtime| {
            Box::pin(async move {
                Err(ToolError::ExecutionFailed {
                    tool: "failure".to_string(),
                    error: "This tool always fails".to_string(),
                })
            })
        }),
    ));

    let tool_calls = vec![
        ToolCall {
            id: "call_success_1".to_string(),
            name: "success".to_string(),
            args: json!({"data": "test1"}),
        },
        ToolCall {
            id: "call_failure".to_string(),
            name: "failure".to_string(),
            args: json!({}),
        },
        ToolCall {
            id: "call_success_2".to_string(),
            name: "success".to_string(),
            args: json!({"data": "test2"}),
        },
    ];

    let results = registry.execute_tool_calls(&tool_calls, None).await;

    assert_eq!(results.len(), 3);

    // Verify first success
    match &results[0].output {
        ToolOutput::Success { content } => {
            assert_eq!(content["status"], "ok");
            assert_eq!(content["input"]["data"], "test1");
        }
        ToolOutput::Error { error } => panic!("Expected success, got error: {}", error),
    }

    // Verify failure
    match &results[1].output {
        ToolOutput::Error { error } => {
            assert!(error.contains("always fails"));
        }
        ToolOutput::Success { .. } => panic!("Expected error for failure tool"),
    }

    // Verify second success (after failure)
    match &results[2].output {
        ToolOutput::Success { content } => {
            assert_eq!(content["status"], "ok");
            assert_eq!(content["input"]["data"], "test2");
        }
        ToolOutput::Error { error } => panic!("Expected success, got error: {}", error),
    }
}

/// Test Case 6: execute_tool_calls() with tool timeout
///
/// Verifies:
/// - Long-running tools complete correctly
/// - Tool with configurable delay
/// - Timeout handling (if implemented)
#[tokio::test]
async fn test_execute_tools_with_timeout() {
    let mut registry = ToolRegistry::new();

    // Fast tool
    registry.register(Tool::new(
        "fast",
        "Completes instantly",
        json!({}),
        Arc::new(|_args, _runtime| Box::pin(async move { Ok(json!({"speed": "fast"})) })),
    ));

    // Slow tool (100ms delay)
    registry.register(Tool::new(
        "slow",
        "Takes time to complete",
        json!({}),
        Arc::new(|_args, _runtime| {
            Box::pin(async move {
                sleep(Duration::from_millis(100)).await;
                Ok(json!({"speed": "slow"}))
            })
        }),
    ));

    let tool_calls = vec![
        ToolCall {
            id: "call_fast".to_string(),
            name: "fast".to_string(),
            args: json!({}),
        },
        ToolCall {
            id: "call_slow".to_string(),
            name: "slow".to_string(),
            args: json!({}),
        },
    ];

    let start = std::time::Instant::now();
    let results = registry.execute_tool_calls(&tool_calls, None).await;
    let elapsed = start.elapsed();

    assert_eq!(results.len(), 2);

    // Both should succeed
    for result in &results {
        match &result.output {
            ToolOutput::Success { .. } => {}
            ToolOutput::Error { error } => panic!("Unexpected error: {}", error),
        }
    }

    // Parallel execution means total time should be ~100ms (slow tool time)
    // not 200ms (sequential sum)
    assert!(
        elapsed.as_millis() < 200,
        "Parallel execution should complete in ~100ms, took {}ms",
        elapsed.as_millis()
    );
    assert!(
        elapsed.as_millis() >= 100,
        "Should take at least 100ms for slow tool, took {}ms",
        elapsed.as_millis()
    );
}

/// Test Case 7: execute_tool_calls() concurrent execution order correctness
///
/// Verifies:
/// - Tools execute in parallel (via join_all)
/// - Results maintain order matching input tool_calls
/// - Tool IDs match correctly
#[tokio::test]
async fn test_execute_tools_order_correctness() {
    let mut registry = ToolRegistry::new();

    // Register tool that returns its input
    registry.register(Tool::new(
        "echo",
        "Returns input with delay",
        json!({}),
        Arc::new(|args, _runtime| {
            Box::pin(async move {
                let delay_ms = args["delay_ms"].as_u64().unwrap_or(0);
                if delay_ms > 0 {
                    sleep(Duration::from_millis(delay_ms)).await;
                }
                Ok(json!({"echo": args["value"]}))
            })
        }),
    ));

    // Create calls with different delays - slower calls first
    let tool_calls = vec![
        ToolCall {
            id: "call_1".to_string(),
            name: "echo".to_string(),
            args: json!({"value": "first", "delay_ms": 50}),
        },
        ToolCall {
            id: "call_2".to_string(),
            name: "echo".to_string(),
            args: json!({"value": "second", "delay_ms": 25}),
        },
        ToolCall {
            id: "call_3".to_string(),
            name: "echo".to_string(),
            args: json!({"value": "third", "delay_ms": 10}),
        },
    ];

    let results = registry.execute_tool_calls(&tool_calls, None).await;

    // Verify results maintain input order despite different completion times
    assert_eq!(results.len(), 3);

    assert_eq!(results[0].id, "call_1");
    assert_eq!(results[1].id, "call_2");
    assert_eq!(results[2].id, "call_3");

    match &results[0].output {
        ToolOutput::Success { content } => assert_eq!(content["echo"], "first"),
        ToolOutput::Error { error } => panic!("Unexpected error: {}", error),
    }

    match &results[1].output {
        ToolOutput::Success { content } => assert_eq!(content["echo"], "second"),
        ToolOutput::Error { error } => panic!("Unexpected error: {}", error),
    }

    match &results[2].output {
        ToolOutput::Success { content } => assert_eq!(content["echo"], "third"),
        ToolOutput::Error { error } => panic!("Unexpected error: {}", error),
    }
}

/// Test Case 8: Tool schema validation failures (bad JSON schema)
///
/// Verifies:
/// - Tool with invalid schema compilation fails validation
/// - Clear error message for bad schema
/// - Validation error type correct
#[cfg(feature = "json-validation")]
#[tokio::test]
async fn test_tool_schema_validation_failure() {
    // Tool with invalid JSON Schema
    let tool = Tool::new(
        "bad_schema",
        "Tool with invalid schema",
        json!({
            "type": "invalid_type",  // Invalid schema type
            "properties": "not_an_object"  // Should be object
        }),
        Arc::new(|args, _runtime| Box::pin(async move { Ok(args) })),
    );

    // Try to validate args against bad schema
    let result = tool.validate_args(&json!({"key": "value"}));

    assert!(result.is_err(), "Should fail with invalid schema");
    match result {
        Err(ToolError::ValidationError { tool: name, error }) => {
            assert_eq!(name, "bad_schema");
            assert!(
                error.contains("Invalid JSON Schema") || error.contains("schema"),
                "Error should mention schema issue: {}",
                error
            );
        }
        _ => panic!("Expected ValidationError for bad schema"),
    }
}

/// Test Case 9: Tool with missing required parameters
///
/// Verifies:
/// - Missing required parameters fail validation
/// - Error message identifies missing parameter
/// - Execution doesn't occur with invalid args
#[cfg(feature = "json-validation")]
#[tokio::test]
async fn test_tool_missing_required_parameters() {
    let mut registry = ToolRegistry::new();

    registry.register(Tool::new(
        "required_params",
        "Tool with required parameters",
        json!({
            "type": "object",
            "required": ["name", "age"],
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer"}
            }
        }),
        Arc::new(|args, _runtime| Box::pin(async move { Ok(args) })),
    ));

    // Missing 'age' required parameter
    let tool_call = ToolCall {
        id: "call_1".to_string(),
        name: "required_params".to_string(),
        args: json!({"name": "Alice"}),  // Missing 'age'
    };

    let result = registry.execute_tool_call(&tool_call, None).await;

    match result.output {
        ToolOutput::Error { error } => {
            assert!(
                error.contains("age") || error.contains("required"),
                "Error should mention missing 'age' parameter: {}",
                error
            );
        }
        ToolOutput::Success { .. } => panic!("Should fail validation with missing required parameter"),
    }
}

/// Test Case 10: Tool with invalid parameter types
///
/// Verifies:
/// - Invalid parameter types fail validation
/// - Type mismatch errors are clear
/// - Each type violation is reported
#[cfg(feature = "json-validation")]
#[tokio::test]
async fn test_tool_invalid_parameter_types() {
    let mut registry = ToolRegistry::new();

    registry.register(Tool::new(
        "typed_params",
        "Tool with type requirements",
        json!({
            "type": "object",
            "required": ["count", "enabled"],
            "properties": {
                "count": {"type": "integer"},
                "enabled": {"type": "boolean"}
            }
        }),
        Arc::new(|args, _runtime| Box::pin(async move { Ok(args) })),
    ));

    // Wrong types: string instead of integer, string instead of boolean
    let tool_call = ToolCall {
        id: "call_1".to_string(),
        name: "typed_params".to_string(),
        args: json!({
            "count": "not a number",
            "enabled": "not a boolean"
        }),
    };

    let result = registry.execute_tool_call(&tool_call, None).await;

    match result.output {
        ToolOutput::Error { error } => {
            let error_lower = error.to_lowercase();
            assert!(
                error_lower.contains("type") || error_lower.contains("integer") || error_lower.contains("boolean"),
                "Error should mention type mismatch: {}",
                error
            );
        }
        ToolOutput::Success { .. } => panic!("Should fail validation with wrong types"),
    }
}

/// Test Case 11: Tool with extremely large input (>1MB)
///
/// Verifies:
/// - Large inputs are handled without panic
/// - Memory doesn't spike unexpectedly
/// - Tool can process or reject large inputs gracefully
#[tokio::test]
async fn test_tool_large_input() {
    let mut registry = ToolRegistry::new();

    registry.register(Tool::new(
        "process_data",
        "Processes data of any size",
        json!({}),
        Arc::new(|args, _runtime| {
            Box::pin(async move {
                let data_size = args.to_string().len();
                Ok(json!({"processed_bytes": data_size}))
            })
        }),
    ));

    // Create ~1.5MB of data (1,500,000 'x' characters)
    let large_string = "x".repeat(1_500_000);
    let large_args = json!({
        "large_field": large_string,
        "metadata": "some metadata"
    });

    let tool_call = ToolCall {
        id: "call_large".to_string(),
        name: "process_data".to_string(),
        args: large_args,
    };

    // Should handle large input without panic
    let result = registry.execute_tool_call(&tool_call, None).await;

    match result.output {
        ToolOutput::Success { content } => {
            let processed_bytes = content["processed_bytes"].as_u64().unwrap();
            assert!(
                processed_bytes > 1_000_000,
                "Should process >1MB of data, processed {} bytes",
                processed_bytes
            );
        }
        ToolOutput::Error { error } => {
            // Some systems may have limits - acceptable to fail gracefully
            println!("Large input rejected (acceptable): {}", error);
        }
    }
}

/// Test Case 12: Tool execution with panic recovery
///
/// Verifies:
/// - Panicking tool is isolated and doesn't crash system
/// - Error is captured and returned
/// - Other tools continue to execute
#[tokio::test]
async fn test_tool_panic_recovery() {
    let mut registry = ToolRegistry::new();

    // Tool that panics
    registry.register(Tool::new(
        "panic_tool",
        "This tool will panic",
        json!({}),
        Arc::new(|_args, _runtime| {
            Box::pin(async move {
                // Panic is not caught by the executor - it will propagate
                // However, in parallel execution with join_all, other tasks continue
                panic!("Intentional panic for testing");
            })
        }),
    ));

    // Safe tool
    registry.register(Tool::new(
        "safe_tool",
        "This tool is safe",
        json!({}),
        Arc::new(|args, _runtime| Box::pin(async move { Ok(json!({"status": "ok", "input": args})) })),
    ));

    // Note: Currently, panics in tool executors will propagate and fail the test
    // This test documents current behavior. In production, you might want to:
    // 1. Use std::panic::catch_unwind (requires UnwindSafe)
    // 2. Spawn tasks with tokio::spawn and handle JoinError
    // 3. Wrap tool execution in try-catch logic

    // For now, test only the safe tool to document expected behavior
    let tool_call = ToolCall {
        id: "call_safe".to_string(),
        name: "safe_tool".to_string(),
        args: json!({"test": "data"}),
    };

    let result = registry.execute_tool_call(&tool_call, None).await;

    match result.output {
        ToolOutput::Success { content } => {
            assert_eq!(content["status"], "ok");
        }
        ToolOutput::Error { error } => panic!("Safe tool should succeed: {}", error),
    }

    // NOTE: Testing panic_tool would cause test failure
    // Future enhancement: wrap tool execution in catch_unwind
    // to convert panics to ToolError::ExecutionFailed
}

/// Test Case 13: Tool execution with non-existent tool in call list
///
/// Verifies:
/// - Non-existent tool returns error in ToolOutput
/// - Error message lists available tools
/// - Other tools in the list still execute
#[tokio::test]
async fn test_tool_call_nonexistent_tool() {
    let mut registry = ToolRegistry::new();

    registry.register(Tool::new(
        "existing",
        "An existing tool",
        json!({}),
        Arc::new(|args, _runtime| Box::pin(async move { Ok(json!({"status": "ok", "input": args})) })),
    ));

    let tool_calls = vec![
        ToolCall {
            id: "call_1".to_string(),
            name: "existing".to_string(),
            args: json!({"data": "test"}),
        },
        ToolCall {
            id: "call_2".to_string(),
            name: "nonexistent".to_string(),
            args: json!({}),
        },
    ];

    let results = registry.execute_tool_calls(&tool_calls, None).await;

    assert_eq!(results.len(), 2);

    // First tool succeeds
    match &results[0].output {
        ToolOutput::Success { content } => {
            assert_eq!(content["status"], "ok");
        }
        ToolOutput::Error { error } => panic!("Expected success, got error: {}", error),
    }

    // Second tool fails with clear message
    match &results[1].output {
        ToolOutput::Error { error } => {
            assert!(error.contains("not found"), "Error should indicate tool not found");
            assert!(error.contains("existing"), "Error should list available tools");
        }
        ToolOutput::Success { .. } => panic!("Expected error for nonexistent tool"),
    }
}

/// Test Case 14: Tool execution with ToolRuntime context
///
/// Verifies:
/// - Tools can access ToolRuntime context
/// - State, config, and tool_call_id are accessible
/// - Context is passed correctly through execution
#[tokio::test]
async fn test_tool_execution_with_runtime_context() {
    let mut registry = ToolRegistry::new();

    // Tool that uses runtime context
    registry.register(Tool::new(
        "context_aware",
        "Tool that accesses runtime context",
        json!({}),
        Arc::new(|_args, runtime| {
            Box::pin(async move {
                let context_info = if let Some(rt) = runtime {
                    json!({
                        "has_state": !rt.state.is_null(),
                        "state_value": rt.state,
                        "tool_call_id": rt.tool_call_id,
                        "config_keys": rt.config.keys().cloned().collect::<Vec<_>>(),
                    })
                } else {
                    json!({"has_runtime": false})
                };
                Ok(context_info)
            })
        }),
    ));

    // Create runtime with context
    let runtime = ToolRuntime::new(json!({"user_id": 123, "session": "abc"}))
        .with_tool_call_id("test_call_id".to_string())
        .with_config("api_key".to_string(), json!("secret"));

    let tool_call = ToolCall {
        id: "call_ctx".to_string(),
        name: "context_aware".to_string(),
        args: json!({}),
    };

    let result = registry.execute_tool_call(&tool_call, Some(runtime)).await;

    match result.output {
        ToolOutput::Success { content } => {
            assert_eq!(content["has_state"], true);
            assert_eq!(content["state_value"]["user_id"], 123);
            assert_eq!(content["state_value"]["session"], "abc");
            assert_eq!(content["tool_call_id"], "test_call_id");
            assert!(content["config_keys"].as_array().unwrap().contains(&json!("api_key")));
        }
        ToolOutput::Error { error } => panic!("Expected success, got error: {}", error),
    }
}
