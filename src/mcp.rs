use crate::error::{ToolError, INVALID_PARAMS, METHOD_NOT_FOUND};
use crate::registries::{find_tool_by_path, PROMPT_REGISTRY, RESOURCE_REGISTRY, TOOL_CATALOG, TOOL_REGISTRY};
use crate::state::AppState;
use crate::tools::{base, color, encoding, hash, jwt, morse, password, regex_gen, roman, text, units, utils};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Option<Value>,
    pub id: Option<Value>, // Optional for notifications
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
    pub resources: Option<ResourcesCapability>,
    pub prompts: Option<PromptsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

#[derive(Debug, Serialize)]
pub struct ResourcesCapability {
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
    pub subscribe: bool,
}

#[derive(Debug, Serialize)]
pub struct PromptsCapability {
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Serialize)]
pub struct Resource {
    pub uri: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Prompt {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Option<Vec<PromptArgument>>,
}

#[derive(Debug, Serialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: Option<String>,
    pub required: Option<bool>,
}

fn rpc_error(code: i64, message: &str) -> Value {
    json!({
        "code": code,
        "message": message
    })
}

pub async fn mcp_handler(State(state): State<AppState>, Json(req): Json<JsonRpcRequest>) -> Response {
    info!("MCP request: method={}, id={:?}", req.method, req.id);

    // Handle notifications (no response required)
    if req.id.is_none() {
        return handle_notification(req).await;
    }

    let response = dispatch(&state, req).await;
    (StatusCode::OK, axum::Json(response)).into_response()
}

pub async fn dispatch(state: &AppState, req: JsonRpcRequest) -> JsonRpcResponse {
    let mut response = JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: None,
        id: req.id.clone(),
    };

    let outcome = match req.method.as_str() {
        "initialize" => {
            info!("Handling initialize request");
            let init_result = InitializeResult {
                protocol_version: "2024-11-05".to_string(),
                capabilities: ServerCapabilities {
                    tools: Some(ToolsCapability {
                        list_changed: false,
                    }),
                    resources: Some(ResourcesCapability {
                        list_changed: false,
                        subscribe: false,
                    }),
                    prompts: Some(PromptsCapability {
                        list_changed: false,
                    }),
                },
                server_info: ServerInfo {
                    name: state.config.server_name.clone(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
            };
            to_value(&init_result)
        }
        "tools/list" => {
            info!("Handling tools/list request");
            let tools: Vec<Tool> = TOOL_REGISTRY
                .iter()
                .map(|tool| Tool {
                    name: tool.name.to_string(),
                    description: match tool.path.and_then(find_tool_by_path) {
                        Some(page) => format!("{} (web page: {})", tool.description, page.path),
                        None => tool.description.to_string(),
                    },
                    input_schema: get_tool_schema(tool.name),
                })
                .collect();
            Ok(json!({ "tools": tools }))
        }
        "tools/call" => {
            info!("Handling tools/call request");
            handle_tool_call(req.params, state).await
        }
        "resources/list" => {
            info!("Handling resources/list request");
            let resources: Vec<Resource> = RESOURCE_REGISTRY
                .iter()
                .map(|resource| Resource {
                    uri: resource.uri.to_string(),
                    name: resource.name.to_string(),
                    description: Some(resource.description.to_string()),
                    mime_type: Some(resource.mime_type.to_string()),
                })
                .collect();
            Ok(json!({ "resources": resources }))
        }
        "resources/read" => {
            info!("Handling resources/read request");
            match req
                .params
                .as_ref()
                .and_then(|params| params.get("uri"))
                .and_then(|v| v.as_str())
            {
                Some(uri) => handle_resource_read(uri, state).await,
                None => Err(rpc_error(INVALID_PARAMS, "Invalid params: missing 'uri'")),
            }
        }
        "prompts/list" => {
            info!("Handling prompts/list request");
            let prompts: Vec<Prompt> = PROMPT_REGISTRY
                .iter()
                .map(|prompt| Prompt {
                    name: prompt.name.to_string(),
                    description: Some(prompt.description.to_string()),
                    arguments: Some(
                        prompt
                            .arguments
                            .iter()
                            .map(|arg| PromptArgument {
                                name: arg.name.to_string(),
                                description: Some(arg.description.to_string()),
                                required: Some(arg.required),
                            })
                            .collect(),
                    ),
                })
                .collect();
            Ok(json!({ "prompts": prompts }))
        }
        "prompts/get" => {
            info!("Handling prompts/get request");
            match req.params.as_ref() {
                Some(params) => match params.get("name").and_then(|v| v.as_str()) {
                    Some(name) => handle_prompt_get(name, params.get("arguments")),
                    None => Err(rpc_error(INVALID_PARAMS, "Invalid params: missing 'name'")),
                },
                None => Err(rpc_error(INVALID_PARAMS, "Missing params")),
            }
        }
        _ => {
            error!("Unknown method: {}", req.method);
            Err(rpc_error(METHOD_NOT_FOUND, "Method not found"))
        }
    };

    match outcome {
        Ok(result) => response.result = Some(result),
        Err(error) => response.error = Some(error),
    }
    response
}

async fn handle_notification(req: JsonRpcRequest) -> Response {
    info!("Handling notification: {}", req.method);

    match req.method.as_str() {
        "notifications/initialized" => {
            info!("Client initialized successfully");
        }
        "exit" => {
            info!("Client exiting");
        }
        _ => {
            info!("Unknown notification: {}", req.method);
        }
    }

    // Notifications don't send responses
    StatusCode::NO_CONTENT.into_response()
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, Value> {
    serde_json::to_value(value).map_err(|e| {
        error!("Failed to serialize result: {}", e);
        rpc_error(-32603, "Internal error")
    })
}

fn text_content(text: impl Into<String>) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": text.into()
        }]
    })
}

fn json_content<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ToolError::Malformed(format!("could not render result: {}", e)))?;
    Ok(text_content(text))
}

fn required_str<'a>(arguments: &'a Value, name: &str) -> Result<&'a str, ToolError> {
    arguments
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::MissingArgument(name.to_string()))
}

fn optional_str<'a>(arguments: &'a Value, name: &str) -> Option<&'a str> {
    arguments.get(name).and_then(|v| v.as_str())
}

fn optional_bool(arguments: &Value, name: &str) -> Option<bool> {
    arguments.get(name).and_then(|v| v.as_bool())
}

fn optional_u64(arguments: &Value, name: &str) -> Result<Option<u64>, ToolError> {
    match arguments.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| ToolError::invalid(name, "expected a non-negative integer")),
    }
}

fn optional_u32(arguments: &Value, name: &str) -> Result<Option<u32>, ToolError> {
    optional_u64(arguments, name)?
        .map(|n| u32::try_from(n).map_err(|_| ToolError::invalid(name, "is too large")))
        .transpose()
}

fn required_u32(arguments: &Value, name: &str) -> Result<u32, ToolError> {
    optional_u32(arguments, name)?.ok_or_else(|| ToolError::MissingArgument(name.to_string()))
}

async fn handle_tool_call(params: Option<Value>, state: &AppState) -> Result<Value, Value> {
    let params = params.ok_or_else(|| rpc_error(INVALID_PARAMS, "Missing params"))?;

    let tool_name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| rpc_error(INVALID_PARAMS, "Missing 'name' parameter"))?;

    let empty_args = json!({});
    let arguments = params.get("arguments").unwrap_or(&empty_args);

    call_tool(tool_name, arguments, state).await.map_err(|e| {
        info!("Tool {} failed: {}", tool_name, e);
        e.to_rpc()
    })
}

pub async fn call_tool(tool_name: &str, arguments: &Value, state: &AppState) -> Result<Value, ToolError> {
    match tool_name {
        "search_tools" => {
            let query = optional_str(arguments, "query").unwrap_or("");
            let session = optional_str(arguments, "sessionId");
            let ai_first = optional_bool(arguments, "groupAiFirst").unwrap_or(false);
            let suggestions = state.search(query, session, ai_first).await;
            json_content(&json!({ "query": query, "suggestions": suggestions }))
        }
        "record_ai_suggestion" => {
            state.store.record_ai_suggestion_used().await?;
            let stats = state.store.stats().await;
            Ok(text_content(format!(
                "AI suggestions used {} times",
                stats.ai_suggestion_usage_count
            )))
        }
        "clear_search_history" => {
            state.store.clear_history().await?;
            Ok(text_content("Search history cleared"))
        }
        "roman_numeral" => {
            if let Some(numeral) = optional_str(arguments, "numeral") {
                let value = roman::from_roman(numeral)?;
                Ok(text_content(format!("{} = {}", roman::normalize(numeral), value)))
            } else {
                let number = required_u32(arguments, "number")?;
                Ok(text_content(format!("{} = {}", number, roman::to_roman(number)?)))
            }
        }
        "base_convert" => {
            let value = required_str(arguments, "value")?;
            let from = optional_u32(arguments, "from")?.unwrap_or(10);
            match optional_u32(arguments, "to")? {
                Some(to) => Ok(text_content(base::convert(value, from, to)?)),
                None => json_content(&base::convert_all(value, from)?),
            }
        }
        "color_convert" => {
            let color = required_str(arguments, "color")?;
            json_content(&color::convert_color(color)?)
        }
        "unit_convert" => {
            let value = arguments
                .get("value")
                .and_then(|v| v.as_f64())
                .ok_or_else(|| ToolError::MissingArgument("value".to_string()))?;
            let from = required_str(arguments, "from")?;
            let to = required_str(arguments, "to")?;
            json_content(&units::convert(value, from, to)?)
        }
        "timestamp" => match optional_str(arguments, "time") {
            Some(time) => json_content(&utils::timestamp_info(Some(time))?),
            None => Ok(text_content(format!("Current timestamp: {}", utils::timestamp()))),
        },
        "morse_code" => {
            let input = required_str(arguments, "text")?;
            let mode = optional_str(arguments, "mode").unwrap_or("encode");
            match mode {
                "encode" => Ok(text_content(morse::encode(input)?)),
                "decode" => Ok(text_content(morse::decode(input)?)),
                other => Err(ToolError::invalid("mode", format!("'{}' is not encode or decode", other))),
            }
        }
        "jwt_decode" => {
            let token = required_str(arguments, "token")?;
            json_content(&jwt::decode(token)?)
        }
        "regex_test" => {
            let pattern = required_str(arguments, "pattern")?;
            let input = required_str(arguments, "text")?;
            let flags = optional_str(arguments, "flags").unwrap_or("g");
            json_content(&regex_gen::test_pattern(pattern, flags, input)?)
        }
        "regex_generate" => {
            let template: regex_gen::PatternTemplate = required_str(arguments, "template")?.parse()?;
            let options: regex_gen::GenerateOptions = match arguments.get("options") {
                Some(options) => serde_json::from_value(options.clone())
                    .map_err(|e| ToolError::invalid("options", e.to_string()))?,
                None => regex_gen::GenerateOptions::default(),
            };
            json_content(&regex_gen::generate(template, &options))
        }
        "base64" => {
            let input = required_str(arguments, "text")?;
            let url_safe = optional_bool(arguments, "urlSafe").unwrap_or(false);
            match optional_str(arguments, "mode").unwrap_or("encode") {
                "encode" => Ok(text_content(encoding::base64_encode(input, url_safe))),
                "decode" => Ok(text_content(encoding::base64_decode(input)?)),
                other => Err(ToolError::invalid("mode", format!("'{}' is not encode or decode", other))),
            }
        }
        "url_encode" => {
            let input = required_str(arguments, "text")?;
            match optional_str(arguments, "mode").unwrap_or("encode") {
                "encode" => Ok(text_content(encoding::url_encode(input))),
                "decode" => Ok(text_content(encoding::url_decode(input)?)),
                other => Err(ToolError::invalid("mode", format!("'{}' is not encode or decode", other))),
            }
        }
        "uuid_generate" => {
            let count = match optional_u64(arguments, "count")? {
                Some(n) => usize::try_from(n).map_err(|_| ToolError::invalid("count", "is too large"))?,
                None => 1,
            };
            Ok(text_content(utils::generate_uuids(count)?.join("\n")))
        }
        "text_transform" => {
            let input = required_str(arguments, "text")?;
            let transform = required_str(arguments, "transform")?;
            Ok(text_content(text::text_transform(input, transform)?))
        }
        "text_stats" => {
            let input = required_str(arguments, "text")?;
            json_content(&text::text_stats(input))
        }
        "password_generate" => {
            let options: password::PasswordOptions = serde_json::from_value(arguments.clone())
                .map_err(|e| ToolError::invalid("options", e.to_string()))?;
            json_content(&password::generate(&options)?)
        }
        "hash_generate" => {
            let input = required_str(arguments, "text")?;
            let algorithm: hash::HashAlgorithm = optional_str(arguments, "algorithm")
                .unwrap_or("sha256")
                .parse()?;
            Ok(text_content(hash::digest(input, algorithm)))
        }
        _ => Err(ToolError::UnknownTool(tool_name.to_string())),
    }
}

async fn handle_resource_read(uri: &str, state: &AppState) -> Result<Value, Value> {
    // First check if the resource URI exists in our registry
    let resource = RESOURCE_REGISTRY
        .iter()
        .find(|r| r.uri == uri)
        .ok_or_else(|| rpc_error(-32001, "Resource not found"))?;

    let body = match uri {
        "toolbox://catalog" => serde_json::to_string_pretty(&*TOOL_CATALOG),
        "toolbox://search/history" => serde_json::to_string_pretty(&state.store.recent().await),
        "toolbox://search/stats" => serde_json::to_string_pretty(&state.store.stats().await),
        _ => return Err(rpc_error(-32001, "Resource handler not implemented")),
    }
    .map_err(|e| {
        error!("Failed to read resource {}: {}", uri, e);
        rpc_error(-32001, "Failed to read resource")
    })?;

    Ok(json!({
        "contents": [{
            "uri": uri,
            "mimeType": resource.mime_type,
            "text": body
        }]
    }))
}

fn handle_prompt_get(name: &str, arguments: Option<&Value>) -> Result<Value, Value> {
    // First check if the prompt exists in our registry
    let _prompt = PROMPT_REGISTRY
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| rpc_error(-32003, "Prompt not found"))?;

    match name {
        "find_tool" => {
            let task = arguments
                .and_then(|args| args.get("task"))
                .and_then(|v| v.as_str())
                .unwrap_or("No task provided");

            let catalogue = TOOL_CATALOG
                .iter()
                .map(|t| format!("- {} ({}): {}", t.name, t.category, t.description))
                .collect::<Vec<_>>()
                .join("\n");

            Ok(json!({
                "messages": [{
                    "role": "user",
                    "content": {
                        "type": "text",
                        "text": format!("Which of these tools best fits the task \"{}\"?\n\n{}", task, catalogue)
                    }
                }]
            }))
        }
        "explain_token" => {
            let token = arguments
                .and_then(|args| args.get("token"))
                .and_then(|v| v.as_str())
                .unwrap_or("");

            let decoded = jwt::decode(token).map_err(|e| e.to_rpc())?;
            let rendered = serde_json::to_string_pretty(&decoded)
                .map_err(|_| rpc_error(-32603, "Internal error"))?;

            Ok(json!({
                "messages": [{
                    "role": "user",
                    "content": {
                        "type": "text",
                        "text": format!("Explain what this decoded JSON Web Token grants and whether anything looks wrong:\n\n{}", rendered)
                    }
                }]
            }))
        }
        _ => Err(rpc_error(-32003, "Prompt handler not implemented")),
    }
}

fn get_tool_schema(tool_name: &str) -> Value {
    match tool_name {
        "search_tools" => json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search text; empty returns recent and trending searches" },
                "sessionId": { "type": "string", "description": "Groups keystrokes from one client for history recording" },
                "groupAiFirst": { "type": "boolean", "description": "List keyword-overlap suggestions first" }
            }
        }),
        "record_ai_suggestion" | "clear_search_history" => json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
        "roman_numeral" => json!({
            "type": "object",
            "properties": {
                "number": { "type": "integer", "minimum": 1, "maximum": 3999, "description": "Integer to convert to a numeral" },
                "numeral": { "type": "string", "description": "Roman numeral to convert to an integer" }
            }
        }),
        "base_convert" => json!({
            "type": "object",
            "properties": {
                "value": { "type": "string", "description": "The number to convert" },
                "from": { "type": "integer", "minimum": 2, "maximum": 36, "description": "Base of the input (default 10)" },
                "to": { "type": "integer", "minimum": 2, "maximum": 36, "description": "Target base; omit for binary, octal, decimal and hex" }
            },
            "required": ["value"]
        }),
        "color_convert" => json!({
            "type": "object",
            "properties": {
                "color": { "type": "string", "description": "Hex, rgb(), hsl(), hsv() or cmyk() color" }
            },
            "required": ["color"]
        }),
        "unit_convert" => json!({
            "type": "object",
            "properties": {
                "value": { "type": "number" },
                "from": { "type": "string", "description": "Source unit, e.g. km, lb, C" },
                "to": { "type": "string", "description": "Target unit" }
            },
            "required": ["value", "from", "to"]
        }),
        "timestamp" => json!({
            "type": "object",
            "properties": {
                "time": { "type": "string", "description": "Unix seconds, milliseconds or RFC 3339; omit for now" }
            },
            "additionalProperties": false
        }),
        "morse_code" | "base64" | "url_encode" => json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "The input text" },
                "mode": { "type": "string", "enum": ["encode", "decode"] },
                "urlSafe": { "type": "boolean", "description": "Base64 only: use the URL-safe alphabet" }
            },
            "required": ["text"]
        }),
        "jwt_decode" => json!({
            "type": "object",
            "properties": {
                "token": { "type": "string", "description": "The encoded JWT" }
            },
            "required": ["token"]
        }),
        "regex_test" => json!({
            "type": "object",
            "properties": {
                "pattern": { "type": "string" },
                "text": { "type": "string" },
                "flags": { "type": "string", "description": "Any of g, i, m, s (default g)" }
            },
            "required": ["pattern", "text"]
        }),
        "regex_generate" => json!({
            "type": "object",
            "properties": {
                "template": {
                    "type": "string",
                    "enum": regex_gen::PatternTemplate::all().iter().map(|t| t.as_str()).collect::<Vec<_>>()
                },
                "options": {
                    "type": "object",
                    "properties": {
                        "anchored": { "type": "boolean" },
                        "caseInsensitive": { "type": "boolean" },
                        "global": { "type": "boolean" },
                        "multiline": { "type": "boolean" }
                    }
                }
            },
            "required": ["template"]
        }),
        "uuid_generate" => json!({
            "type": "object",
            "properties": {
                "count": { "type": "integer", "minimum": 1, "maximum": utils::MAX_UUIDS }
            }
        }),
        "text_transform" => json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "The text to transform"
                },
                "transform": {
                    "type": "string",
                    "enum": text::TRANSFORMS,
                    "description": "The transformation to apply"
                }
            },
            "required": ["text", "transform"]
        }),
        "text_stats" => json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "The text to measure" }
            },
            "required": ["text"]
        }),
        "password_generate" => json!({
            "type": "object",
            "properties": {
                "length": { "type": "integer", "minimum": password::MIN_LENGTH, "maximum": password::MAX_LENGTH },
                "uppercase": { "type": "boolean" },
                "lowercase": { "type": "boolean" },
                "digits": { "type": "boolean" },
                "symbols": { "type": "boolean" },
                "excludeAmbiguous": { "type": "boolean" }
            }
        }),
        "hash_generate" => json!({
            "type": "object",
            "properties": {
                "text": { "type": "string" },
                "algorithm": { "type": "string", "enum": ["sha224", "sha256", "sha384", "sha512"] }
            },
            "required": ["text"]
        }),
        _ => json!({
            "type": "object",
            "additionalProperties": true
        }),
    }
}
