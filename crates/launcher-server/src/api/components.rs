//! Container, script, trigger, workflow and persistence handlers

use launcher_core::Core;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{parse_params, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContainerId {
    #[serde(default)]
    container_id: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteParams {
    script_path: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScriptId {
    #[serde(default)]
    script_id: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggerId {
    #[serde(default)]
    trigger_id: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowId {
    #[serde(default)]
    workflow_id: Value,
}

#[derive(Debug, Deserialize)]
struct KeyParams {
    key: String,
}

#[derive(Debug, Deserialize)]
struct SaveParams {
    key: String,
    #[serde(default)]
    data: Value,
}

// Container

pub async fn container_create(core: Arc<Core>, params: Value) -> Result<Value> {
    Ok(core.container()?.create(&params))
}

pub async fn container_start(core: Arc<Core>, params: Value) -> Result<Value> {
    let container = core.container()?;
    let ContainerId { container_id } = parse_params(params)?;
    Ok(container.start(container_id))
}

pub async fn container_stop(core: Arc<Core>, params: Value) -> Result<Value> {
    let container = core.container()?;
    let ContainerId { container_id } = parse_params(params)?;
    Ok(container.stop(container_id))
}

pub async fn container_remove(core: Arc<Core>, params: Value) -> Result<Value> {
    let container = core.container()?;
    let ContainerId { container_id } = parse_params(params)?;
    Ok(container.remove(container_id))
}

pub async fn container_list(core: Arc<Core>, _params: Value) -> Result<Value> {
    Ok(core.container()?.list())
}

// Script

pub async fn script_execute(core: Arc<Core>, params: Value) -> Result<Value> {
    let script = core.script()?;
    let ExecuteParams { script_path, args } = parse_params(params)?;
    Ok(script.execute(&script_path, args))
}

pub async fn script_list(core: Arc<Core>, _params: Value) -> Result<Value> {
    Ok(core.script()?.list())
}

pub async fn script_get_status(core: Arc<Core>, params: Value) -> Result<Value> {
    let script = core.script()?;
    let ScriptId { script_id } = parse_params(params)?;
    Ok(script.status(script_id))
}

// Trigger

pub async fn trigger_create(core: Arc<Core>, params: Value) -> Result<Value> {
    Ok(core.trigger()?.create(&params))
}

pub async fn trigger_start(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let TriggerId { trigger_id } = parse_params(params)?;
    Ok(trigger.start(trigger_id))
}

pub async fn trigger_stop(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let TriggerId { trigger_id } = parse_params(params)?;
    Ok(trigger.stop(trigger_id))
}

pub async fn trigger_list(core: Arc<Core>, _params: Value) -> Result<Value> {
    Ok(core.trigger()?.list())
}

// Workflow

pub async fn workflow_create(core: Arc<Core>, params: Value) -> Result<Value> {
    Ok(core.workflow()?.create(&params))
}

pub async fn workflow_start(core: Arc<Core>, params: Value) -> Result<Value> {
    let workflow = core.workflow()?;
    let WorkflowId { workflow_id } = parse_params(params)?;
    Ok(workflow.start(workflow_id))
}

pub async fn workflow_stop(core: Arc<Core>, params: Value) -> Result<Value> {
    let workflow = core.workflow()?;
    let WorkflowId { workflow_id } = parse_params(params)?;
    Ok(workflow.stop(workflow_id))
}

pub async fn workflow_list(core: Arc<Core>, _params: Value) -> Result<Value> {
    Ok(core.workflow()?.list())
}

// Persistence

pub async fn persistence_save(core: Arc<Core>, params: Value) -> Result<Value> {
    let persistence = core.persistence()?;
    let SaveParams { key, data } = parse_params(params)?;
    Ok(Value::Bool(persistence.save(&key, data)))
}

pub async fn persistence_load(core: Arc<Core>, params: Value) -> Result<Value> {
    let persistence = core.persistence()?;
    let KeyParams { key } = parse_params(params)?;
    Ok(persistence.load(&key).unwrap_or(Value::Null))
}

pub async fn persistence_delete(core: Arc<Core>, params: Value) -> Result<Value> {
    let persistence = core.persistence()?;
    let KeyParams { key } = parse_params(params)?;
    Ok(Value::Bool(persistence.delete(&key)))
}
