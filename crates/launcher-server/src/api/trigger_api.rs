//! `trigger_api.*` handlers: events, manual triggers, schedules and webhooks

use launcher_core::Core;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{bind, parse_params, Result};
use crate::registry::MethodRegistry;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEventParams {
    #[serde(default)]
    event_name: Value,
    #[serde(default)]
    workflow_id: Value,
    #[serde(default)]
    config: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventId {
    #[serde(default)]
    event_id: Value,
    #[serde(default)]
    updates: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FireEventParams {
    #[serde(default)]
    event_name: Value,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct BatchCreateParams {
    #[serde(default)]
    events: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchDeleteParams {
    #[serde(default)]
    event_ids: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleParams {
    #[serde(default)]
    event_id: Value,
    enabled: bool,
}

/// Shared by manual-trigger and webhook creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowConfigParams {
    #[serde(default)]
    workflow_id: Value,
    #[serde(default)]
    config: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TriggerId {
    #[serde(default)]
    trigger_id: Value,
    #[serde(default)]
    updates: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunWorkflowParams {
    #[serde(default)]
    workflow_id: Value,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateScheduleParams {
    #[serde(default)]
    cron_expression: Value,
    #[serde(default)]
    workflow_id: Value,
    #[serde(default)]
    config: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleId {
    #[serde(default)]
    schedule_id: Value,
    #[serde(default)]
    updates: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CronParams {
    #[serde(default)]
    cron_expression: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookId {
    #[serde(default)]
    webhook_id: Value,
    #[serde(default)]
    updates: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookCallParams {
    #[serde(default)]
    workflow_id: Value,
    #[serde(default)]
    payload: Value,
}

// Event listeners

async fn create_event(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let CreateEventParams {
        event_name,
        workflow_id,
        config,
    } = parse_params(params)?;
    Ok(trigger.create_event(event_name, workflow_id, config))
}

async fn delete_event(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let EventId { event_id, .. } = parse_params(params)?;
    Ok(trigger.delete_event(event_id))
}

async fn update_event(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let EventId { event_id, updates } = parse_params(params)?;
    Ok(trigger.update_event(event_id, updates))
}

async fn get_event(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let EventId { event_id, .. } = parse_params(params)?;
    Ok(trigger.get_event(event_id))
}

async fn get_all_events(core: Arc<Core>, _params: Value) -> Result<Value> {
    Ok(core.trigger()?.get_all_events())
}

async fn trigger_event(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let FireEventParams { event_name, data } = parse_params(params)?;
    Ok(trigger.trigger_event(event_name, data))
}

// Bulk event operations

async fn batch_create_events(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let BatchCreateParams { events } = parse_params(params)?;
    Ok(trigger.batch_create_events(&events))
}

async fn batch_delete_events(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let BatchDeleteParams { event_ids } = parse_params(params)?;
    Ok(trigger.batch_delete_events(&event_ids))
}

async fn toggle_event_status(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let ToggleParams { event_id, enabled } = parse_params(params)?;
    Ok(trigger.toggle_event_status(event_id, enabled))
}

async fn event_stats(core: Arc<Core>, _params: Value) -> Result<Value> {
    Ok(core.trigger()?.event_stats())
}

async fn cleanup_expired_events(core: Arc<Core>, _params: Value) -> Result<Value> {
    Ok(core.trigger()?.cleanup_expired_events())
}

// Manual triggers

async fn create_manual_trigger(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let WorkflowConfigParams {
        workflow_id,
        config,
    } = parse_params(params)?;
    Ok(trigger.create_manual_trigger(workflow_id, config))
}

async fn delete_manual_trigger(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let TriggerId { trigger_id, .. } = parse_params(params)?;
    Ok(trigger.delete_manual_trigger(trigger_id))
}

async fn update_manual_trigger(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let TriggerId {
        trigger_id,
        updates,
    } = parse_params(params)?;
    Ok(trigger.update_manual_trigger(trigger_id, updates))
}

async fn get_manual_trigger(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let TriggerId { trigger_id, .. } = parse_params(params)?;
    Ok(trigger.get_manual_trigger(trigger_id))
}

async fn get_all_manual_triggers(core: Arc<Core>, _params: Value) -> Result<Value> {
    Ok(core.trigger()?.get_all_manual_triggers())
}

async fn trigger_workflow(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let RunWorkflowParams { workflow_id, data } = parse_params(params)?;
    Ok(trigger.trigger_workflow(workflow_id, data))
}

// Schedules

async fn create_schedule(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let CreateScheduleParams {
        cron_expression,
        workflow_id,
        config,
    } = parse_params(params)?;
    Ok(trigger.create_schedule(cron_expression, workflow_id, config))
}

async fn delete_schedule(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let ScheduleId { schedule_id, .. } = parse_params(params)?;
    Ok(trigger.delete_schedule(schedule_id))
}

async fn update_schedule(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let ScheduleId {
        schedule_id,
        updates,
    } = parse_params(params)?;
    Ok(trigger.update_schedule(schedule_id, updates))
}

async fn get_schedule(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let ScheduleId { schedule_id, .. } = parse_params(params)?;
    Ok(trigger.get_schedule(schedule_id))
}

async fn get_all_schedules(core: Arc<Core>, _params: Value) -> Result<Value> {
    Ok(core.trigger()?.get_all_schedules())
}

async fn validate_cron_expression(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let CronParams { cron_expression } = parse_params(params)?;
    Ok(trigger.validate_cron_expression(&cron_expression))
}

// Webhooks

async fn create_webhook(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let WorkflowConfigParams {
        workflow_id,
        config,
    } = parse_params(params)?;
    Ok(trigger.create_webhook(workflow_id, config))
}

async fn delete_webhook(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let WebhookId { webhook_id, .. } = parse_params(params)?;
    Ok(trigger.delete_webhook(webhook_id))
}

async fn update_webhook(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let WebhookId {
        webhook_id,
        updates,
    } = parse_params(params)?;
    Ok(trigger.update_webhook(webhook_id, updates))
}

async fn get_webhook(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let WebhookId { webhook_id, .. } = parse_params(params)?;
    Ok(trigger.get_webhook(webhook_id))
}

async fn get_all_webhooks(core: Arc<Core>, _params: Value) -> Result<Value> {
    Ok(core.trigger()?.get_all_webhooks())
}

async fn handle_webhook_call(core: Arc<Core>, params: Value) -> Result<Value> {
    let trigger = core.trigger()?;
    let WebhookCallParams {
        workflow_id,
        payload,
    } = parse_params(params)?;
    Ok(trigger.handle_webhook_call(workflow_id, payload))
}

pub fn register(registry: &mut MethodRegistry, core: &Arc<Core>) {
    registry.register("trigger_api.event.createEvent", bind(core, create_event));
    registry.register("trigger_api.event.deleteEvent", bind(core, delete_event));
    registry.register("trigger_api.event.updateEvent", bind(core, update_event));
    registry.register("trigger_api.event.getEvent", bind(core, get_event));
    registry.register("trigger_api.event.getAllEvents", bind(core, get_all_events));
    registry.register("trigger_api.event.triggerEvent", bind(core, trigger_event));

    registry.register(
        "trigger_api.events.batchCreateEvents",
        bind(core, batch_create_events),
    );
    registry.register(
        "trigger_api.events.batchDeleteEvents",
        bind(core, batch_delete_events),
    );
    registry.register(
        "trigger_api.events.toggleEventStatus",
        bind(core, toggle_event_status),
    );
    registry.register("trigger_api.events.getEventStats", bind(core, event_stats));
    registry.register(
        "trigger_api.events.cleanupExpiredEvents",
        bind(core, cleanup_expired_events),
    );

    registry.register(
        "trigger_api.manual.createManualTrigger",
        bind(core, create_manual_trigger),
    );
    registry.register(
        "trigger_api.manual.deleteManualTrigger",
        bind(core, delete_manual_trigger),
    );
    registry.register(
        "trigger_api.manual.updateManualTrigger",
        bind(core, update_manual_trigger),
    );
    registry.register(
        "trigger_api.manual.getManualTrigger",
        bind(core, get_manual_trigger),
    );
    registry.register(
        "trigger_api.manual.getAllManualTriggers",
        bind(core, get_all_manual_triggers),
    );
    registry.register(
        "trigger_api.manual.triggerWorkflow",
        bind(core, trigger_workflow),
    );

    registry.register("trigger_api.schedule.createSchedule", bind(core, create_schedule));
    registry.register("trigger_api.schedule.deleteSchedule", bind(core, delete_schedule));
    registry.register("trigger_api.schedule.updateSchedule", bind(core, update_schedule));
    registry.register("trigger_api.schedule.getSchedule", bind(core, get_schedule));
    registry.register(
        "trigger_api.schedule.getAllSchedules",
        bind(core, get_all_schedules),
    );
    registry.register(
        "trigger_api.schedule.validateCronExpression",
        bind(core, validate_cron_expression),
    );

    registry.register("trigger_api.webhook.createWebhook", bind(core, create_webhook));
    registry.register("trigger_api.webhook.deleteWebhook", bind(core, delete_webhook));
    registry.register("trigger_api.webhook.updateWebhook", bind(core, update_webhook));
    registry.register("trigger_api.webhook.getWebhook", bind(core, get_webhook));
    registry.register("trigger_api.webhook.getAllWebhooks", bind(core, get_all_webhooks));
    registry.register(
        "trigger_api.webhook.handleWebhookCall",
        bind(core, handle_webhook_call),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use launcher_core::components::{Component, Trigger};
    use launcher_core::models::LauncherConfig;
    use serde_json::json;

    fn registry() -> MethodRegistry {
        let config = LauncherConfig::default();
        let core = Core::new(config.clone());
        core.register_component(Component::Trigger(Arc::new(Trigger::new(
            config.components.trigger.clone(),
        ))));

        let mut registry = MethodRegistry::new();
        register(&mut registry, &Arc::new(core));
        registry
    }

    #[test]
    fn test_registers_every_family() {
        let registry = registry();
        assert_eq!(registry.len(), 29);
        assert!(registry
            .list()
            .iter()
            .all(|name| name.starts_with("trigger_api.")));
    }

    #[tokio::test]
    async fn test_validate_cron_expression() {
        let registry = registry();

        let valid = registry
            .call(
                "trigger_api.schedule.validateCronExpression",
                json!({"cronExpression": "*/5 * * * *"}),
            )
            .await
            .unwrap();
        assert_eq!(valid["valid"], true);

        let invalid = registry
            .call(
                "trigger_api.schedule.validateCronExpression",
                json!({"cronExpression": "* * *"}),
            )
            .await
            .unwrap();
        assert_eq!(invalid["valid"], false);
    }

    #[tokio::test]
    async fn test_webhook_url_uses_workflow_id() {
        let registry = registry();
        let hook = registry
            .call(
                "trigger_api.webhook.createWebhook",
                json!({"workflowId": "wf-1"}),
            )
            .await
            .unwrap();

        assert_eq!(hook["url"], "/api/webhook/wf-1");
        assert_eq!(hook["config"], json!({}));
    }

    #[tokio::test]
    async fn test_batch_delete_counts_ids() {
        let registry = registry();
        let result = registry
            .call(
                "trigger_api.events.batchDeleteEvents",
                json!({"eventIds": [1, 2, 3]}),
            )
            .await
            .unwrap();

        assert_eq!(result["deleted"], 3);
        assert_eq!(result["results"][0]["message"], "Event listener 1 deleted");
    }

    #[tokio::test]
    async fn test_toggle_requires_enabled() {
        let registry = registry();
        let err = registry
            .call("trigger_api.events.toggleEventStatus", json!({"eventId": 1}))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid params"));
    }

    #[tokio::test]
    async fn test_without_trigger_component() {
        let core = Arc::new(Core::new(LauncherConfig::default()));
        let mut registry = MethodRegistry::new();
        register(&mut registry, &core);

        let err = registry
            .call("trigger_api.event.getAllEvents", json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Trigger component not available");
    }
}
