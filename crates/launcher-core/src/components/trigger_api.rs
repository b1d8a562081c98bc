//! Event, manual, schedule and webhook trigger management

use super::trigger::Trigger;
use super::{id_label, merge_updates, millis_id, timestamp};
use serde_json::{json, Value};
use tracing::info;

fn or_empty(value: Value) -> Value {
    if value.is_null() {
        json!({})
    } else {
        value
    }
}

fn removed(what: &str, id: &Value) -> Value {
    json!({
        "success": true,
        "message": format!("{} {} deleted", what, id_label(id)),
    })
}

fn described(id: Value, kind: &str) -> Value {
    json!({
        "id": id,
        "type": kind,
        "status": "active",
        "createdAt": timestamp(),
    })
}

/// Number of fields in a cron expression. Only five-field expressions are accepted.
const CRON_FIELDS: usize = 5;

impl Trigger {
    // Event listeners

    pub fn create_event(&self, event_name: Value, workflow_id: Value, config: Value) -> Value {
        info!("Creating event listener {}", id_label(&event_name));
        json!({
            "id": millis_id(),
            "type": "event",
            "eventName": event_name,
            "workflowId": workflow_id,
            "config": or_empty(config),
            "status": "created",
            "createdAt": timestamp(),
        })
    }

    pub fn delete_event(&self, event_id: Value) -> Value {
        info!("Deleting event listener {}", id_label(&event_id));
        removed("Event listener", &event_id)
    }

    pub fn update_event(&self, event_id: Value, updates: Value) -> Value {
        info!("Updating event listener {}", id_label(&event_id));
        merge_updates(event_id, updates)
    }

    pub fn get_event(&self, event_id: Value) -> Value {
        described(event_id, "event")
    }

    pub fn get_all_events(&self) -> Value {
        json!({ "events": [], "count": 0 })
    }

    pub fn trigger_event(&self, event_name: Value, data: Value) -> Value {
        info!("Firing event {}", id_label(&event_name));
        json!({
            "eventName": event_name,
            "data": or_empty(data),
            "timestamp": timestamp(),
        })
    }

    // Bulk event operations

    /// Each entry may carry `eventName`, `workflowId` and `config`.
    pub fn batch_create_events(&self, events: &[Value]) -> Value {
        let results: Vec<Value> = events
            .iter()
            .map(|event| {
                let field = |name: &str| event.get(name).cloned().unwrap_or(Value::Null);
                self.create_event(field("eventName"), field("workflowId"), field("config"))
            })
            .collect();

        json!({ "success": true, "created": results.len(), "results": results })
    }

    pub fn batch_delete_events(&self, event_ids: &[Value]) -> Value {
        let results: Vec<Value> = event_ids
            .iter()
            .map(|id| self.delete_event(id.clone()))
            .collect();

        json!({ "success": true, "deleted": results.len(), "results": results })
    }

    pub fn toggle_event_status(&self, event_id: Value, enabled: bool) -> Value {
        let status = if enabled { "active" } else { "disabled" };
        self.update_event(event_id, json!({ "enabled": enabled, "status": status }))
    }

    pub fn event_stats(&self) -> Value {
        json!({
            "total": 0,
            "active": 0,
            "disabled": 0,
            "byType": {},
            "lastUpdated": timestamp(),
        })
    }

    pub fn cleanup_expired_events(&self) -> Value {
        json!({
            "success": true,
            "cleaned": 0,
            "message": "Expired event cleanup complete",
        })
    }

    // Manual triggers

    pub fn create_manual_trigger(&self, workflow_id: Value, config: Value) -> Value {
        info!("Creating manual trigger for workflow {}", id_label(&workflow_id));
        json!({
            "id": millis_id(),
            "type": "manual",
            "workflowId": workflow_id,
            "config": or_empty(config),
            "status": "created",
            "createdAt": timestamp(),
        })
    }

    pub fn delete_manual_trigger(&self, trigger_id: Value) -> Value {
        removed("Manual trigger", &trigger_id)
    }

    pub fn update_manual_trigger(&self, trigger_id: Value, updates: Value) -> Value {
        merge_updates(trigger_id, updates)
    }

    pub fn get_manual_trigger(&self, trigger_id: Value) -> Value {
        described(trigger_id, "manual")
    }

    pub fn get_all_manual_triggers(&self) -> Value {
        json!({ "triggers": [], "count": 0 })
    }

    pub fn trigger_workflow(&self, workflow_id: Value, data: Value) -> Value {
        info!("Manually triggering workflow {}", id_label(&workflow_id));
        json!({
            "workflowId": workflow_id,
            "triggerType": "manual",
            "data": or_empty(data),
            "executionId": millis_id(),
            "timestamp": timestamp(),
        })
    }

    // Schedules

    pub fn create_schedule(
        &self,
        cron_expression: Value,
        workflow_id: Value,
        config: Value,
    ) -> Value {
        info!("Creating schedule {}", id_label(&cron_expression));
        json!({
            "id": millis_id(),
            "type": "schedule",
            "cronExpression": cron_expression,
            "workflowId": workflow_id,
            "config": or_empty(config),
            "status": "created",
            "createdAt": timestamp(),
        })
    }

    pub fn delete_schedule(&self, schedule_id: Value) -> Value {
        removed("Schedule", &schedule_id)
    }

    pub fn update_schedule(&self, schedule_id: Value, updates: Value) -> Value {
        merge_updates(schedule_id, updates)
    }

    pub fn get_schedule(&self, schedule_id: Value) -> Value {
        described(schedule_id, "schedule")
    }

    pub fn get_all_schedules(&self) -> Value {
        json!({ "schedules": [], "count": 0 })
    }

    pub fn validate_cron_expression(&self, cron_expression: &str) -> Value {
        json!({
            "valid": cron_expression.split_whitespace().count() == CRON_FIELDS,
            "expression": cron_expression,
        })
    }

    // Webhooks

    pub fn create_webhook(&self, workflow_id: Value, config: Value) -> Value {
        let url = format!("/api/webhook/{}", id_label(&workflow_id));
        info!("Creating webhook {}", url);
        json!({
            "id": millis_id(),
            "type": "webhook",
            "workflowId": workflow_id,
            "config": or_empty(config),
            "url": url,
            "status": "created",
            "createdAt": timestamp(),
        })
    }

    pub fn delete_webhook(&self, webhook_id: Value) -> Value {
        removed("Webhook", &webhook_id)
    }

    pub fn update_webhook(&self, webhook_id: Value, updates: Value) -> Value {
        merge_updates(webhook_id, updates)
    }

    pub fn get_webhook(&self, webhook_id: Value) -> Value {
        described(webhook_id, "webhook")
    }

    pub fn get_all_webhooks(&self) -> Value {
        json!({ "webhooks": [], "count": 0 })
    }

    pub fn handle_webhook_call(&self, workflow_id: Value, payload: Value) -> Value {
        info!("Webhook call for workflow {}", id_label(&workflow_id));
        json!({
            "workflowId": workflow_id,
            "payload": payload,
            "taskId": millis_id(),
            "status": "accepted",
            "timestamp": timestamp(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TriggerConfig;

    fn trigger() -> Trigger {
        Trigger::new(TriggerConfig::default())
    }

    #[test]
    fn test_create_event_defaults_config() {
        let event = trigger().create_event(json!("push"), json!("wf-1"), Value::Null);
        assert_eq!(event["type"], "event");
        assert_eq!(event["eventName"], "push");
        assert_eq!(event["config"], json!({}));
    }

    #[test]
    fn test_batch_operations_count_entries() {
        let t = trigger();
        let created = t.batch_create_events(&[
            json!({ "eventName": "a", "workflowId": "w" }),
            json!({ "eventName": "b" }),
        ]);
        assert_eq!(created["created"], 2);
        assert_eq!(created["results"][1]["eventName"], "b");

        let deleted = t.batch_delete_events(&[json!(1), json!(2), json!(3)]);
        assert_eq!(deleted["deleted"], 3);
        assert_eq!(deleted["results"][2]["message"], "Event listener 3 deleted");
    }

    #[test]
    fn test_toggle_event_status() {
        let t = trigger();
        let off = t.toggle_event_status(json!("e1"), false);
        assert_eq!(off["id"], "e1");
        assert_eq!(off["enabled"], false);
        assert_eq!(off["status"], "disabled");

        assert_eq!(t.toggle_event_status(json!("e1"), true)["status"], "active");
    }

    #[test]
    fn test_validate_cron_expression() {
        let t = trigger();
        assert_eq!(t.validate_cron_expression("*/5 * * * *")["valid"], true);
        assert_eq!(t.validate_cron_expression("0  12 * * 1")["valid"], true);
        assert_eq!(t.validate_cron_expression("* * * *")["valid"], false);
        assert_eq!(t.validate_cron_expression("0 0 * * * *")["valid"], false);
        assert_eq!(t.validate_cron_expression("")["valid"], false);
    }

    #[test]
    fn test_webhook_url_and_call() {
        let t = trigger();
        let hook = t.create_webhook(json!("deploy"), json!({ "secret": "s" }));
        assert_eq!(hook["url"], "/api/webhook/deploy");
        assert_eq!(hook["config"]["secret"], "s");

        let call = t.handle_webhook_call(json!("deploy"), json!({ "ref": "main" }));
        assert_eq!(call["status"], "accepted");
        assert_eq!(call["payload"]["ref"], "main");
    }

    #[test]
    fn test_manual_trigger_workflow() {
        let run = trigger().trigger_workflow(json!(9), json!({ "x": 1 }));
        assert_eq!(run["triggerType"], "manual");
        assert_eq!(run["workflowId"], 9);
        assert!(run["executionId"].is_i64());
    }

    #[test]
    fn test_get_all_shapes() {
        let t = trigger();
        assert_eq!(t.get_all_events()["count"], 0);
        assert_eq!(t.get_all_manual_triggers()["triggers"], json!([]));
        assert_eq!(t.get_all_schedules()["schedules"], json!([]));
        assert_eq!(t.get_all_webhooks()["webhooks"], json!([]));
        assert_eq!(t.event_stats()["byType"], json!({}));
        assert_eq!(t.cleanup_expired_events()["cleaned"], 0);
    }
}
