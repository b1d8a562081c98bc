//! Trigger management mode: `event`, `events`, `manual`, `schedule` and `webhook` commands

use serde_json::{json, Map, Value};

use crate::command::{tokenize, ParseError};

#[derive(Debug, Clone, Copy)]
enum Arg {
    /// Required plain string.
    Text(&'static str),
    /// Required JSON document.
    Json(&'static str),
    /// JSON document, `{}` when omitted.
    OptJson(&'static str),
    /// `true` when the token is exactly "true".
    Flag(&'static str),
}

struct Action {
    family: &'static str,
    name: &'static str,
    method: &'static str,
    usage: &'static str,
    args: &'static [Arg],
}

use Arg::{Flag, Json, OptJson, Text};

const ACTIONS: &[Action] = &[
    // Event listeners
    Action {
        family: "event",
        name: "create",
        method: "trigger_api.event.createEvent",
        usage: "event create <eventName> <workflowId> [config]",
        args: &[Text("eventName"), Text("workflowId"), OptJson("config")],
    },
    Action {
        family: "event",
        name: "delete",
        method: "trigger_api.event.deleteEvent",
        usage: "event delete <eventId>",
        args: &[Text("eventId")],
    },
    Action {
        family: "event",
        name: "update",
        method: "trigger_api.event.updateEvent",
        usage: "event update <eventId> <updates>",
        args: &[Text("eventId"), Json("updates")],
    },
    Action {
        family: "event",
        name: "get",
        method: "trigger_api.event.getEvent",
        usage: "event get <eventId>",
        args: &[Text("eventId")],
    },
    Action {
        family: "event",
        name: "list",
        method: "trigger_api.event.getAllEvents",
        usage: "event list",
        args: &[],
    },
    Action {
        family: "event",
        name: "trigger",
        method: "trigger_api.event.triggerEvent",
        usage: "event trigger <eventName> [data]",
        args: &[Text("eventName"), OptJson("data")],
    },
    // Bulk event operations
    Action {
        family: "events",
        name: "batch-create",
        method: "trigger_api.events.batchCreateEvents",
        usage: "events batch-create <eventsJson>",
        args: &[Json("events")],
    },
    Action {
        family: "events",
        name: "batch-delete",
        method: "trigger_api.events.batchDeleteEvents",
        usage: "events batch-delete <eventIdsJson>",
        args: &[Json("eventIds")],
    },
    Action {
        family: "events",
        name: "toggle",
        method: "trigger_api.events.toggleEventStatus",
        usage: "events toggle <eventId> <true|false>",
        args: &[Text("eventId"), Flag("enabled")],
    },
    Action {
        family: "events",
        name: "stats",
        method: "trigger_api.events.getEventStats",
        usage: "events stats",
        args: &[],
    },
    Action {
        family: "events",
        name: "cleanup",
        method: "trigger_api.events.cleanupExpiredEvents",
        usage: "events cleanup",
        args: &[],
    },
    // Manual triggers
    Action {
        family: "manual",
        name: "create",
        method: "trigger_api.manual.createManualTrigger",
        usage: "manual create <workflowId> [config]",
        args: &[Text("workflowId"), OptJson("config")],
    },
    Action {
        family: "manual",
        name: "delete",
        method: "trigger_api.manual.deleteManualTrigger",
        usage: "manual delete <triggerId>",
        args: &[Text("triggerId")],
    },
    Action {
        family: "manual",
        name: "update",
        method: "trigger_api.manual.updateManualTrigger",
        usage: "manual update <triggerId> <updates>",
        args: &[Text("triggerId"), Json("updates")],
    },
    Action {
        family: "manual",
        name: "get",
        method: "trigger_api.manual.getManualTrigger",
        usage: "manual get <triggerId>",
        args: &[Text("triggerId")],
    },
    Action {
        family: "manual",
        name: "list",
        method: "trigger_api.manual.getAllManualTriggers",
        usage: "manual list",
        args: &[],
    },
    Action {
        family: "manual",
        name: "trigger",
        method: "trigger_api.manual.triggerWorkflow",
        usage: "manual trigger <workflowId> [data]",
        args: &[Text("workflowId"), OptJson("data")],
    },
    // Schedules
    Action {
        family: "schedule",
        name: "create",
        method: "trigger_api.schedule.createSchedule",
        usage: "schedule create <cronExpression> <workflowId> [config]",
        args: &[Text("cronExpression"), Text("workflowId"), OptJson("config")],
    },
    Action {
        family: "schedule",
        name: "delete",
        method: "trigger_api.schedule.deleteSchedule",
        usage: "schedule delete <scheduleId>",
        args: &[Text("scheduleId")],
    },
    Action {
        family: "schedule",
        name: "update",
        method: "trigger_api.schedule.updateSchedule",
        usage: "schedule update <scheduleId> <updates>",
        args: &[Text("scheduleId"), Json("updates")],
    },
    Action {
        family: "schedule",
        name: "get",
        method: "trigger_api.schedule.getSchedule",
        usage: "schedule get <scheduleId>",
        args: &[Text("scheduleId")],
    },
    Action {
        family: "schedule",
        name: "list",
        method: "trigger_api.schedule.getAllSchedules",
        usage: "schedule list",
        args: &[],
    },
    Action {
        family: "schedule",
        name: "validate",
        method: "trigger_api.schedule.validateCronExpression",
        usage: "schedule validate <cronExpression>",
        args: &[Text("cronExpression")],
    },
    // Webhooks
    Action {
        family: "webhook",
        name: "create",
        method: "trigger_api.webhook.createWebhook",
        usage: "webhook create <workflowId> [config]",
        args: &[Text("workflowId"), OptJson("config")],
    },
    Action {
        family: "webhook",
        name: "delete",
        method: "trigger_api.webhook.deleteWebhook",
        usage: "webhook delete <webhookId>",
        args: &[Text("webhookId")],
    },
    Action {
        family: "webhook",
        name: "update",
        method: "trigger_api.webhook.updateWebhook",
        usage: "webhook update <webhookId> <updates>",
        args: &[Text("webhookId"), Json("updates")],
    },
    Action {
        family: "webhook",
        name: "get",
        method: "trigger_api.webhook.getWebhook",
        usage: "webhook get <webhookId>",
        args: &[Text("webhookId")],
    },
    Action {
        family: "webhook",
        name: "list",
        method: "trigger_api.webhook.getAllWebhooks",
        usage: "webhook list",
        args: &[],
    },
    Action {
        family: "webhook",
        name: "call",
        method: "trigger_api.webhook.handleWebhookCall",
        usage: "webhook call <workflowId> [payload]",
        args: &[Text("workflowId"), OptJson("payload")],
    },
];

fn family_usage(family: &str) -> &'static str {
    match family {
        "event" => "event <create|delete|update|get|list|trigger> [options]",
        "events" => "events <batch-create|batch-delete|toggle|stats|cleanup> [options]",
        "manual" => "manual <create|delete|update|get|list|trigger> [options]",
        "schedule" => "schedule <create|delete|update|get|list|validate> [options]",
        _ => "webhook <create|delete|update|get|list|call> [options]",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriggerCommand {
    Call { method: &'static str, params: Value },
    List,
    Status,
    Help,
    Clear,
    Exit,
}

impl TriggerCommand {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(line)?;
        let Some((name, rest)) = tokens.split_first() else {
            return Err(ParseError::Usage("help"));
        };

        match name.to_lowercase().as_str() {
            family @ ("event" | "events" | "manual" | "schedule" | "webhook") => {
                parse_call(family, rest)
            }
            "list" => Ok(TriggerCommand::List),
            "status" => Ok(TriggerCommand::Status),
            "help" => Ok(TriggerCommand::Help),
            "clear" => Ok(TriggerCommand::Clear),
            "exit" | "quit" => Ok(TriggerCommand::Exit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

fn parse_call(family: &str, rest: &[String]) -> Result<TriggerCommand, ParseError> {
    let Some((name, values)) = rest.split_first() else {
        return Err(ParseError::Usage(family_usage(family)));
    };
    let action = ACTIONS
        .iter()
        .find(|a| a.family == family && a.name == name.as_str())
        .ok_or(ParseError::Usage(family_usage(family)))?;

    let mut params = Map::new();
    for (index, arg) in action.args.iter().enumerate() {
        let token = values.get(index);
        let (key, value) = match (*arg, token) {
            (Text(key), Some(token)) => (key, Value::String(token.clone())),
            (Json(key), Some(token)) => (key, parse_json(token)?),
            (OptJson(key), Some(token)) => (key, parse_json(token)?),
            (OptJson(key), None) => (key, json!({})),
            (Flag(key), Some(token)) => (key, Value::Bool(token == "true")),
            (_, None) => return Err(ParseError::Usage(action.usage)),
        };
        params.insert(key.to_string(), value);
    }

    Ok(TriggerCommand::Call {
        method: action.method,
        params: Value::Object(params),
    })
}

fn parse_json(token: &str) -> Result<Value, ParseError> {
    serde_json::from_str(token).map_err(|e| ParseError::InvalidJson(e.to_string()))
}

pub const TRIGGER_TYPES: &str = "\
Trigger types:
  event     - Event listeners
  manual    - Manual triggers
  schedule  - Cron schedules
  webhook   - Webhooks

Type \"help\" for the full command list";

const GENERAL_HELP: &str = "
General:
  list    - Show trigger types
  status  - Show trigger component status
  help    - Show this help
  clear   - Clear the screen
  exit    - Back to the main prompt

Quote JSON arguments, e.g. '{\"key\": \"value\"}'
";

/// Help text assembled from the action table.
pub fn help() -> String {
    let mut text = String::from("Trigger management commands:\n");
    let mut family = "";
    for action in ACTIONS {
        if action.family != family {
            family = action.family;
            text.push('\n');
        }
        text.push_str("  ");
        text.push_str(action.usage);
        text.push('\n');
    }
    text.push_str(GENERAL_HELP);
    text
}
