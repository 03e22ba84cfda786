//! # Response Formatter
//!
//! Renders the automation webhook's responses as chat markdown. The workflow
//! answers with `{action, output}` envelopes for the action families it
//! knows (mail, calendar, notes, tasks); a bare `{"reply": ...}` passes
//! through verbatim, and anything else falls back to a code block so the
//! user always sees something.

use serde_json::Value;

use crate::strings::messages;

/// Render a raw webhook response body.
pub fn format_response(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(parsed) => format_parsed(parsed),
        // Not JSON at all; show the raw text untouched.
        Err(_) => format!("✅ Response:\n```\n{body}\n```"),
    }
}

fn format_parsed(parsed: Value) -> String {
    // The workflow engine wraps results in a single-element array.
    let data = match parsed {
        Value::Array(items) => match items.into_iter().next() {
            Some(first) => first,
            None => return messages::ACTION_OK.to_string(),
        },
        other => other,
    };

    let Value::Object(map) = &data else {
        return format!("✅ Response:\n```\n{data}\n```");
    };

    // A conversational answer is relayed as-is, no decoration.
    if let Some(reply) = map.get("reply").and_then(Value::as_str) {
        return reply.to_string();
    }

    let action = map.get("action").and_then(Value::as_str).unwrap_or_default();
    let Some(output) = map.get("output").and_then(Value::as_object) else {
        return messages::ACTION_OK.to_string();
    };
    if output.is_empty() {
        return messages::ACTION_OK.to_string();
    }

    let output_type = output.get("type").and_then(Value::as_str).unwrap_or_default();
    let content = output.get("content").and_then(Value::as_str).unwrap_or_default();
    let items: &[Value] = output.get("items").and_then(Value::as_array).map_or(&[], Vec::as_slice);
    let emoji = action_emoji(action);

    if action == "get_email" || output_type == "email_summary" {
        return format_email_list(emoji, content, items);
    }
    if action == "send_email" || output_type == "email_sent" {
        return format!("{emoji} **{content}**");
    }
    if action == "get_calendar" || output_type == "calendar_events" {
        return format_calendar_events(emoji, content, items);
    }
    if action == "send_calendar" || output_type == "calendar_event_created" {
        return format!("{emoji} **{content}**");
    }
    if action == "note" || matches!(output_type, "note_created" | "note_updated" | "note_list") {
        return format_notes(emoji, content, items);
    }
    if action == "task" || matches!(output_type, "task_created" | "task_updated" | "task_list") {
        return format_tasks(emoji, content, items);
    }

    if !items.is_empty() {
        return format_generic_list(emoji, content, items);
    }
    if !content.is_empty() {
        return format!("{emoji} **{content}**");
    }
    match serde_json::to_string_pretty(&data) {
        Ok(pretty) => format!("{emoji} Response:\n```json\n{pretty}\n```"),
        Err(_) => messages::ACTION_OK.to_string(),
    }
}

/// Emoji for each workflow action family.
fn action_emoji(action: &str) -> &'static str {
    match action {
        "get_email" => "📧",
        "send_email" => "📨",
        "get_calendar" => "📅",
        "send_calendar" => "🗓️",
        "note" => "📝",
        "task" => "✅",
        "other" => "💡",
        _ => "✅",
    }
}

/// First non-empty string value found under any of `keys`.
fn field<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        item.get(*key).and_then(Value::as_str).filter(|value| !value.is_empty())
    })
}

fn format_email_list(emoji: &str, content: &str, items: &[Value]) -> String {
    let mut out = format!("{emoji} **{content}**\n\n");
    for (idx, item) in items.iter().enumerate() {
        let sender = field(item, &["sender", "from"]).unwrap_or("Unknown");
        let subject = field(item, &["subject"]).unwrap_or("No subject");

        out.push_str(&format!("**{}.** {subject}\n", idx + 1));
        out.push_str(&format!("   📨 From: {sender}\n"));
        if let Some(date) = field(item, &["date", "received"]) {
            out.push_str(&format!("   📅 {}\n", format_date(date)));
        }
        if let Some(preview) = field(item, &["preview", "snippet"]) {
            out.push_str(&format!("   💬 {}\n", truncate(preview, 100)));
        }
        out.push('\n');
    }
    out
}

fn format_calendar_events(emoji: &str, content: &str, items: &[Value]) -> String {
    let mut out = format!("{emoji} **{content}**\n\n");
    for (idx, item) in items.iter().enumerate() {
        let title = field(item, &["title", "summary"]).unwrap_or("Untitled");

        out.push_str(&format!("**{}.** {title}\n", idx + 1));
        if let Some(start) = field(item, &["start", "start_time"]) {
            out.push_str(&format!("   🕐 Start: {}\n", format_date(start)));
        }
        if let Some(end) = field(item, &["end", "end_time"]) {
            out.push_str(&format!("   🕐 End: {}\n", format_date(end)));
        }
        if let Some(location) = field(item, &["location"]) {
            out.push_str(&format!("   📍 Location: {location}\n"));
        }
        if let Some(description) = field(item, &["description"]) {
            out.push_str(&format!("   📄 {}\n", truncate(description, 100)));
        }
        out.push('\n');
    }
    out
}

fn format_notes(emoji: &str, content: &str, items: &[Value]) -> String {
    if items.is_empty() {
        return format!("{emoji} **{content}**");
    }

    let mut out = format!("{emoji} **{content}**\n\n");
    for (idx, item) in items.iter().enumerate() {
        let title = field(item, &["title"]).unwrap_or("Untitled");

        out.push_str(&format!("**{}.** {title}\n", idx + 1));
        if let Some(body) = field(item, &["body", "content"]) {
            out.push_str(&format!("   {}\n", truncate(body, 150)));
        }
        if let Some(created) = field(item, &["created", "created_at"]) {
            out.push_str(&format!("   🕐 {}\n", format_date(created)));
        }
        out.push('\n');
    }
    out
}

fn format_tasks(emoji: &str, content: &str, items: &[Value]) -> String {
    if items.is_empty() {
        return format!("{emoji} **{content}**");
    }

    let mut out = format!("{emoji} **{content}**\n\n");
    for (idx, item) in items.iter().enumerate() {
        let title = field(item, &["title", "name"]).unwrap_or("Untitled");
        let done = match item.get("status").or_else(|| item.get("completed")) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(status)) => status == "completed" || status == "done",
            _ => false,
        };
        let checkbox = if done { "✅" } else { "⬜" };

        out.push_str(&format!("{checkbox} **{}.** {title}\n", idx + 1));
        if let Some(priority) = field(item, &["priority"]) {
            let dot = match priority.to_lowercase().as_str() {
                "high" => "🔴",
                "medium" => "🟡",
                "low" => "🟢",
                _ => "⚪",
            };
            out.push_str(&format!("   {dot} Priority: {priority}\n"));
        }
        if let Some(due) = field(item, &["due_date", "due"]) {
            out.push_str(&format!("   📅 Due: {}\n", format_date(due)));
        }
        out.push('\n');
    }
    out
}

fn format_generic_list(emoji: &str, content: &str, items: &[Value]) -> String {
    let mut out = format!("{emoji} **{content}**\n\n");
    for (idx, item) in items.iter().enumerate() {
        match item {
            Value::String(text) => {
                out.push_str(&format!("**{}.** {text}\n", idx + 1));
            }
            Value::Object(map) => {
                let title = field(item, &["title", "name", "text"])
                    .map(str::to_string)
                    .unwrap_or_else(|| item.to_string());
                out.push_str(&format!("**{}.** {title}\n", idx + 1));
                for (key, value) in map {
                    if matches!(key.as_str(), "title" | "name" | "text") {
                        continue;
                    }
                    let rendered = match value {
                        Value::Null | Value::Bool(false) => continue,
                        Value::String(text) if text.is_empty() => continue,
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    out.push_str(&format!("   • {key}: {rendered}\n"));
                }
            }
            other => {
                out.push_str(&format!("**{}.** {other}\n", idx + 1));
            }
        }
        out.push('\n');
    }
    out
}

/// `dd/mm/YYYY HH:MM` for anything ISO-8601-ish; everything else passes
/// through untouched.
fn format_date(raw: &str) -> String {
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%d/%m/%Y %H:%M").to_string();
    }
    if let Ok(parsed) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return parsed.format("%d/%m/%Y %H:%M").to_string();
    }
    // Date-only values count as midnight.
    if let Ok(parsed) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return format!("{} 00:00", parsed.format("%d/%m/%Y"));
    }
    raw.to_string()
}

/// Cap `text` at `limit` characters with a trailing ellipsis.
fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let cut: String = text.chars().take(limit).collect();
        format!("{cut}...")
    }
}
