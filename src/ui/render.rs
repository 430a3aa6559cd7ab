use askama::Template;

use super::{format_created, visible, AdminState, Filter};
use crate::models::{MergedItem, Status};

pub struct StatusOption {
    pub value: &'static str,
    pub selected: bool,
}

pub struct Row {
    pub id: String,
    pub created: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub options: Vec<StatusOption>,
}

impl Row {
    fn from_item(item: &MergedItem) -> Self {
        let sub = &item.submission;
        Row {
            id: sub.id.clone(),
            created: format_created(sub.created_at()),
            name: sub.name().unwrap_or("-").to_string(),
            email: sub.email().unwrap_or("-").to_string(),
            message: sub.message().unwrap_or("-").to_string(),
            options: status_options(item.status),
        }
    }
}

fn status_options(current: Status) -> Vec<StatusOption> {
    Status::ALL
        .iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            selected: *status == current,
        })
        .collect()
}

/// Table body plus hint line. Every field is HTML-escaped by the template.
#[derive(Template)]
#[template(path = "admin/rows.html")]
struct RowsTemplate {
    signed_in: bool,
    rows: Vec<Row>,
    hint: String,
    alert: Option<String>,
}

/// Rows for a signed-in session. One-shot messages are consumed.
pub fn render_view(view: &mut AdminState, filter: &Filter) -> String {
    let rows: Vec<Row> = visible(view.items(), filter)
        .into_iter()
        .map(Row::from_item)
        .collect();

    let shown = format!("{} shown", rows.len());
    let hint = match view.notice() {
        Some(notice) => format!("{notice} · {shown}"),
        None => shown,
    };

    let template = RowsTemplate {
        signed_in: true,
        rows,
        hint,
        alert: view.alert().map(str::to_string),
    };
    view.clear_messages();
    template.render().unwrap_or_default()
}

pub fn render_signed_out() -> String {
    let template = RowsTemplate {
        signed_in: false,
        rows: Vec::new(),
        hint: String::new(),
        alert: None,
    };
    template.render().unwrap_or_default()
}
