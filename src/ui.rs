use crate::export::export_file_name;
use crate::form::default_dates;
use crate::models::{Category, QueryParams, QueryRange};
use crate::table::ResultTable;
use chrono::NaiveDate;
use serde_json::Value;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub category: Category,
    pub start_date: String,
    pub end_date: String,
}

impl FormValues {
    pub fn defaults(today: NaiveDate) -> Self {
        let (start, end) = default_dates(today);
        Self {
            category: Category::Individual,
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    pub fn from_params(params: &QueryParams, today: NaiveDate) -> Self {
        let defaults = Self::defaults(today);
        Self {
            category: params
                .category
                .as_deref()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.category),
            start_date: params
                .start_date
                .clone()
                .unwrap_or(defaults.start_date),
            end_date: params.end_date.clone().unwrap_or(defaults.end_date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn query_summary(range: &QueryRange) -> Self {
        Notice::Success(format!(
            "Application type: {} · Start date: {} · End date: {}",
            range.category.label(),
            range.start_date,
            range.end_date
        ))
    }
}

pub fn render_login(password_incorrect: bool) -> String {
    let error = if password_incorrect {
        r#"<div class="status" data-type="error">😕 Password incorrect</div>"#
    } else {
        ""
    };
    LOGIN_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{ERROR}}", error)
}

pub fn render_dashboard(
    form: &FormValues,
    notice: Option<&Notice>,
    results: Option<(&QueryRange, &ResultTable)>,
) -> String {
    let notice = match notice {
        Some(Notice::Success(message)) => format!(
            r#"<div class="status" data-type="ok">{}</div>"#,
            escape_html(message)
        ),
        Some(Notice::Error(message)) => format!(
            r#"<div class="status" data-type="error">Error: {}</div>"#,
            escape_html(message)
        ),
        None => String::new(),
    };
    let results = results
        .map(|(range, table)| render_results(range, table))
        .unwrap_or_default();

    DASHBOARD_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{CATEGORY_OPTIONS}}", &category_options(form.category))
        .replace("{{START}}", &escape_html(&form.start_date))
        .replace("{{END}}", &escape_html(&form.end_date))
        .replace("{{NOTICE}}", &notice)
        .replace("{{RESULTS}}", &results)
}

/// `application_no` becomes `Application No`.
pub fn display_header(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn category_options(selected: Category) -> String {
    Category::ALL
        .iter()
        .map(|category| {
            let marker = if *category == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{marker}>{}</option>"#,
                category.as_str(),
                category.label()
            )
        })
        .collect()
}

fn render_results(range: &QueryRange, table: &ResultTable) -> String {
    let export_href = format!(
        "/export?category={}&amp;start_date={}&amp;end_date={}",
        range.category.as_str(),
        range.start_date,
        range.end_date
    );

    let mut grid = String::new();
    if table.is_empty() {
        grid.push_str(r#"<p class="hint">No applications were filed in this range.</p>"#);
    } else {
        grid.push_str("<div class=\"table-card\"><table><thead><tr>");
        for column in table.columns() {
            let _ = write!(grid, "<th>{}</th>", escape_html(&display_header(column)));
        }
        grid.push_str("</tr></thead><tbody>");
        for record in table.rows() {
            grid.push_str("<tr>");
            for value in table.cells(record) {
                let _ = write!(grid, "<td>{}</td>", escape_html(&cell_text(value)));
            }
            grid.push_str("</tr>");
        }
        grid.push_str("</tbody></table></div>");
    }

    RESULTS_HTML
        .replace("{{EXPORT_HREF}}", &export_href)
        .replace("{{FILE_NAME}}", &escape_html(&export_file_name(range)))
        .replace("{{ROWS}}", &table.len().to_string())
        .replace("{{DAYS}}", &range.day_count().to_string())
        .replace("{{GRID}}", &grid)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

const STYLE: &str = r#"
  <style>
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #2d7a4b;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1200px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
      margin: 0;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
    }

    form.query {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
      align-items: end;
    }

    label {
      display: grid;
      gap: 6px;
      font-weight: 600;
    }

    input, select {
      font: inherit;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.25);
      background: white;
    }

    button, .download {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent-2);
      color: white;
      text-decoration: none;
      text-align: center;
    }

    .download {
      background: var(--accent);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent);
    }

    .table-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      overflow-x: auto;
    }

    table {
      border-collapse: collapse;
      width: 100%;
      font-size: 0.9rem;
    }

    th, td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.1);
      white-space: nowrap;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.9rem;
    }
  </style>
"#;

const LOGIN_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Automating IPR Application Updates</title>
{{STYLE}}
</head>
<body>
  <main class="app">
    <header>
      <h1>Automating IPR Application Updates</h1>
    </header>
    <form method="post" action="/login">
      <label>Please enter your password
        <input type="password" name="password" autocomplete="current-password" autofocus />
      </label>
      <button type="submit">Sign in</button>
    </form>
    {{ERROR}}
  </main>
</body>
</html>
"#;

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Download the latest applications</title>
{{STYLE}}
</head>
<body>
  <main class="app">
    <header>
      <h1>Download the latest applications</h1>
      <p class="subtitle">Please input the following items</p>
    </header>

    <form class="query" method="get" action="/query">
      <label>Specify Application Type
        <select name="category">{{CATEGORY_OPTIONS}}</select>
      </label>
      <label>Start Date
        <input type="date" name="start_date" value="{{START}}" />
      </label>
      <label>End Date
        <input type="date" name="end_date" value="{{END}}" />
      </label>
      <button type="submit">Fetch applications</button>
    </form>

    {{NOTICE}}
    {{RESULTS}}
    <p class="hint">Ranges are limited to 31 days. Fetching can take up to a minute.</p>
  </main>
</body>
</html>
"#;

const RESULTS_HTML: &str = r#"<section class="panel">
      <div class="stat">
        <span class="label">Export</span>
        <a class="download" href="{{EXPORT_HREF}}" download="{{FILE_NAME}}">Download data as Excel</a>
      </div>
      <div class="stat">
        <span class="label">No. of Applicants</span>
        <span id="row-count" class="value">{{ROWS}}</span>
      </div>
      <div class="stat">
        <span class="label">No. of Days</span>
        <span id="day-count" class="value">{{DAYS}}</span>
      </div>
    </section>
    {{GRID}}"#;
