use crate::filters::{DatePreset, MAX_FILTER_SET_NAME};
use crate::models::{DashboardView, DateRange};
use chrono::NaiveDate;

pub fn render_index(view: &DashboardView) -> String {
    INDEX_HTML
        .replace("{{DASHBOARD}}", &escape(&view.dashboard))
        .replace("{{DATE}}", &escape(&date_label(&view.filter.date)))
        .replace("{{DATE_FROM}}", &date_value(view.filter.date.from))
        .replace("{{DATE_TO}}", &date_value(view.filter.date.to))
        .replace("{{PRESETS}}", &preset_options())
        .replace("{{CHOICES}}", &choice_boxes(view))
        .replace("{{KPIS}}", &kpi_cards(view))
        .replace("{{DRILLDOWN}}", &drilldown_panel(view))
        // User-named sets go in last so their text is never re-expanded.
        .replace("{{FILTER_SETS}}", &filter_set_controls(view))
}

fn is_advanced(view: &DashboardView) -> bool {
    view.filter.mode == "advanced"
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn date_label(range: &DateRange) -> String {
    match (range.from, range.to) {
        (None, _) => "Pick date range".to_string(),
        (Some(from), Some(to)) => format!("{from} - {to}"),
        (Some(from), None) => from.to_string(),
    }
}

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|date| date.to_string()).unwrap_or_default()
}

fn preset_options() -> String {
    DatePreset::ALL
        .iter()
        .map(|preset| format!(r#"<option value="{}">{}</option>"#, preset.key(), preset.label()))
        .collect()
}

fn checkboxes(kind: &str, available: &[String], selected: &[String]) -> String {
    available
        .iter()
        .map(|value| {
            let checked = if selected.contains(value) { " checked" } else { "" };
            format!(
                r#"<label class="choice"><input type="checkbox" class="toggle" data-kind="{kind}" value="{value}"{checked} /> {value}</label>"#,
                value = escape(value),
            )
        })
        .collect()
}

/// Category and KPI pickers; basic pages only filter by date.
fn choice_boxes(view: &DashboardView) -> String {
    if !is_advanced(view) {
        return String::new();
    }
    let filter = &view.filter;
    format!(
        r#"<fieldset><legend>Categories</legend>{}</fieldset><fieldset><legend>KPIs</legend>{}</fieldset>"#,
        checkboxes("categories", &filter.available_categories, &filter.selected_categories),
        checkboxes("kpis", &filter.available_kpis, &filter.selected_kpis),
    )
}

fn filter_set_controls(view: &DashboardView) -> String {
    if !is_advanced(view) {
        return String::new();
    }
    let options: String = if view.filter_sets.is_empty() {
        r#"<option value="" disabled>No sets</option>"#.to_string()
    } else {
        view.filter_sets
            .iter()
            .map(|set| {
                let name = escape(&set.name);
                format!(r#"<option value="{name}">{name}</option>"#)
            })
            .collect()
    };
    format!(
        r#"<label>Filter Sets <select id="filter-set"><option value="">Saved set</option>{options}</select></label><button type="button" id="apply-set">Load set</button><button type="button" id="delete-set">Delete set</button><label>Save as <input id="set-name" maxlength="{max}" placeholder="Set name" /></label><button type="button" id="save-set">Save set</button>"#,
        max = MAX_FILTER_SET_NAME,
    )
}

fn kpi_cards(view: &DashboardView) -> String {
    if view.visible_kpis.is_empty() {
        return r#"<p class="subtitle">No KPIs match the current filter.</p>"#.to_string();
    }
    let title = if view.editable {
        "Drag to re-order. Click to drill down."
    } else {
        "Click to drill down"
    };
    view.visible_kpis
        .iter()
        .map(|kpi| {
            // Drag indices address the full ordered list, not the filtered one.
            let index = view
                .kpis
                .iter()
                .position(|entry| entry.label == kpi.label)
                .unwrap_or_default();
            format!(
                r#"<div class="stat kpi" draggable="{editable}" data-index="{index}" data-label="{label}" title="{title}"><span class="label">{label}</span><span class="value">{value}</span></div>"#,
                editable = view.editable,
                label = escape(&kpi.label),
                value = escape(&kpi.value.to_string()),
            )
        })
        .collect()
}

fn drilldown_panel(view: &DashboardView) -> String {
    let Some(detail) = &view.drilldown else {
        return String::new();
    };
    let trend: String = detail
        .trend
        .iter()
        .map(|point| format!("<li>{}: {}</li>", escape(&point.month), point.value))
        .collect();
    format!(
        r#"<section class="drilldown"><h2>{title}</h2><p>Current value: <b>{value}</b></p><span>Sample Trend (Past Months):</span><ul>{trend}</ul><button type="button" id="close-drill">Close</button></section>"#,
        title = escape(&detail.title),
        value = escape(&detail.value.to_string()),
    )
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{DASHBOARD}} - Report Dashboard</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
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
      background: linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
    }

    form.filters {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: end;
    }

    fieldset {
      border: 1px solid rgba(47, 72, 88, 0.15);
      border-radius: 14px;
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
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
      cursor: pointer;
    }

    .stat.over {
      outline: 2px solid var(--accent);
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
      color: var(--accent-2);
    }

    .drilldown {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid var(--accent);
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font-weight: 600;
      background: var(--accent-2);
      color: white;
      cursor: pointer;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>{{DASHBOARD}}</h1>
      <p class="subtitle">Track KPIs at a glance. Date range: {{DATE}}</p>
    </header>
    <form class="filters" id="filters">
      <label>Date Preset
        <select id="preset"><option value="">Select preset</option>{{PRESETS}}</select>
      </label>
      <label>From <input type="date" id="date-from" value="{{DATE_FROM}}" /></label>
      <label>To <input type="date" id="date-to" value="{{DATE_TO}}" /></label>
      <button type="button" id="set-dates">Set dates</button>
      {{CHOICES}}
      {{FILTER_SETS}}
      <button type="submit">Apply</button>
      <button type="button" id="reset">Reset</button>
    </form>
    <section class="panel" id="kpis">{{KPIS}}</section>
    {{DRILLDOWN}}
  </main>
  <script>
    const done = (res) =>
      res.ok ? window.location.reload() : res.text().then((msg) => alert(msg));
    const post = (url, body) =>
      fetch(url, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body),
      }).then(done);
    const on = (id, event, handler) => {
      const el = document.getElementById(id);
      if (el) el.addEventListener(event, handler);
    };
    const chosenSet = () => encodeURIComponent(document.getElementById('filter-set').value);

    on('preset', 'change', (e) => post('/api/filters/preset', { preset: e.target.value }));
    on('set-dates', 'click', () => {
      const from = document.getElementById('date-from').value || null;
      const to = document.getElementById('date-to').value || null;
      post('/api/filters/date', { from, to });
    });
    document.querySelectorAll('.toggle').forEach((box) => {
      box.addEventListener('change', () =>
        post('/api/filters/' + box.dataset.kind + '/toggle', { value: box.value }));
    });
    on('apply-set', 'click', () => {
      if (chosenSet()) post('/api/filter-sets/' + chosenSet() + '/apply');
    });
    on('delete-set', 'click', () => {
      if (chosenSet()) fetch('/api/filter-sets/' + chosenSet(), { method: 'DELETE' }).then(done);
    });
    on('save-set', 'click', () =>
      post('/api/filter-sets', { name: document.getElementById('set-name').value }));
    document.getElementById('filters').addEventListener('submit', (e) => {
      e.preventDefault();
      post('/api/filters/apply');
    });
    on('reset', 'click', () => post('/api/filters/reset'));

    on('close-drill', 'click', () => fetch('/api/drilldown', { method: 'DELETE' }).then(done));

    let dragIndex = null;
    document.querySelectorAll('.kpi').forEach((card) => {
      card.addEventListener('click', () => post('/api/kpis/drilldown', { label: card.dataset.label }));
      card.addEventListener('dragstart', () => { dragIndex = Number(card.dataset.index); });
      card.addEventListener('dragover', (e) => { e.preventDefault(); card.classList.add('over'); });
      card.addEventListener('dragleave', () => card.classList.remove('over'));
      card.addEventListener('drop', () => {
        card.classList.remove('over');
        const to = Number(card.dataset.index);
        if (dragIndex !== null && dragIndex !== to) {
          post('/api/kpis/reorder', { from: dragIndex, to });
        }
        dragIndex = null;
      });
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::kpi_catalog;
    use crate::filters::{FilterCapabilities, FilterController};
    use crate::models::FilterSet;

    fn view() -> DashboardView {
        let kpis = kpi_catalog(crate::catalog::EXECUTIVE_OVERVIEW).unwrap();
        DashboardView {
            dashboard: "Executive <Overview>".to_string(),
            editable: false,
            filter: FilterController::new(FilterCapabilities::Basic).view(),
            visible_kpis: kpis[1..].to_vec(),
            kpis,
            filter_sets: Vec::new(),
            drilldown: None,
        }
    }

    #[test]
    fn renders_visible_kpis_with_full_list_indices() {
        let html = render_index(&view());
        assert!(html.contains("Executive &lt;Overview&gt;"));
        assert!(html.contains(r#"draggable="false" data-index="1" data-label="YTD Growth""#));
        assert!(!html.contains(r#"data-label="Total Revenue""#));
        assert!(html.contains("Pick date range"));
        assert!(html.contains(r#"id="date-from" value="""#));
        assert!(!html.contains(r#"class="toggle""#));
        assert!(!html.contains(r#"id="save-set""#));
    }

    #[test]
    fn advanced_view_offers_toggles_and_filter_set_controls() {
        let kpis = kpi_catalog(crate::catalog::EXECUTIVE_OVERVIEW).unwrap();
        let mut filters = FilterController::new(FilterCapabilities::Advanced {
            categories: crate::catalog::categories(&kpis),
            kpis: crate::catalog::labels(&kpis),
        });
        filters.toggle_category("B");
        filters
            .set_date_range(DateRange::new(NaiveDate::from_ymd_opt(2026, 1, 1), None))
            .unwrap();
        let mut view = view();
        view.filter = filters.view();
        view.filter_sets = vec![FilterSet {
            name: "<Q1>".to_string(),
            date: None,
            categories: Vec::new(),
            kpis: Vec::new(),
        }];

        let html = render_index(&view);
        assert!(html.contains(r#"data-kind="categories" value="B" checked"#));
        assert!(html.contains(r#"data-kind="kpis" value="Churn Rate" />"#));
        assert!(html.contains(r#"id="date-from" value="2026-01-01""#));
        assert!(html.contains(r#"<option value="&lt;Q1&gt;">"#));
        assert!(html.contains(r#"id="delete-set""#));
        assert!(html.contains(&format!(r#"maxlength="{MAX_FILTER_SET_NAME}""#)));
    }
}
