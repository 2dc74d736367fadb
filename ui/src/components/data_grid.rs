use dioxus::prelude::*;

use crate::grid::{EmptyState, GridRow, GridState};

const DEFAULT_EMPTY: &str = "No records found.";
const DEFAULT_EMPTY_FILTER: &str = "No results for the filter.";

/// Filterable, paginated table over a [`GridState`] owned by the caller.
///
/// `state` is any writable signal of the grid, usually a field of the
/// screen's own state mapped with `map_mut`.
///
/// The column named by `link_column` renders as a button that fires
/// `on_detail`; `on_edit` adds a leading edit column. With `selectable`
/// each row gets a checkbox and the header a select-all for the page.
#[component]
pub fn DataGrid<R: GridRow>(
    #[props(into)] mut state: WriteSignal<GridState<R>>,
    link_column: Option<String>,
    on_detail: Option<EventHandler<R>>,
    on_edit: Option<EventHandler<R>>,
    on_selection_change: Option<EventHandler<Vec<R>>>,
    #[props(default)] selectable: bool,
    #[props(into, default = "Filter".to_string())] filter_placeholder: String,
    #[props(into, default = DEFAULT_EMPTY.to_string())] empty_message: String,
    #[props(into, default = DEFAULT_EMPTY_FILTER.to_string())] empty_filter_message: String,
) -> Element {
    let grid = state.read();
    let view = grid.view();
    let columns = grid.columns();
    let page_selected = grid.page_fully_selected();
    let loading = grid.is_loading();
    // Loading hides rows only; filter and paging stay usable.
    let rows = if loading { Vec::new() } else { view.rows.clone() };
    let filter = grid.filter().to_string();
    let empty_text = grid.empty_state().map(|empty| match empty {
        EmptyState::NoRows => empty_message.clone(),
        EmptyState::NoMatches => empty_filter_message.clone(),
    });

    let span = columns.len() + usize::from(selectable) + usize::from(on_edit.is_some());

    let notify_selection = move || {
        if let Some(handler) = on_selection_change {
            handler.call(state.read().selected_rows());
        }
    };

    rsx! {
        div { class: "data-grid",
            if grid.is_filterable() {
                div { class: "data-grid-toolbar",
                    input {
                        class: "form-input data-grid-filter",
                        r#type: "search",
                        placeholder: "{filter_placeholder}",
                        value: "{filter}",
                        oninput: move |e| state.write().set_filter(e.value()),
                    }
                }
            }

            div { class: "table-container",
                table {
                    thead {
                        tr {
                            if selectable {
                                th { class: "data-grid-check",
                                    input {
                                        r#type: "checkbox",
                                        checked: page_selected,
                                        disabled: view.rows.is_empty(),
                                        onchange: move |_| {
                                            state.write().toggle_page();
                                            notify_selection();
                                        },
                                    }
                                }
                            }
                            if on_edit.is_some() {
                                th { class: "data-grid-edit" }
                            }
                            for column in columns.iter() {
                                th { key: "{column.field}", "{column.header}" }
                            }
                        }
                    }
                    tbody {
                        if loading {
                            tr {
                                td { class: "loading", colspan: "{span}", "Loading..." }
                            }
                        }
                        if let Some(text) = empty_text {
                            tr {
                                td { class: "data-grid-empty", colspan: "{span}", "{text}" }
                            }
                        }
                        for row in rows {
                            {
                                let id = row.row_id().to_string();
                                let checked = grid.selection().contains(&id);
                                rsx! {
                                    tr {
                                        key: "{id}",
                                        class: if checked { "selected" },
                                        if selectable {
                                            td { class: "data-grid-check",
                                                input {
                                                    r#type: "checkbox",
                                                    checked,
                                                    onchange: {
                                                        let id = id.clone();
                                                        move |_| {
                                                            state.write().toggle_row(&id);
                                                            notify_selection();
                                                        }
                                                    },
                                                }
                                            }
                                        }
                                        if let Some(handler) = on_edit {
                                            td { class: "data-grid-edit",
                                                button {
                                                    class: "btn-icon",
                                                    title: "Edit",
                                                    onclick: {
                                                        let row = row.clone();
                                                        move |_| handler.call(row.clone())
                                                    },
                                                    "✏️"
                                                }
                                            }
                                        }
                                        for column in columns.iter() {
                                            {
                                                let text = row.cell_text(&column.field);
                                                let is_link = link_column.as_deref() == Some(column.field.as_str());
                                                let row = row.clone();
                                                rsx! {
                                                    td { key: "{column.field}",
                                                        if is_link {
                                                            button {
                                                                class: "btn-link",
                                                                onclick: move |_| {
                                                                    if let Some(handler) = on_detail {
                                                                        handler.call(row.clone());
                                                                    }
                                                                },
                                                                "{text}"
                                                            }
                                                        } else {
                                                            "{text}"
                                                        }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            {paginator(state)}
        }
    }
}

fn paginator<R: GridRow>(mut state: WriteSignal<GridState<R>>) -> Element {
    let grid = state.read();
    let view = grid.view();
    let last_page = view.total_pages - 1;
    let current = view.page_index;
    let page_size = grid.page_size();
    let sizes = grid.page_sizes().to_vec();
    let report = format!("{} to {} of {}", view.first, view.last, view.total_filtered);

    rsx! {
        div { class: "paginator",
            button {
                class: "paginator-btn",
                disabled: current == 0,
                onclick: move |_| state.write().set_page(0),
                "«"
            }
            button {
                class: "paginator-btn",
                disabled: current == 0,
                onclick: move |_| state.write().set_page(current.saturating_sub(1)),
                "‹"
            }
            for page in 0..view.total_pages {
                {
                    let label = page + 1;
                    rsx! {
                        button {
                            key: "{page}",
                            class: if page == current { "paginator-btn active" } else { "paginator-btn" },
                            onclick: move |_| state.write().set_page(page),
                            "{label}"
                        }
                    }
                }
            }
            button {
                class: "paginator-btn",
                disabled: current >= last_page,
                onclick: move |_| state.write().set_page(current + 1),
                "›"
            }
            button {
                class: "paginator-btn",
                disabled: current >= last_page,
                onclick: move |_| state.write().set_page(last_page),
                "»"
            }
            if sizes.len() > 1 {
                select {
                    class: "paginator-size",
                    value: "{page_size}",
                    onchange: move |e| {
                        if let Ok(size) = e.value().parse() {
                            state.write().set_page_size(size);
                        }
                    },
                    for size in sizes {
                        option { key: "{size}", value: "{size}", "{size}" }
                    }
                }
            }
            span { class: "paginator-report", "{report}" }
        }
    }
}
