//! Dropdown menus: axis scale switches and trace visibility filters.

use plotly::common::Anchor;
use plotly::layout::update_menu::{Button, ButtonMethod, UpdateMenu, UpdateMenuDirection};
use serde_json::{json, Value};

/// Dropdown at paper position (`x`, `y`), anchored by its top-left corner.
pub fn dropdown(buttons: Vec<Button>, x: f64, y: f64) -> UpdateMenu {
    UpdateMenu::new()
        .buttons(buttons)
        .direction(UpdateMenuDirection::Down)
        .show_active(true)
        .x(x)
        .x_anchor(Anchor::Left)
        .y(y)
        .y_anchor(Anchor::Top)
}

/// Button applying layout `changes`, given as plotly attribute paths.
pub fn relayout_button(label: &str, changes: Value) -> Button {
    Button::new()
        .label(label)
        .method(ButtonMethod::Relayout)
        .args(json!([changes]))
}

/// Button showing the traces flagged in `visible` and retitling the figure.
pub fn visibility_button(label: &str, visible: &[bool], title: &str) -> Button {
    Button::new()
        .label(label)
        .method(ButtonMethod::Update)
        .args(json!([{ "visible": visible }, { "title.text": title }]))
}

/// Visibility flags for `total` traces, set where `keep(index)` holds.
pub fn visibility_mask(total: usize, keep: impl Fn(usize) -> bool) -> Vec<bool> {
    (0..total).map(keep).collect()
}

/// Log/linear switch for the y axis, with a title per scale.
pub fn y_scale_menu(log_label: &str, log_title: &str, linear_label: &str, linear_title: &str) -> UpdateMenu {
    dropdown(
        vec![
            relayout_button(
                log_label,
                json!({ "yaxis.type": "log", "yaxis.title.text": log_title }),
            ),
            relayout_button(
                linear_label,
                json!({ "yaxis.type": "linear", "yaxis.title.text": linear_title }),
            ),
        ],
        0.0,
        1.12,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_button_args() {
        let mask = visibility_mask(4, |i| i % 2 == 0);
        let button = visibility_button("Veneto", &mask, "Crescita dei casi: Veneto");
        let json = serde_json::to_value(&button).unwrap();

        assert_eq!(json["label"], "Veneto");
        assert_eq!(json["method"], "update");
        assert_eq!(json["args"][0]["visible"], json!([true, false, true, false]));
        assert_eq!(json["args"][1]["title.text"], "Crescita dei casi: Veneto");
    }

    #[test]
    fn test_scale_menu_has_both_scales() {
        let menu = y_scale_menu("Log", "Cases (log)", "Linear", "Cases");
        let json = serde_json::to_value(&menu).unwrap();
        let buttons = json["buttons"].as_array().unwrap();

        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0]["args"][0]["yaxis.type"], "log");
        assert_eq!(buttons[1]["args"][0]["yaxis.title.text"], "Cases");
    }
}
