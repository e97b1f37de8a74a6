//! Choice list normalization for select, radio and checkbox fields

use serde_json::Value;

use crate::migrator::types::ChoiceOption;

use super::path::{is_filled, is_true, members, resolve_path, scalar_string};

/// Normalize source choices into destination options plus default selections
///
/// Each option keeps its position as id. Labels fall back to `Item -<index>`,
/// empty values fall back to the label. Defaults keep source order.
pub fn normalize_choices(choices: Option<&Value>) -> (Vec<ChoiceOption>, Vec<String>) {
    let mut options = Vec::new();
    let mut defaults = Vec::new();

    for (idx, choice) in members(choices).into_iter().enumerate() {
        let label = resolve_path(choice, "label")
            .and_then(scalar_string)
            .unwrap_or_else(|| format!("Item -{}", idx));

        let value = resolve_path(choice, "value")
            .filter(|v| is_filled(v))
            .and_then(scalar_string)
            .unwrap_or_else(|| label.clone());

        let image = resolve_path(choice, "image")
            .and_then(scalar_string)
            .filter(|url| !url.is_empty());

        if is_true(resolve_path(choice, "default")) {
            defaults.push(value.clone());
        }

        options.push(ChoiceOption {
            label,
            value,
            image,
            calc_value: String::new(),
            id: idx,
        });
    }

    (options, defaults)
}
