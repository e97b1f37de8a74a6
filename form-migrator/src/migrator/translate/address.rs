//! Address sub-field expansion

use indexmap::IndexMap;

use crate::migrator::types::{AddressSubField, SourceField};

/// Address parts: (destination key, source attribute prefix, label, hide flag)
const ADDRESS_PARTS: &[(&str, &str, &str, Option<&str>)] = &[
    ("address_line_1", "address1", "Address Line 1", None),
    ("address_line_2", "address2", "Address Line 2", Some("address2_hide")),
    ("city", "city", "City", None),
    ("state", "state", "State", None),
    ("zip", "postal", "Zip", Some("postal_hide")),
    ("country", "country", "Country", Some("country_hide")),
];

/// Build the six address sub-fields for a parent field named `parent_name`
pub fn address_sub_fields(field: &SourceField, parent_name: &str) -> IndexMap<String, AddressSubField> {
    let hide_sub_labels = field.is_true("sublabel_hide");
    let us_scheme = field.str_or("scheme", "") == "us";

    ADDRESS_PARTS
        .iter()
        .map(|&(key, prefix, label, hide_flag)| {
            let default = if key == "country" && us_scheme {
                "US".to_string()
            } else {
                field.str_or(&format!("{}_default", prefix), "")
            };

            let sub_field = AddressSubField {
                name: format!("{}_{}", parent_name, key),
                label: if hide_sub_labels { String::new() } else { label.to_string() },
                placeholder: field.str_or(&format!("{}_placeholder", prefix), ""),
                default,
                visible: hide_flag.map(|flag| !field.is_true(flag)).unwrap_or(true),
            };
            (key.to_string(), sub_field)
        })
        .collect()
}
