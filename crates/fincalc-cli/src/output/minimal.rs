use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Priority list of key output fields
    let priority_keys = [
        "monthly_payment",
        "max_purchase_price",
        "final_nominal_value",
        "final_real_value_retained",
        "equivalent_amount",
        "final_premium",
        "replacement_price_increase",
        "reference_label",
    ];

    if let Value::Object(map) = result_obj {
        // Try priority keys first (skip null values)
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", super::cell(val));
                    return;
                }
            }
        }

        // Then one level down, e.g. the loan inside an auto-loan result
        for key in &priority_keys {
            let nested = map
                .values()
                .filter_map(Value::as_object)
                .find_map(|child| child.get(*key).filter(|v| !v.is_null()));
            if let Some(val) = nested {
                println!("{}", super::cell(val));
                return;
            }
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, super::cell(val));
            return;
        }
    }

    // Not an object, just print directly
    println!("{}", super::cell(result_obj));
}
