//! Naming helpers for deployment nodes.
//!
//! Node names are the only keys the orchestrator sees; they are derived
//! from stack tag, region, and a kebab-cased class or app identifier so
//! the same input always produces the same key.

/// Converts an identifier to kebab-case.
///
/// Handles `UpperCamel`, `snake_case`, and space-separated input;
/// consecutive capitals are kept together (`"DBStack"` becomes
/// `"db-stack"`).
#[must_use]
pub fn kebab_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let chars: Vec<char> = input.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == ' ' || c == '-' {
            if !out.ends_with('-') && !out.is_empty() {
                out.push('-');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev_lower = i > 0 && chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if !out.is_empty() && !out.ends_with('-') && (prev_lower || (prev_upper && next_lower))
            {
                out.push('-');
            }
            for lower in c.to_lowercase() {
                out.push(lower);
            }
        } else {
            out.push(c);
        }
    }

    out
}

/// Converts a kebab- or snake-case identifier to `UpperCamelCase`.
#[must_use]
pub fn upper_camel(input: &str) -> String {
    input
        .split(|c: char| c == '-' || c == '_' || c == ' ')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Name of the cloud-formation node for a stack group.
#[must_use]
pub fn cfn_node_name(stack_tag: &str, region: &str, template_class: &str) -> String {
    format!("cfn-{stack_tag}-{region}-{}", kebab_case(template_class))
}

/// Name of an artifact node (`function-upload`, `scaling-deploy`, ...).
#[must_use]
pub fn artifact_node_name(prefix: &str, stack_tag: &str, region: &str, app: &str) -> String {
    format!("{prefix}-{stack_tag}-{region}-{}", kebab_case(app))
}
