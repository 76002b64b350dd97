//! Resource naming for Cloud Functions

/// Entry point exported by every packaged function
pub const ENTRY_POINT: &str = "main";

/// Canonical function name: `{package}--{name}` with every `.` and the first `@` replaced by `_`
///
/// `my.pkg` / `hello@1.2.3` becomes `my_pkg--hello_1_2_3`.
pub fn full_function_name(package_name: &str, name: &str) -> String {
    format!("{}--{}", package_name, name)
        .replace('.', "_")
        .replacen('@', "_", 1)
}

/// `projects/{project}/locations/{region}`
pub fn location_path(project_id: &str, region: &str) -> String {
    format!("projects/{}/locations/{}", project_id, region)
}

/// `projects/{project}/locations/{region}/functions/{full_name}`
pub fn function_resource_name(project_id: &str, region: &str, full_name: &str) -> String {
    format!("{}/functions/{}", location_path(project_id, region), full_name)
}

/// Host serving 1st gen HTTPS functions of a project/region
pub fn function_host(region: &str, project_id: &str) -> String {
    format!("{}-{}.cloudfunctions.net", region, project_id)
}

/// URL of a function when the live trigger URL is not known
pub fn fallback_function_url(region: &str, project_id: &str, full_name: &str) -> String {
    format!("https://{}/{}", function_host(region, project_id), full_name)
}

/// Runtime identifier, e.g. `nodejs18`
pub fn runtime(node_version: &str) -> String {
    format!("nodejs{}", node_version)
}

/// URL-encode a value and fold it into the label charset (`[a-z0-9_-]`, max 63 chars)
pub fn label_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(63)
        .collect()
}
