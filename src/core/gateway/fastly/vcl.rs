//! VCL generation for the load-balancing service
//!
//! Pure functions over [`BackendTarget`]s; the same input always yields the
//! same VCL text.

use crate::core::traits::Deployer;

/// Gateway-facing projection of a deployer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    /// Backend name; also the prefix of the health check name
    pub name: String,
    /// Origin host
    pub host: String,
    /// Path prefix of the function on the origin
    pub base_path: String,
    /// VCL expression evaluating to the backend request URL
    pub url_vcl: String,
    /// Extra VCL appended to the fallback branch
    pub custom_vcl: String,
}

impl From<&dyn Deployer> for BackendTarget {
    fn from(deployer: &dyn Deployer) -> Self {
        Self {
            name: deployer.name().to_string(),
            host: deployer.host(),
            base_path: deployer.base_path(),
            url_vcl: deployer.url_vcl(),
            custom_vcl: deployer.custom_vcl(),
        }
    }
}

impl BackendTarget {
    /// VCL identifier of this target's backend
    pub fn ident(&self) -> String {
        vcl_backend_ident(&self.name)
    }

    /// Name of this target's health check
    pub fn healthcheck_name(&self) -> String {
        format!("{}Check", self.name)
    }
}

/// VCL identifier Fastly derives from a backend name: `F_` plus the name
/// with every character outside `[A-Za-z0-9_]` replaced by `_`
pub fn vcl_backend_ident(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("F_{}", sanitized)
}

/// Join a base path and a check path, collapsing a trailing `/` on the base
pub fn healthcheck_path(base_path: &str, checkpath: &str) -> String {
    format!("{}{}", base_path.trim_end_matches('/'), checkpath)
}

/// `recv` snippet: pick a random healthy backend.
///
/// Draws `i` in `[0, N-1]`; the first target whose index is `>= i` and which
/// is healthy wins. When none qualifies the first target is used
/// unconditionally, followed by its custom VCL. Returns an empty string for
/// an empty target list.
pub fn backend_selection_vcl(targets: &[BackendTarget]) -> String {
    let Some(first) = targets.first() else {
        return String::new();
    };

    let mut vcl = String::new();
    vcl.push_str("declare local var.i INTEGER;\n");
    vcl.push_str(&format!("set var.i = randomint(0, {});\n", targets.len() - 1));

    for (index, target) in targets.iter().enumerate() {
        let ident = target.ident();
        if index > 0 {
            vcl.push_str("} else ");
        }
        vcl.push_str(&format!(
            "if (var.i <= {} && backend.{}.healthy) {{\n  set req.backend = {};\n",
            index, ident, ident
        ));
    }

    vcl.push_str("} else {\n");
    vcl.push_str(&format!("  set req.backend = {};\n", first.ident()));
    if !first.custom_vcl.is_empty() {
        vcl.push_str(&format!("  {}\n", first.custom_vcl));
    }
    vcl.push_str("}\n");
    vcl
}

/// `miss`/`pass` snippet: rewrite the backend request URL per backend
pub fn url_rewrite_vcl(targets: &[BackendTarget]) -> String {
    targets
        .iter()
        .map(|target| {
            format!(
                "if (req.backend == {}) {{\n  set bereq.url = {};\n}}\n",
                target.ident(),
                target.url_vcl
            )
        })
        .collect()
}

/// `fetch` snippet: expose the chosen backend on the response
pub fn log_url_vcl() -> String {
    "set beresp.http.X-Backend-URL = bereq.url;\nset beresp.http.X-Backend-Name = req.backend;\n"
        .to_string()
}
