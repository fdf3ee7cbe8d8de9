//! Add-on id matching

/// Whether `installed` satisfies the requirement `required`.
///
/// Ids compare case-insensitively. An installed id also matches when it ends
/// with `.` followed by the required id, so `rust-lang.rust-analyzer`
/// satisfies `rust-analyzer`.
pub fn matches_installed(required: &str, installed: &str) -> bool {
    let required = required.to_lowercase();
    let installed = installed.to_lowercase();
    installed == required || installed.ends_with(&format!(".{required}"))
}

/// Required ids not satisfied by any installed id, in their original order
pub fn uninstalled(required: &[String], installed: &[String]) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for id in required {
        let satisfied = installed.iter().any(|have| matches_installed(id, have));
        let seen = missing.iter().any(|m| m.eq_ignore_ascii_case(id));
        if !satisfied && !seen {
            missing.push(id.clone());
        }
    }
    missing
}
