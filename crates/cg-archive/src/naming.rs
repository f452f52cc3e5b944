//! Entry name collision resolution.

use cg_core::sanitize_filename;
use std::collections::{HashMap, HashSet};

/// `<base>_<n>.<ext>`, splitting on the last `.`; names without a `.` get
/// the suffix appended.
pub fn numbered_name(name: &str, n: usize) -> String {
    match name.rfind('.') {
        Some(dot) => format!("{}_{}.{}", &name[..dot], n, &name[dot + 1..]),
        None => format!("{name}_{n}"),
    }
}

/// Sanitize and de-duplicate names in input order. The first occurrence keeps
/// its name; the Nth repeat becomes `<base>_<N>.<ext>`. A generated name that
/// is already in use is bumped further, so the output never repeats.
pub fn resolve_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();
    let mut resolved = Vec::new();

    for raw in names {
        let name = sanitize_filename(raw);
        let count = counts.entry(name.clone()).or_insert(0);
        *count += 1;

        let mut n = *count;
        let mut candidate = if n == 1 { name.clone() } else { numbered_name(&name, n) };
        while taken.contains(&candidate) {
            n += 1;
            candidate = numbered_name(&name, n);
        }
        *count = n;

        taken.insert(candidate.clone());
        resolved.push(candidate);
    }
    resolved
}
