pub fn normalize_vault_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .collect::<Vec<_>>()
        .join("/")
}

pub fn in_scope(path: &str, folder: &str) -> bool {
    let folder = normalize_vault_path(folder);
    if folder.is_empty() {
        return true;
    }

    let path = normalize_vault_path(path);
    path.strip_prefix(&folder)
        .is_some_and(|rest| rest.starts_with('/'))
}

pub fn sanitize_folder(folder: &str) -> String {
    let without_parent_refs = folder.replace('\\', "/").replace("..", "");
    without_parent_refs
        .split('/')
        .filter(|segment| !segment.trim().is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn sanitize_date_key(date_key: &str) -> String {
    date_key
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

pub fn derived_note_path(folder: &str, date_key: &str) -> String {
    let folder = sanitize_folder(folder);
    let key = sanitize_date_key(date_key);
    if folder.is_empty() {
        format!("{key}.md")
    } else {
        format!("{folder}/{key}.md")
    }
}
