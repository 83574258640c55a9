pub fn branch_prefix() -> String {
    "previews/".to_string()
}

pub fn retention_days() -> i64 {
    30
}
