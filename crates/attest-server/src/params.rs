//! Listing query-string parsing.
//!
//! Each filter may be given once (`state=pending`), repeated
//! (`state=pending&state=rejected`) or in bracket form (`state[]=pending`).
//! `state`, `keyword` and `organization` collapse into a set; `priority` and
//! `user` are single-valued and keep the first value given.

use attest_db::repos::query::AcceptanceTestQuery;

/// Parse a raw query string into listing filters. Unknown keys and empty
/// values are ignored.
#[must_use]
pub fn parse_list_query(raw: Option<&str>) -> AcceptanceTestQuery {
    let mut query = AcceptanceTestQuery::default();
    let Some(raw) = raw else {
        return query;
    };

    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let target = match key.strip_suffix("[]").unwrap_or(&*key) {
            "state" => &mut query.states,
            "keyword" => &mut query.keywords,
            "organization" => &mut query.organizations,
            "priority" => {
                query.priority.get_or_insert_with(|| value.to_string());
                continue;
            }
            "user" => {
                query.user.get_or_insert_with(|| value.to_string());
                continue;
            }
            _ => continue,
        };
        if !target.iter().any(|existing| existing == value) {
            target.push(value.to_string());
        }
    }
    query
}
