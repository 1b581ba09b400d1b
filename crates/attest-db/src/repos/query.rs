//! Permission-scoped acceptance test listing.
//!
//! [`build_filter`] turns a caller and its query parameters into a single SQL
//! statement; [`AttestService::list_acceptance_tests`] runs it and shapes each
//! row into the view the caller is entitled to.
//!
//! Rules:
//!
//! - Anonymous callers only see `validated` tests. Their `state`, `priority`
//!   and `user` parameters are ignored.
//! - Authenticated callers see `validated` and `pending` tests unless `state`
//!   narrows it; `priority` and `user` are single values matched exactly.
//! - `keyword` is conjunctive: a test must carry every requested keyword.
//! - `organization` joins the owner and keeps tests whose owner belongs to one
//!   of the requested organizations. Ownerless tests never match, and neither
//!   does anything listed for an anonymous caller, whose results carry no
//!   owner.
//!
//! Unknown state or priority strings are bound as-is and match nothing.

use std::collections::BTreeSet;

use attest_core::entities::PopulatedAcceptanceTest;
use attest_core::enums::TestState;
use attest_core::identity::Caller;
use attest_core::responses::{AcceptanceTestView, OwnerDetail};

use crate::error::DatabaseError;
use crate::helpers::placeholders;
use crate::repos::acceptance_test::{SELECT_COLS, row_to_acceptance_test};
use crate::service::AttestService;

/// Listing parameters. Set-valued fields treat an empty set as "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptanceTestQuery {
    pub states: Vec<String>,
    pub priority: Option<String>,
    pub user: Option<String>,
    pub keywords: Vec<String>,
    pub organizations: Vec<String>,
}

/// A compiled listing statement and its positional parameters.
#[derive(Debug, Clone)]
pub struct FilterSql {
    pub sql: String,
    pub params: Vec<libsql::Value>,
}

/// Sorted, de-duplicated copy of a parameter set.
fn as_set(values: &[String]) -> Vec<String> {
    values
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Bind `values` and return an `IN (...)` list referencing them.
fn bind_all(params: &mut Vec<libsql::Value>, values: Vec<String>) -> String {
    let start = params.len() + 1;
    let count = values.len();
    params.extend(values.into_iter().map(libsql::Value::Text));
    placeholders(start, count)
}

/// Compile the listing query for `caller`.
#[must_use]
pub fn build_filter(caller: Option<&Caller>, query: &AcceptanceTestQuery) -> FilterSql {
    let mut joins = Vec::new();
    let mut conditions = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();

    match caller {
        None => {
            params.push(TestState::Validated.as_str().into());
            conditions.push(format!("t.state = ?{}", params.len()));
        }
        Some(_) => {
            let states = if query.states.is_empty() {
                TestState::DEFAULT_MEMBER_STATES
                    .iter()
                    .map(|s| s.as_str().to_string())
                    .collect()
            } else {
                as_set(&query.states)
            };
            let list = bind_all(&mut params, states);
            conditions.push(format!("t.state IN ({list})"));

            if let Some(priority) = &query.priority {
                params.push(priority.as_str().into());
                conditions.push(format!("t.priority = ?{}", params.len()));
            }
            if let Some(user) = &query.user {
                params.push(user.as_str().into());
                conditions.push(format!("t.user_id = ?{}", params.len()));
            }
        }
    }

    if !query.keywords.is_empty() {
        let keywords = as_set(&query.keywords);
        let required = keywords.len();
        let list = bind_all(&mut params, keywords);
        conditions.push(format!(
            "t.id IN (SELECT acceptance_test_id FROM acceptance_test_keywords
                      WHERE keyword IN ({list})
                      GROUP BY acceptance_test_id
                      HAVING COUNT(DISTINCT keyword) = {required})"
        ));
    }

    if !query.organizations.is_empty() {
        if caller.is_some() {
            let list = bind_all(&mut params, as_set(&query.organizations));
            joins.push(format!(
                "JOIN users u ON u.id = t.user_id AND u.organization IN ({list})"
            ));
        } else {
            conditions.push("0".to_string());
        }
    }

    let mut sql = format!("SELECT {SELECT_COLS} FROM acceptance_tests t");
    for join in &joins {
        sql.push(' ');
        sql.push_str(join);
    }
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY t.created_at DESC, t.rowid DESC");

    FilterSql { sql, params }
}

impl AttestService {
    /// List acceptance tests visible to `caller`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any query fails; no partial list is returned.
    pub async fn list_acceptance_tests(
        &self,
        caller: Option<&Caller>,
        query: &AcceptanceTestQuery,
    ) -> Result<Vec<AcceptanceTestView>, DatabaseError> {
        let filter = build_filter(caller, query);
        tracing::debug!(sql = %filter.sql, params = filter.params.len(), "listing acceptance tests");

        let mut rows = self
            .db()
            .conn()
            .query(&filter.sql, libsql::params_from_iter(filter.params))
            .await?;

        let mut tests = Vec::new();
        while let Some(row) = rows.next().await? {
            tests.push(row_to_acceptance_test(&row)?);
        }

        let mut views = Vec::with_capacity(tests.len());
        for mut test in tests {
            self.fill_children(&mut test).await?;
            let owner = match (caller, test.user_id.as_deref()) {
                (Some(_), Some(user_id)) => self.find_user(user_id).await?,
                _ => None,
            };
            let last_execution = match test.last_execution_id.as_deref() {
                Some(execution_id) => self.find_execution(execution_id).await?,
                None => None,
            };
            let populated = PopulatedAcceptanceTest {
                test,
                owner,
                last_execution,
            };
            views.push(AcceptanceTestView::for_caller(
                caller,
                &populated,
                OwnerDetail::Organization,
            ));
        }
        Ok(views)
    }
}
