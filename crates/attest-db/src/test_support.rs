//! Shared test utilities for attest-db unit tests.

pub(crate) mod helpers {
    use attest_core::entities::{ExpectedResult, Situation, User};
    use attest_core::identity::Caller;

    use crate::AttestDb;
    use crate::repos::acceptance_test::NewAcceptanceTest;
    use crate::service::AttestService;

    /// Create an in-memory `AttestService` with the default evaluator.
    pub async fn test_service() -> AttestService {
        let db = AttestDb::open_local(":memory:").await.unwrap();
        AttestService::from_db(db)
    }

    /// Create a user and return it.
    pub async fn create_test_user(
        svc: &AttestService,
        email: &str,
        organization: Option<&str>,
        is_admin: bool,
    ) -> User {
        svc.create_user(email, "hash", organization, is_admin)
            .await
            .unwrap()
    }

    /// Caller identity for a stored user.
    pub fn caller_for(user: &User) -> Caller {
        Caller::from(user)
    }

    /// Create a draft situation owned by `user`.
    pub async fn create_test_situation(
        svc: &AttestService,
        user: &User,
        payload: serde_json::Value,
    ) -> Situation {
        svc.create_situation(Some(&user.id), &payload).await.unwrap()
    }

    /// New-test input with a name, keywords and a single `af` expected result.
    pub fn new_test(situation_id: &str, name: &str, keywords: &[&str]) -> NewAcceptanceTest {
        NewAcceptanceTest {
            situation_id: situation_id.to_string(),
            name: name.to_string(),
            description: None,
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            expected_results: vec![ExpectedResult {
                code: "af".into(),
                expected_value: serde_json::json!(131.16),
            }],
        }
    }
}
