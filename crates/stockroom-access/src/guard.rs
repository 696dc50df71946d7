//! Stock authorization guard.
//!
//! One decision per guarded request, made in this order (first failure
//! wins):
//!
//! 1. no authenticated caller: `Unauthenticated`
//! 2. stock id is not a positive integer: `InvalidIdentifier`
//! 3. caller does not map to a user: `UserNotFound`
//! 4. stock does not exist: `ResourceNotFound`
//! 5. caller owns the stock: allowed, no collaborator lookup
//! 6. no collaborator record: `NoAccess`; otherwise the collaborator's
//!    role must grant the required permission (`InsufficientRole`).
//!
//! A denial is a value, not an error: repository failures come back as
//! `Err` and are never turned into denials.

use stockroom_core::error::{AccessDenied, StockroomError, StockroomResult};
use stockroom_core::models::permission::Permission;
use stockroom_core::models::stock_role::StockRole;
use stockroom_core::repository::{StockRepository, UserRepository};
use tracing::{debug, info};

/// The already-authenticated subject of a request, if any.
///
/// Token verification happens upstream; this only carries its result
/// (the user's email).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(Option<String>);

impl Caller {
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self(Some(subject.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn subject(&self) -> Option<&str> {
        self.0.as_deref().filter(|s| !s.is_empty())
    }
}

/// Outcome of a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision<G> {
    Allowed(G),
    Denied(AccessDenied),
}

impl<G> AccessDecision<G> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed(_))
    }

    pub fn denial(&self) -> Option<&AccessDenied> {
        match self {
            AccessDecision::Allowed(_) => None,
            AccessDecision::Denied(reason) => Some(reason),
        }
    }

    /// `Ok(grant)` if allowed, `Err(AccessDenied)` otherwise.
    pub fn into_result(self) -> StockroomResult<G> {
        match self {
            AccessDecision::Allowed(grant) => Ok(grant),
            AccessDecision::Denied(reason) => Err(StockroomError::AccessDenied(reason)),
        }
    }
}

/// What an allowed caller may do on a stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockGrant {
    pub stock_id: i64,
    pub user_id: i64,
    /// `Owner` for the owner, the collaborator's role otherwise.
    pub role: StockRole,
    pub is_owner: bool,
}

/// Parse a path identifier. Only positive integers are accepted.
pub fn parse_identifier(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// Map the caller to a user id, or say why that is impossible.
pub(crate) async fn resolve_user<U: UserRepository>(
    users: &U,
    caller: &Caller,
) -> StockroomResult<Result<i64, AccessDenied>> {
    let Some(subject) = caller.subject() else {
        return Ok(Err(AccessDenied::Unauthenticated));
    };
    match users.find_id_by_email(subject).await? {
        Some(user_id) => Ok(Ok(user_id)),
        None => Ok(Err(AccessDenied::UserNotFound)),
    }
}

/// Authorization guard for stock resources.
pub struct StockGuard<'r, U: UserRepository, S: StockRepository> {
    users: &'r U,
    stocks: &'r S,
}

impl<'r, U: UserRepository, S: StockRepository> StockGuard<'r, U, S> {
    pub fn new(users: &'r U, stocks: &'r S) -> Self {
        Self { users, stocks }
    }

    pub async fn authorize(
        &self,
        caller: &Caller,
        raw_stock_id: &str,
        required: Permission,
    ) -> StockroomResult<AccessDecision<StockGrant>> {
        let decision = self.decide(caller, raw_stock_id, required).await?;
        match &decision {
            AccessDecision::Allowed(grant) => debug!(
                stock_id = grant.stock_id,
                user_id = grant.user_id,
                role = %grant.role,
                permission = %required,
                "Stock access granted"
            ),
            AccessDecision::Denied(reason) => info!(
                stock_id = raw_stock_id,
                permission = %required,
                reason = %reason,
                "Stock access denied"
            ),
        }
        Ok(decision)
    }

    async fn decide(
        &self,
        caller: &Caller,
        raw_stock_id: &str,
        required: Permission,
    ) -> StockroomResult<AccessDecision<StockGrant>> {
        if caller.subject().is_none() {
            return Ok(AccessDecision::Denied(AccessDenied::Unauthenticated));
        }

        let Some(stock_id) = parse_identifier(raw_stock_id) else {
            return Ok(AccessDecision::Denied(AccessDenied::InvalidIdentifier {
                raw: raw_stock_id.to_owned(),
            }));
        };

        let user_id = match resolve_user(self.users, caller).await? {
            Ok(user_id) => user_id,
            Err(reason) => return Ok(AccessDecision::Denied(reason)),
        };

        let ownership = self.stocks.find_ownership(stock_id).await?;
        if !ownership.exists {
            return Ok(AccessDecision::Denied(AccessDenied::ResourceNotFound {
                resource: "stock",
                id: stock_id,
            }));
        }

        if ownership.owner_user_id == Some(user_id) {
            return Ok(AccessDecision::Allowed(StockGrant {
                stock_id,
                user_id,
                role: StockRole::Owner,
                is_owner: true,
            }));
        }

        let Some(raw_role) = self
            .stocks
            .find_collaborator_role(stock_id, user_id)
            .await?
        else {
            return Ok(AccessDecision::Denied(AccessDenied::NoAccess {
                resource: "stock",
            }));
        };

        let role: StockRole = raw_role.parse().map_err(|e| {
            StockroomError::Internal(format!(
                "stored collaborator role for stock {stock_id}: {e}"
            ))
        })?;

        if role.has_required_permission(required) {
            Ok(AccessDecision::Allowed(StockGrant {
                stock_id,
                user_id,
                role,
                is_owner: false,
            }))
        } else {
            Ok(AccessDecision::Denied(AccessDenied::insufficient(
                role, required,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeStocks, FakeUsers};

    const OWNER: &str = "owner@example.com";
    const VIEWER: &str = "viewer@example.com";
    const EDITOR: &str = "editor@example.com";
    const CONTRIBUTOR: &str = "contrib@example.com";
    const STRANGER: &str = "stranger@example.com";

    /// Users 1..=5, stock 10 owned by user 1 with one collaborator per role.
    fn fixtures() -> (FakeUsers, FakeStocks) {
        let users = FakeUsers::with(&[
            (1, OWNER),
            (2, VIEWER),
            (3, EDITOR),
            (4, CONTRIBUTOR),
            (5, STRANGER),
        ]);
        let stocks = FakeStocks::default();
        stocks.insert_owned(10, 1);
        stocks.insert_role(10, 2, "VIEWER");
        stocks.insert_role(10, 3, "EDITOR");
        stocks.insert_role(10, 4, "VIEWER_CONTRIBUTOR");
        (users, stocks)
    }

    async fn decide(
        users: &FakeUsers,
        stocks: &FakeStocks,
        caller: Caller,
        stock_id: &str,
        permission: Permission,
    ) -> AccessDecision<StockGrant> {
        StockGuard::new(users, stocks)
            .authorize(&caller, stock_id, permission)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn anonymous_caller_is_unauthenticated() {
        let (users, stocks) = fixtures();
        let decision = decide(&users, &stocks, Caller::anonymous(), "10", Permission::Read).await;
        assert_eq!(decision.denial(), Some(&AccessDenied::Unauthenticated));

        let empty = decide(
            &users,
            &stocks,
            Caller::authenticated(""),
            "10",
            Permission::Read,
        )
        .await;
        assert_eq!(empty.denial(), Some(&AccessDenied::Unauthenticated));
    }

    #[tokio::test]
    async fn unauthenticated_wins_over_bad_identifier() {
        let (users, stocks) = fixtures();
        let decision =
            decide(&users, &stocks, Caller::anonymous(), "abc", Permission::Read).await;
        assert_eq!(decision.denial(), Some(&AccessDenied::Unauthenticated));
    }

    #[tokio::test]
    async fn malformed_identifiers_are_rejected() {
        let (users, stocks) = fixtures();
        for raw in ["abc", "", "0", "-4", "1.5"] {
            let decision = decide(
                &users,
                &stocks,
                Caller::authenticated(OWNER),
                raw,
                Permission::Read,
            )
            .await;
            assert_eq!(
                decision.denial(),
                Some(&AccessDenied::InvalidIdentifier { raw: raw.into() }),
                "{raw:?}"
            );
        }
    }

    #[tokio::test]
    async fn unknown_user_is_denied_before_stock_lookup() {
        let (users, stocks) = fixtures();
        let decision = decide(
            &users,
            &stocks,
            Caller::authenticated("ghost@example.com"),
            "999",
            Permission::Read,
        )
        .await;
        assert_eq!(decision.denial(), Some(&AccessDenied::UserNotFound));
    }

    #[tokio::test]
    async fn missing_stock_is_not_found() {
        let (users, stocks) = fixtures();
        let decision = decide(
            &users,
            &stocks,
            Caller::authenticated(OWNER),
            "999",
            Permission::Read,
        )
        .await;
        assert_eq!(
            decision.denial(),
            Some(&AccessDenied::ResourceNotFound {
                resource: "stock",
                id: 999
            })
        );
    }

    #[tokio::test]
    async fn owner_has_every_permission_without_collaborator_lookup() {
        let (users, stocks) = fixtures();
        for permission in Permission::ALL {
            let decision = decide(
                &users,
                &stocks,
                Caller::authenticated(OWNER),
                "10",
                permission,
            )
            .await;
            assert_eq!(
                decision,
                AccessDecision::Allowed(StockGrant {
                    stock_id: 10,
                    user_id: 1,
                    role: StockRole::Owner,
                    is_owner: true,
                })
            );
        }
        assert_eq!(stocks.collaborator_lookups(), 0);
    }

    #[tokio::test]
    async fn viewer_cannot_write() {
        let (users, stocks) = fixtures();
        let decision = decide(
            &users,
            &stocks,
            Caller::authenticated(VIEWER),
            "10",
            Permission::Write,
        )
        .await;
        let denial = decision.denial().unwrap();
        assert_eq!(
            denial,
            &AccessDenied::InsufficientRole {
                role: "VIEWER".into(),
                permission: "write".into(),
            }
        );
        assert!(denial.to_string().contains("VIEWER"));
        assert!(denial.to_string().contains("write"));
    }

    #[tokio::test]
    async fn collaborator_roles_follow_the_permission_table() {
        let (users, stocks) = fixtures();
        let cases = [
            (VIEWER, Permission::Read, true),
            (VIEWER, Permission::Suggest, false),
            (EDITOR, Permission::Write, true),
            (EDITOR, Permission::Suggest, true),
            (CONTRIBUTOR, Permission::Suggest, true),
            (CONTRIBUTOR, Permission::Write, false),
        ];
        for (subject, permission, allowed) in cases {
            let decision = decide(
                &users,
                &stocks,
                Caller::authenticated(subject),
                "10",
                permission,
            )
            .await;
            assert_eq!(decision.is_allowed(), allowed, "{subject} / {permission}");
        }
    }

    #[tokio::test]
    async fn stranger_has_no_access() {
        let (users, stocks) = fixtures();
        let decision = decide(
            &users,
            &stocks,
            Caller::authenticated(STRANGER),
            "10",
            Permission::Read,
        )
        .await;
        assert_eq!(
            decision.denial(),
            Some(&AccessDenied::NoAccess { resource: "stock" })
        );
    }

    #[tokio::test]
    async fn corrupt_stored_role_is_an_error_not_a_denial() {
        let (users, stocks) = fixtures();
        stocks.insert_role(10, 5, "SUPERUSER");
        let result = StockGuard::new(&users, &stocks)
            .authorize(&Caller::authenticated(STRANGER), "10", Permission::Read)
            .await;
        assert!(matches!(result, Err(StockroomError::Internal(_))));
    }

    #[tokio::test]
    async fn repository_failure_propagates() {
        let (users, stocks) = fixtures();
        stocks.fail_next("connection reset");
        let result = StockGuard::new(&users, &stocks)
            .authorize(&Caller::authenticated(OWNER), "10", Permission::Read)
            .await;
        assert!(matches!(result, Err(StockroomError::Database(msg)) if msg == "connection reset"));
    }

    #[tokio::test]
    async fn decision_is_idempotent() {
        let (users, stocks) = fixtures();
        let guard = StockGuard::new(&users, &stocks);
        let caller = Caller::authenticated(EDITOR);
        let first = guard.authorize(&caller, "10", Permission::Write).await.unwrap();
        let second = guard.authorize(&caller, "10", Permission::Write).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn into_result_maps_denial() {
        let denied: AccessDecision<StockGrant> = AccessDecision::Denied(AccessDenied::UserNotFound);
        assert!(matches!(
            denied.into_result(),
            Err(StockroomError::AccessDenied(AccessDenied::UserNotFound))
        ));
    }

    #[test]
    fn identifiers() {
        assert_eq!(parse_identifier("42"), Some(42));
        assert_eq!(parse_identifier(" 7 "), Some(7));
        assert_eq!(parse_identifier("0"), None);
        assert_eq!(parse_identifier("x1"), None);
    }
}
