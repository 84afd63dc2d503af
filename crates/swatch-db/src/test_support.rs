//! Shared test utilities for swatch-db unit tests.

use swatch_core::identity::Actor;

use crate::SwatchDb;
use crate::service::SwatchService;

/// Create an in-memory service.
pub async fn test_service() -> SwatchService {
    let db = SwatchDb::open_local(":memory:").await.unwrap();
    SwatchService::from_db(db)
}

/// Create the first (admin) user and a second, regular user.
pub async fn admin_and_user(svc: &SwatchService) -> (Actor, Actor) {
    let admin = svc.create_user(None, "admin", false).await.unwrap();
    let admin = Actor::from(&admin);
    let user = svc.create_user(Some(&admin), "ada", false).await.unwrap();
    (admin, Actor::from(&user))
}

/// In-memory service plus a regular (non-admin) user.
pub async fn service_with_owner() -> (SwatchService, Actor) {
    let svc = test_service().await;
    let (_, user) = admin_and_user(&svc).await;
    (svc, user)
}
