//! Credential store tests against a real Postgres database

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use warung_server::db::run_migrations;
    use warung_server::models::Role;
    use warung_server::store::{
        CredentialChanges, NewAccount, PgUserStore, StoreError, UserStore,
    };

    /// Helper to create a migrated test database pool
    async fn setup_test_db() -> PgPool {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/warung_test".to_string());

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(4)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        run_migrations(&pool).await.expect("migrations");
        pool
    }

    /// Usernames unique per run so tests do not collide with leftovers
    fn unique(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("{}-{}", prefix, nanos)
    }

    fn new_account(username: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            password_hash: "$2b$04$placeholderplaceholderplaceholderplaceholderpla".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_concurrent_create_single_row() {
        let store = Arc::new(PgUserStore::new(setup_test_db().await));
        let username = unique("racer");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                let account = new_account(&username);
                tokio::spawn(async move { store.create(account).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(StoreError::Conflict(_)) => {}
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        assert_eq!(created, 1);

        let account = store.find_by_username(&username).await.unwrap().unwrap();
        store.delete(account.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_update_and_delete() {
        let store = PgUserStore::new(setup_test_db().await);
        let first = store.create(new_account(&unique("first"))).await.unwrap();
        let second = store.create(new_account(&unique("second"))).await.unwrap();

        let err = store
            .update_credentials(
                second.id,
                CredentialChanges {
                    username: Some(first.username.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let promoted = store
            .update_credentials(
                second.id,
                CredentialChanges {
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(promoted.role, Role::Admin);
        assert_eq!(promoted.username, second.username);

        let err = store
            .update_credentials(i32::MAX, CredentialChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));

        let listed = store.list().await.unwrap();
        assert!(listed.windows(2).all(|w| w[0].id < w[1].id));

        store.delete(first.id).await.unwrap();
        store.delete(first.id).await.unwrap();
        store.delete(second.id).await.unwrap();
        assert!(store.find_by_id(first.id).await.unwrap().is_none());
    }
}
