//! In-memory user store tests.

use std::collections::HashSet;
use std::sync::Arc;

use common::AppError;
use domain::{NewUser, User};
use user_service_lib::repository::{MemoryUserStore, UserRepository};

fn alice() -> NewUser {
    NewUser::new("Alice", "alice@example.com")
}

fn bob() -> NewUser {
    NewUser::new("Bob", "bob@example.com")
}

fn carol() -> NewUser {
    NewUser::new("Carol", "carol@example.com")
}

// =============================================================================
// Create / Get
// =============================================================================

#[tokio::test]
async fn test_create_assigns_increasing_ids_from_one() {
    let store = MemoryUserStore::new();

    let mut ids = Vec::new();
    for i in 0..5 {
        let user = store
            .create(NewUser::new(format!("user{}", i), format!("user{}@example.com", i)))
            .await
            .unwrap();
        ids.push(user.id);
    }

    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_get_returns_created_fields() {
    let store = MemoryUserStore::new();

    let created = store.create(alice()).await.unwrap();
    let fetched = store.get(created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(NewUser::from(fetched), alice());
}

#[tokio::test]
async fn test_get_on_empty_store_is_not_found() {
    let store = MemoryUserStore::new();

    let result = store.get(42).await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_negative_id_is_not_found() {
    let store = MemoryUserStore::new();
    store.create(alice()).await.unwrap();

    assert!(matches!(store.get(-1).await, Err(AppError::NotFound)));
    assert!(matches!(store.delete(-1).await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_store_does_not_validate_fields() {
    let store = MemoryUserStore::new();

    let user = store.create(NewUser::new("", "not-an-email")).await.unwrap();
    let twin = store.create(NewUser::new("", "not-an-email")).await.unwrap();

    assert_eq!(user.name, "");
    assert_ne!(user.id, twin.id);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_deleted_ids_are_never_reused() {
    let store = MemoryUserStore::new();

    let first = store.create(alice()).await.unwrap();
    let second = store.create(bob()).await.unwrap();
    assert_eq!((first.id, second.id), (1, 2));

    store.delete(1).await.unwrap();
    assert!(matches!(store.get(1).await, Err(AppError::NotFound)));

    let third = store.create(carol()).await.unwrap();
    assert_eq!(third.id, 3);
    assert_eq!(third.name, "Carol");
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let store = MemoryUserStore::new();
    store.create(alice()).await.unwrap();

    assert!(matches!(store.delete(9).await, Err(AppError::NotFound)));
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_double_delete_is_not_found() {
    let store = MemoryUserStore::new();
    let user = store.create(alice()).await.unwrap();

    store.delete(user.id).await.unwrap();

    assert!(matches!(store.delete(user.id).await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_ids_keep_growing_after_store_is_emptied() {
    let store = MemoryUserStore::new();
    for _ in 0..3 {
        let user = store.create(alice()).await.unwrap();
        store.delete(user.id).await.unwrap();
    }

    let next = store.create(bob()).await.unwrap();

    assert_eq!(next.id, 4);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_replaces_fields_and_keeps_id() {
    let store = MemoryUserStore::new();
    store.create(alice()).await.unwrap();
    store.create(bob()).await.unwrap();

    let updated = store
        .update(2, NewUser::new("Bobby", "bobby@example.com"))
        .await
        .unwrap();

    let expected = User {
        id: 2,
        name: "Bobby".to_string(),
        email: "bobby@example.com".to_string(),
    };
    assert_eq!(updated, expected);
    assert_eq!(store.get(2).await.unwrap(), expected);
    assert_eq!(store.get(1).await.unwrap().name, "Alice");
}

#[tokio::test]
async fn test_update_with_id_from_other_record_keeps_target_id() {
    let store = MemoryUserStore::new();
    store.create(alice()).await.unwrap();
    let bob = store.create(bob()).await.unwrap();

    // Input built from a different stored user still lands on the target id
    let other = store.get(1).await.unwrap();
    let updated = store.update(bob.id, NewUser::from(other)).await.unwrap();

    assert_eq!(updated.id, bob.id);
    assert_eq!(updated.name, "Alice");
    assert_eq!(store.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_missing_is_not_found_and_changes_nothing() {
    let store = MemoryUserStore::new();
    let alice = store.create(alice()).await.unwrap();

    let result = store.update(7, bob()).await;
    assert!(matches!(result, Err(AppError::NotFound)));

    assert_eq!(store.list().await.unwrap(), vec![alice]);
    // The failed update must not have consumed an id either
    assert_eq!(store.create(carol()).await.unwrap().id, 2);
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_list_on_fresh_store_is_empty() {
    let store = MemoryUserStore::new();

    let users = store.list().await.unwrap();

    assert!(users.is_empty());
}

#[tokio::test]
async fn test_list_counts_current_records() {
    let store = MemoryUserStore::new();
    store.create(alice()).await.unwrap();
    store.create(bob()).await.unwrap();
    store.create(carol()).await.unwrap();
    store.delete(2).await.unwrap();

    let users = store.list().await.unwrap();
    let ids: HashSet<i32> = users.iter().map(|u| u.id).collect();

    assert_eq!(users.len(), 2);
    assert_eq!(ids, HashSet::from([1, 3]));
}

#[tokio::test]
async fn test_list_is_empty_after_deleting_everything() {
    let store = MemoryUserStore::new();
    let a = store.create(alice()).await.unwrap();
    let b = store.create(bob()).await.unwrap();

    store.delete(a.id).await.unwrap();
    store.delete(b.id).await.unwrap();

    assert!(store.list().await.unwrap().is_empty());
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_distinct_ids() {
    const TASKS: usize = 200;
    let store = Arc::new(MemoryUserStore::new());

    let handles: Vec<_> = (0..TASKS)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .create(NewUser::new(format!("user{}", i), format!("user{}@example.com", i)))
                    .await
                    .unwrap()
                    .id
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap()));
    }

    assert_eq!(ids.len(), TASKS);
    assert_eq!(ids, (1..=TASKS as i32).collect::<HashSet<_>>());
    assert_eq!(store.list().await.unwrap().len(), TASKS);
}

#[test]
fn test_creates_from_os_threads_do_not_collide() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 50;
    let store = MemoryUserStore::new();

    let ids: Vec<i32> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let store = &store;
                scope.spawn(move || {
                    (0..PER_THREAD)
                        .map(|i| {
                            let user = NewUser::new(format!("t{}-{}", t, i), "x@example.com");
                            futures::executor::block_on(store.create(user)).unwrap().id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let unique: HashSet<i32> = ids.iter().copied().collect();
    assert_eq!(unique.len(), THREADS * PER_THREAD);
    assert_eq!(
        futures::executor::block_on(store.list()).unwrap().len(),
        THREADS * PER_THREAD
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mixed_operations_keep_map_consistent() {
    let store = Arc::new(MemoryUserStore::new());
    for i in 0..50 {
        store
            .create(NewUser::new(format!("seed{}", i), "seed@example.com"))
            .await
            .unwrap();
    }

    let mut handles = Vec::new();
    for id in 1..=50 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            if id % 2 == 0 {
                store.delete(id).await.unwrap();
            } else {
                store
                    .update(id, NewUser::new(format!("updated{}", id), "u@example.com"))
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let users = store.list().await.unwrap();
    assert_eq!(users.len(), 25);
    for user in users {
        assert_eq!(user.id % 2, 1);
        assert_eq!(user.name, format!("updated{}", user.id));
        assert_eq!(store.get(user.id).await.unwrap().id, user.id);
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_scenario_create_delete_recreate() {
    let store = MemoryUserStore::new();

    assert_eq!(store.create(alice()).await.unwrap().id, 1);
    assert_eq!(store.create(bob()).await.unwrap().id, 2);
    store.delete(1).await.unwrap();
    assert!(matches!(store.get(1).await, Err(AppError::NotFound)));
    assert_eq!(store.create(carol()).await.unwrap().id, 3);

    let bobby = store
        .update(2, NewUser::new("Bobby", "bobby@example.com"))
        .await
        .unwrap();
    assert_eq!(
        bobby,
        User {
            id: 2,
            name: "Bobby".to_string(),
            email: "bobby@example.com".to_string(),
        }
    );
}

#[tokio::test]
async fn test_stores_are_independent() {
    let first = MemoryUserStore::new();
    let second = MemoryUserStore::default();

    first.create(alice()).await.unwrap();
    first.create(bob()).await.unwrap();

    assert!(second.list().await.unwrap().is_empty());
    assert_eq!(second.create(carol()).await.unwrap().id, 1);
}
