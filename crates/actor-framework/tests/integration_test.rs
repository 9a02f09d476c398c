use actor_framework::{ActorEntity, FrameworkError, JsonSnapshot, ResourceActor};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Locker {
    id: u32,
    name: String,
    tokens: Vec<String>,
}

#[derive(Debug)]
struct LockerCreate {
    name: String,
    tokens: Vec<String>,
}

#[derive(Debug)]
struct LockerUpdate {
    name: Option<String>,
}

#[derive(Debug)]
enum LockerAction {
    /// Removes `n` tokens, failing without side effects when fewer remain.
    Take(usize),
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum LockerError {
    #[error("only {available} tokens left")]
    Short { available: usize },
    #[error("name must not be blank")]
    BlankName,
}

#[async_trait]
impl ActorEntity for Locker {
    type Id = u32;
    type Create = LockerCreate;
    type Update = LockerUpdate;
    type Action = LockerAction;
    type ActionResult = Vec<String>;
    type Context = ();
    type Error = LockerError;

    fn id(&self) -> u32 {
        self.id
    }

    fn from_create_params(id: u32, params: LockerCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(LockerError::BlankName);
        }
        Ok(Self {
            id,
            name: params.name,
            tokens: params.tokens,
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn validate(&self) -> Result<(), Self::Error> {
        if self.name.trim().is_empty() {
            return Err(LockerError::BlankName);
        }
        Ok(())
    }

    async fn on_update(&mut self, update: LockerUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            self.name = name;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: LockerAction,
        _ctx: &(),
    ) -> Result<Vec<String>, Self::Error> {
        match action {
            LockerAction::Take(n) => {
                // Drain first, then check, so a failure exercises the draft rollback.
                let taken: Vec<String> = self.tokens.drain(..n.min(self.tokens.len())).collect();
                if taken.len() < n {
                    return Err(LockerError::Short {
                        available: taken.len(),
                    });
                }
                Ok(taken)
            }
        }
    }
}

fn locker(name: &str, tokens: &[&str]) -> LockerCreate {
    LockerCreate {
        name: name.into(),
        tokens: tokens.iter().map(|t| t.to_string()).collect(),
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<Locker>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.create(locker("north", &["a", "b", "c"])).await.unwrap();
    assert_eq!(id, 1);

    let taken = client.perform_action(id, LockerAction::Take(2)).await.unwrap();
    assert_eq!(taken, vec!["a", "b"]);

    let updated = client
        .update(
            id,
            LockerUpdate {
                name: Some("south".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "south");
    assert_eq!(updated.tokens, vec!["c"]);

    let all = client.list().await.unwrap();
    assert_eq!(all, vec![updated]);

    assert!(client.get(42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_action_leaves_entity_untouched() {
    let (actor, client) = ResourceActor::<Locker>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.create(locker("north", &["a", "b"])).await.unwrap();

    let result = client.perform_action(id, LockerAction::Take(3)).await;
    assert!(matches!(
        result,
        Err(FrameworkError::Entity(LockerError::Short { available: 2 }))
    ));

    let stored = client.get(id).await.unwrap().unwrap();
    assert_eq!(stored.tokens, vec!["a", "b"]);
}

#[tokio::test]
async fn test_missing_entity_and_create_errors() {
    let (actor, client) = ResourceActor::<Locker>::new(10);
    tokio::spawn(actor.run(()));

    let result = client.perform_action(9, LockerAction::Take(1)).await;
    assert!(matches!(result, Err(FrameworkError::NotFound(id)) if id == "9"));

    let result = client.create(locker("  ", &[])).await;
    assert!(matches!(
        result,
        Err(FrameworkError::Entity(LockerError::BlankName))
    ));
    assert!(client.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unique_key_conflicts_on_create_and_update() {
    let (actor, client) = ResourceActor::<Locker>::new(10);
    tokio::spawn(actor.run(()));

    client.create(locker("north", &[])).await.unwrap();
    let south = client.create(locker("south", &[])).await.unwrap();

    let dup = client.create(locker("north", &[])).await;
    assert!(matches!(dup, Err(FrameworkError::Conflict(key)) if key == "north"));

    let rename = client
        .update(
            south,
            LockerUpdate {
                name: Some("north".into()),
            },
        )
        .await;
    assert!(matches!(rename, Err(FrameworkError::Conflict(_))));
    assert_eq!(client.get(south).await.unwrap().unwrap().name, "south");

    // Re-saving under its own key is not a conflict
    let same = client
        .update(
            south,
            LockerUpdate {
                name: Some("south".into()),
            },
        )
        .await;
    assert!(same.is_ok());
}

#[tokio::test]
async fn test_snapshot_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lockers.json");

    let (actor, client) = ResourceActor::<Locker>::new(10);
    let actor = actor
        .with_persistence(Box::new(JsonSnapshot::new(&path)))
        .unwrap();
    let handle = tokio::spawn(actor.run(()));

    let id = client.create(locker("north", &["a", "b", "c"])).await.unwrap();
    client.perform_action(id, LockerAction::Take(1)).await.unwrap();
    drop(client);
    handle.await.unwrap();

    let (actor, client) = ResourceActor::<Locker>::new(10);
    let actor = actor
        .with_persistence(Box::new(JsonSnapshot::new(&path)))
        .unwrap();
    tokio::spawn(actor.run(()));

    let restored = client.get(id).await.unwrap().unwrap();
    assert_eq!(restored.tokens, vec!["b", "c"]);

    // Ids continue after the restored counter
    let next = client.create(locker("south", &[])).await.unwrap();
    assert_eq!(next, 2);
}

#[tokio::test]
async fn test_corrupt_snapshot_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lockers.json");
    std::fs::write(&path, b"{not json").unwrap();

    let (actor, _client) = ResourceActor::<Locker>::new(10);
    let result = actor.with_persistence(Box::new(JsonSnapshot::new(&path)));
    assert!(matches!(
        result,
        Err(actor_framework::SnapshotError::Encoding { .. })
    ));
}

#[tokio::test]
async fn test_snapshot_breaking_invariants_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lockers.json");
    std::fs::write(
        &path,
        br#"{"next_id":2,"entities":[{"id":1,"name":"  ","tokens":[]}]}"#,
    )
    .unwrap();

    let (actor, _client) = ResourceActor::<Locker>::new(10);
    let result = actor.with_persistence(Box::new(JsonSnapshot::new(&path)));
    assert!(matches!(
        result,
        Err(actor_framework::SnapshotError::Invalid { ref entity, .. }) if entity == "1"
    ));
}
