//! Integration tests for the client operation surface.
//!
//! These tests require a MongoDB server to be running.
//! Set MONGODB_URI and run with `cargo test -- --ignored`.

use bson::{doc, oid::ObjectId, Document as BsonDocument};
use loadx_mongodb::{connect, BridgeError, ClientConfig, ClientHandle};

const DB: &str = "loadx_test";

async fn client() -> ClientHandle {
    let uri = std::env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    connect(&uri, ClientConfig::default()).await.unwrap()
}

/// Start every test from an empty, uniquely named collection
async fn fresh(client: &ClientHandle, name: &str) -> String {
    let collection = format!("{}_{}", name, ObjectId::new().to_hex());
    client.drop_collection(DB, &collection).await.unwrap();
    collection
}

fn without_id(mut doc: BsonDocument) -> BsonDocument {
    doc.remove("_id");
    doc
}

#[tokio::test]
async fn test_malformed_uri_returns_error() {
    let result = connect("mongodb://invalid::bad", ClientConfig::default()).await;
    assert!(matches!(result, Err(BridgeError::Configuration(_))));
}

#[tokio::test]
#[ignore] // Only run with --ignored flag when database is available
async fn test_insert_then_find_all_round_trip() {
    let client = client().await;
    let col = fresh(&client, "round_trip").await;

    client.insert(DB, &col, doc! { "name": "a" }).await.unwrap();

    let docs = client.find_all(DB, &col).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].get_str("name").unwrap(), "a");
    assert!(docs[0].contains_key("_id"));

    client.drop_collection(DB, &col).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_insert_many_round_trip() {
    let client = client().await;
    let col = fresh(&client, "bulk").await;

    let batch = vec![doc! { "x": 1 }, doc! { "x": 2 }, doc! { "x": 3 }];
    client.insert_many(DB, &col, batch.clone()).await.unwrap();

    let mut stored: Vec<BsonDocument> = client
        .find_all(DB, &col)
        .await
        .unwrap()
        .into_iter()
        .map(without_id)
        .collect();
    stored.sort_by_key(|d| d.get_i32("x").unwrap());
    assert_eq!(stored, batch);

    client.drop_collection(DB, &col).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_find_limit_honored() {
    let client = client().await;
    let col = fresh(&client, "limit").await;

    client
        .insert_many(DB, &col, vec![doc! { "x": 1 }, doc! { "x": 2 }, doc! { "x": 3 }])
        .await
        .unwrap();

    assert_eq!(client.find(DB, &col, doc! {}, 2).await.unwrap().len(), 2);
    assert_eq!(client.find(DB, &col, doc! {}, 10).await.unwrap().len(), 3);
    assert_eq!(client.find(DB, &col, doc! {}, 0).await.unwrap().len(), 3);
    assert_eq!(client.find(DB, &col, doc! {}, -1).await.unwrap().len(), 3);

    client.drop_collection(DB, &col).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_find_passes_operator_filters_through() {
    let client = client().await;
    let col = fresh(&client, "operators").await;

    client
        .insert_many(DB, &col, (1..=5).map(|x| doc! { "x": x }).collect())
        .await
        .unwrap();

    let docs = client
        .find(DB, &col, doc! { "$or": [ { "x": { "$lt": 2 } }, { "x": { "$gte": 5 } } ] }, 0)
        .await
        .unwrap();
    assert_eq!(docs.len(), 2);

    client.drop_collection(DB, &col).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_find_one_missing_is_none() {
    let client = client().await;
    let col = fresh(&client, "find_one").await;

    client.insert(DB, &col, doc! { "k": "v" }).await.unwrap();

    let missing = client
        .find_one(DB, &col, doc! { "k": "missing" })
        .await
        .unwrap();
    assert!(missing.is_none());

    let found = client
        .find_one(DB, &col, doc! { "k": "v" })
        .await
        .unwrap()
        .expect("document should exist");
    assert_eq!(found.get_str("k").unwrap(), "v");

    client.drop_collection(DB, &col).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_find_one_picks_smallest_id() {
    let client = client().await;
    let col = fresh(&client, "smallest_id").await;

    client
        .insert_many(
            DB,
            &col,
            vec![
                doc! { "_id": 3, "tag": "x" },
                doc! { "_id": 1, "tag": "x" },
                doc! { "_id": 2, "tag": "x" },
            ],
        )
        .await
        .unwrap();

    let found = client
        .find_one(DB, &col, doc! { "tag": "x" })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.get_i32("_id").unwrap(), 1);

    client.drop_collection(DB, &col).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_update_one_sets_fields_only() {
    let client = client().await;
    let col = fresh(&client, "update").await;

    client
        .insert(DB, &col, doc! { "a": "1", "b": "2" })
        .await
        .unwrap();
    client
        .update_one(DB, &col, doc! { "a": "1" }, doc! { "b": "9" })
        .await
        .unwrap();

    let found = client
        .find_one(DB, &col, doc! { "a": "1" })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.get_str("a").unwrap(), "1");
    assert_eq!(found.get_str("b").unwrap(), "9");

    client.drop_collection(DB, &col).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_delete_one_and_delete_many() {
    let client = client().await;
    let col = fresh(&client, "delete").await;

    let tagged = |n: usize| (0..n).map(|i| doc! { "tag": "x", "i": i as i32 }).collect::<Vec<_>>();
    client.insert_many(DB, &col, tagged(5)).await.unwrap();

    client.delete_one(DB, &col, doc! { "tag": "x" }).await.unwrap();
    assert_eq!(client.find_all(DB, &col).await.unwrap().len(), 4);

    client.delete_many(DB, &col, doc! { "tag": "x" }).await.unwrap();
    assert!(client.find_all(DB, &col).await.unwrap().is_empty());

    client.drop_collection(DB, &col).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_drop_collection_is_total() {
    let client = client().await;
    let col = fresh(&client, "drop").await;

    client
        .insert_many(DB, &col, vec![doc! { "n": 1 }, doc! { "n": 2 }])
        .await
        .unwrap();
    client.drop_collection(DB, &col).await.unwrap();

    assert!(client.find_all(DB, &col).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_duplicate_key_is_write_rejected() {
    let client = client().await;
    let col = fresh(&client, "duplicate").await;

    client.insert(DB, &col, doc! { "_id": "same" }).await.unwrap();
    let err = client.insert(DB, &col, doc! { "_id": "same" }).await.unwrap_err();
    assert!(matches!(err, BridgeError::WriteRejected(_)), "{err}");

    client.drop_collection(DB, &col).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_shared_handle_across_tasks() {
    let client = client().await;
    let col = fresh(&client, "shared").await;

    let mut tasks = Vec::new();
    for vu in 0..8 {
        let client = client.clone();
        let col = col.clone();
        tasks.push(tokio::spawn(async move {
            client.insert(DB, &col, doc! { "vu": vu }).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(client.find_all(DB, &col).await.unwrap().len(), 8);

    client.drop_collection(DB, &col).await.unwrap();
}
